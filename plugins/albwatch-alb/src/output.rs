//! Host-agent emission
//!
//! The agent consumes two surfaces: flat `name<TAB>value<TAB>epoch` metric
//! lines on stdout, and a graph-definition document printed when the agent
//! negotiates definitions at registration.

use std::collections::BTreeMap;
use std::io::{self, Write};

use albwatch_lb_latency::{GraphDef, MetricSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Env var the host agent sets when it wants graph definitions instead of
/// values
pub const PLUGIN_META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

const META_HEADER: &str = "# mackerel-agent-plugin";

#[derive(Serialize)]
struct Definitions<'a> {
    graphs: &'a BTreeMap<String, GraphDef>,
}

/// Write one metric line per snapshot entry
pub fn write_snapshot<W: Write>(
    out: &mut W,
    snapshot: &MetricSnapshot,
    at: DateTime<Utc>,
) -> io::Result<()> {
    let epoch = at.timestamp();
    for (key, value) in snapshot.iter() {
        writeln!(out, "{}\t{}\t{}", key, value, epoch)?;
    }
    Ok(())
}

/// Write the graph-definition document
pub fn write_definitions<W: Write>(
    out: &mut W,
    graphs: &BTreeMap<String, GraphDef>,
) -> anyhow::Result<()> {
    writeln!(out, "{}", META_HEADER)?;
    let document = serde_json::to_string(&Definitions { graphs })?;
    writeln!(out, "{}", document)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use albwatch_lb_latency::graph_definitions;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_lines_are_tab_separated() {
        let mut snapshot = MetricSnapshot::new();
        snapshot.insert("alb.p99".to_string(), 120.5);
        snapshot.insert("alb.tg-a.p50".to_string(), 14.0);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut out = Vec::new();
        write_snapshot(&mut out, &snapshot, at).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "alb.p99\t120.5\t1714564800\nalb.tg-a.p50\t14\t1714564800\n");
    }

    #[test]
    fn test_definitions_document_shape() {
        let graphs = graph_definitions("alb");

        let mut out = Vec::new();
        write_definitions(&mut out, &graphs).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(META_HEADER));

        let document: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert!(document["graphs"]["alb"].is_object());
        assert!(document["graphs"]["alb.#"].is_object());
        assert_eq!(document["graphs"]["alb"]["metrics"][0]["name"], "p99");
    }
}
