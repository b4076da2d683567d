//! Output rendering for generated configs.
//!
//! YAML rendering never fails: a serialization error is reported in place
//! of the document. Target lists are printed as flow sequences. JSON rendering only emits the first target list and
//! its errors are fatal to the caller.

use super::PrometheusConfig;
use console::Style;
use failure::{Fallible, ResultExt};
use serde::Serialize;

/// Output format for a generated config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Full document as YAML, optionally colorized.
    Structured { color: bool },
    /// First target list as indented JSON.
    Json,
}

/// Render a config in the requested format.
pub(crate) fn render(cfg: &PrometheusConfig, format: OutputFormat) -> Fallible<String> {
    let out = match format {
        OutputFormat::Structured { color } => render_yaml(cfg, color),
        OutputFormat::Json => render_json(cfg)?,
    };
    Ok(out)
}

fn render_yaml(cfg: &PrometheusConfig, color: bool) -> String {
    let doc = match serde_yaml::to_string(cfg) {
        Ok(doc) => doc,
        Err(e) => return format!("error creating config string: {}", e),
    };
    let doc = flow_sequence(doc.trim_end(), "targets");
    if color {
        Style::new().green().apply_to(doc).to_string()
    } else {
        doc
    }
}

/// Rewrite the scalar block sequences under `key` as flow sequences.
///
/// Items are taken as emitted, quoted items stay quoted. Plain items
/// holding flow indicators get single-quoted.
fn flow_sequence(doc: &str, key: &str) -> String {
    let marker = format!("{}:", key);
    let mut out = vec![];
    let mut lines = doc.lines().peekable();

    while let Some(line) = lines.next() {
        let body = line.trim_start_matches(|c: char| c == ' ' || c == '-');
        if body != marker {
            out.push(line.to_string());
            continue;
        }

        let column = line.len() - body.len();
        let mut items = vec![];
        while let Some(next) = lines.peek() {
            let item = next.trim_start_matches(' ');
            let indent = next.len() - item.len();
            if indent < column || indent > column + 2 || !item.starts_with("- ") {
                break;
            }
            items.push(flow_item(&item[2..]));
            lines.next();
        }

        if items.is_empty() {
            out.push(line.to_string());
        } else {
            out.push(format!("{} [{}]", line, items.join(", ")));
        }
    }

    out.join("\n")
}

fn flow_item(item: &str) -> String {
    let quoted = item.starts_with('\'') || item.starts_with('"');
    if !quoted && item.contains(|c: char| ",[]{}".contains(c)) {
        format!("'{}'", item.replace('\'', "''"))
    } else {
        item.to_string()
    }
}

fn render_json(cfg: &PrometheusConfig) -> Fallible<String> {
    let targets = cfg
        .scrape_configs
        .first()
        .and_then(|scrape| scrape.static_configs.first())
        .map(|stat| &stat.targets)
        .ok_or_else(|| format_err!("no scrape targets to render"))?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    targets
        .serialize(&mut ser)
        .context("unable to marshal into JSON")?;

    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prometheus::{assemble, Template};

    fn sample() -> PrometheusConfig {
        assemble(Template::Current, "T0k3n.abc", "http", "play.min.io:9000")
    }

    #[test]
    fn yaml_contains_all_fields() {
        let out = render(&sample(), OutputFormat::Structured { color: false }).unwrap();

        assert!(out.starts_with("scrape_configs:"));
        for value in &[
            "minio-job",
            "/minio/v2/metrics/cluster",
            "http",
            "play.min.io:9000",
            "T0k3n.abc",
        ] {
            assert!(out.contains(value), "missing '{}' in:\n{}", value, out);
        }
        for key in &[
            "job_name",
            "bearer_token",
            "metrics_path",
            "scheme",
            "static_configs",
            "targets",
        ] {
            assert!(out.contains(key), "missing key '{}' in:\n{}", key, out);
        }
    }

    #[test]
    fn yaml_targets_in_flow_style() {
        let out = render(&sample(), OutputFormat::Structured { color: false }).unwrap();
        assert!(
            out.contains("targets: [play.min.io:9000]"),
            "block-style targets in:\n{}",
            out
        );

        let doc: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        let targets = &doc["scrape_configs"][0]["static_configs"][0]["targets"];
        assert_eq!(targets[0].as_str(), Some("play.min.io:9000"));
        assert_eq!(doc["scrape_configs"][0]["scheme"].as_str(), Some("http"));
    }

    #[test]
    fn flow_sequence_layouts() {
        let doc = "static_configs:\n- targets:\n  - a:1\n  - 'b c'\n  - x,y\n  labels: {}";
        assert_eq!(
            flow_sequence(doc, "targets"),
            "static_configs:\n- targets: [a:1, 'b c', 'x,y']\n  labels: {}"
        );

        let doc = "job:\n  targets:\n    - h:9000\nnext: 1";
        assert_eq!(
            flow_sequence(doc, "targets"),
            "job:\n  targets: [h:9000]\nnext: 1"
        );

        let doc = "- targets: []\n- other: 1";
        assert_eq!(flow_sequence(doc, "targets"), doc);
    }

    #[test]
    fn yaml_omits_empty_optional_fields() {
        let mut cfg = sample();
        cfg.scrape_configs[0].scheme = String::new();
        cfg.scrape_configs[0].static_configs.clear();

        let out = render(&cfg, OutputFormat::Structured { color: false }).unwrap();
        assert!(!out.contains("scheme"));
        assert!(!out.contains("static_configs"));
        assert!(out.contains("bearer_token"));
    }

    #[test]
    fn json_renders_first_target_list() {
        let out = render(&sample(), OutputFormat::Json).unwrap();
        assert_eq!(out, "[\n \"play.min.io:9000\"\n]");
    }

    #[test]
    fn json_without_targets_fails() {
        let mut cfg = sample();
        cfg.scrape_configs[0].static_configs.clear();
        assert!(render(&cfg, OutputFormat::Json).is_err());

        let empty = PrometheusConfig {
            scrape_configs: vec![],
        };
        assert!(render(&empty, OutputFormat::Json).is_err());
    }
}
