use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => render_array_table(&items),
        // Envelope responses (`{"events": [...]}`) render their single list.
        Value::Object(map) if map.len() == 1 && map.values().all(Value::is_array) => {
            let items = map.into_iter().next().map(|(_, v)| v);
            match items {
                Some(Value::Array(items)) => render_array_table(&items),
                _ => Ok(String::from("(no rows)")),
            }
        }
        Value::Object(map) => {
            let headers = ["key", "value"];
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut rows = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                rows.push(vec![key, value_to_cell(&value)]);
            }
            Ok(table::render_entity_table(&headers, &rows, options))
        }
        scalar => {
            let headers = ["value"];
            let rows = vec![vec![value_to_cell(&scalar)]];
            Ok(table::render_entity_table(&headers, &rows, options))
        }
    }
}

fn render_array_table(items: &[Value]) -> anyhow::Result<String> {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    if items.is_empty() {
        return Ok(String::from("(no rows)"));
    }

    let all_objects = items.iter().all(Value::is_object);
    if !all_objects {
        let headers = ["value"];
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return Ok(table::render_entity_table(&headers, &rows, options));
    }

    let mut headers = Vec::<String>::new();
    for item in items {
        if let Some(map) = item.as_object() {
            for key in map.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    if headers.is_empty() {
        return Ok(String::from("(no columns)"));
    }

    headers.sort();

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Ok(table::render_entity_table(&header_refs, &rows, options))
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sima_core::enums::{ScoreStatus, Stage};
    use sima_core::responses::{AdvanceResponse, ScoreResponse, TimelineResponse};

    use super::render;
    use crate::cli::OutputFormat;

    fn reference_score() -> ScoreResponse {
        ScoreResponse {
            identity: 90.0,
            climate: 85.0,
            context: 70.0,
            function: 88.0,
            human: 75.0,
            total: 82.6,
            status: ScoreStatus::Pass,
        }
    }

    fn timeline() -> TimelineResponse {
        serde_json::from_value(json!({
            "events": [
                {
                    "project_id": "prj-1",
                    "seq": 1,
                    "kind": "UPLOAD",
                    "payload": {"actor": "consultant"},
                    "at": "2026-02-09T14:30:00Z"
                },
                {
                    "project_id": "prj-1",
                    "seq": 2,
                    "kind": "ANALYSIS",
                    "payload": {"complete": true, "total": 82.6},
                    "at": "2026-02-09T14:30:01Z"
                }
            ]
        }))
        .expect("timeline fixture should deserialize")
    }

    #[test]
    fn score_table_has_one_row_per_field() {
        let out = render(&reference_score(), OutputFormat::Table).expect("table render should work");
        let keys: Vec<&str> = out
            .lines()
            .skip(2)
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(
            keys,
            vec!["climate", "context", "function", "human", "identity", "status", "total"]
        );
        let status = out.lines().find(|l| l.starts_with("status")).expect("status row");
        assert!(status.contains("PASS"), "{out}");
        let total = out.lines().find(|l| l.starts_with("total")).expect("total row");
        assert!(total.trim_end().ends_with("82.6"), "{out}");
    }

    #[test]
    fn score_json_keeps_the_wire_shape() {
        let out = render(&reference_score(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["status"], "PASS");
        assert_eq!(parsed["total"], 82.6);
    }

    #[test]
    fn advance_raw_is_single_line_json() {
        let moved = AdvanceResponse {
            stage: Stage::Review("technical_review".into()),
            version: 1,
        };
        let out = render(&moved, OutputFormat::Raw).expect("raw render should work");
        assert_eq!(out, r#"{"stage":"technical_review","version":1}"#);
    }

    #[test]
    fn timeline_envelope_renders_events_as_rows() {
        let out = render(&timeline(), OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4, "{out}");
        for column in ["at", "kind", "payload", "project_id", "seq"] {
            assert!(lines[0].contains(column), "missing {column}: {out}");
        }
        assert!(lines[2].contains("UPLOAD") && lines[2].contains(r#"{"actor":"consultant"}"#));
        assert!(lines[3].contains("ANALYSIS"));
    }

    #[test]
    fn empty_timeline_has_no_rows() {
        let empty = TimelineResponse { events: vec![] };
        let out = render(&empty, OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "(no rows)");
    }
}
