use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Objects become key/value tables with nested objects flattened to dotted
/// keys; arrays of objects become one column per key; arrays of objects
/// inside an object are appended as their own tables.
fn render_table(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::Array(items) => Ok(render_rows(items)),
        Value::Object(map) => {
            let mut pairs = Vec::new();
            let mut sections = Vec::new();
            for (key, field) in map {
                match field {
                    Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                        sections.push(format!("{key}:\n{}", render_rows(items)));
                    }
                    _ => flatten(key, field, &mut pairs),
                }
            }

            let rows = pairs
                .into_iter()
                .map(|(key, cell)| vec![key, cell])
                .collect::<Vec<_>>();
            let mut out = table::render_table(&["key", "value"], &rows, options());
            for section in sections {
                out.push_str("\n\n");
                out.push_str(&section);
            }
            Ok(out)
        }
        scalar => Ok(table::render_table(&["value"], &[vec![cell(scalar)]], options())),
    }
}

fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, options());
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render_table(&header_refs, &rows, options())
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                flatten(&format!("{prefix}.{key}"), nested, out);
            }
        }
        other => out.push((prefix.to_string(), cell(other))),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) if v.is_empty() => String::from("-"),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        path: &'static str,
        sha256: &'static str,
    }

    #[derive(Serialize)]
    struct Report {
        freshness: &'static str,
        previous: Option<&'static str>,
        params: serde_json::Value,
        sources: Vec<Row>,
    }

    fn report() -> Report {
        Report {
            freshness: "changed",
            previous: None,
            params: serde_json::json!({ "label": "cat", "strict": true }),
            sources: vec![Row {
                path: "clip.mp4",
                sha256: "abc",
            }],
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&report(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["freshness"], "changed");
        assert_eq!(parsed["params"]["strict"], true);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&report(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert!(parsed["previous"].is_null());
    }

    #[test]
    fn table_flattens_nested_objects_and_appends_row_sections() {
        let out = render(&report(), OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("params.label"));
        assert!(out.contains("params.strict"));
        assert!(out.contains("sources:"));
        assert!(out.contains("clip.mp4"));
    }

    #[test]
    fn table_for_array_uses_field_columns() {
        let rows = vec![
            Row {
                path: "a.mp4",
                sha256: "1",
            },
            Row {
                path: "b.mp4",
                sha256: "2",
            },
        ];
        let out = render(&rows, OutputFormat::Table).expect("table render should work");
        let header = out.lines().next().unwrap_or_default();
        assert!(header.starts_with("path"));
        assert!(header.contains("sha256"));
    }
}
