//! Structural export to XML and YAML. Pure tree-to-string transforms with
//! no external dependency; a minor utility next to the sync engine.

use crate::document::serialize;
use serde_json::Value;

/// Scalar text used by both exporters: string content without quotes,
/// everything else in its JSON form (`true`, `null`, `1.5`). Containers
/// reaching this fall back to their minified JSON text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serialize(other, false),
    }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Converts a JSON tree to XML under a `<root>` element. Each array element
/// repeats its parent key as the tag, so `{"x": [1, 2]}` becomes
/// `<root><x>1</x><x>2</x></root>`.
pub fn to_xml(value: &Value) -> String {
    let mut out = String::from("<root>");
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                object_entry_to_xml(key, child, &mut out);
            }
        }
        other => out.push_str(&xml_escape(&scalar_text(other))),
    }
    out.push_str("</root>");
    out
}

fn object_entry_to_xml(key: &str, value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(key, item, out);
            }
        }
        other => write_element(key, other, out),
    }
}

fn write_element(tag: &str, value: &Value, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                object_entry_to_xml(key, child, out);
            }
        }
        other => out.push_str(&xml_escape(&scalar_text(other))),
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Converts a JSON tree to YAML-style text: two spaces per nesting level,
/// `- `-prefixed array items, a bare `-` line introducing container items.
pub fn to_yaml(value: &Value) -> String {
    let mut lines = Vec::new();
    yaml_lines(value, 0, &mut lines);
    lines.join("\n")
}

fn yaml_lines(value: &Value, indent: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if child.is_object() || child.is_array() {
                    lines.push(format!("{}{}:", pad, key));
                    yaml_lines(child, indent + 1, lines);
                } else {
                    lines.push(format!("{}{}: {}", pad, key, scalar_text(child)));
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if item.is_object() || item.is_array() {
                    lines.push(format!("{}-", pad));
                    yaml_lines(item, indent + 1, lines);
                } else {
                    lines.push(format!("{}- {}", pad, scalar_text(item)));
                }
            }
        }
        other => lines.push(format!("{}{}", pad, scalar_text(other))),
    }
}
