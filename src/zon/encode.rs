use serde_json::Value;

const INDENT: &str = "  ";
const QUOTE_TRIGGERS: [char; 6] = ['"', '#', '[', ']', '{', '}'];

pub(super) fn encode_document(value: &Value) -> String {
    let mut lines = Vec::new();
    match value {
        Value::Object(map) if map.is_empty() => {}
        Value::Object(_) => write_block(value, 0, &mut lines),
        Value::Array(items) if is_scalar_only(items) => lines.push(inline_list(items)),
        Value::Array(_) => write_block(value, 0, &mut lines),
        Value::String(s) if s == "-" => lines.push(quote(s)),
        scalar => lines.push(safe_scalar(scalar)),
    }
    lines.join("\n")
}

/// Text form of a scalar value.
///
/// `null`, booleans and numbers are written as literals. Strings are written bare unless
/// they are empty or contain whitespace or one of `" # [ ] { }`, in which case they are
/// double-quoted with escapes. Strings spelling `true`/`false`/`null` are lowercased.
pub fn safe_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => safe_str(s),
        Value::Array(_) | Value::Object(_) => quote(&value.to_string()),
    }
}

fn safe_str(s: &str) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }
    let lower = s.to_ascii_lowercase();
    if matches!(lower.as_str(), "true" | "false" | "null") {
        return lower;
    }
    if super::decode::is_numeric(s) {
        return s.to_string();
    }
    if needs_quotes(s) {
        return quote(s);
    }
    s.to_string()
}

fn needs_quotes(s: &str) -> bool {
    let single_quoted = s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'');
    single_quoted
        || s
            .chars()
            .any(|c| c.is_whitespace() || QUOTE_TRIGGERS.contains(&c))
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn encode_key(key: &str) -> String {
    if key.is_empty() || key == "-" || needs_quotes(key) {
        quote(key)
    } else {
        key.to_string()
    }
}

fn is_nested(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn is_scalar_only(items: &[Value]) -> bool {
    !items.iter().any(is_nested)
}

fn inline_list(items: &[Value]) -> String {
    if items.is_empty() {
        return "[ ]".to_string();
    }
    let parts: Vec<String> = items
        .iter()
        .map(|item| match item {
            Value::String(s) if s.contains(',') => quote(s),
            other => safe_scalar(other),
        })
        .collect();
    format!("[ {} ]", parts.join(", "))
}

/// Text written after a key or item marker, or `None` when the value needs its own block.
fn inline_value(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) if map.is_empty() => Some("{}".to_string()),
        Value::Object(_) => None,
        Value::Array(items) if is_scalar_only(items) => Some(inline_list(items)),
        Value::Array(_) => None,
        scalar => Some(safe_scalar(scalar)),
    }
}

fn write_block(value: &Value, indent: usize, lines: &mut Vec<String>) {
    let pad = INDENT.repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let key = encode_key(key);
                match inline_value(child) {
                    Some(text) => lines.push(format!("{pad}{key} {text}")),
                    None => {
                        lines.push(format!("{pad}{key}"));
                        write_block(child, indent + 1, lines);
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match inline_value(item) {
                    Some(text) => lines.push(format!("{pad}- {text}")),
                    None => {
                        lines.push(format!("{pad}-"));
                        write_block(item, indent + 1, lines);
                    }
                }
            }
        }
        scalar => lines.push(format!("{pad}{}", safe_scalar(scalar))),
    }
}
