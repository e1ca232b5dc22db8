use serde_json::{Map, Number, Value};

use super::ZonError;

/// One non-blank line with comments stripped.
struct Line<'a> {
    number: usize,
    level: usize,
    content: &'a str,
}

impl Line<'_> {
    fn item(&self) -> Option<&str> {
        if self.content == "-" {
            Some("")
        } else {
            self.content.strip_prefix("- ").map(str::trim)
        }
    }
}

pub(super) fn decode_document(input: &str) -> Result<Value, ZonError> {
    let lines: Vec<Line<'_>> = input
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let stripped = strip_comment(raw).trim_end();
            let content = stripped.trim_start();
            if content.is_empty() {
                return None;
            }
            let indent = stripped.len() - stripped.trim_start_matches(' ').len();
            Some(Line {
                number: idx + 1,
                level: indent / 2,
                content,
            })
        })
        .collect();

    let Some(first) = lines.first() else {
        return Ok(Value::Object(Map::new()));
    };

    if lines.len() == 1 && first.item().is_none() {
        if first.content.starts_with('[') {
            return Ok(parse_literal(first.content));
        }
        if split_key(first)?.1.is_none() {
            return Ok(parse_literal(first.content));
        }
    }

    let mut pos = 0;
    let value = parse_block(&lines, &mut pos, 0)?;
    Ok(value)
}

/// Parses the lines at `pos` whose level is at least `min_level`.
fn parse_block(lines: &[Line<'_>], pos: &mut usize, min_level: usize) -> Result<Value, ZonError> {
    match lines.get(*pos) {
        Some(line) if line.item().is_some() => parse_sequence(lines, pos, min_level),
        _ => parse_mapping(lines, pos, min_level),
    }
}

fn parse_mapping(lines: &[Line<'_>], pos: &mut usize, min_level: usize) -> Result<Value, ZonError> {
    let mut map = Map::new();
    while let Some(line) = lines.get(*pos).filter(|l| l.level >= min_level) {
        if line.item().is_some() {
            return Err(ZonError::UnexpectedItem { line: line.number });
        }
        let (key, rest) = split_key(line)?;
        *pos += 1;

        let value = match rest {
            Some(text) => parse_literal(text),
            None => nested_or(lines, pos, line.level, Value::Object(Map::new()))?,
        };
        map.insert(key, value);
    }
    Ok(Value::Object(map))
}

fn parse_sequence(lines: &[Line<'_>], pos: &mut usize, min_level: usize) -> Result<Value, ZonError> {
    let mut items = Vec::new();
    while let Some(line) = lines.get(*pos).filter(|l| l.level >= min_level) {
        let Some(rest) = line.item() else {
            return Err(ZonError::UnexpectedEntry { line: line.number });
        };
        *pos += 1;

        let value = if rest.is_empty() {
            nested_or(lines, pos, line.level, Value::Null)?
        } else {
            parse_literal(rest)
        };
        items.push(value);
    }
    Ok(Value::Array(items))
}

/// The block indented under a line at `level`, or `empty` when nothing is nested there.
fn nested_or(
    lines: &[Line<'_>],
    pos: &mut usize,
    level: usize,
    empty: Value,
) -> Result<Value, ZonError> {
    match lines.get(*pos) {
        Some(next) if next.level > level => parse_block(lines, pos, level + 1),
        _ => Ok(empty),
    }
}

/// Splits `key rest`; a key may be double-quoted.
fn split_key<'a>(line: &Line<'a>) -> Result<(String, Option<&'a str>), ZonError> {
    let content = line.content;
    let (key, rest) = if let Some(body) = content.strip_prefix('"') {
        let end = closing_quote(body).ok_or(ZonError::UnterminatedKey { line: line.number })?;
        (unescape(&body[..end]), &body[end + 1..])
    } else {
        match content.find(char::is_whitespace) {
            Some(idx) => (content[..idx].to_string(), &content[idx..]),
            None => (content.to_string(), ""),
        }
    };

    let rest = rest.trim();
    Ok((key, (!rest.is_empty()).then_some(rest)))
}

/// Byte offset of the first unescaped `"` in `body`.
fn closing_quote(body: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(idx),
            _ => {}
        }
    }
    None
}

fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..idx],
            _ => {}
        }
    }
    line
}

/// Splits on commas outside double quotes.
fn split_list(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (idx, c) in inner.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(inner[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(inner[start..].trim());
    parts
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Optional sign, digits with an optional fraction, optional exponent.
pub(super) fn is_numeric(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

fn parse_number(t: &str) -> Option<Value> {
    if !is_numeric(t) {
        return None;
    }
    let integral = !t.contains(|c: char| matches!(c, '.' | 'e' | 'E'));
    if integral {
        if let Ok(n) = t.parse::<i64>() {
            return Some(Value::Number(n.into()));
        }
        if let Ok(n) = t.parse::<u64>() {
            return Some(Value::Number(n.into()));
        }
    }
    t.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Parses a value token: literals, quoted strings, inline lists, `{}`, numbers, else text.
pub fn parse_literal(token: &str) -> Value {
    let t = token.trim();
    match t {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "{}" => return Value::Object(Map::new()),
        _ => {}
    }

    if t.len() >= 2 {
        if let Some(inner) = t.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
            return Value::String(unescape(inner));
        }
        if let Some(inner) = t.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
            return Value::String(inner.to_string());
        }
    }

    if let Some(inner) = t.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let inner = inner.trim();
        if inner.is_empty() {
            return Value::Array(Vec::new());
        }
        return Value::Array(split_list(inner).into_iter().map(parse_literal).collect());
    }

    parse_number(t).unwrap_or_else(|| Value::String(t.to_string()))
}
