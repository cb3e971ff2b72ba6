//! Hand-written document text parser and writer.
//!
//! Persisted world documents are produced and consumed by this pair alone,
//! and both sides share a deliberate limitation: a backslash protects the
//! following quote while member boundaries are located, but escape
//! sequences are never decoded, and the writer never escapes what it
//! emits. Externally-produced documents rely on this asymmetry, so it is
//! part of the format rather than a defect to fix.

use std::collections::BTreeMap;

use crate::error::ParseError;
use crate::limits::MAX_DEPTH;
use crate::model::Value;

// =============================================================================
// PARSING
// =============================================================================

/// Parses document text into a value tree.
///
/// Recursive descent keyed on the first non-whitespace character of the
/// current slice. Fails with a [`ParseError`] on the first structural
/// error: an unterminated container or string, a non-numeric number token,
/// or an unknown literal.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    parse_value(text, 0)
}

fn parse_value(text: &str, depth: usize) -> Result<Value, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::DepthLimitExceeded { max: MAX_DEPTH });
    }
    let text = text.trim();
    let Some(first) = text.chars().next() else {
        return Err(ParseError::MalformedDocument { context: "empty value" });
    };
    match first {
        '{' => parse_object(text, depth),
        '[' => parse_array(text, depth),
        '"' => parse_string(text),
        _ => parse_scalar(text),
    }
}

fn parse_object(text: &str, depth: usize) -> Result<Value, ParseError> {
    let mut entries = BTreeMap::new();
    for part in split_top_level(text)? {
        let (key, value) = split_member(&part)?;
        let Value::Text(key) = parse_value(key, depth + 1)? else {
            // split_member guarantees the key slice is a quoted string
            return Err(ParseError::MalformedDocument { context: "object key must be text" });
        };
        entries.insert(key, parse_value(value, depth + 1)?);
    }
    Ok(Value::Map(entries))
}

fn parse_array(text: &str, depth: usize) -> Result<Value, ParseError> {
    let mut items = Vec::new();
    for part in split_top_level(text)? {
        items.push(parse_value(&part, depth + 1)?);
    }
    Ok(Value::List(items))
}

/// Strips the surrounding quotes. Escape sequences in the payload are kept
/// verbatim.
fn parse_string(text: &str) -> Result<Value, ParseError> {
    if text.len() < 2 || !text.ends_with('"') {
        return Err(ParseError::MalformedDocument { context: "unterminated string literal" });
    }
    Ok(Value::Text(text[1..text.len() - 1].to_string()))
}

fn parse_scalar(token: &str) -> Result<Value, ParseError> {
    if token.contains(['.', 'e', 'E']) {
        token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ParseError::InvalidNumber { token: token.to_string() })
    } else if token == "null" {
        Ok(Value::Null)
    } else {
        token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ParseError::UnknownLiteral { token: token.to_string() })
    }
}

/// Splits an object member slice into its quoted key and its value text.
///
/// The key ends at the first unescaped `"` after the opening quote; the
/// scan uses a one-character lookback, so a `\` suppresses exactly the
/// next character's quote check.
fn split_member(part: &str) -> Result<(&str, &str), ParseError> {
    let bytes = part.as_bytes();
    if bytes.first() != Some(&b'"') {
        return Err(ParseError::MalformedDocument { context: "object key must be a quoted string" });
    }

    let mut ignore = false;
    let mut end = None;
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        if ignore {
            ignore = false;
            continue;
        }
        if b == b'\\' {
            ignore = true;
        } else if b == b'"' {
            end = Some(i);
            break;
        }
    }
    let Some(end) = end else {
        return Err(ParseError::MalformedDocument { context: "unterminated object key" });
    };

    if bytes.get(end + 1) != Some(&b':') {
        return Err(ParseError::MalformedDocument { context: "object member missing ':' separator" });
    }
    Ok((&part[..=end], &part[end + 2..]))
}

/// Splits the body of a container into its top-level comma-separated
/// parts.
///
/// State machine over (ignore-next-char, in-string, bracket-depth).
/// Whitespace outside strings is dropped entirely, characters before the
/// opening bracket are ignored, and a comma only counts at depth exactly
/// one. The close bracket that returns the depth to zero terminates the
/// split, flushing any non-empty trailing part; running out of input
/// first means the container never closed.
fn split_top_level(text: &str) -> Result<Vec<String>, ParseError> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut ignore = false;
    let mut depth = 0usize;

    for c in text.chars() {
        if ignore {
            ignore = false;
            current.push(c);
        } else if in_string {
            ignore = c == '\\';
            in_string = c != '"';
            current.push(c);
        } else if c.is_whitespace() {
            continue;
        } else if depth == 0 {
            if c == '{' || c == '[' {
                depth = 1;
            }
        } else if depth == 1 {
            match c {
                '{' | '[' => {
                    current.push(c);
                    depth = 2;
                }
                '}' | ']' => {
                    if !current.is_empty() {
                        parts.push(current);
                    }
                    return Ok(parts);
                }
                '"' => {
                    in_string = true;
                    current.push(c);
                }
                ',' => parts.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        } else {
            if c == '{' || c == '[' {
                depth += 1;
            }
            if c == '}' || c == ']' {
                depth -= 1;
            }
            if c == '"' {
                in_string = true;
            }
            current.push(c);
        }
    }

    Err(ParseError::MalformedDocument { context: "unterminated container" })
}

// =============================================================================
// WRITING
// =============================================================================

/// Renders a value tree as document text.
///
/// Integers and floats use their default textual form and strings are
/// wrapped in quotes with no escaping applied, matching what the parser
/// accepts. Flat output carries no whitespace outside strings; `pretty`
/// wraps each container in newlines and re-indents every nested value's
/// internal newlines by one tab stop relative to its container.
pub fn write(value: &Value, pretty: bool) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Text(s) => format!("\"{s}\""),
        Value::List(items) => {
            let mut out = String::from("[");
            for item in items {
                if out.len() > 1 {
                    out.push(',');
                }
                push_element(&mut out, &write(item, pretty), pretty);
            }
            out.push_str(if pretty { "\n]" } else { "]" });
            out
        }
        Value::Map(entries) => {
            let mut out = String::from("{");
            for (key, value) in entries {
                if out.len() > 1 {
                    out.push(',');
                }
                push_element(&mut out, &format!("\"{}\": {}", key, write(value, pretty)), pretty);
            }
            out.push_str(if pretty { "\n}" } else { "}" });
            out
        }
    }
}

fn push_element(out: &mut String, rendered: &str, pretty: bool) {
    if pretty {
        out.push_str("\n\t");
        out.push_str(&rendered.replace('\n', "\n\t"));
    } else {
        out.push_str(rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("5").unwrap(), Value::Int(5));
        assert_eq!(parse("-17").unwrap(), Value::Int(-17));
        assert_eq!(parse("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(parse("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("\"hi\"").unwrap(), Value::Text("hi".into()));
    }

    #[test]
    fn test_parse_containers() {
        assert_eq!(parse("[]").unwrap(), Value::List(vec![]));
        assert_eq!(parse("{}").unwrap(), Value::Map(BTreeMap::new()));
        assert_eq!(
            parse("[1,\"a\",null]").unwrap(),
            Value::List(vec![Value::Int(1), Value::Text("a".into()), Value::Null])
        );
        assert_eq!(
            parse("{\"a\": 1, \"b\": [2, 3]}").unwrap(),
            map(&[("a", Value::Int(1)), ("b", Value::List(vec![Value::Int(2), Value::Int(3)]))])
        );
    }

    #[test]
    fn test_parse_nested() {
        let parsed = parse("{\"outer\": {\"inner\": [[1], {\"deep\": null}]}}").unwrap();
        let expected = map(&[(
            "outer",
            map(&[(
                "inner",
                Value::List(vec![Value::List(vec![Value::Int(1)]), map(&[("deep", Value::Null)])]),
            )]),
        )]);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_skips_whitespace_outside_strings() {
        assert_eq!(
            parse(" { \"a b\" :\n\t[ 1 , 2 ] } ").unwrap(),
            map(&[("a b", Value::List(vec![Value::Int(1), Value::Int(2)]))])
        );
    }

    #[test]
    fn test_parse_escaped_quote_protected_not_decoded() {
        // The backslash protects the quote during splitting, but the
        // payload keeps the escape sequence verbatim.
        let parsed = parse("{\"k\": \"a\\\"b\", \"n\": 1}").unwrap();
        assert_eq!(
            parsed,
            map(&[("k", Value::Text("a\\\"b".into())), ("n", Value::Int(1))])
        );
    }

    #[test]
    fn test_parse_escaped_quote_in_key() {
        let parsed = parse("{\"a\\\"b\": 1}").unwrap();
        assert_eq!(parsed, map(&[("a\\\"b", Value::Int(1))]));
    }

    #[test]
    fn test_parse_commas_inside_nested_containers() {
        assert_eq!(
            parse("[[1,2],[3,4]]").unwrap(),
            Value::List(vec![
                Value::List(vec![Value::Int(1), Value::Int(2)]),
                Value::List(vec![Value::Int(3), Value::Int(4)]),
            ])
        );
    }

    #[test]
    fn test_parse_commas_inside_strings() {
        assert_eq!(
            parse("[\"a,b\",1]").unwrap(),
            Value::List(vec![Value::Text("a,b".into()), Value::Int(1)])
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse("[1, 2").unwrap_err(),
            ParseError::MalformedDocument { context: "unterminated container" }
        ));
        assert!(matches!(
            parse("{\"a\": \"unclosed").unwrap_err(),
            ParseError::MalformedDocument { context: "unterminated container" }
        ));
        assert!(matches!(parse("").unwrap_err(), ParseError::MalformedDocument { .. }));
        assert!(matches!(parse("[1,,2]").unwrap_err(), ParseError::MalformedDocument { .. }));
        assert!(matches!(parse("{1: 2}").unwrap_err(), ParseError::MalformedDocument { .. }));
        assert!(matches!(parse("{\"a\" 1}").unwrap_err(), ParseError::MalformedDocument { .. }));
    }

    #[test]
    fn test_parse_bad_tokens() {
        assert_eq!(
            parse("1.2.3").unwrap_err(),
            ParseError::InvalidNumber { token: "1.2.3".into() }
        );
        assert_eq!(parse("true").unwrap_err(), ParseError::UnknownLiteral { token: "true".into() });
        assert_eq!(parse("nil").unwrap_err(), ParseError::UnknownLiteral { token: "nil".into() });
    }

    #[test]
    fn test_parse_depth_limit() {
        let mut hostile = String::new();
        for _ in 0..(MAX_DEPTH + 2) {
            hostile.push('[');
        }
        for _ in 0..(MAX_DEPTH + 2) {
            hostile.push(']');
        }
        assert_eq!(parse(&hostile).unwrap_err(), ParseError::DepthLimitExceeded { max: MAX_DEPTH });
    }

    #[test]
    fn test_write_flat() {
        let doc = map(&[
            ("a", Value::Int(1)),
            ("b", Value::List(vec![Value::Float(0.5), Value::Text("x".into()), Value::Null])),
        ]);
        assert_eq!(write(&doc, false), "{\"a\": 1,\"b\": [0.5,\"x\",null]}");
    }

    #[test]
    fn test_write_pretty() {
        let doc = map(&[("a", Value::Int(1)), ("b", Value::List(vec![Value::Int(2), Value::Int(3)]))]);
        assert_eq!(write(&doc, true), "{\n\t\"a\": 1,\n\t\"b\": [\n\t\t2,\n\t\t3\n\t]\n}");
    }

    #[test]
    fn test_write_empty_containers() {
        assert_eq!(write(&Value::List(vec![]), false), "[]");
        assert_eq!(write(&Value::Map(BTreeMap::new()), false), "{}");
        assert_eq!(write(&Value::List(vec![]), true), "[\n]");
        assert_eq!(write(&Value::Map(BTreeMap::new()), true), "{\n}");
    }

    #[test]
    fn test_write_does_not_escape() {
        // Documented limitation: the writer emits string payloads verbatim.
        assert_eq!(write(&Value::Text("a\\\"b".into()), false), "\"a\\\"b\"");
    }

    #[test]
    fn test_write_parse_roundtrip() {
        let doc = map(&[
            ("format", Value::Text("standard_2".into())),
            ("list", Value::List(vec![Value::Int(-3), Value::Float(1.25), Value::Null])),
            ("nested", map(&[("k", Value::List(vec![map(&[("x", Value::Int(0))])]))])),
        ]);
        for pretty in [false, true] {
            assert_eq!(parse(&write(&doc, pretty)).unwrap(), doc, "pretty={pretty}");
        }
    }
}
