//! Dot-path addressing into configuration trees.
//!
//! `module.rules.0.loader` and `module.rules[0].loader` address the same node.
//! A bracketed, quoted segment holds a literal key: `resolve.alias["@app.core"]`.

use crate::core::value::Value;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn from_plain(text: &str) -> Segment {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = text.parse() {
                return Segment::Index(index);
            }
        }
        Segment::Key(text.to_string())
    }

    /// The segment as an object key.
    fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

/// Parse a path expression into segments.
///
/// Empty segments are skipped, so `""` and `"."` both parse to no segments.
/// Malformed brackets are kept as literal key text.
pub fn parse(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut rest = path;

    while let Some(c) = rest.chars().next() {
        match c {
            '.' => {
                flush(&mut plain, &mut segments);
                rest = &rest[1..];
            }
            '[' => match parse_bracket(rest) {
                Some((segment, consumed)) => {
                    flush(&mut plain, &mut segments);
                    segments.push(segment);
                    rest = &rest[consumed..];
                }
                None => {
                    plain.push('[');
                    rest = &rest[1..];
                }
            },
            c => {
                plain.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    flush(&mut plain, &mut segments);

    segments
}

fn flush(plain: &mut String, segments: &mut Vec<Segment>) {
    if !plain.is_empty() {
        segments.push(Segment::from_plain(plain));
        plain.clear();
    }
}

/// Parse `[N]`, `["key"]` or `['key']` at the start of `input`.
///
/// Returns the segment and the number of bytes consumed.
fn parse_bracket(input: &str) -> Option<(Segment, usize)> {
    let inner = &input[1..];
    let quote = inner.chars().next()?;

    if quote == '"' || quote == '\'' {
        let body = &inner[1..];
        let end = body.find(quote)?;
        if !body[end + 1..].starts_with(']') {
            return None;
        }
        // '[' + quote + key + quote + ']'
        let consumed = 1 + 1 + end + 1 + 1;
        return Some((Segment::Key(body[..end].to_string()), consumed));
    }

    let end = inner.find(']')?;
    let index = &inner[..end];
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((Segment::Index(index.parse().ok()?), 1 + end + 1))
}

/// Follow `path` from `value`. `None` means the path does not exist.
pub fn select(value: &Value, path: &str) -> Option<Value> {
    select_segments(value, &parse(path))
}

/// Follow already-parsed segments from `value`.
pub fn select_segments(value: &Value, segments: &[Segment]) -> Option<Value> {
    let mut current = value.clone();
    for segment in segments {
        current = step(&current, segment)?;
    }
    Some(current)
}

fn step(value: &Value, segment: &Segment) -> Option<Value> {
    match (value, segment) {
        (Value::Object(obj), segment) => obj.try_borrow()?.get(&segment.as_key()).cloned(),
        (Value::Array(arr), Segment::Index(index)) => arr.try_borrow()?.get(*index).cloned(),
        _ => None,
    }
}

/// Write `new_value` at `segments` below `root`, creating objects on the way.
///
/// Returns `false` when an existing scalar or a non-index step into an array
/// blocks the path. Arrays can be overwritten or appended to, never padded.
pub fn assign(root: &Value, segments: &[Segment], new_value: Value) -> bool {
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = root.clone();
    for segment in parents {
        let next = match step(&current, segment) {
            Some(next @ (Value::Object(_) | Value::Array(_))) => next,
            Some(Value::Undefined) | None => {
                let created = Value::object();
                if !put(&current, segment, created.clone()) {
                    return false;
                }
                created
            }
            Some(_) => return false,
        };
        current = next;
    }

    put(&current, last, new_value)
}

fn put(container: &Value, segment: &Segment, value: Value) -> bool {
    match (container, segment) {
        (Value::Object(obj), segment) => {
            obj.set(segment.as_key(), value);
            true
        }
        (Value::Array(arr), Segment::Index(index)) => {
            if *index > arr.len() {
                return false;
            }
            arr.set(*index, value);
            true
        }
        _ => false,
    }
}
