//! Bounded, cycle-safe rendering of configuration trees.
//!
//! The output follows the familiar console-inspection layout:
//!
//! ```text
//! {
//!   mode: 'production',
//!   module: {
//!     rules: [Array]
//!   },
//!   plugins: [
//!     BuildProgressPlugin {
//!       config: <circular reference>
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::core::value::{ArrayRef, NodeId, ObjectRef, Value};

/// Marker emitted when a node is reached again from inside itself.
pub const CIRCULAR_MARKER: &str = "<circular reference>";

/// Placeholder for a node that cannot be read while rendering.
const BORROWED_MARKER: &str = "[Opaque <borrowed>]";

/// How many levels of nesting to render.
///
/// A negative limit truncates the root itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Limited(i64),
    Unbounded,
}

impl Depth {
    /// Parse a depth the way the command line accepts it.
    ///
    /// An optional sign and the leading digits are used (`"3x"` is 3, `"+5"`
    /// is 5, `"-3"` is -3). Anything without leading digits, zero, or a value
    /// that overflows means unbounded.
    pub fn parse_lenient(input: &str) -> Depth {
        let input = input.trim();
        let (sign, rest) = match input.strip_prefix(['+', '-']) {
            Some(rest) => (&input[..1], rest),
            None => ("", input),
        };
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();

        match format!("{}{}", sign, digits).parse::<i64>() {
            Ok(0) | Err(_) => Depth::Unbounded,
            Ok(n) => Depth::Limited(n),
        }
    }

    /// Whether a container at `level` must be truncated.
    fn exceeded(&self, level: usize) -> bool {
        match self {
            Depth::Limited(max) => i64::try_from(level).map_or(true, |level| level > *max),
            Depth::Unbounded => false,
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Limited(5)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Limited(n) => write!(f, "{}", n),
            Depth::Unbounded => write!(f, "Infinity"),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub depth: Depth,
    /// Emit ANSI styling
    pub colors: bool,
    /// Include hidden (non-enumerable) properties
    pub show_hidden: bool,
    /// Render containers on a single line
    pub compact: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            depth: Depth::default(),
            colors: true,
            show_hidden: true,
            compact: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Style {
    String,
    Literal,
    Null,
    Undefined,
    Regex,
    Special,
}

impl Style {
    /// ANSI open and close codes.
    fn codes(&self) -> (u8, u8) {
        match self {
            Style::String => (32, 39),
            Style::Literal => (33, 39),
            Style::Null => (1, 22),
            Style::Undefined => (90, 39),
            Style::Regex => (31, 39),
            Style::Special => (36, 39),
        }
    }
}

/// Render a value to text.
pub fn render(value: &Value, options: &RenderOptions) -> String {
    let mut printer = Printer {
        options,
        open: HashSet::new(),
        out: String::new(),
    };
    printer.value(value, 0);
    printer.out
}

struct Printer<'a> {
    options: &'a RenderOptions,
    /// Nodes on the current traversal path
    open: HashSet<NodeId>,
    out: String,
}

impl Printer<'_> {
    fn value(&mut self, value: &Value, level: usize) {
        match value {
            Value::Undefined => self.styled(Style::Undefined, "undefined"),
            Value::Null => self.styled(Style::Null, "null"),
            Value::Bool(b) => self.styled(Style::Literal, &b.to_string()),
            Value::Number(n) => self.styled(Style::Literal, &format_number(*n)),
            Value::String(s) => self.styled(Style::String, &quote(s)),
            Value::Regex(source) => self.styled(Style::Regex, &format!("/{}/", source)),
            Value::Function(Some(name)) => {
                self.styled(Style::Special, &format!("[Function: {}]", name))
            }
            Value::Function(None) => self.styled(Style::Special, "[Function (anonymous)]"),
            Value::Opaque(type_name) => {
                self.styled(Style::Special, &format!("[Opaque {}]", type_name))
            }
            Value::Object(obj) => self.object(obj, level),
            Value::Array(arr) => self.array(arr, level),
        }
    }

    fn object(&mut self, obj: &ObjectRef, level: usize) {
        let id = obj.id();
        if self.open.contains(&id) {
            self.styled(Style::Special, CIRCULAR_MARKER);
            return;
        }
        let Some(inner) = obj.try_borrow() else {
            self.styled(Style::Special, BORROWED_MARKER);
            return;
        };

        if self.options.depth.exceeded(level) {
            let marker = format!("[{}]", inner.class().unwrap_or("Object"));
            self.styled(Style::Special, &marker);
            return;
        }

        if let Some(class) = inner.class() {
            self.out.push_str(class);
            self.out.push(' ');
        }

        let entries: Vec<(String, bool, Value)> = inner
            .properties()
            .filter(|(_, prop)| prop.enumerable || self.options.show_hidden)
            .map(|(key, prop)| (key.to_string(), prop.enumerable, prop.value.clone()))
            .collect();
        drop(inner);

        if entries.is_empty() {
            self.out.push_str("{}");
            return;
        }

        self.open.insert(id);
        self.out.push('{');
        for (i, (key, enumerable, value)) in entries.iter().enumerate() {
            self.separator(i, level + 1);
            self.key(key, *enumerable);
            self.out.push_str(": ");
            self.value(value, level + 1);
        }
        self.close(level, '}');
        self.open.remove(&id);
    }

    fn array(&mut self, arr: &ArrayRef, level: usize) {
        let id = arr.id();
        if self.open.contains(&id) {
            self.styled(Style::Special, CIRCULAR_MARKER);
            return;
        }
        let items: Vec<Value> = match arr.try_borrow() {
            Some(items) => items.clone(),
            None => {
                self.styled(Style::Special, BORROWED_MARKER);
                return;
            }
        };

        if self.options.depth.exceeded(level) {
            self.styled(Style::Special, "[Array]");
            return;
        }

        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }

        self.open.insert(id);
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            self.separator(i, level + 1);
            self.value(item, level + 1);
        }
        self.close(level, ']');
        self.open.remove(&id);
    }

    /// Start the `index`th entry of a container whose entries sit at `level`.
    fn separator(&mut self, index: usize, level: usize) {
        if index > 0 {
            self.out.push(',');
        }
        if self.options.compact {
            self.out.push(' ');
        } else {
            self.out.push('\n');
            self.indent(level);
        }
    }

    fn close(&mut self, level: usize, bracket: char) {
        if self.options.compact {
            self.out.push(' ');
        } else {
            self.out.push('\n');
            self.indent(level);
        }
        self.out.push(bracket);
    }

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
    }

    fn key(&mut self, key: &str, enumerable: bool) {
        let (open, close) = if enumerable { ("", "") } else { ("[", "]") };
        self.out.push_str(open);
        if is_identifier(key) {
            self.out.push_str(key);
        } else {
            self.styled(Style::String, &quote(key));
        }
        self.out.push_str(close);
    }

    fn styled(&mut self, style: Style, text: &str) {
        if self.options.colors {
            let (open, close) = style.codes();
            self.out
                .push_str(&format!("\x1b[{}m{}\x1b[{}m", open, text, close));
        } else {
            self.out.push_str(text);
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\x{:02X}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else {
        n.to_string()
    }
}
