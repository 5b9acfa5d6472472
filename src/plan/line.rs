//! Line normalization and classification
//!
//! Plan output has no formal grammar: line shapes overlap and the same
//! delimiters are reused for different constructs. Each normalized line is
//! classified in a fixed priority order so that the more specific shapes
//! win over the generic `name = value` shape.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

use super::types::COMPUTED_VALUE;

/// Separates an attribute name from its value
pub const ATTRIBUTE_DEFINITION_DELIMITER: &str = " = ";

/// Separates the old value from the new value of a change
pub const ATTRIBUTE_CHANGE_DELIMITER: &str = " -> ";

/// Trailing annotation on attributes that force the resource to be replaced
pub const FORCES_REPLACEMENT: &str = " # forces replacement";

/// Trailing text of the extra comment printed under deferred data reads
pub const CONFIG_UNKNOWN_SUFFIX: &str = " (config refers to values not yet known)";

/// Start of the plan summary line ("Plan: 1 to add, 0 to change, 0 to destroy.")
pub const PLAN_SUMMARY_PREFIX: &str = "Plan: ";

const HEREDOC_OPENERS: [&str; 2] = ["<<~EOT", "<<-EOT"];
const MARKER_CHARS: &[char] = &['+', '/', '-', '~', '<', '='];

lazy_static! {
    // CSI sequences (colors, cursor movement) and two-byte escapes
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b[@-Z\\-_]")
        .expect("Invalid ANSI escape regex");
}

/// Remove terminal color and control sequences from a line
pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(input, "")
}

/// Decode, uncolor and trim one raw input line
pub fn normalize(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    strip_ansi(&text).trim().to_string()
}

/// Remove surrounding double quotes
pub fn dequote(text: &str) -> &str {
    text.trim_matches('"')
}

/// The kind of composite value a block holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Map,
    Array,
    Heredoc,
    JsonEncode,
}

impl BlockKind {
    /// Human-readable name used in error messages
    pub fn context(&self) -> &'static str {
        match self {
            BlockKind::Map => "map attribute",
            BlockKind::Array => "array attribute",
            BlockKind::Heredoc => "heredoc attribute",
            BlockKind::JsonEncode => "jsonencode attribute",
        }
    }
}

/// Leading change marker of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeMarker {
    /// `+`
    Add,
    /// `-`, also `-/+`
    Remove,
    /// `~`
    Change,
    /// `<=`, only seen on data source block lines
    Read,
    None,
}

/// Classification of a normalized line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `# address will be created` and friends
    ResourceComment,
    /// A `#` line that is not a resource comment, e.g. `# (2 unchanged attributes hidden)`
    Annotation,
    /// `+ resource "type" "name" {`; never produces a node
    ResourceBlockStart,
    PlanSummary,
    Terminator(BlockKind),
    CompositeStart(BlockKind),
    Scalar,
    Unrecognized,
}

/// A normalized line split into its change marker and body
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    text: &'a str,
    marker: ChangeMarker,
    body: &'a str,
    forces_replacement: bool,
}

impl<'a> Line<'a> {
    /// Split an already normalized line
    pub fn new(text: &'a str) -> Self {
        let text = text.trim();
        let (marker, rest) = split_marker(text);

        let (body, forces_replacement) = match rest.strip_suffix(FORCES_REPLACEMENT) {
            Some(stripped) => (stripped.trim_end(), true),
            None => (rest, false),
        };

        Self {
            text,
            marker,
            body,
            forces_replacement,
        }
    }

    /// The full normalized line
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn marker(&self) -> ChangeMarker {
        self.marker
    }

    /// The line without its change marker and replacement annotation
    pub fn body(&self) -> &'a str {
        self.body
    }

    pub fn forces_replacement(&self) -> bool {
        self.forces_replacement
    }

    /// Split the body into a name and a value
    ///
    /// Uses the first ` = ` when present, otherwise the first space.
    pub fn split_name_value(&self) -> Option<(&'a str, &'a str)> {
        if let Some((name, value)) = self.body.split_once(ATTRIBUTE_DEFINITION_DELIMITER) {
            return Some((name.trim(), value.trim()));
        }

        self.body
            .split_once(' ')
            .map(|(name, value)| (name.trim(), value.trim()))
    }

    /// The value part of the body, or the whole body when there is no name
    pub fn value_portion(&self) -> &'a str {
        self.split_name_value()
            .map(|(_, value)| value)
            .unwrap_or(self.body)
    }

    /// Name of a composite attribute, empty for unnamed blocks such as `{`
    pub fn block_name(&self) -> &'a str {
        match self.split_name_value() {
            Some((name, _)) => dequote(name),
            None => "",
        }
    }

    pub fn is_plan_summary(&self) -> bool {
        self.text.starts_with(PLAN_SUMMARY_PREFIX)
    }

    pub fn is_resource_comment(&self) -> bool {
        let Some(rest) = self.text.strip_prefix('#') else {
            return false;
        };
        let rest = rest.trim_start();

        !rest.is_empty() && !rest.starts_with('(') && !self.text.ends_with(CONFIG_UNKNOWN_SUFFIX)
    }

    pub fn is_resource_block_start(&self) -> bool {
        (self.body.starts_with("resource \"") || self.body.starts_with("data \""))
            && self.body.ends_with(" {")
    }

    /// Terminator kind if this line closes a block
    pub fn terminator(&self) -> Option<BlockKind> {
        if self.marker != ChangeMarker::None {
            return None;
        }

        // Closing lines may carry the value the whole block changes to
        let closing = match self.body.split_once(ATTRIBUTE_CHANGE_DELIMITER) {
            Some((closing, "null" | COMPUTED_VALUE)) => closing,
            _ => self.body,
        };
        let closing = closing.strip_suffix(',').unwrap_or(closing);

        match closing {
            "}" => Some(BlockKind::Map),
            "]" => Some(BlockKind::Array),
            "EOT" => Some(BlockKind::Heredoc),
            ")" => Some(BlockKind::JsonEncode),
            _ => None,
        }
    }

    /// Block kind if this line opens a composite attribute
    pub fn composite_start(&self) -> Option<BlockKind> {
        let value = self.value_portion();

        if HEREDOC_OPENERS.iter().any(|opener| value.starts_with(opener)) {
            Some(BlockKind::Heredoc)
        } else if value.starts_with("jsonencode(") && !value.contains(')') {
            // `jsonencode(...)` closed on the same line has no body
            Some(BlockKind::JsonEncode)
        } else if value.ends_with('{') || value == "{}" {
            Some(BlockKind::Map)
        } else if value.ends_with('[') || value == "[]" {
            Some(BlockKind::Array)
        } else {
            None
        }
    }

    /// Whether the composite opened by this line is closed on the same line
    pub fn is_one_line_empty(&self) -> bool {
        matches!(self.value_portion(), "{}" | "[]")
    }

    /// Classify the line, most specific shape first
    pub fn kind(&self) -> LineKind {
        if self.text.is_empty() {
            LineKind::Blank
        } else if self.text.starts_with('#') {
            if self.is_resource_comment() {
                LineKind::ResourceComment
            } else {
                LineKind::Annotation
            }
        } else if self.is_plan_summary() {
            LineKind::PlanSummary
        } else if self.is_resource_block_start() {
            LineKind::ResourceBlockStart
        } else if let Some(kind) = self.terminator() {
            LineKind::Terminator(kind)
        } else if let Some(kind) = self.composite_start() {
            LineKind::CompositeStart(kind)
        } else if self.split_name_value().is_some() {
            LineKind::Scalar
        } else {
            LineKind::Unrecognized
        }
    }
}

/// Split a leading change marker (`+`, `-`, `~`, `-/+`, `<=`) from the line
fn split_marker(text: &str) -> (ChangeMarker, &str) {
    let rest = text.trim_start_matches(MARKER_CHARS);
    let marker_len = text.len() - rest.len();

    // A marker is always followed by a space; `-1` is a value, not a removal
    if marker_len == 0 || !(rest.is_empty() || rest.starts_with(' ')) {
        return (ChangeMarker::None, text);
    }

    let marker = match text.as_bytes()[0] {
        b'+' => ChangeMarker::Add,
        b'-' => ChangeMarker::Remove,
        b'~' => ChangeMarker::Change,
        b'<' => ChangeMarker::Read,
        _ => return (ChangeMarker::None, text),
    };

    (marker, rest.trim_start())
}
