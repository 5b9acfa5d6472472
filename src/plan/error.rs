use thiserror::Error;

/// Result type alias for plan parsing
pub type Result<T> = std::result::Result<T, PlanParseError>;

/// Errors produced while parsing plan output
///
/// A parse either yields the complete change tree or exactly one of these;
/// no partial tree is ever returned. Line numbers are 1-based; 0 means the
/// error was raised outside of a line cursor.
#[derive(Debug, Error)]
pub enum PlanParseError {
    /// A line did not have the value shape its classification requires
    #[error("malformed line {line_number} {line:?}: {reason}")]
    MalformedLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    /// The input ended while a block was still open
    #[error("unexpected end of input while parsing {context}")]
    UnexpectedEndOfInput { context: &'static str },

    /// A resource comment or the plan summary appeared inside a block
    #[error("unexpected line {line_number} while parsing {context}: {line}")]
    UnexpectedStructuralLine {
        line_number: usize,
        line: String,
        context: &'static str,
    },

    /// The resource address did not leave a type and a name
    #[error("failed to parse resource info from address {address} on line {line_number}")]
    UnresolvableAddress {
        line_number: usize,
        /// The address exactly as written
        address: String,
    },

    /// The underlying line source failed
    #[error("failed to read plan input: {0}")]
    Io(#[from] std::io::Error),
}

impl PlanParseError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        PlanParseError::MalformedLine {
            line_number: 0,
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach the number of the line being parsed to a line-level error
    pub(crate) fn at_line(mut self, number: usize) -> Self {
        match &mut self {
            PlanParseError::MalformedLine { line_number, .. }
            | PlanParseError::UnresolvableAddress { line_number, .. } => *line_number = number,
            _ => {}
        }
        self
    }
}
