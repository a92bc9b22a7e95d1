//! Error types for CSG parsing and writing.
//!
//! The two failure families are disjoint: [`ParseError`] comes from the grammar
//! layer (text → tree), [`WriteError`] from the canonical writer (tree → text).

use thiserror::Error;

/// The input text did not match the CSG grammar.
///
/// `rule` is the deepest rule the grammar expected at the failure point.
/// `offset`/`length` are byte positions into the source; `length` is 0 when
/// the failure is a single point (e.g. unexpected end of input).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("CSG parse error at line {line}, column {column}: {message} while parsing {rule}")]
pub struct ParseError {
    pub rule: String,
    pub offset: usize,
    pub length: usize,
    /// 1-based line of `offset`.
    pub line: usize,
    /// 1-based column of `offset`, counted in characters.
    pub column: usize,
    pub message: String,
}

impl ParseError {
    /// Render the offending source line with a caret marker underneath:
    ///
    /// ```text
    /// sphere(r=5.0
    ///             ^
    /// expected close_paren while parsing close_paren
    /// ```
    pub fn diagnostic(&self, source: &str) -> String {
        let line_text = source.lines().nth(self.line.saturating_sub(1)).unwrap_or("");
        let mut out = String::with_capacity(line_text.len() * 2 + self.message.len() + 32);
        out.push_str(line_text);
        out.push('\n');
        out.push_str(&" ".repeat(self.column.saturating_sub(1)));
        let marked = source
            .get(self.offset..self.offset + self.length)
            .map_or(0, |s| s.chars().count());
        out.push_str(&"~".repeat(marked));
        out.push('^');
        out.push('\n');
        out.push_str(&self.message);
        out.push_str(" while parsing ");
        out.push_str(&self.rule);
        out
    }
}

/// A tree could not be rendered as CSG text.
///
/// Always fatal for the subtree being written; the writer never emits partial
/// output for a node it rejects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// Something other than a node (or list of nodes) where a node was expected,
    /// or a node without a string `type`.
    #[error("malformed tree: expected a CSG node, found {found}")]
    Malformed { found: String },

    #[error("unknown object type: {type_name:?}")]
    UnknownType { type_name: String },

    #[error("too few children objects for instruction {type_name:?}: requires at least {required}, found {found}")]
    TooFewChildren {
        type_name: String,
        required: usize,
        found: usize,
    },

    #[error("properties of {type_name:?} must be an object of named arguments")]
    InvalidProperties { type_name: String },

    #[error("objects of {type_name:?} must be an array of nodes")]
    InvalidObjects { type_name: String },

    /// A type or property name that the grammar's name rule would not accept.
    #[error("invalid name {name:?}: names are letters with an optional leading '$'")]
    InvalidName { name: String },

    /// A property value with no CSG text form (null, nested object, or a
    /// string containing a double quote).
    #[error("unsupported property value: {found}")]
    UnsupportedValue { found: String },
}

/// Errors surfaced by the conversion entry points.
#[derive(Error, Debug)]
pub enum CsgError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// The input string was not valid JSON (CSGJS reading path).
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Convenience alias used throughout csg-core.
pub type Result<T> = std::result::Result<T, CsgError>;
