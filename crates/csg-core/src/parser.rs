//! CSG text → document tree.
//!
//! The grammar lives in `csg.pest`; pest does rule matching, backtracking and
//! whitespace skipping. This module walks the resulting parse tree bottom-up
//! and assembles `serde_json::Value` nodes:
//!
//! - `object_list` → array of nodes, in source order (comments are dropped)
//! - `object` → `{"type", "properties"}`
//! - `instruction` → `{"type", "properties", "objects"}`, where `properties`
//!   is an array when the source used the bare matrix form
//! - `argument_list` → object of named arguments; a repeated name keeps its
//!   first position and takes the last value
//!
//! Each builder returns its value; nothing is accumulated across calls.

use crate::error::{ParseError, Result};
use log::debug;
use pest::error::{ErrorVariant, InputLocation, LineColLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde_json::{Map, Number, Value};

#[derive(Parser)]
#[grammar = "csg.pest"]
struct CsgGrammar;

/// Parse CSG source text into a document (an array of nodes).
///
/// # Example
/// ```
/// use csg_core::parse;
/// let doc = parse("sphere(r = 5);").unwrap();
/// assert_eq!(doc, serde_json::json!([{"type": "sphere", "properties": {"r": 5.0}}]));
/// ```
pub fn parse(source: &str) -> Result<Value> {
    let document = parse_document(source)?;
    debug!(
        "parsed CSG document: {} top-level nodes from {} bytes",
        document.as_array().map_or(0, Vec::len),
        source.len()
    );
    Ok(document)
}

fn parse_document(source: &str) -> std::result::Result<Value, ParseError> {
    let mut pairs = CsgGrammar::parse(Rule::file, source).map_err(convert_parse_error)?;
    let file = pairs
        .next()
        .ok_or_else(|| missing(Rule::file, "file", source.len()))?;
    build_file(file)
}

/// `file := object_list EOI` — the document is the object list's value.
fn build_file(pair: Pair<Rule>) -> std::result::Result<Value, ParseError> {
    let offset = pair.as_span().end();
    let list = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::object_list)
        .ok_or_else(|| missing(Rule::file, "object list", offset))?;
    build_object_list(list)
}

fn build_object_list(pair: Pair<Rule>) -> std::result::Result<Value, ParseError> {
    let mut nodes = Vec::new();
    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::object => nodes.push(build_object(item)?),
            Rule::instruction => nodes.push(build_instruction(item)?),
            Rule::comment => debug!("discarding comment: {}", item.as_str()),
            rule => return Err(unexpected(&item, rule)),
        }
    }
    Ok(Value::Array(nodes))
}

fn build_object(pair: Pair<Rule>) -> std::result::Result<Value, ParseError> {
    let end = pair.as_span().end();
    let mut inner = pair.into_inner().filter(|p| !is_punctuation(p.as_rule()));

    let name = inner.next().ok_or_else(|| missing(Rule::object, "name", end))?;
    let args = inner
        .next()
        .ok_or_else(|| missing(Rule::object, "argument list", end))?;

    let mut node = Map::new();
    node.insert("type".into(), Value::String(name.as_str().to_string()));
    node.insert("properties".into(), build_value(args)?);
    Ok(Value::Object(node))
}

fn build_instruction(pair: Pair<Rule>) -> std::result::Result<Value, ParseError> {
    let end = pair.as_span().end();
    let mut inner = pair.into_inner().filter(|p| !is_punctuation(p.as_rule()));

    let name = inner
        .next()
        .ok_or_else(|| missing(Rule::instruction, "name", end))?;
    let properties = inner
        .next()
        .ok_or_else(|| missing(Rule::instruction, "matrix or argument list", end))?;
    let body = inner
        .next()
        .ok_or_else(|| missing(Rule::instruction, "object list", end))?;

    let mut node = Map::new();
    node.insert("type".into(), Value::String(name.as_str().to_string()));
    node.insert("properties".into(), build_value(properties)?);
    node.insert("objects".into(), build_object_list(body)?);
    Ok(Value::Object(node))
}

/// Convert a value-producing pair (`argument_list`, `matrix`, `array`,
/// `number`, `quoted`, `boolean`) into its `Value`.
fn build_value(pair: Pair<Rule>) -> std::result::Result<Value, ParseError> {
    match pair.as_rule() {
        Rule::number => build_number(&pair),
        Rule::boolean => Ok(Value::Bool(pair.as_str() == "true")),
        // String contents are taken verbatim; there are no escape sequences.
        Rule::quoted => Ok(Value::String(
            pair.into_inner()
                .next()
                .map_or_else(String::new, |s| s.as_str().to_string()),
        )),
        Rule::matrix => {
            let end = pair.as_span().end();
            let array = pair
                .into_inner()
                .next()
                .ok_or_else(|| missing(Rule::matrix, "array", end))?;
            build_value(array)
        }
        Rule::array => pair
            .into_inner()
            .map(build_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array),
        Rule::argument_list => build_argument_list(pair),
        rule => Err(unexpected(&pair, rule)),
    }
}

fn build_argument_list(pair: Pair<Rule>) -> std::result::Result<Value, ParseError> {
    let mut args = Map::new();
    for argument in pair.into_inner() {
        let end = argument.as_span().end();
        let mut inner = argument.into_inner();
        let name = inner
            .next()
            .ok_or_else(|| missing(Rule::argument, "name", end))?;
        let value = inner
            .next()
            .ok_or_else(|| missing(Rule::argument, "value", end))?;
        // Map::insert keeps the key's original position on overwrite.
        args.insert(name.as_str().to_string(), build_value(value)?);
    }
    Ok(Value::Object(args))
}

fn build_number(pair: &Pair<Rule>) -> std::result::Result<Value, ParseError> {
    let text = pair.as_str();
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| {
            error_at(
                Rule::number,
                pair,
                format!("number {text:?} is out of range"),
            )
        })
}

fn is_punctuation(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::close_paren | Rule::terminator | Rule::block_open | Rule::block_close
    )
}

// ============================================================================
// Errors
// ============================================================================

/// Convert a pest failure into a [`ParseError`]. The most specific expected
/// rule (the last declared among pest's positive attempts) names the error.
fn convert_parse_error(error: pest::error::Error<Rule>) -> ParseError {
    let (offset, length) = match &error.location {
        InputLocation::Pos(pos) => (*pos, 0),
        InputLocation::Span((start, end)) => (*start, end.saturating_sub(*start)),
    };
    let (line, column) = match &error.line_col {
        LineColLocation::Pos(lc) | LineColLocation::Span(lc, _) => *lc,
    };
    let rule = match &error.variant {
        ErrorVariant::ParsingError { positives, .. } => positives.iter().max().copied(),
        ErrorVariant::CustomError { .. } => None,
    }
    .unwrap_or(Rule::file);

    ParseError {
        rule: rule_name(rule),
        offset,
        length,
        line,
        column,
        message: error.variant.message().into_owned(),
    }
}

fn rule_name(rule: Rule) -> String {
    format!("{rule:?}")
}

fn error_at(rule: Rule, pair: &Pair<Rule>, message: String) -> ParseError {
    let span = pair.as_span();
    let (line, column) = span.start_pos().line_col();
    ParseError {
        rule: rule_name(rule),
        offset: span.start(),
        length: span.end() - span.start(),
        line,
        column,
        message,
    }
}

fn unexpected(pair: &Pair<Rule>, rule: Rule) -> ParseError {
    error_at(rule, pair, format!("unexpected {} in parse tree", rule_name(rule)))
}

/// A child the grammar always produces was absent: the grammar and the
/// builder disagree.
fn missing(rule: Rule, what: &str, offset: usize) -> ParseError {
    ParseError {
        rule: rule_name(rule),
        offset,
        length: 0,
        line: 0,
        column: 0,
        message: format!("missing {what} in parse tree"),
    }
}
