// Parser error handling
// miette diagnostics that carry their own named source

use crate::ast::Span;
use crate::parser::Rule;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Parse error: {message}")]
    #[diagnostic(
        code(unimpl::parse::syntax_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: NamedSource<String>,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unexpected grammar rule: expected {expected}, found {found:?}")]
    #[diagnostic(
        code(unimpl::parse::unexpected_rule),
        help("This is a bug in the declaration parser")
    )]
    UnexpectedRule {
        #[source_code]
        src: NamedSource<String>,
        #[label("while parsing this")]
        span: SourceSpan,
        expected: String,
        found: Rule,
    },

    #[error("Missing {expected}")]
    #[diagnostic(code(unimpl::parse::missing_element))]
    MissingElement {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected {expected} inside this")]
        span: SourceSpan,
        expected: String,
    },
}

impl ParseError {
    /// Convert a pest error into a diagnostic for the given source
    pub fn from_pest(error: pest::error::Error<Rule>, name: &str, source: &str) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 0),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end.saturating_sub(start))
            }
        };

        ParseError::PestError {
            src: named_source(name, source),
            span,
            message: error.variant.message().into_owned(),
        }
    }

    /// Source span the error points at
    pub fn span(&self) -> SourceSpan {
        match self {
            ParseError::PestError { span, .. }
            | ParseError::UnexpectedRule { span, .. }
            | ParseError::MissingElement { span, .. } => *span,
        }
    }
}

pub(crate) fn named_source(name: &str, source: &str) -> NamedSource<String> {
    NamedSource::new(name, source.to_string())
}

/// Convert an AST span into a miette source span
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

pub type ParseResult<T> = Result<T, ParseError>;
