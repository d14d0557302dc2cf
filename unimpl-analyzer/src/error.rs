//! Error types for the analyzer
//!
//! Following the parser's miette patterns so every failure renders with its
//! source context.

use crate::symbols::{Location, TypeKind};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;
use unimpl_parser::ParseError;

/// Declarations that cannot be merged into a single named type
#[derive(Error, Diagnostic, Debug)]
pub enum ResolveError {
    #[error("Type '{name}' is declared more than once")]
    #[diagnostic(code(unimpl::resolve::duplicate_declaration))]
    DuplicateDeclaration {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("declared again here")]
        span: Option<SourceSpan>,
        #[help]
        previous: String,
    },

    #[error("Partial declarations of '{name}' disagree on its kind: {existing} and {found}")]
    #[diagnostic(code(unimpl::resolve::conflicting_partial_kinds))]
    ConflictingPartialKinds {
        name: String,
        existing: TypeKind,
        found: TypeKind,
        #[source_code]
        src: NamedSource<String>,
        #[label("declared as {found} here")]
        span: Option<SourceSpan>,
        #[help]
        previous: String,
    },
}

impl ResolveError {
    pub fn duplicate_declaration(
        name: String,
        source_text: &str,
        location: &Location,
        previous: &Location,
    ) -> Self {
        Self::DuplicateDeclaration {
            name,
            src: NamedSource::new(location.source.to_string(), source_text.to_string()),
            span: to_source_span(source_text, location),
            previous: format!(
                "previously declared at {previous}; mark every declaration `partial` or rename one of them"
            ),
        }
    }

    pub fn conflicting_partial_kinds(
        name: String,
        existing: TypeKind,
        found: TypeKind,
        source_text: &str,
        location: &Location,
        previous: &Location,
    ) -> Self {
        Self::ConflictingPartialKinds {
            name,
            existing,
            found,
            src: NamedSource::new(location.source.to_string(), source_text.to_string()),
            span: to_source_span(source_text, location),
            previous: format!("first declared as {existing} at {previous}"),
        }
    }
}

/// Failure to turn a set of sources into a program
#[derive(Error, Diagnostic, Debug)]
pub enum ProgramError {
    #[error("{count} source file(s) could not be parsed")]
    #[diagnostic(code(unimpl::program::parse_failed))]
    Parse {
        count: usize,
        #[related]
        errors: Vec<ParseError>,
    },

    #[error("{count} declaration conflict(s) found")]
    #[diagnostic(code(unimpl::program::resolve_failed))]
    Resolve {
        count: usize,
        #[related]
        errors: Vec<ResolveError>,
    },
}

impl ProgramError {
    pub fn parse(errors: Vec<ParseError>) -> Self {
        Self::Parse {
            count: errors.len(),
            errors,
        }
    }

    pub fn resolve(errors: Vec<ResolveError>) -> Self {
        Self::Resolve {
            count: errors.len(),
            errors,
        }
    }
}

/// Reasons an analysis run produced no findings
#[derive(Error, Diagnostic, Debug)]
pub enum AnalysisError {
    #[error("Analysis was cancelled before every type was visited")]
    #[diagnostic(
        code(unimpl::analysis::cancelled),
        help("No findings are reported for an incomplete run")
    )]
    Cancelled,

    #[error("Could not start the visitation thread pool: {message}")]
    #[diagnostic(code(unimpl::analysis::thread_pool))]
    ThreadPool { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Program(#[from] ProgramError),
}

fn to_source_span(source_text: &str, location: &Location) -> Option<SourceSpan> {
    (location.span.end <= source_text.len())
        .then(|| SourceSpan::new(location.span.start.into(), location.span.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use unimpl_parser::Span;

    fn location(start: usize, end: usize) -> Location {
        Location::new("A.cs", Span::new(start, end))
    }

    #[test]
    fn test_duplicate_declaration_help_names_previous_location() {
        let error = ResolveError::duplicate_declaration(
            "N.I".to_string(),
            "interface I {}",
            &location(10, 11),
            &location(10, 11),
        );

        let help = error.help().map(|help| help.to_string()).unwrap_or_default();
        assert!(help.starts_with("previously declared at A.cs@10"));
        assert!(help.contains("partial"));
        assert_eq!(error.labels().map(|labels| labels.count()), Some(1));
    }

    #[test]
    fn test_span_outside_source_has_no_label() {
        let error = ResolveError::conflicting_partial_kinds(
            "N.C".to_string(),
            TypeKind::Class,
            TypeKind::Struct,
            "short",
            &location(40, 41),
            &location(0, 1),
        );

        assert!(matches!(
            error,
            ResolveError::ConflictingPartialKinds { span: None, .. }
        ));
        assert_eq!(error.labels().map_or(0, |labels| labels.count()), 0);
    }
}
