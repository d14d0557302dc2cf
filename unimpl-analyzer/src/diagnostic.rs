//! Diagnostic rule and findings for unimplemented interfaces
//!
//! Findings are plain data so hosts can present them however they like;
//! [`CoverageDiagnostic::to_report`] renders one through miette.

use crate::symbols::Location;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fmt;
use thiserror::Error;

/// Severity level of a diagnostic rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Fixed description of a diagnostic the analyzer can produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: &'static str,
    pub title: &'static str,
    /// Message template; `{0}` is replaced with the qualified interface name
    pub message_format: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub enabled_by_default: bool,
    pub description: &'static str,
}

impl Rule {
    pub fn format_message(&self, argument: &str) -> String {
        self.message_format.replace("{0}", argument)
    }
}

/// A declared interface with no implementing or inheriting type
pub static UNIMPLEMENTED_INTERFACE: Rule = Rule {
    id: "UnimplementedInterface",
    title: "Interface is not implemented",
    message_format: "Interface '{0}' is not implemented",
    category: "Implementations",
    severity: Severity::Warning,
    enabled_by_default: true,
    description: "An interface is declared but no class, struct or record in the program implements it, directly or through inheritance.",
};

/// Rules this analyzer reports
pub fn supported_rules() -> &'static [Rule] {
    std::slice::from_ref(&UNIMPLEMENTED_INTERFACE)
}

/// One finding: an interface nobody implements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageDiagnostic {
    pub rule: &'static Rule,
    /// Namespace-qualified interface name
    pub interface_name: String,
    /// First declaration of the interface
    pub location: Location,
    /// Remaining declarations (other partial fragments), in host order
    pub additional_locations: Vec<Location>,
}

impl CoverageDiagnostic {
    pub fn unimplemented_interface(
        interface_name: String,
        location: Location,
        additional_locations: Vec<Location>,
    ) -> Self {
        Self {
            rule: &UNIMPLEMENTED_INTERFACE,
            interface_name,
            location,
            additional_locations,
        }
    }

    pub fn message(&self) -> String {
        self.rule.format_message(&self.interface_name)
    }

    pub fn severity(&self) -> Severity {
        self.rule.severity
    }

    /// Build a miette report, looking up source text through `sources`
    pub fn to_report(&self, sources: &dyn SourceLookup) -> miette::Report {
        let fragments = self
            .additional_locations
            .iter()
            .map(|location| PartialDeclarationReport {
                src: source_for(sources, location),
                span: span_for(sources, location),
            })
            .collect();

        miette::Report::new(UnimplementedInterfaceReport {
            message: self.message(),
            src: source_for(sources, &self.location),
            span: span_for(sources, &self.location),
            fragments,
        })
    }
}

impl fmt::Display for CoverageDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.location,
            self.severity(),
            self.rule.id,
            self.message()
        )
    }
}

/// Access to the text of the sources findings point into
pub trait SourceLookup {
    fn source_text(&self, name: &str) -> Option<&str>;
}

fn source_for(sources: &dyn SourceLookup, location: &Location) -> NamedSource<String> {
    let text = sources.source_text(&location.source).unwrap_or_default();
    NamedSource::new(location.source.to_string(), text.to_string())
}

fn span_for(sources: &dyn SourceLookup, location: &Location) -> Option<SourceSpan> {
    let text = sources.source_text(&location.source)?;
    (location.span.end <= text.len())
        .then(|| SourceSpan::new(location.span.start.into(), location.span.len()))
}

#[derive(Error, Diagnostic, Debug)]
#[error("{message}")]
#[diagnostic(
    code(unimpl::unimplemented_interface),
    severity(Warning),
    help("Implement the interface in at least one type, or remove it if it is no longer needed")
)]
pub struct UnimplementedInterfaceReport {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("declared here")]
    span: Option<SourceSpan>,
    #[related]
    fragments: Vec<PartialDeclarationReport>,
}

#[derive(Error, Diagnostic, Debug)]
#[error("also declared here")]
#[diagnostic(code(unimpl::partial_declaration), severity(Advice))]
pub struct PartialDeclarationReport {
    #[source_code]
    src: NamedSource<String>,
    #[label("partial declaration")]
    span: Option<SourceSpan>,
}
