//! Coverage sweep
//!
//! Runs once per analysis, over the final registry state, and turns every
//! interface still without an implementor into a diagnostic.

use crate::diagnostic::CoverageDiagnostic;
use crate::qualified_name::display_name;
use crate::symbols::NamedType;
use tracing::debug;

/// Build one diagnostic per unimplemented interface in `final_state`
///
/// Interfaces without any declaration location cannot be anchored and are
/// skipped. The result is ordered by primary location so output is stable,
/// though callers should not depend on the order across interfaces.
pub fn sweep<S, I>(final_state: I) -> Vec<CoverageDiagnostic>
where
    S: NamedType,
    I: IntoIterator<Item = (S, bool)>,
{
    let mut diagnostics: Vec<CoverageDiagnostic> = final_state
        .into_iter()
        .filter(|(_, implemented)| !implemented)
        .filter_map(|(interface, _)| build_diagnostic(&interface))
        .collect();

    diagnostics.sort_by(|a, b| {
        (&a.location.source, a.location.span.start, &a.interface_name).cmp(&(
            &b.location.source,
            b.location.span.start,
            &b.interface_name,
        ))
    });

    debug!(findings = diagnostics.len(), "coverage sweep finished");
    diagnostics
}

fn build_diagnostic<S: NamedType>(interface: &S) -> Option<CoverageDiagnostic> {
    let Some((primary, rest)) = interface.locations().split_first() else {
        debug!(
            interface = interface.name(),
            "skipping unimplemented interface without a declaration location"
        );
        return None;
    };

    Some(CoverageDiagnostic::unimplemented_interface(
        display_name(interface.containing_scope(), interface.name()),
        primary.clone(),
        rest.to_vec(),
    ))
}
