//! Display names for declared types

/// Separator placed after every enclosing scope name
pub const SCOPE_SEPARATOR: char = '.';

/// Render an enclosing scope chain as a prefix, outermost first
///
/// Each scope contributes its name followed by `.`; the global scope (an
/// empty chain) contributes nothing.
pub fn qualify<S: AsRef<str>>(scope: &[S]) -> String {
    match scope.split_last() {
        None => String::new(),
        Some((innermost, outer)) => {
            let mut qualified = qualify(outer);
            qualified.push_str(innermost.as_ref());
            qualified.push(SCOPE_SEPARATOR);
            qualified
        }
    }
}

/// Fully qualified display name of a type declared in `scope`
pub fn display_name<S: AsRef<str>>(scope: &[S], name: &str) -> String {
    let mut qualified = qualify(scope);
    qualified.push_str(name);
    qualified
}
