// Unimpl Parser Library
// Pest-based parser for the declaration skeleton of C#-style sources

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use parser::*;

// Re-export parser rule for manual testing
pub use parser::Rule;

/// Parse one source file, naming it for diagnostics
pub fn parse_source(name: &str, input: &str) -> Result<SourceFile, ParseError> {
    parser::DeclarationParser::parse_source_file(name, input)
}

/// Parse an anonymous source, mainly for tests
pub fn parse_declarations(input: &str) -> Result<SourceFile, ParseError> {
    parse_source("input", input)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
