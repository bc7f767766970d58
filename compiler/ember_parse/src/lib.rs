//! Ember Parse - recursive descent parser producing a `CodeUnit`.
//!
//! Parsing stops at the first error: a unit that does not parse is never
//! executed, so there is nothing to gain from recovering and collecting
//! further diagnostics.

mod error;
mod parser;

pub use error::ParseError;

use ember_ir::CodeUnit;

/// Parse a whole source unit.
///
/// `origin` names the storage the text came from and is kept on the unit for
/// diagnostics.
#[tracing::instrument(level = "debug", skip(source))]
pub fn parse(source: &str, origin: &str) -> Result<CodeUnit, ParseError> {
    let tokens = ember_lexer::lex(source)?;
    let body = parser::Parser::new(&tokens).parse_unit()?;
    tracing::trace!(statements = body.len(), "parsed unit");
    Ok(CodeUnit::new(origin, body))
}

#[cfg(test)]
mod tests;
