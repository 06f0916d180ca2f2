//! The public decoding entry point.

use crate::envelope;
use crate::error::ParseError;
use crate::line;
use crate::statement::{self, Statement};

/// MT942 message parser.
///
/// Owns the raw document text; every `process_statement*` call runs the
/// full pipeline from scratch, so no state (in particular no statement
/// sequencing) survives between calls or leaks between documents.
pub struct Parser {
    document: String,
}

impl Parser {
    pub fn new(document: impl Into<String>) -> Self {
        Parser {
            document: document.into(),
        }
    }

    /// Decode the document, discarding recoverable per-field errors.
    ///
    /// Structural errors (a missing envelope block, a body line with no tag
    /// marker) still abort the parse.
    pub fn process_statement(&self) -> Result<Statement, ParseError> {
        self.process_statement_recovering()
            .map(|(statement, _)| statement)
    }

    /// Decode the document, returning recoverable per-field errors
    /// alongside the (possibly partially populated) statement.
    pub fn process_statement_recovering(
        &self,
    ) -> Result<(Statement, Vec<ParseError>), ParseError> {
        let envelope = envelope::split(&self.document)?;
        let logical = line::reconstruct(&envelope.body)?;
        let (block4, errors) = statement::assemble(&logical);
        Ok((
            Statement {
                block1: envelope.block1,
                block2: envelope.block2,
                block4,
            },
            errors,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequencing_is_scoped_to_one_call() {
        // Two parses of the same document must number their statement
        // lines identically -- the counter never persists.
        let doc = "{1:A1}{2:B2}{4:\n:61:210101C1,00NTRFA//X\n:86:NOTE\n-}";
        let parser = Parser::new(doc);
        let first = parser.process_statement().unwrap();
        let second = parser.process_statement().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.block4.lines[0].sequence, 1);
    }

    #[test]
    fn envelope_failure_is_fatal_for_both_variants() {
        let parser = Parser::new("not a swift message");
        assert!(matches!(
            parser.process_statement(),
            Err(ParseError::MalformedEnvelope { .. })
        ));
        assert!(matches!(
            parser.process_statement_recovering(),
            Err(ParseError::MalformedEnvelope { .. })
        ));
    }
}
