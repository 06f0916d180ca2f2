/// All errors that can be produced while decoding an MT942 message.
///
/// The first two variants are fatal: without an envelope or a well-formed
/// first tagged line there is nothing safe to decode. The last two are
/// recoverable per line -- [`crate::Parser::process_statement_recovering`]
/// collects them while the rest of the document still decodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The document does not contain the `{1:..}{2:..}{4:..-}` block
    /// structure.
    #[error("malformed envelope: {reason}")]
    MalformedEnvelope { reason: String },

    /// A physical line that should open a tagged field carries no tag
    /// marker.
    #[error("malformed line {index}: no tag marker in '{line}'")]
    MalformedLine { index: usize, line: String },

    /// A recognized tag's text does not satisfy the required groups of its
    /// grammar.
    #[error("field {tag} does not match its grammar: {reason}")]
    FieldGrammarMismatch { tag: String, reason: String },

    /// An information line appeared before any statement line it could
    /// describe. The line is dropped from the output.
    #[error("information line '{text}' has no preceding statement line")]
    OrphanInformation { text: String },
}
