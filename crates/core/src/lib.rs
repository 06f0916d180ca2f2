//! mt942-core: SWIFT MT942 interim statement decoder.
//!
//! Decodes an MT942 interim bank-statement message into a structured
//! record through four stages:
//!
//! 1. envelope splitting (`{1:..}{2:..}{4:..-}` block structure),
//! 2. logical-line reconstruction (re-joining wrapped tag lines),
//! 3. per-tag field decoding (one small fixed-width grammar per tag),
//! 4. statement assembly (linking tag-86 information lines to their tag-61
//!    statement lines by positional sequence).
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`Parser`] -- construct from a document, call
//!   [`Parser::process_statement`] (or the `_recovering` variant to also
//!   receive recoverable per-field errors)
//! - [`Statement`] / [`Block4`] -- the decoded output record
//! - [`StatementLine`] -- one decoded transaction entry
//! - [`ParseError`] -- the error taxonomy
//!
//! The individual pipeline stages ([`envelope::split`],
//! [`line::reconstruct`], [`field::decode`]) are public for selective use.

/// The SWIFT message type this crate decodes.
pub const MESSAGE_TYPE: &str = "942";

pub mod envelope;
pub mod error;
pub mod field;
pub mod line;
pub mod parser;
mod scan;
pub mod statement;

// ── Convenience re-exports: key types ────────────────────────────────

pub use error::ParseError;
pub use field::{
    DateTimeIndicator, EntryDate, EntrySummary, FieldValue, FloorLimit, StatementLine,
    StatementSequence, SwiftDate,
};
pub use statement::{Block4, Statement};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use envelope::{split, Envelope};
pub use field::decode;
pub use line::{reconstruct, LogicalLine};
pub use parser::Parser;
