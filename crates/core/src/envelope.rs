//! Envelope splitting: the `{1:..}{2:..}{4:..-}` block structure.

use crate::error::ParseError;

/// The three blocks of an MT942 message that this decoder consumes.
///
/// `body` is the trimmed block-4 text; blocks 1 and 2 are kept verbatim,
/// byte-identical to the source text between their delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub block1: String,
    pub block2: String,
    pub body: String,
}

/// Split a raw message into its basic header, application header and text
/// body. Text before `{1:` is permitted and ignored.
pub fn split(document: &str) -> Result<Envelope, ParseError> {
    let start = document
        .find("{1:")
        .ok_or_else(|| malformed("no '{1:' basic header block"))?;
    let rest = &document[start + 3..];
    let (block1, rest) = take_header_block(rest, '1')?;
    let rest = rest
        .strip_prefix("{2:")
        .ok_or_else(|| malformed("no '{2:' application header block"))?;
    let (block2, rest) = take_header_block(rest, '2')?;
    let rest = rest
        .strip_prefix("{4:")
        .ok_or_else(|| malformed("no '{4:' text block"))?;
    let end = find_terminator(rest)
        .ok_or_else(|| malformed("text block is not terminated by a '-' line"))?;

    Ok(Envelope {
        block1,
        block2,
        body: rest[..end].trim().to_string(),
    })
}

fn malformed(reason: impl Into<String>) -> ParseError {
    ParseError::MalformedEnvelope {
        reason: reason.into(),
    }
}

/// One-or-more uppercase alphanumerics up to the closing `}`.
fn take_header_block(rest: &str, which: char) -> Result<(String, &str), ParseError> {
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c.is_ascii_uppercase()))
        .unwrap_or(rest.len());
    if end == 0 {
        return Err(malformed(format!(
            "block {} is empty or not uppercase alphanumeric",
            which
        )));
    }
    let rest_after = rest[end..]
        .strip_prefix('}')
        .ok_or_else(|| malformed(format!("block {} is not closed by '}}'", which)))?;
    Ok((rest[..end].to_string(), rest_after))
}

/// Offset of the `-}` that terminates the body: the first one whose `-`
/// sits at the start of a (whitespace-trimmed) line. A `-}` embedded
/// mid-line in field text never terminates the block.
fn find_terminator(body: &str) -> Option<usize> {
    let mut search = 0;
    while let Some(offset) = body[search..].find("-}") {
        let at = search + offset;
        let line_start = body[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
        if body[line_start..at].trim().is_empty() {
            return Some(at);
        }
        search = at + 1;
    }
    None
}
