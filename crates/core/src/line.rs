//! Logical-line reconstruction: SWIFT tags wrap physically but continue
//! until the next line that starts with `:`.

use crate::error::ParseError;

/// One tagged field of the text body, with continuation lines already
/// folded back into `text` (joined by `\n`).
///
/// The order of logical lines is load-bearing: tag-86 information lines are
/// linked to tag-61 statement lines purely by position in this sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub tag: String,
    pub text: String,
}

/// Re-join the body's physical lines into logical lines.
///
/// A line starting with `:` opens a new logical line; any other non-empty
/// line is a continuation of the previous one, preserved behind an internal
/// `\n` (the tag-61 grammar finds its `details` group there). A
/// continuation with no preceding tagged line is fatal.
pub fn reconstruct(body: &str) -> Result<Vec<LogicalLine>, ParseError> {
    let mut lines: Vec<LogicalLine> = Vec::new();

    for (index, raw) in body.trim().lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(':') {
            let tag_end = rest.find(':').ok_or_else(|| malformed(index, line))?;
            let tag = &rest[..tag_end];
            if tag.is_empty()
                || !tag
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
            {
                return Err(malformed(index, line));
            }
            lines.push(LogicalLine {
                tag: tag.to_string(),
                text: rest[tag_end + 1..].to_string(),
            });
        } else {
            match lines.last_mut() {
                Some(prev) => {
                    prev.text.push('\n');
                    prev.text.push_str(line);
                }
                None => return Err(malformed(index, line)),
            }
        }
    }

    Ok(lines)
}

fn malformed(index: usize, line: &str) -> ParseError {
    ParseError::MalformedLine {
        index,
        line: line.to_string(),
    }
}
