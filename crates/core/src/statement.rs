//! Statement assembly: folding decoded fields into the output record.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::field::{
    self, DateTimeIndicator, EntrySummary, FieldValue, FloorLimit, StatementLine,
    StatementSequence,
};
use crate::line::LogicalLine;

/// The assembled block-4 field mapping. One slot per recognized tag;
/// repeated tags overwrite their slot, statement lines accumulate in
/// `lines`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block4 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_sequence: Option<StatementSequence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_floor: Option<FloorLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit_floor: Option<FloorLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTimeIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debits: Option<EntrySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<EntrySummary>,
    pub lines: Vec<StatementLine>,
}

/// The decoded message: both headers verbatim plus the assembled body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub block1: String,
    pub block2: String,
    pub block4: Block4,
}

impl Statement {
    /// Render the statement as a `serde_json::Value` tree.
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Decode every logical line and fold the results into a [`Block4`].
///
/// The statement-sequence counter lives here, local to the call: it is
/// incremented immediately before decoding each tag-61 line (even one whose
/// grammar then fails), and tag-86 lines read its current value to know
/// which statement line they describe. The buffered information is merged
/// after the scan, in encounter order; information keyed to a sequence with
/// no surviving statement line is dropped and reported. Recoverable errors
/// (grammar mismatches, orphan information) are collected, not thrown.
pub(crate) fn assemble(lines: &[LogicalLine]) -> (Block4, Vec<ParseError>) {
    let mut block4 = Block4::default();
    let mut errors = Vec::new();
    let mut sequence: u32 = 0;
    let mut pending_information: Vec<(u32, String)> = Vec::new();

    for line in lines {
        if line.tag == "61" {
            sequence += 1;
        }
        let decoded = match field::decode(&line.tag, &line.text) {
            Ok(value) => value,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        match decoded {
            FieldValue::Reference(v) => block4.reference = Some(v),
            FieldValue::RelatedReference(v) => block4.related_reference = Some(v),
            FieldValue::AccountNumber(v) => block4.account_number = Some(v),
            FieldValue::StatementSequence(v) => block4.statement_sequence = Some(v),
            FieldValue::CreditFloor(v) => block4.credit_floor = Some(v),
            FieldValue::DebitFloor(v) => block4.debit_floor = Some(v),
            FieldValue::DateTime(v) => block4.date_time = Some(v),
            FieldValue::Debits(v) => block4.debits = Some(v),
            FieldValue::Credits(v) => block4.credits = Some(v),
            FieldValue::StatementLine(mut statement_line) => {
                statement_line.sequence = sequence;
                block4.lines.push(*statement_line);
            }
            FieldValue::Information(text) => {
                if sequence == 0 {
                    errors.push(ParseError::OrphanInformation { text });
                } else {
                    pending_information.push((sequence, text));
                }
            }
            FieldValue::Unknown => {}
        }
    }

    for (seq, text) in pending_information {
        match block4.lines.iter_mut().find(|l| l.sequence == seq) {
            Some(entry) => entry.information.push(text),
            // The statement line this information belonged to never decoded.
            None => errors.push(ParseError::OrphanInformation { text }),
        }
    }

    (block4, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logical(tag: &str, text: &str) -> LogicalLine {
        LogicalLine {
            tag: tag.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn information_lines_attach_to_the_preceding_statement_line() {
        let lines = vec![
            logical("61", "210101C1,00NTRFA//X"),
            logical("86", "FIRST NOTE"),
            logical("86", "SECOND NOTE"),
            logical("61", "210102D2,00NTRFB//Y"),
            logical("86", "THIRD NOTE"),
        ];
        let (block4, errors) = assemble(&lines);
        assert!(errors.is_empty());
        assert_eq!(block4.lines.len(), 2);
        assert_eq!(block4.lines[0].sequence, 1);
        assert_eq!(block4.lines[0].information, vec!["FIRST NOTE", "SECOND NOTE"]);
        assert_eq!(block4.lines[1].sequence, 2);
        assert_eq!(block4.lines[1].information, vec!["THIRD NOTE"]);
    }

    #[test]
    fn statement_line_count_matches_tag_61_count() {
        let lines = vec![
            logical("61", "210101C1,00NTRFA//X"),
            logical("61", "210102C2,00NTRFB//Y"),
            logical("61", "210103C3,00NTRFC//Z"),
        ];
        let (block4, _) = assemble(&lines);
        assert_eq!(block4.lines.len(), 3);
        let sequences: Vec<u32> = block4.lines.iter().map(|l| l.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert!(block4.lines.iter().all(|l| l.information.is_empty()));
    }

    #[test]
    fn orphan_information_is_dropped_and_reported() {
        let lines = vec![
            logical("86", "NO HOME"),
            logical("61", "210101C1,00NTRFA//X"),
        ];
        let (block4, errors) = assemble(&lines);
        assert_eq!(block4.lines.len(), 1);
        assert!(block4.lines[0].information.is_empty());
        assert_eq!(
            errors,
            vec![ParseError::OrphanInformation {
                text: "NO HOME".into()
            }]
        );
    }

    #[test]
    fn information_after_a_failed_statement_line_does_not_attach_to_the_previous_one() {
        let lines = vec![
            logical("61", "210101C1,00NTRFA//X"),
            logical("61", "garbage that fails the grammar"),
            logical("86", "FOR THE FAILED LINE"),
        ];
        let (block4, errors) = assemble(&lines);
        assert_eq!(block4.lines.len(), 1);
        assert!(block4.lines[0].information.is_empty());
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ParseError::FieldGrammarMismatch { .. }));
        assert!(matches!(errors[1], ParseError::OrphanInformation { .. }));
    }

    #[test]
    fn repeated_scalar_tags_overwrite() {
        let lines = vec![logical("20", "FIRST"), logical("20", "SECOND")];
        let (block4, _) = assemble(&lines);
        assert_eq!(block4.reference.as_deref(), Some("SECOND"));
    }

    #[test]
    fn grammar_mismatch_is_collected_and_the_rest_still_decodes() {
        let lines = vec![
            logical("34F", "E1"),
            logical("20", "REF123"),
        ];
        let (block4, errors) = assemble(&lines);
        assert_eq!(block4.reference.as_deref(), Some("REF123"));
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ParseError::FieldGrammarMismatch { ref tag, .. } if tag == "34F"
        ));
    }

    #[test]
    fn unknown_tags_contribute_nothing() {
        let lines = vec![logical("99", "garbage"), logical("20", "REF")];
        let (block4, errors) = assemble(&lines);
        assert!(errors.is_empty());
        assert_eq!(block4, Block4 {
            reference: Some("REF".into()),
            ..Block4::default()
        });
    }
}
