//! Per-tag field grammars.
//!
//! Each recognized tag has its own small fixed-width parser over a
//! [`Scanner`]; the grammars are never one monolithic pattern, so the
//! absent-vs-empty distinction of optional groups is explicit. All amounts
//! are `rust_decimal::Decimal` -- never `f64`. The wire decimal comma is
//! normalized to `.` at the string level before parsing, so the scale of
//! `100,00` survives as `100.00`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::scan::Scanner;

// ──────────────────────────────────────────────
// Decoded field shapes
// ──────────────────────────────────────────────

/// A value date from a tag-61 line: two-digit year (2000-based), month, day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwiftDate {
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

/// The optional entry date of a tag-61 line; the wire carries no year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDate {
    pub month: u8,
    pub day: u8,
}

/// Tag 28C, `5n[/5n]`. Numbers stay strings: leading zeros are significant
/// on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSequence {
    pub statement_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

/// Tag 34F, `3!a[1!a]15d`. `floor_type` of `C` selects the credit floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorLimit {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_type: Option<char>,
    pub amount: Decimal,
}

/// Tag 13D, `6!n4!n1!x4!n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeIndicator {
    /// Unix timestamp of the date-time, assumed UTC.
    pub timestamp: i64,
    /// RFC 3339 rendering of `timestamp`.
    pub iso_date: String,
    /// Signed HHMM offset from the wire. Captured but not applied to
    /// `timestamp`.
    pub offset: String,
}

/// Tags 90D/90C, `5n3!a15d`: entry count and sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub entries: u32,
    pub currency: String,
    pub amount: Decimal,
}

/// One decoded tag-61 statement line.
///
/// `sequence` and `information` are filled in during assembly: the sequence
/// counter lives in the assembler, and information lines arrive as later
/// tag-86 fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub sequence: u32,
    pub value_date: SwiftDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<EntryDate>,
    pub indicator: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds_code: Option<char>,
    pub amount: Decimal,
    pub transaction_code: String,
    pub customer_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub information: Vec<String>,
}

/// Decoded value of one logical line, keyed by tag code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// `:20:` transaction reference number.
    Reference(String),
    /// `:21:` related reference.
    RelatedReference(String),
    /// `:25:` account identification.
    AccountNumber(String),
    /// `:28C:` statement/sequence number.
    StatementSequence(StatementSequence),
    /// `:34F:` floor limit with type `C`.
    CreditFloor(FloorLimit),
    /// `:34F:` floor limit with any other (or no) type letter.
    DebitFloor(FloorLimit),
    /// `:13D:` date/time indicator.
    DateTime(DateTimeIndicator),
    /// `:61:` statement line.
    StatementLine(Box<StatementLine>),
    /// `:86:` information to account owner, linked positionally to the most
    /// recent statement line.
    Information(String),
    /// `:90D:` number and sum of debit entries.
    Debits(EntrySummary),
    /// `:90C:` number and sum of credit entries.
    Credits(EntrySummary),
    /// Any unsupported tag; contributes nothing to the output.
    Unknown,
}

// ──────────────────────────────────────────────
// Dispatch
// ──────────────────────────────────────────────

/// Decode one logical line's text by its tag code.
///
/// Unrecognized tags return [`FieldValue::Unknown`]. A required leading
/// group that cannot match yields [`ParseError::FieldGrammarMismatch`],
/// which is recoverable per line.
pub fn decode(tag: &str, text: &str) -> Result<FieldValue, ParseError> {
    match tag {
        "20" => Ok(FieldValue::Reference(take_reference(text, 16))),
        "21" => Ok(FieldValue::RelatedReference(take_reference(text, 16))),
        "25" => Ok(FieldValue::AccountNumber(take_reference(text, 35))),
        "28C" => Ok(FieldValue::StatementSequence(decode_28c(text))),
        "34F" => decode_34f(text),
        "13D" => decode_13d(text).map(FieldValue::DateTime),
        "61" => decode_61(text).map(|line| FieldValue::StatementLine(Box::new(line))),
        "86" => Ok(FieldValue::Information(take_information(text))),
        "90D" => decode_90(text, "90D").map(FieldValue::Debits),
        "90C" => decode_90(text, "90C").map(FieldValue::Credits),
        _ => Ok(FieldValue::Unknown),
    }
}

fn grammar(tag: &str, reason: impl Into<String>) -> ParseError {
    ParseError::FieldGrammarMismatch {
        tag: tag.to_string(),
        reason: reason.into(),
    }
}

// ──────────────────────────────────────────────
// Shared groups
// ──────────────────────────────────────────────

/// Replace the SWIFT decimal comma with a dot. Pure string substitution;
/// applying it twice is a no-op.
fn normalize_amount(raw: &str) -> String {
    raw.replace(',', ".")
}

/// `15d`: up to 15 chars of digits and the decimal comma.
fn take_amount(scanner: &mut Scanner, tag: &str) -> Result<Decimal, ParseError> {
    let raw = scanner.take_up_to(15, |c| c.is_ascii_digit() || c == ',');
    if raw.is_empty() {
        return Err(grammar(tag, "expected amount"));
    }
    normalize_amount(&raw)
        .parse::<Decimal>()
        .map_err(|e| grammar(tag, format!("invalid amount '{}': {}", raw, e)))
}

/// Scalar reference field: up to `max` alphanumerics.
fn take_reference(text: &str, max: usize) -> String {
    Scanner::new(text).take_up_to(max, |c| c.is_ascii_alphanumeric())
}

/// `65x` of the information character set.
fn take_information(text: &str) -> String {
    Scanner::new(text).take_up_to(65, |c| c.is_ascii_alphanumeric() || c == '/' || c == ' ')
}

fn take_single_upper(scanner: &mut Scanner) -> Option<char> {
    scanner
        .take_exact(1, |c| c.is_ascii_uppercase())
        .and_then(|s| s.chars().next())
}

fn take_swift_date(scanner: &mut Scanner) -> Option<SwiftDate> {
    let digits = scanner.take_exact(6, |c| c.is_ascii_digit())?;
    let b = digits.as_bytes();
    Some(SwiftDate {
        year: (b[0] - b'0') * 10 + (b[1] - b'0'),
        month: (b[2] - b'0') * 10 + (b[3] - b'0'),
        day: (b[4] - b'0') * 10 + (b[5] - b'0'),
    })
}

/// Four digits as two two-digit numbers (MMDD or HHMM).
fn take_digit_pair(scanner: &mut Scanner) -> Option<(u8, u8)> {
    let digits = scanner.take_exact(4, |c| c.is_ascii_digit())?;
    let b = digits.as_bytes();
    Some((
        (b[0] - b'0') * 10 + (b[1] - b'0'),
        (b[2] - b'0') * 10 + (b[3] - b'0'),
    ))
}

fn take_entry_date(scanner: &mut Scanner) -> Option<EntryDate> {
    take_digit_pair(scanner).map(|(month, day)| EntryDate { month, day })
}

// ──────────────────────────────────────────────
// Per-tag decoders
// ──────────────────────────────────────────────

/// `5n[/5n]`. The sequence number is only taken after a literal `/`.
fn decode_28c(text: &str) -> StatementSequence {
    let mut scanner = Scanner::new(text);
    let statement_number = scanner.take_up_to(5, |c| c.is_ascii_digit());
    let sequence_number = if scanner.eat("/") {
        let digits = scanner.take_up_to(5, |c| c.is_ascii_digit());
        if digits.is_empty() {
            None
        } else {
            Some(digits)
        }
    } else {
        None
    };
    StatementSequence {
        statement_number,
        sequence_number,
    }
}

/// `3!a[1!a]15d`. A `C` in the type slot makes this the credit floor.
fn decode_34f(text: &str) -> Result<FieldValue, ParseError> {
    let mut scanner = Scanner::new(text);
    let currency = scanner
        .take_exact(3, |c| c.is_ascii_uppercase())
        .ok_or_else(|| grammar("34F", "expected 3-letter currency code"))?;
    let floor_type = take_single_upper(&mut scanner);
    let amount = take_amount(&mut scanner, "34F")?;
    let limit = FloorLimit {
        currency,
        floor_type,
        amount,
    };
    if limit.floor_type == Some('C') {
        Ok(FieldValue::CreditFloor(limit))
    } else {
        Ok(FieldValue::DebitFloor(limit))
    }
}

/// `6!n4!n1!x4!n`: YYMMDDHHMM, a sign, and an HHMM offset. The timestamp is
/// computed with the date-time assumed UTC; the offset is captured only.
fn decode_13d(text: &str) -> Result<DateTimeIndicator, ParseError> {
    let mut scanner = Scanner::new(text);
    let date = take_swift_date(&mut scanner)
        .ok_or_else(|| grammar("13D", "expected YYMMDD date digits"))?;
    let (hour, minute) = take_digit_pair(&mut scanner)
        .ok_or_else(|| grammar("13D", "expected HHMM time digits"))?;
    let sign = match scanner.bump() {
        Some(c @ ('+' | '-')) => c,
        _ => return Err(grammar("13D", "expected '+' or '-' offset sign")),
    };
    let offset_digits = scanner
        .take_exact(4, |c| c.is_ascii_digit())
        .ok_or_else(|| grammar("13D", "expected 4-digit offset"))?;

    let month = time::Month::try_from(date.month)
        .map_err(|e| grammar("13D", format!("invalid month: {}", e)))?;
    let calendar_date = time::Date::from_calendar_date(2000 + i32::from(date.year), month, date.day)
        .map_err(|e| grammar("13D", format!("invalid calendar date: {}", e)))?;
    let clock_time = time::Time::from_hms(hour, minute, 0)
        .map_err(|e| grammar("13D", format!("invalid time of day: {}", e)))?;
    let date_time = time::PrimitiveDateTime::new(calendar_date, clock_time).assume_utc();
    let iso_date = date_time
        .format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| grammar("13D", format!("unformattable date-time: {}", e)))?;

    Ok(DateTimeIndicator {
        timestamp: date_time.unix_timestamp(),
        iso_date,
        offset: format!("{}{}", sign, offset_digits),
    })
}

/// `6!n[4!n]2a[1!a]15d1!a3!c16x[//16x]`, optionally followed on a continued
/// physical line by `[34x]` of details.
fn decode_61(text: &str) -> Result<StatementLine, ParseError> {
    let mut scanner = Scanner::new(text);
    let value_date = take_swift_date(&mut scanner)
        .ok_or_else(|| grammar("61", "expected YYMMDD value date"))?;
    let entry_date = take_entry_date(&mut scanner);
    let indicator = take_single_upper(&mut scanner)
        .ok_or_else(|| grammar("61", "expected debit/credit indicator"))?;
    let funds_code = take_single_upper(&mut scanner);
    let amount = take_amount(&mut scanner, "61")?;
    let transaction_code = take_transaction_code(&mut scanner)
        .ok_or_else(|| grammar("61", "expected 1!a3!c transaction code"))?;
    let customer_ref = scanner.take_up_to(16, |c| c.is_ascii_alphanumeric() || c == ' ');
    if customer_ref.is_empty() {
        return Err(grammar("61", "expected customer reference"));
    }
    let institution_ref = if scanner.eat("//") {
        Some(scanner.take_up_to(16, |c| c.is_ascii_alphanumeric()))
    } else {
        None
    };
    scanner.eat("\n");
    let details = {
        let d = scanner.take_up_to(34, |c| c.is_ascii_alphanumeric() || c == ' ');
        if d.is_empty() {
            None
        } else {
            Some(d)
        }
    };

    Ok(StatementLine {
        sequence: 0,
        value_date,
        entry_date,
        indicator,
        funds_code,
        amount,
        transaction_code,
        customer_ref,
        institution_ref,
        details,
        information: Vec::new(),
    })
}

/// `1!a3!c`: one uppercase letter, then three uppercase alphanumerics.
fn take_transaction_code(scanner: &mut Scanner) -> Option<String> {
    let head = scanner.take_exact(1, |c| c.is_ascii_uppercase())?;
    let tail = scanner.take_exact(3, |c| c.is_ascii_digit() || c.is_ascii_uppercase())?;
    Some(head + &tail)
}

/// `5n3!a15d`: entry count, currency, sum.
fn decode_90(text: &str, tag: &str) -> Result<EntrySummary, ParseError> {
    let mut scanner = Scanner::new(text);
    let digits = scanner.take_up_to(5, |c| c.is_ascii_digit());
    if digits.is_empty() {
        return Err(grammar(tag, "expected entry count"));
    }
    let entries = digits
        .parse::<u32>()
        .map_err(|e| grammar(tag, format!("invalid entry count '{}': {}", digits, e)))?;
    let currency = scanner
        .take_exact(3, |c| c.is_ascii_uppercase())
        .ok_or_else(|| grammar(tag, "expected 3-letter currency code"))?;
    let amount = take_amount(&mut scanner, tag)?;
    Ok(EntrySummary {
        entries,
        currency,
        amount,
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
