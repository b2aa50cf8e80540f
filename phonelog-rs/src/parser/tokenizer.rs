//! Tokenizer for `content query` rows
//!
//! Rows look like `Row: 0 _id=12, number=5551234567, name=John Smith` but
//! some providers separate fields with spaces instead of commas, and some mix
//! both. A row that contains a comma is split on commas, then each piece is
//! split again where whitespace is followed by a `key=` token, so multi-word
//! values survive. A row without commas is split on whitespace. Tokens
//! without `=` are discarded.

use super::types::{ParseOutcome, RawRecord, ADDRESS_FIELD, NUMBER_FIELD};
use crate::utils::normalize;

/// Leading marker of a provider row
pub const ROW_MARKER: &str = "Row:";

/// Literal the device prints for a SQL NULL column
const NULL_LITERAL: &str = "NULL";

/// One token of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Field { key: &'a str, value: Option<&'a str> },
    Garbage(&'a str),
}

/// Split a row into field and garbage tokens
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let content = strip_row_header(line);

    let pieces: Vec<&str> = if content.contains(',') {
        content.split(',').flat_map(split_before_keys).collect()
    } else {
        content.split_whitespace().collect()
    };

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(classify_token)
        .collect()
}

/// Split a comma-delimited piece wherever whitespace precedes a `key=` token
fn split_before_keys(piece: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut after_space = false;

    for (idx, c) in piece.char_indices() {
        if c.is_whitespace() {
            after_space = true;
            continue;
        }
        if after_space && starts_with_key(&piece[idx..]) && !piece[start..idx].trim().is_empty() {
            parts.push(&piece[start..idx]);
            start = idx;
        }
        after_space = false;
    }

    parts.push(&piece[start..]);
    parts
}

/// Whether `rest` opens with an identifier immediately followed by `=`
fn starts_with_key(rest: &str) -> bool {
    let key_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    key_len > 0 && rest[key_len..].starts_with('=')
}

fn classify_token(token: &str) -> Token<'_> {
    // Values may contain '=' themselves (base64 padding, URLs)
    match token.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Token::Field {
            key: key.trim(),
            value: clean_value(value),
        },
        _ => Token::Garbage(token),
    }
}

fn clean_value(value: &str) -> Option<&str> {
    let value = value.trim();
    let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    };

    if value == NULL_LITERAL {
        None
    } else {
        Some(value)
    }
}

/// Drop a leading `Row:` marker and the row index that follows it
pub fn strip_row_header(line: &str) -> &str {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(ROW_MARKER) else {
        return trimmed;
    };

    let rest = rest.trim_start();
    let index_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if index_len > 0 && rest[index_len..].starts_with(char::is_whitespace) {
        rest[index_len..].trim_start()
    } else {
        rest
    }
}

/// Collect the field tokens of a row into a record, without post-processing
pub fn collect_fields(line: &str) -> RawRecord {
    tokenize(line)
        .into_iter()
        .filter_map(|token| match token {
            Token::Field { key, value } => Some((key.to_string(), value.map(str::to_string))),
            Token::Garbage(_) => None,
        })
        .collect()
}

/// Parse one row into a record
pub fn parse_line(line: &str) -> ParseOutcome {
    finish(collect_fields(line))
}

/// Apply the number conventions and wrap the result
///
/// SMS rows carry the number in `address`; it is aliased into `number` when
/// the row has no `number` of its own. `number` is then normalized, and set
/// to null when it has fewer than 10 digits.
pub(crate) fn finish(mut record: RawRecord) -> ParseOutcome {
    if record.is_empty() {
        return ParseOutcome::Unparseable;
    }

    if !record.contains_key(NUMBER_FIELD) {
        if let Some(address) = record.get(ADDRESS_FIELD).map(str::to_string) {
            record.insert(NUMBER_FIELD, Some(address));
        }
    }

    if record.contains_key(NUMBER_FIELD) {
        let normalized = record.get(NUMBER_FIELD).and_then(normalize);
        record.insert(NUMBER_FIELD, normalized);
    }

    ParseOutcome::Parsed(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_separated_row() {
        let record = collect_fields("display_name=John number=1234567890");
        assert_eq!(record.get("display_name"), Some("John"));
        assert_eq!(record.get("number"), Some("1234567890"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_comma_separated_row_keeps_spaces_in_values() {
        let record =
            collect_fields("Row: 0 _id=12, number=+1 (707) 266-8159, name=John Smith, type=1");
        assert_eq!(record.get("_id"), Some("12"));
        assert_eq!(record.get("name"), Some("John Smith"));
        assert_eq!(record.get("number"), Some("+1 (707) 266-8159"));
    }

    #[test]
    fn test_mixed_separators() {
        let record = parse_line("Row: 0 _id=1 number=5551234567, duration=3").into_record();
        assert_eq!(record.get("_id"), Some("1"));
        assert_eq!(record.get("number"), Some("5551234567"));
        assert_eq!(record.get("duration"), Some("3"));

        let record = collect_fields("_id=7 name=John Smith, type=2 date=1700000000");
        assert_eq!(record.get("name"), Some("John Smith"));
        assert_eq!(record.get("type"), Some("2"));
        assert_eq!(record.get("date"), Some("1700000000"));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_value_split_on_first_equals_only() {
        let tokens = tokenize("data=YWJj==, url=http://x?a=b");
        assert_eq!(
            tokens,
            vec![
                Token::Field { key: "data", value: Some("YWJj==") },
                Token::Field { key: "url", value: Some("http://x?a=b") },
            ]
        );
    }

    #[test]
    fn test_garbage_and_quotes() {
        let tokens = tokenize("junk display_name=Jane =orphan");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::Garbage("junk"));
        assert_eq!(tokens[2], Token::Garbage("=orphan"));

        let record = collect_fields("display_name=\"Jane\", number=\"4065550100\"");
        assert_eq!(record.get("display_name"), Some("Jane"));
        assert_eq!(record.get("number"), Some("4065550100"));
    }

    #[test]
    fn test_null_literal_becomes_null() {
        let record = collect_fields("name=NULL, number=5551234567");
        assert!(record.contains_key("name"));
        assert_eq!(record.get("name"), None);
    }

    #[test]
    fn test_strip_row_header() {
        assert_eq!(strip_row_header("Row: 3 _id=1"), "_id=1");
        assert_eq!(strip_row_header("Row: foo=bar"), "foo=bar");
        assert_eq!(strip_row_header("  _id=1  "), "_id=1");
    }

    #[test]
    fn test_parse_line_normalizes_number() {
        let record = parse_line("display_name=John number=+1-707-266-8159").into_record();
        assert_eq!(record.get("number"), Some("7072668159"));

        let record = parse_line("number=12345, type=2").into_record();
        assert!(record.contains_key("number"));
        assert_eq!(record.get("number"), None);
    }

    #[test]
    fn test_sms_address_alias() {
        let record = parse_line("address=+15551234567, body=hello").into_record();
        assert_eq!(record.get("number"), Some("5551234567"));
        assert_eq!(record.get("address"), Some("+15551234567"));

        let record = parse_line("address=+15551234567, number=4065550100").into_record();
        assert_eq!(record.get("number"), Some("4065550100"));
    }

    #[test]
    fn test_unparseable_rows() {
        assert_eq!(parse_line(""), ParseOutcome::Unparseable);
        assert_eq!(parse_line("no fields here"), ParseOutcome::Unparseable);
        assert!(parse_line("Row: 0").into_record().is_empty());
    }
}
