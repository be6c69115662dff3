//! Comma separated values.
//!
//! Double-quoted fields may contain commas, newlines and `""` escapes.
//! Records end with LF, CRLF or a bare CR.

use winnow::{Parser as _, combinator::alt, token::take_while};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Error(String);

type ParseResult<T> = Result<T, winnow::error::ErrMode<winnow::error::ContextError>>;

fn quoted_field(input: &mut &str) -> ParseResult<String> {
    let _: char = '"'.parse_next(input)?;
    let mut result = String::new();

    loop {
        if input.starts_with("\"\"") {
            let _: &str = "\"\"".parse_next(input)?;
            result.push('"');
            continue;
        }
        if input.starts_with('"') {
            let _: char = '"'.parse_next(input)?;
            break;
        }
        let ch: char = winnow::token::any.parse_next(input)?;
        result.push(ch);
    }

    Ok(result)
}

fn unquoted_field(input: &mut &str) -> ParseResult<String> {
    take_while(0.., |c: char| !matches!(c, ',' | '\n' | '\r'))
        .map(|s: &str| s.to_owned())
        .parse_next(input)
}

fn field(input: &mut &str) -> ParseResult<String> {
    if input.starts_with('"') {
        quoted_field(input)
    } else {
        unquoted_field(input)
    }
}

fn record(input: &mut &str) -> ParseResult<Vec<String>> {
    let mut fields = vec![field(input)?];
    while input.starts_with(',') {
        let _: char = ','.parse_next(input)?;
        fields.push(field(input)?);
    }
    Ok(fields)
}

fn line_ending<'a>(input: &mut &'a str) -> ParseResult<&'a str> {
    alt(("\r\n", "\n", "\r")).parse_next(input)
}

fn is_blank(record: &[String]) -> bool {
    matches!(record, [only] if only.is_empty())
}

/// Split `src` into records of fields. Blank lines are skipped.
pub fn parse_records(src: &str) -> Result<Vec<Vec<String>>, Error> {
    let mut input = src.strip_prefix('\u{feff}').unwrap_or(src);
    let mut records = Vec::new();
    while !input.is_empty() {
        let line = records.len() + 1;
        let fields = record(&mut input)
            .map_err(|e| Error(format!("record {line}: unterminated quoted field ({e})")))?;
        if !input.is_empty() {
            line_ending(&mut input).map_err(|_| {
                Error(format!(
                    "record {line}: unexpected character after closing quote"
                ))
            })?;
        }
        if !is_blank(&fields) {
            records.push(fields);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::parse_records;

    #[test]
    fn test_simple() {
        let records = parse_records("a,b\n1,2\n").unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let records = parse_records("a,b\r\n\r\n1,2\r\n").unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_quoted_fields() {
        let records = parse_records("name,quote\n\"Doe, J\",\"He said \"\"hi\"\"\nagain\"").unwrap();
        assert_eq!(
            records[1],
            vec!["Doe, J".to_string(), "He said \"hi\"\nagain".to_string()]
        );
    }

    #[test]
    fn test_empty_fields() {
        let records = parse_records(",x,\n").unwrap();
        assert_eq!(records, vec![vec!["", "x", ""]]);
    }

    #[test]
    fn test_byte_order_mark() {
        let records = parse_records("\u{feff}a\n1").unwrap();
        assert_eq!(records, vec![vec!["a"], vec!["1"]]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(parse_records("a\n\"open").is_err());
    }

    #[test]
    fn test_garbage_after_quote() {
        assert!(parse_records("\"a\"b,c").is_err());
    }
}
