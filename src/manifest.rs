//! Manifest loader: raw tabular (CSV) text → ordered [`ManifestRecord`]s.
//!
//! Structural problems fail the whole audit up front with an [`InputError`]
//! carrying the offending line number. A malformed header makes every row's
//! semantics suspect, so nothing is classified after a loader failure.

use crate::error::InputError;
use crate::models::ManifestRecord;

const DEFAULT_CONTENT_TYPE: &str = "unknown";

/// Parse a CSV manifest. The first line is the header; column names are
/// matched case-insensitively after trimming.
///
/// Columns:
/// - `url` — required (`source_url` accepted as an alias; `url` wins if both
///   are present)
/// - `content_type` — optional, defaults to `"unknown"`
/// - `word_count` — optional non-negative integer, defaults to `0`
///
/// Extra columns are ignored. Field counts must match the header exactly.
pub fn parse_manifest(input: &str) -> Result<Vec<ManifestRecord>, InputError> {
    let mut rows = parse_csv(input)?.into_iter();

    let (_, header) = rows
        .next()
        .ok_or_else(|| InputError::new(1, "empty manifest: missing header row"))?;

    let names: Vec<String> = header
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let col = |name: &str| names.iter().position(|n| n.as_str() == name);

    let url_idx = col("url")
        .or_else(|| col("source_url"))
        .ok_or_else(|| InputError::new(1, "missing required column `url`"))?;
    let content_type_idx = col("content_type");
    let word_count_idx = col("word_count");

    let mut records = Vec::new();

    for (line, fields) in rows {
        if fields.len() != names.len() {
            return Err(InputError::new(
                line,
                format!("expected {} columns, found {}", names.len(), fields.len()),
            ));
        }

        let content_type = content_type_idx
            .map(|i| fields[i].trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let word_count = match word_count_idx.map(|i| fields[i].trim()) {
            None | Some("") => 0,
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                InputError::new(line, format!("invalid word_count {:?}", raw))
            })?,
        };

        records.push(ManifestRecord {
            url: fields[url_idx].trim().to_string(),
            content_type,
            word_count,
        });
    }

    Ok(records)
}

/// Minimal RFC-4180-style reader: quoted fields may contain commas, doubled
/// quotes and newlines. Returns each record with the 1-based line number it
/// starts on. Blank lines between records are skipped.
fn parse_csv(input: &str) -> Result<Vec<(usize, Vec<String>)>, InputError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut record_started = false;
    let mut line = 1usize;
    let mut record_line = 1usize;

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                if !field.is_empty() {
                    return Err(InputError::new(line, "unexpected quote inside unquoted field"));
                }
                in_quotes = true;
                record_started = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                record_started = true;
            }
            '\r' => {
                // Swallowed; the following '\n' terminates the record.
            }
            '\n' => {
                if record_started || !field.is_empty() || !fields.is_empty() {
                    fields.push(std::mem::take(&mut field));
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                line += 1;
                record_line = line;
                record_started = false;
            }
            _ => {
                field.push(c);
                record_started = true;
            }
        }
    }

    if in_quotes {
        return Err(InputError::new(record_line, "unterminated quoted field"));
    }

    if record_started || !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_columns() {
        let records = parse_manifest(
            "url,content_type,word_count\n\
             https://nytimes.com/a,text/html,1200\n\
             https://arxiv.org/abs/1,application/pdf,5000\n",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://nytimes.com/a");
        assert_eq!(records[0].content_type, "text/html");
        assert_eq!(records[0].word_count, 1200);
    }

    #[test]
    fn test_optional_columns_default() {
        let records = parse_manifest("url\nhttps://example.com/x\n").unwrap();
        assert_eq!(records[0].content_type, "unknown");
        assert_eq!(records[0].word_count, 0);
    }

    #[test]
    fn test_empty_optional_values_default() {
        let records =
            parse_manifest("url,content_type,word_count\nhttps://example.com/x,,\n").unwrap();
        assert_eq!(records[0].content_type, "unknown");
        assert_eq!(records[0].word_count, 0);
    }

    #[test]
    fn test_source_url_alias() {
        let records = parse_manifest("source_url,word_count\nhttps://a.com,10\n").unwrap();
        assert_eq!(records[0].url, "https://a.com");
    }

    #[test]
    fn test_missing_url_column() {
        let err = parse_manifest("domain,word_count\na.com,10\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("url"));
    }

    #[test]
    fn test_empty_input() {
        let err = parse_manifest("").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_header_only_is_an_empty_manifest() {
        let records = parse_manifest("url,content_type\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_bad_word_count_reports_line() {
        let err = parse_manifest(
            "url,word_count\nhttps://a.com,10\nhttps://b.com,ten\n",
        )
        .unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("word_count"));
    }

    #[test]
    fn test_negative_word_count_rejected() {
        let err = parse_manifest("url,word_count\nhttps://a.com,-5\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_column_count_mismatch_reports_line() {
        let err = parse_manifest("url,word_count\nhttps://a.com,1,extra\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("columns"));
    }

    #[test]
    fn test_quoted_fields() {
        let records = parse_manifest(
            "url,content_type\n\"https://example.com/a,b\",\"text, html\"\n",
        )
        .unwrap();
        assert_eq!(records[0].url, "https://example.com/a,b");
        assert_eq!(records[0].content_type, "text, html");
    }

    #[test]
    fn test_doubled_quote_escape() {
        let records = parse_manifest("url,content_type\nhttps://a.com,\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(records[0].content_type, "say \"hi\"");
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_manifest("url\n\"https://a.com\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let records = parse_manifest("url,word_count\r\nhttps://a.com,3\r\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].word_count, 3);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let records = parse_manifest("url\nhttps://a.com\n\nhttps://b.com\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_preserves_input_order() {
        let records = parse_manifest("url\nc.com\na.com\nb.com\n").unwrap();
        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["c.com", "a.com", "b.com"]);
    }
}
