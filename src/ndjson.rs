//! NDJSON encoding shared by raw captures and rollup files.
//!
//! One JSON object per line, LF-joined, no trailing newline, UTF-8.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes `items` to NDJSON.
pub fn to_ndjson<T: Serialize>(items: &[T]) -> serde_json::Result<String> {
    let lines: Vec<String> = items
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<_, _>>()?;
    Ok(lines.join("\n"))
}

/// Parses NDJSON text, returning the rows that parsed and the number of
/// lines that did not. Blank lines are ignored entirely.
pub fn parse_ndjson<T: DeserializeOwned>(text: &str) -> (Vec<T>, usize) {
    let mut rows = Vec::new();
    let mut skipped = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(row) => rows.push(row),
            Err(_) => skipped += 1,
        }
    }
    (rows, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Row {
        a: u32,
    }

    #[test]
    fn test_to_ndjson_no_trailing_newline() {
        let text = to_ndjson(&[Row { a: 1 }, Row { a: 2 }]).unwrap();
        assert_eq!(text, "{\"a\":1}\n{\"a\":2}");
    }

    #[test]
    fn test_to_ndjson_empty_is_empty_string() {
        let rows: [Row; 0] = [];
        assert_eq!(to_ndjson(&rows).unwrap(), "");
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let (rows, skipped) = parse_ndjson::<Row>("{\"a\":1}\nnot json\n\n{\"a\":3}");
        assert_eq!(rows, vec![Row { a: 1 }, Row { a: 3 }]);
        assert_eq!(skipped, 1);
    }
}
