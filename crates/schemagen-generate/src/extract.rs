use std::sync::OnceLock;

use regex::Regex;

use schemagen_core::{GenerationError, Result};

const COLUMN_LIST_PATTERN: &str =
    r"^(?i:RANGE|LIST|AGGREGATE\s+KEY|DUPLICATE\s+KEY)\s*\(([^()]*)\)";

fn column_list_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COLUMN_LIST_PATTERN).ok())
        .as_ref()
}

/// Extract the column identifiers of a leading `RANGE(...)`, `LIST(...)`,
/// `AGGREGATE KEY(...)` or `DUPLICATE KEY(...)` clause.
///
/// `` RANGE ( col1, `col2` ) (...) `` yields `["col1", "col2"]`. Only the first
/// parenthesis group is read; this is not a SQL parser.
pub fn extract_columns(clause: &str) -> Result<Vec<String>> {
    let clause = clause.trim();
    let captures = column_list_regex()
        .and_then(|re| re.captures(clause))
        .ok_or_else(|| {
            GenerationError::Configuration(format!("column list not found in: {clause}"))
        })?;

    let columns: Vec<String> = captures[1]
        .split(',')
        .map(|column| column.trim_matches(|ch: char| ch == '`' || ch.is_whitespace()))
        .filter(|column| !column.is_empty())
        .map(str::to_string)
        .collect();

    if columns.is_empty() {
        return Err(GenerationError::Configuration(format!(
            "empty column list in: {clause}"
        )));
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_range_columns() {
        let columns = extract_columns("RANGE ( col1, col2 ) (PARTITION p0 VALUES LESS THAN (10))")
            .expect("extract");
        assert_eq!(columns, vec!["col1", "col2"]);
    }

    #[test]
    fn strips_backticks_and_surrounding_whitespace() {
        let clause = "\n\tRange ( col1, `col2` )(PARTITION p0 VALUES LESS THAN ('2020-05-25')),\n\
                      PARTITION p1 VALUES [('2020-05-25'), ('2020-05-26')))\n)\n";
        assert_eq!(extract_columns(clause).expect("extract"), vec!["col1", "col2"]);

        let key = "DUPLICATE KEY ( col1, `col2`, col3 )";
        assert_eq!(
            extract_columns(key).expect("extract"),
            vec!["col1", "col2", "col3"]
        );
    }

    #[test]
    fn keyword_is_case_insensitive() {
        assert_eq!(extract_columns("list(region)").expect("extract"), vec!["region"]);
        assert_eq!(
            extract_columns("aggregate   key(k1,k2)").expect("extract"),
            vec!["k1", "k2"]
        );
    }

    #[test]
    fn clause_must_lead_the_text() {
        let err = extract_columns("PARTITION BY RANGE(a)").unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));
        assert!(extract_columns("UNIQUE KEY(pk)").is_err());
        assert!(extract_columns("DUPLICATE KEY").is_err());
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(extract_columns("RANGE( ` ` )").is_err());
    }
}
