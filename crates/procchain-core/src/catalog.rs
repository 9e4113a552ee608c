//! Rule catalogs.
//!
//! A `Catalog` is the ordered list of rules available to one search, plus an
//! index from source label to the positions of the rules leaving it. Rule
//! identity is positional: two identical entries are two distinct edges.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rule::{Rule, RuleParseError};

/// Comment marker for the line-oriented rules format.
pub const COMMENT_MARKER: char = '#';

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rules: Vec<Rule>,
    by_from: AHashMap<String, Vec<usize>>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog entry {index}: {source}")]
    Entry {
        /// 1-based position in the input sequence.
        index: usize,
        #[source]
        source: RuleParseError,
    },

    #[error("invalid rule on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: RuleParseError,
    },
}

/// Shape summary of a catalog (used by `procchain check`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub rules: usize,
    pub labels: usize,
    pub self_loops: usize,
    /// Entries that repeat an earlier entry exactly.
    pub duplicates: usize,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut catalog = Self::new();
        for rule in rules {
            catalog.push(rule);
        }
        catalog
    }

    /// Strictly parse a sequence of `name:from:to` entries.
    ///
    /// Fails on the first entry rejected by [`Rule::parse_strict`].
    pub fn parse<I, S>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for (i, entry) in entries.into_iter().enumerate() {
            let rule = Rule::parse_strict(entry.as_ref())
                .map_err(|source| CatalogError::Entry { index: i + 1, source })?;
            catalog.push(rule);
        }
        Ok(catalog)
    }

    /// Build a catalog from entries the caller promised are well-formed.
    ///
    /// Only the shape is checked: entries without exactly three non-empty
    /// fields are skipped and logged instead of failing the call.
    pub fn from_entries_lossy<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for (i, entry) in entries.into_iter().enumerate() {
            match Rule::parse(entry.as_ref()) {
                Ok(rule) => {
                    catalog.push(rule);
                }
                Err(err) => {
                    tracing::warn!(index = i + 1, error = %err, "skipping malformed catalog entry");
                }
            }
        }
        catalog
    }

    /// Parse the line-oriented rules format: one rule per line, blank lines
    /// ignored, `#` comments to end of line.
    pub fn parse_text(text: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for (i, raw) in text.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let rule = Rule::parse_strict(line)
                .map_err(|source| CatalogError::Line { line: i + 1, source })?;
            catalog.push(rule);
        }
        Ok(catalog)
    }

    /// Append a rule and return its position.
    pub fn push(&mut self, rule: Rule) -> usize {
        let position = self.rules.len();
        self.by_from
            .entry(rule.from.clone())
            .or_default()
            .push(position);
        self.rules.push(rule);
        position
    }

    pub fn extend(&mut self, other: Catalog) {
        for rule in other.rules {
            self.push(rule);
        }
    }

    pub fn get(&self, position: usize) -> Option<&Rule> {
        self.rules.get(position)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules leaving `label`, in catalog order.
    pub fn outgoing<'a>(&'a self, label: &str) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.by_from
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&position| (position, &self.rules[position]))
    }

    /// Every label mentioned as a source or target.
    pub fn labels(&self) -> AHashSet<&str> {
        self.rules
            .iter()
            .flat_map(|r| [r.from.as_str(), r.to.as_str()])
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut seen: AHashSet<&Rule> = AHashSet::with_capacity(self.rules.len());
        let duplicates = self.rules.iter().filter(|r| !seen.insert(*r)).count();
        CatalogStats {
            rules: self.rules.len(),
            labels: self.labels().len(),
            self_loops: self.rules.iter().filter(|r| r.is_self_loop()).count(),
            duplicates,
        }
    }
}

impl FromIterator<Rule> for Catalog {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self::from_rules(iter)
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once(COMMENT_MARKER)
        .map(|(before, _)| before)
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleField;

    fn bread() -> Catalog {
        Catalog::parse(["gather:field:wheat", "bake:flour:bread", "mill:wheat:flour"])
            .expect("parse")
    }

    #[test]
    fn keeps_input_order_and_indexes_sources() {
        let catalog = bread();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1), Some(&Rule::new("bake", "flour", "bread")));

        let out: Vec<usize> = catalog.outgoing("wheat").map(|(pos, _)| pos).collect();
        assert_eq!(out, vec![2]);
        assert_eq!(catalog.outgoing("bread").count(), 0);
    }

    #[test]
    fn outgoing_lists_branches_in_catalog_order() {
        let catalog = Catalog::parse(["b:x:z", "a:y:x", "c:x:y", "b:x:z"]).expect("parse");
        let names: Vec<&str> = catalog.outgoing("x").map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "b"]);
    }

    #[test]
    fn strict_parse_reports_position() {
        let err = Catalog::parse(["a:x:y", "broken", "b:y:z"]).expect_err("should error");
        match err {
            CatalogError::Entry { index, source } => {
                assert_eq!(index, 2);
                assert!(matches!(source, RuleParseError::FieldCount { found: 1, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lossy_build_skips_malformed_entries() {
        let catalog = Catalog::from_entries_lossy(["a:x:y", "nope", "b::z", "c:y:z"]);
        let names: Vec<&str> = catalog.rules().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn lossy_build_keeps_rules_the_strict_parser_rejects() {
        let entries = ["brew:café:thé", "smelt/v2:ore:metal"];
        let catalog = Catalog::from_entries_lossy(entries);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.outgoing("ore").count(), 1);

        let err = Catalog::parse(entries).expect_err("should error");
        assert!(matches!(err, CatalogError::Entry { index: 2, .. }));
    }

    #[test]
    fn parse_text_handles_comments_and_blank_lines() {
        let text = "\
# bread production
gather:field:wheat

mill:wheat:flour   # stone mill
bake:flour:bread
";
        let catalog = Catalog::parse_text(text).expect("parse");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).map(|r| r.name.as_str()), Some("mill"));
    }

    #[test]
    fn parse_text_reports_line_numbers() {
        let err = Catalog::parse_text("a:x:y\n\nb:x:\n").expect_err("should error");
        match err {
            CatalogError::Line { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(
                    source,
                    RuleParseError::EmptyField {
                        field: RuleField::To,
                        ..
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stats_count_labels_loops_and_duplicates() {
        let catalog =
            Catalog::parse(["a:x:y", "a:x:y", "b:y:y", "c:y:x", "d:z:x"]).expect("parse");
        let stats = catalog.stats();
        assert_eq!(
            stats,
            CatalogStats {
                rules: 5,
                labels: 3,
                self_loops: 1,
                duplicates: 1,
            }
        );
    }

    #[test]
    fn extend_reindexes_appended_rules() {
        let mut catalog = Catalog::parse(["a:x:y"]).expect("parse");
        catalog.extend(Catalog::parse(["b:x:z"]).expect("parse"));
        let out: Vec<usize> = catalog.outgoing("x").map(|(pos, _)| pos).collect();
        assert_eq!(out, vec![0, 1]);
    }
}
