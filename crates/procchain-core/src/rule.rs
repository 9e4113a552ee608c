//! Process rules: `name:from:to`
//!
//! A rule is a named, directed transformation from one item label to another.
//! Catalog entries are written as three colon-separated tokens, e.g.
//! `smelt:ore:metal`.
//!
//! Two parsing levels exist:
//! - [`Rule::parse`] only checks the shape: three non-empty fields. Any text
//!   without a colon is a valid field.
//! - [`Rule::parse_strict`] also requires each field to be a token of
//!   alphanumerics (any script) plus `_ + - * = .`, so that arithmetic-style
//!   process names (`mul2*5=10`) are accepted.

use nom::{bytes::complete::take_while1, combinator::all_consuming, IResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field separator inside a catalog entry.
pub const RULE_FIELD_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub from: String,
    pub to: String,
}

impl Rule {
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Parse a single `name:from:to` entry, checking only its shape.
    ///
    /// Surrounding whitespace is ignored; whitespace inside a field is kept.
    pub fn parse(entry: &str) -> Result<Self, RuleParseError> {
        let entry = entry.trim();
        let [name, from, to] = split_fields(entry)?;
        let name = non_empty_field(entry, RuleField::Name, name)?;
        let from = non_empty_field(entry, RuleField::From, from)?;
        let to = non_empty_field(entry, RuleField::To, to)?;
        Ok(Self::new(name, from, to))
    }

    /// Parse a single entry whose fields must all be tokens.
    pub fn parse_strict(entry: &str) -> Result<Self, RuleParseError> {
        let entry = entry.trim();
        let [name, from, to] = split_fields(entry)?;
        let name = token_field(entry, RuleField::Name, name)?;
        let from = token_field(entry, RuleField::From, from)?;
        let to = token_field(entry, RuleField::To, to)?;
        Ok(Self::new(name, from, to))
    }

    /// A rule whose source and target are the same item.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.name,
            self.from,
            self.to,
            sep = RULE_FIELD_SEPARATOR
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Name,
    From,
    To,
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleField::Name => "name",
            RuleField::From => "from",
            RuleField::To => "to",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("rule `{entry}` has {found} field(s); expected `name:from:to`")]
    FieldCount { entry: String, found: usize },

    #[error("rule `{entry}` has an empty `{field}` field")]
    EmptyField { entry: String, field: RuleField },

    #[error("rule `{entry}` has an invalid `{field}` token `{token}`")]
    InvalidToken {
        entry: String,
        field: RuleField,
        token: String,
    },
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '+' | '-' | '*' | '=' | '.')
}

fn parse_token(input: &str) -> IResult<&str, &str> {
    take_while1(is_token_char)(input)
}

fn split_fields(entry: &str) -> Result<[&str; 3], RuleParseError> {
    let fields: Vec<&str> = entry.split(RULE_FIELD_SEPARATOR).collect();
    match fields.as_slice() {
        [name, from, to] => Ok([*name, *from, *to]),
        _ => Err(RuleParseError::FieldCount {
            entry: entry.to_string(),
            found: fields.len(),
        }),
    }
}

fn non_empty_field<'a>(
    entry: &str,
    field: RuleField,
    text: &'a str,
) -> Result<&'a str, RuleParseError> {
    if text.is_empty() {
        return Err(RuleParseError::EmptyField {
            entry: entry.to_string(),
            field,
        });
    }
    Ok(text)
}

fn token_field<'a>(entry: &str, field: RuleField, text: &'a str) -> Result<&'a str, RuleParseError> {
    let text = non_empty_field(entry, field, text)?;
    all_consuming(parse_token)(text)
        .map(|(_, token)| token)
        .map_err(|_| RuleParseError::InvalidToken {
            entry: entry.to_string(),
            field,
            token: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_rule() {
        let rule = Rule::parse("smelt:ore:metal").expect("parse");
        assert_eq!(rule, Rule::new("smelt", "ore", "metal"));
        assert!(!rule.is_self_loop());
    }

    #[test]
    fn accepts_arithmetic_names_and_trims_outer_whitespace() {
        let rule: Rule = "  mul2*5=10:2:10\n".parse().expect("parse");
        assert_eq!(rule.name, "mul2*5=10");
        assert_eq!(rule.from, "2");
        assert_eq!(rule.to, "10");
    }

    #[test]
    fn display_is_the_catalog_form() {
        let rule = Rule::new("bake", "flour", "bread");
        assert_eq!(rule.to_string(), "bake:flour:bread");
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = Rule::parse("gather:field").expect_err("should error");
        assert_eq!(
            err,
            RuleParseError::FieldCount {
                entry: "gather:field".to_string(),
                found: 2,
            }
        );

        let err = Rule::parse("a:b:c:d").expect_err("should error");
        assert!(matches!(err, RuleParseError::FieldCount { found: 4, .. }));

        let err = Rule::parse("").expect_err("should error");
        assert!(matches!(err, RuleParseError::FieldCount { found: 1, .. }));
    }

    #[test]
    fn rejects_empty_field() {
        let err = Rule::parse("mill::flour").expect_err("should error");
        assert_eq!(
            err,
            RuleParseError::EmptyField {
                entry: "mill::flour".to_string(),
                field: RuleField::From,
            }
        );
    }

    #[test]
    fn shape_parse_accepts_any_colon_free_text() {
        let rule = Rule::parse("brew:café:thé").expect("parse");
        assert_eq!(rule, Rule::new("brew", "café", "thé"));

        let rule = Rule::parse("smelt/v2:ore:metal").expect("parse");
        assert_eq!(rule.name, "smelt/v2");

        let rule = Rule::parse("mill:whole wheat:flour").expect("parse");
        assert_eq!(rule.from, "whole wheat");
    }

    #[test]
    fn strict_parse_accepts_non_ascii_alphanumerics() {
        let rule = Rule::parse_strict("brew:café:thé").expect("parse");
        assert_eq!(rule.to, "thé");
    }

    #[test]
    fn strict_parse_rejects_inner_whitespace_and_symbols() {
        let err = Rule::parse_strict("mill:whole wheat:flour").expect_err("should error");
        assert!(matches!(
            err,
            RuleParseError::InvalidToken {
                field: RuleField::From,
                ..
            }
        ));

        let err = Rule::parse_strict("mill!:wheat:flour").expect_err("should error");
        let msg = err.to_string();
        assert!(msg.contains("invalid `name` token `mill!`"), "msg={msg}");
    }
}
