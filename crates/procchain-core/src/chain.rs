//! Process chains.
//!
//! A `Chain` is an ordered list of catalog positions. Applied in order, the
//! rules transform the start item into the end item:
//!
//! ```text
//! from(chain[0]) == start
//! to(chain[i])   == from(chain[i + 1])
//! to(chain[n-1]) == end
//! ```
//!
//! Positions (not names) are stored because names are not unique within a
//! catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::rule::Rule;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    steps: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("step {step} refers to rule position {position}, which is not in the catalog")]
    UnknownRule { step: usize, position: usize },

    #[error("chain starts at `{found}` but the start item is `{expected}`")]
    WrongStart { expected: String, found: String },

    #[error("step {step} starts at `{found}` but the previous step produced `{expected}`")]
    Disconnected {
        step: usize,
        expected: String,
        found: String,
    },

    #[error("chain ends at `{found}` but the end item is `{expected}`")]
    WrongEnd { expected: String, found: String },

    #[error("empty chain cannot turn `{start}` into `{end}`")]
    EmptyChain { start: String, end: String },
}

impl Chain {
    pub fn new(steps: Vec<usize>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The rules of this chain, in execution order.
    ///
    /// Fails on the first position missing from `catalog`. Connectivity is
    /// not checked here; see [`Chain::verify`].
    pub fn rules<'c>(&self, catalog: &'c Catalog) -> Result<Vec<&'c Rule>, ChainError> {
        self.steps
            .iter()
            .enumerate()
            .map(|(step, &position)| {
                catalog
                    .get(position)
                    .ok_or(ChainError::UnknownRule { step, position })
            })
            .collect()
    }

    /// Rule names in execution order.
    pub fn names(&self, catalog: &Catalog) -> Result<Vec<String>, ChainError> {
        Ok(self
            .rules(catalog)?
            .into_iter()
            .map(|rule| rule.name.clone())
            .collect())
    }

    /// Check that this chain is a valid path from `start` to `end`.
    pub fn verify(&self, start: &str, end: &str, catalog: &Catalog) -> Result<(), ChainError> {
        if self.steps.is_empty() {
            if start == end {
                return Ok(());
            }
            return Err(ChainError::EmptyChain {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let mut current = start;
        for (step, &position) in self.steps.iter().enumerate() {
            let rule = catalog
                .get(position)
                .ok_or(ChainError::UnknownRule { step, position })?;

            if rule.from != current {
                if step == 0 {
                    return Err(ChainError::WrongStart {
                        expected: start.to_string(),
                        found: rule.from.clone(),
                    });
                }
                return Err(ChainError::Disconnected {
                    step,
                    expected: current.to_string(),
                    found: rule.from.clone(),
                });
            }
            current = rule.to.as_str();
        }

        if current != end {
            return Err(ChainError::WrongEnd {
                expected: end.to_string(),
                found: current.to_string(),
            });
        }
        Ok(())
    }
}

impl From<Vec<usize>> for Chain {
    fn from(steps: Vec<usize>) -> Self {
        Self::new(steps)
    }
}
