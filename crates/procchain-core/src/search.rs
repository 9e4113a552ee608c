//! Shortest-chain search.
//!
//! The catalog is a directed multigraph: labels are nodes, rules are edges.
//! `shortest_chain` runs a breadth-first search from the start label and
//! stops the first time the end label is reached, so the returned chain has
//! the minimum number of rules.
//!
//! Each label is expanded at most once, hence each rule is examined at most
//! once. Cycles and self-loops cannot cause repeated expansion.
//!
//! Tie-break: among equally short chains, the first one discovered wins.
//! Labels are expanded in FIFO order and the rules leaving a label are tried
//! in catalog order. For `["a:1:2", "b:1:2"]` the chain from `1` to `2` is
//! `["a"]`.

use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

use crate::catalog::Catalog;
use crate::chain::Chain;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    /// Longest chain worth returning. Goals further away are reported as
    /// unreachable. `None` means no limit.
    pub max_steps: Option<usize>,
}

impl SearchOptions {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// Which kind of [`SearchOutcome`] a search produced, without the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Identity,
    Found,
    Unreachable,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchStatus::Identity => "identity",
            SearchStatus::Found => "found",
            SearchStatus::Unreachable => "unreachable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Start and end are the same item; nothing to do.
    Identity,
    Found(Chain),
    Unreachable,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn chain(&self) -> Option<&Chain> {
        match self {
            SearchOutcome::Found(chain) => Some(chain),
            _ => None,
        }
    }

    /// Number of rules to apply (0 for identity and unreachable).
    pub fn len(&self) -> usize {
        self.chain().map(Chain::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collapse to rule names. Identity and unreachable both give `[]`.
    ///
    /// `catalog` must be the catalog this outcome was searched over; chains
    /// from [`shortest_chain`] only hold positions of that catalog.
    pub fn into_names(self, catalog: &Catalog) -> Vec<String> {
        match self {
            SearchOutcome::Found(chain) => chain.names(catalog).unwrap_or_else(|err| {
                tracing::error!(error = %err, "chain does not match catalog");
                Vec::new()
            }),
            SearchOutcome::Identity | SearchOutcome::Unreachable => Vec::new(),
        }
    }

    pub fn status(&self) -> SearchStatus {
        match self {
            SearchOutcome::Identity => SearchStatus::Identity,
            SearchOutcome::Found(_) => SearchStatus::Found,
            SearchOutcome::Unreachable => SearchStatus::Unreachable,
        }
    }
}

/// Find a minimum-length chain of rules turning `start` into `end`.
pub fn shortest_chain<'a>(
    start: &'a str,
    end: &str,
    catalog: &'a Catalog,
    options: &SearchOptions,
) -> SearchOutcome {
    if start == end {
        tracing::debug!(start, "start and end coincide");
        return SearchOutcome::Identity;
    }

    let mut visited: AHashSet<&'a str> = AHashSet::new();
    // label -> (predecessor label, rule position used to reach it)
    let mut came_from: AHashMap<&'a str, (&'a str, usize)> = AHashMap::new();
    let mut queue: VecDeque<(&'a str, usize)> = VecDeque::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((label, depth)) = queue.pop_front() {
        if options.max_steps.is_some_and(|max| depth >= max) {
            continue;
        }

        for (position, rule) in catalog.outgoing(label) {
            let next = rule.to.as_str();
            if !visited.insert(next) {
                continue;
            }
            came_from.insert(next, (label, position));

            if next == end {
                let chain = rebuild_chain(&came_from, next);
                tracing::debug!(
                    start,
                    end,
                    steps = chain.len(),
                    explored = visited.len(),
                    "found shortest chain"
                );
                return SearchOutcome::Found(chain);
            }
            queue.push_back((next, depth + 1));
        }
    }

    tracing::debug!(start, end, explored = visited.len(), "end item unreachable");
    SearchOutcome::Unreachable
}

fn rebuild_chain(came_from: &AHashMap<&str, (&str, usize)>, end: &str) -> Chain {
    let mut steps = Vec::new();
    let mut current = end;
    while let Some(&(previous, position)) = came_from.get(current) {
        steps.push(position);
        current = previous;
    }
    steps.reverse();
    Chain::new(steps)
}

/// Names of the processes to apply, in order, to turn `start` into `end`.
///
/// `rules` holds `name:from:to` entries. Returns `[]` both when no steps are
/// needed and when `end` cannot be reached. Malformed entries are skipped.
pub fn find_processes<S: AsRef<str>>(start: &str, end: &str, rules: &[S]) -> Vec<String> {
    let catalog = Catalog::from_entries_lossy(rules);
    shortest_chain(start, end, &catalog, &SearchOptions::default()).into_names(&catalog)
}
