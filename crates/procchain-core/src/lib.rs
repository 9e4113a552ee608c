//! Procchain: shortest process chains between items
//!
//! A catalog of named processes (`name:from:to`) describes how items can be
//! transformed into one another. Given a start item and an end item, this
//! crate finds the shortest ordered list of processes that turns one into the
//! other:
//!
//! ```text
//! gather:field:wheat   mill:wheat:flour   bake:flour:bread
//!
//! field ──gather──► wheat ──mill──► flour ──bake──► bread
//! ```
//!
//! ## Module Organization
//!
//! - `rule`: parsing of single `name:from:to` entries
//! - `catalog`: ordered rule lists indexed by source item
//! - `chain`: chains of rule positions and their validation
//! - `search`: breadth-first shortest-chain search and `find_processes`

pub mod catalog;
pub mod chain;
pub mod rule;
pub mod search;

pub use catalog::{Catalog, CatalogError, CatalogStats};
pub use chain::{Chain, ChainError};
pub use rule::{Rule, RuleField, RuleParseError};
pub use search::{find_processes, shortest_chain, SearchOptions, SearchOutcome, SearchStatus};
