//! finder-search - depth-bounded, deduplicated search for placement paths.

mod config;
mod error;
mod goal;
mod order;
mod result;
mod searcher;

pub use config::SearchConfig;
pub use error::SearchError;
pub use goal::{Goal, MatchesField, PerfectClear};
pub use order::{Order, OrderKey};
pub use result::SearchResult;
pub use searcher::Searcher;
