//! finder-cover - which piece orderings a set of solutions can be built in,
//! optionally under a cover mode such as T-spin doubles or back-to-back.

mod analyzer;
mod buildup;
mod mode;
mod ordering;

pub use analyzer::{CoverageAnalyzer, CoverageReport, OrderingCoverage};
pub use buildup::{can_build, can_build_with_hold};
pub use mode::{CoverMode, CoverRules};
pub use ordering::reduce_orderings;
