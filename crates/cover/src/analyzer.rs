//! Which orderings of a catalogue does a set of solutions cover?

use finder_core::{Field, Operation, Piece};
use finder_engine::{DropType, Reachable};
use finder_search::{SearchConfig, SearchResult};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::buildup::build;
use crate::mode::CoverRules;
use crate::ordering::piece_counts;

/// Verdict for one ordering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingCoverage {
    pub pieces: Vec<Piece>,
    /// Index of the first result that can be built in this order.
    pub result: Option<usize>,
}

impl OrderingCoverage {
    pub fn is_satisfied(&self) -> bool {
        self.result.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub orderings: Vec<OrderingCoverage>,
    pub satisfied: usize,
}

impl CoverageReport {
    pub fn total(&self) -> usize {
        self.orderings.len()
    }

    /// Share of satisfied orderings; 0 for an empty catalogue.
    pub fn ratio(&self) -> f64 {
        if self.orderings.is_empty() {
            return 0.0;
        }
        self.satisfied as f64 / self.orderings.len() as f64
    }

    pub fn is_complete(&self) -> bool {
        self.satisfied == self.orderings.len()
    }

    pub fn unsatisfied(&self) -> impl Iterator<Item = &[Piece]> + '_ {
        self.orderings
            .iter()
            .filter(|o| !o.is_satisfied())
            .map(|o| o.pieces.as_slice())
    }
}

/// Results grouped by the multiset of pieces they place.
struct ResultIndex {
    by_counts: FxHashMap<[u8; 7], Vec<usize>>,
    depths: Vec<usize>,
}

impl ResultIndex {
    fn new(results: &[SearchResult]) -> Self {
        let mut by_counts: FxHashMap<[u8; 7], Vec<usize>> = FxHashMap::default();
        let mut depths = Vec::new();
        for (i, result) in results.iter().enumerate() {
            let counts = piece_counts(result.operations.iter().map(|op| op.piece));
            by_counts.entry(counts).or_default().push(i);
            depths.push(result.operations.len());
        }
        depths.sort_unstable();
        depths.dedup();
        Self { by_counts, depths }
    }

    /// Results whose pieces could be drawn from `ordering`, ascending.
    fn candidates(&self, ordering: &[Piece], use_hold: bool, out: &mut Vec<usize>) {
        out.clear();
        for &depth in &self.depths {
            if ordering.len() < depth {
                continue;
            }
            if use_hold && ordering.len() > depth {
                // one of the first depth + 1 pieces stays in hold
                let drawn = &ordering[..=depth];
                let all = piece_counts(drawn.iter().copied());
                for piece in Piece::ALL {
                    if all[piece.index()] == 0 {
                        continue;
                    }
                    let mut counts = all;
                    counts[piece.index()] -= 1;
                    self.extend(&counts, out);
                }
            } else {
                self.extend(&piece_counts(ordering[..depth].iter().copied()), out);
            }
        }
        out.sort_unstable();
        out.dedup();
    }

    fn extend(&self, counts: &[u8; 7], out: &mut Vec<usize>) {
        if let Some(indices) = self.by_counts.get(counts) {
            out.extend_from_slice(indices);
        }
    }
}

/// Per-thread buffers reused across orderings.
#[derive(Default)]
struct Scratch {
    candidates: Vec<usize>,
    operations: Vec<Operation>,
}

pub struct CoverageAnalyzer<R = DropType> {
    max_height: i32,
    use_hold: bool,
    reachable: R,
    rules: CoverRules,
}

impl CoverageAnalyzer<DropType> {
    pub fn new(max_height: i32, use_hold: bool, drop: DropType) -> Self {
        Self::with_reachable(max_height, use_hold, drop)
    }

    /// Replay under the same rules the search ran with.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.max_height, config.use_hold, config.drop)
    }
}

impl<R: Reachable> CoverageAnalyzer<R> {
    pub fn with_reachable(max_height: i32, use_hold: bool, reachable: R) -> Self {
        Self {
            max_height,
            use_hold,
            reachable,
            rules: CoverRules::default(),
        }
    }

    /// Require a cover mode, a soft drop window or a back-to-back start.
    pub fn with_rules(mut self, rules: CoverRules) -> Self {
        self.rules = rules;
        self
    }

    /// Can `operations` be placed from `field` in the order of `pieces`?
    pub fn satisfies(&self, field: &Field, operations: &[Operation], pieces: &[Piece]) -> bool {
        build(
            field,
            operations,
            pieces,
            self.max_height,
            &self.reachable,
            &self.rules,
            self.use_hold,
        )
    }

    /// Check every ordering against `results`, all found from `field`.
    pub fn analyze(
        &self,
        field: &Field,
        results: &[SearchResult],
        orderings: &[Vec<Piece>],
    ) -> CoverageReport {
        let span = info_span!(
            "coverage",
            results = results.len(),
            orderings = orderings.len(),
            hold = self.use_hold,
            mode = self.rules.mode.name()
        );
        let _guard = span.enter();

        let index = ResultIndex::new(results);
        let entries: Vec<OrderingCoverage> = orderings
            .par_iter()
            .map_init(Scratch::default, |scratch, ordering| {
                let Scratch {
                    candidates,
                    operations,
                } = scratch;
                index.candidates(ordering, self.use_hold, candidates);
                let result = candidates.iter().copied().find(|&i| {
                    // lower pieces first so the replay hits dead ends early
                    operations.clear();
                    operations.extend_from_slice(&results[i].operations);
                    operations.sort_by_key(|op| (op.y + op.piece.mino(op.rotation).min_y(), op.x));
                    self.satisfies(field, operations, ordering)
                });
                OrderingCoverage {
                    pieces: ordering.clone(),
                    result,
                }
            })
            .collect();

        let satisfied = entries.iter().filter(|e| e.is_satisfied()).count();
        info!(satisfied, total = entries.len(), "coverage finished");
        CoverageReport {
            orderings: entries,
            satisfied,
        }
    }
}
