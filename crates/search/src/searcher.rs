//! Breadth-first search over placement sequences.
//!
//! Each depth expands the whole frontier in parallel and folds the children
//! into per-thread maps keyed by field and hold piece, which are then merged.
//! When two paths reach the same key the lexicographically smaller operation
//! list is kept, so the output does not depend on the thread count.

use std::collections::hash_map::Entry;

use finder_core::{lift_cleared_key, Field, Operation, Piece, MAX_FIELD_HEIGHT};
use finder_engine::{apply_placement, generate_placements};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info, info_span};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::goal::Goal;
use crate::order::{Order, OrderKey};
use crate::result::SearchResult;

type Frontier = FxHashMap<OrderKey, Order>;

/// Piece to place next and the hold slot it leaves behind.
#[derive(Clone, Copy, Debug)]
struct Step {
    piece: Piece,
    hold: Option<Piece>,
    hold_used: bool,
}

/// Moves available to `order`.
///
/// The current piece is the first one not yet drawn: a filled hold slot
/// means one extra piece came off the sequence.
fn steps(order: &Order, pieces: &[Piece], use_hold: bool) -> [Option<Step>; 2] {
    let drawn = order.drawn();
    let current = pieces.get(drawn).copied();
    let place = current.map(|piece| Step {
        piece,
        hold: order.hold,
        hold_used: false,
    });
    if !use_hold {
        return [place, None];
    }
    let swap = match order.hold {
        None => match (current, pieces.get(drawn + 1)) {
            (Some(current), Some(&next)) => Some(Step {
                piece: next,
                hold: Some(current),
                hold_used: true,
            }),
            _ => None,
        },
        Some(held) => Some(Step {
            piece: held,
            hold: current,
            hold_used: true,
        }),
    };
    [place, swap]
}

/// Keep whichever of the two paths to the same key sorts first.
fn insert_min(frontier: &mut Frontier, order: Order) {
    match frontier.entry(order.key()) {
        Entry::Occupied(mut slot) => {
            if order.operations < slot.get().operations {
                slot.insert(order);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(order);
        }
    }
}

fn merge_frontiers(mut a: Frontier, mut b: Frontier) -> Frontier {
    if a.len() < b.len() {
        std::mem::swap(&mut a, &mut b);
    }
    for (_, order) in b {
        insert_min(&mut a, order);
    }
    a
}

pub struct Searcher {
    config: SearchConfig,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Every distinct field reachable by placing `max_depth` pieces of
    /// `pieces` that satisfies `goal`, sorted by field, hold and path.
    pub fn search<G>(
        &self,
        initial: &Field,
        pieces: &[Piece],
        goal: &G,
    ) -> Result<Vec<SearchResult>, SearchError>
    where
        G: Goal + ?Sized,
    {
        self.validate(initial, pieces)?;
        match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|err| SearchError::ThreadPool {
                        threads,
                        message: err.to_string(),
                    })?;
                Ok(pool.install(|| self.run(initial, pieces, goal)))
            }
            None => Ok(self.run(initial, pieces, goal)),
        }
    }

    fn validate(&self, initial: &Field, pieces: &[Piece]) -> Result<(), SearchError> {
        let SearchConfig {
            max_depth,
            max_height,
            ..
        } = self.config;
        if !(1..=MAX_FIELD_HEIGHT).contains(&max_height) {
            return Err(SearchError::Height(max_height));
        }
        if pieces.len() < max_depth {
            return Err(SearchError::NotEnoughPieces {
                depth: max_depth,
                available: pieces.len(),
            });
        }
        let capacity = initial.max_field_height();
        if capacity < max_height {
            return Err(SearchError::FieldTooSmall {
                capacity,
                max_height,
            });
        }
        if initial.exists_above(max_height) {
            return Err(SearchError::BlocksAboveHeight(max_height));
        }
        Ok(())
    }

    fn run<G>(&self, initial: &Field, pieces: &[Piece], goal: &G) -> Vec<SearchResult>
    where
        G: Goal + ?Sized,
    {
        let config = &self.config;
        let span = info_span!(
            "search",
            depth = config.max_depth,
            height = config.max_height,
            hold = config.use_hold,
            drop = config.drop.name()
        );
        let _guard = span.enter();

        let mut frontier = vec![Order::root(*initial)];
        for depth in 0..config.max_depth {
            let next = frontier
                .par_iter()
                .fold(FxHashMap::default, |mut acc, order| {
                    self.expand(order, depth, pieces, goal, &mut acc);
                    acc
                })
                .reduce(FxHashMap::default, merge_frontiers);
            frontier = next.into_values().collect();
            debug!(depth = depth + 1, frontier = frontier.len(), "expanded");
            if frontier.is_empty() {
                break;
            }
        }

        let mut results: Vec<SearchResult> = frontier
            .into_iter()
            .filter(|order| order.operations.len() == config.max_depth)
            .filter(|order| goal.is_goal(&order.field))
            .map(|order| SearchResult {
                field: order.field,
                max_height: config.max_height,
                depth: config.max_depth,
                hold: order.hold,
                operations: order.operations,
            })
            .collect();
        results.sort_by(|a, b| {
            (a.field, a.hold)
                .cmp(&(b.field, b.hold))
                .then_with(|| a.operations.cmp(&b.operations))
        });
        info!(results = results.len(), "search finished");
        results
    }

    fn expand<G>(
        &self,
        order: &Order,
        depth: usize,
        pieces: &[Piece],
        goal: &G,
        out: &mut Frontier,
    ) where
        G: Goal + ?Sized,
    {
        let max_height = order.max_height(self.config.max_height);
        let remaining = self.config.max_depth - depth - 1;
        for step in steps(order, pieces, self.config.use_hold)
            .into_iter()
            .flatten()
        {
            let placements =
                generate_placements(&order.field, step.piece, max_height, self.config.drop);
            for placement in placements {
                let (field, key) = apply_placement(&order.field, step.piece, &placement);
                if !goal.is_promising(&field, remaining, max_height - key.count_ones() as i32) {
                    continue;
                }
                let mut operation = Operation::from_compressed(
                    step.piece,
                    placement.rotation,
                    placement.x,
                    placement.y,
                    order.cleared,
                );
                operation.hold_used = step.hold_used;
                let mut operations = Vec::with_capacity(order.operations.len() + 1);
                operations.extend_from_slice(&order.operations);
                operations.push(operation);
                insert_min(
                    out,
                    Order {
                        field,
                        hold: step.hold,
                        cleared: order.cleared | lift_cleared_key(key, order.cleared),
                        operations,
                    },
                );
            }
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
