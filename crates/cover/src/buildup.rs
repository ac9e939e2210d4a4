//! Replaying a set of placements against a different piece order.
//!
//! Operations are in the frame of the starting field. The replay keeps the
//! compressed field plus the rows cleared so far, exactly as the search does,
//! so an operation fits only when the rows inside its span that it expects
//! gone are gone and no others.

use finder_core::key::rows_between;
use finder_core::{lift_cleared_key, Field, Operation, Piece, SpinType};
use finder_engine::{HarddropReachable, Reachable};

use crate::mode::{CoverRules, Lock, Progress};

/// Replay state between placements.
#[derive(Clone, Copy)]
struct State {
    field: Field,
    cleared: u64,
    used: u64,
    progress: Progress,
}

struct BuildUp<'a, R: ?Sized> {
    operations: &'a [Operation],
    pieces: &'a [Piece],
    max_height: i32,
    reachable: &'a R,
    rules: &'a CoverRules,
}

impl<'a, R: Reachable + ?Sized> BuildUp<'a, R> {
    /// Place `operations[index]` as placement number `depth`.
    fn place(&self, state: &State, index: usize, depth: usize) -> Option<State> {
        let op = &self.operations[index];
        let mino = op.piece.mino(op.rotation);
        // rows from the piece's lowest block to its highest in the starting
        // frame, cleared rows in between included
        let bottom = op.y + mino.min_y();
        let height = mino.max_y() - mino.min_y() + 1 + op.need_deleted_key.count_ones() as i32;
        if state.cleared & rows_between(bottom, bottom + height) != op.need_deleted_key {
            return None;
        }

        let field = &state.field;
        let y = op.compressed_y(state.cleared);
        let max_height = self.max_height - state.cleared.count_ones() as i32;
        if y + mino.max_y() >= max_height
            || !field.can_put(mino, op.x, y)
            || !field.is_on_ground(mino, op.x, y)
        {
            return None;
        }
        let soft = self.rules.allows_softdrop(depth, self.operations.len());
        let reached = if soft {
            self.reachable
                .checks(field, op.piece, op.rotation, op.x, y, max_height)
        } else {
            HarddropReachable.checks(field, op.piece, op.rotation, op.x, y, max_height)
        };
        if !reached {
            return None;
        }

        let mut next = *field;
        next.put(mino, op.x, y);
        let key = next.clear_line_return_key();
        let lines = key.count_ones();
        let spin = if soft && self.rules.mode.needs_spin(lines) {
            self.reachable
                .spin(field, op.piece, op.rotation, op.x, y, max_height)
        } else {
            SpinType::None
        };
        let lock = Lock {
            lines,
            spin,
            last: depth + 1 == self.operations.len(),
        };
        Some(State {
            field: next,
            cleared: state.cleared | lift_cleared_key(key, state.cleared),
            used: state.used | 1 << index,
            progress: self.rules.advance(state.progress, lock)?,
        })
    }

    fn unused(&self, used: u64, piece: Piece) -> impl Iterator<Item = usize> + 'a {
        let operations = self.operations;
        operations
            .iter()
            .enumerate()
            .filter(move |&(i, op)| used & (1 << i) == 0 && op.piece == piece)
            .map(|(i, _)| i)
    }

    /// Place any unused operation of `piece` and carry on with `rest`.
    fn try_piece(
        &self,
        state: &State,
        depth: usize,
        piece: Piece,
        rest: impl Fn(&State) -> bool,
    ) -> bool {
        self.unused(state.used, piece)
            .any(|i| self.place(state, i, depth).is_some_and(|next| rest(&next)))
    }

    fn finished(&self, state: &State, depth: usize) -> Option<bool> {
        (depth == self.operations.len()).then(|| self.rules.is_met(state.progress))
    }

    fn without_hold(&self, state: &State, depth: usize) -> bool {
        if let Some(done) = self.finished(state, depth) {
            return done;
        }
        let Some(&piece) = self.pieces.get(depth) else {
            return false;
        };
        self.try_piece(state, depth, piece, |next| self.without_hold(next, depth + 1))
    }

    /// `hold` empty: `pieces[depth]` is current. `hold` filled: one extra
    /// piece was drawn, `pieces[depth + 1]` is current.
    fn with_hold(&self, state: &State, depth: usize, hold: Option<Piece>) -> bool {
        if let Some(done) = self.finished(state, depth) {
            return done;
        }
        let current = self
            .pieces
            .get(depth + usize::from(hold.is_some()))
            .copied();
        // (piece to place, hold afterwards)
        let swap = match hold {
            None => current.zip(self.pieces.get(depth + 1).copied()).map(|(c, n)| (n, Some(c))),
            Some(held) => Some((held, current)),
        };
        let choices = [current.map(|c| (c, hold)), swap];

        choices.into_iter().flatten().any(|(piece, next_hold)| {
            self.try_piece(state, depth, piece, |next| {
                self.with_hold(next, depth + 1, next_hold)
            })
        })
    }

    fn run(&self, field: &Field, use_hold: bool) -> bool {
        assert!(
            self.operations.len() <= 64,
            "at most 64 operations can be replayed"
        );
        let start = State {
            field: *field,
            cleared: 0,
            used: 0,
            progress: Progress::default(),
        };
        if use_hold {
            self.with_hold(&start, 0, None)
        } else {
            self.without_hold(&start, 0)
        }
    }
}

/// Can `operations` be placed in the order of `pieces`, one each, starting
/// from `field`?
pub fn can_build<R: Reachable + ?Sized>(
    field: &Field,
    operations: &[Operation],
    pieces: &[Piece],
    max_height: i32,
    reachable: &R,
) -> bool {
    build(field, operations, pieces, max_height, reachable, &CoverRules::default(), false)
}

/// Same as [`can_build`] with one hold slot: `pieces` may run one longer
/// than `operations`.
pub fn can_build_with_hold<R: Reachable + ?Sized>(
    field: &Field,
    operations: &[Operation],
    pieces: &[Piece],
    max_height: i32,
    reachable: &R,
) -> bool {
    build(field, operations, pieces, max_height, reachable, &CoverRules::default(), true)
}

/// Replay under `rules`, with or without a hold slot.
pub(crate) fn build<R: Reachable + ?Sized>(
    field: &Field,
    operations: &[Operation],
    pieces: &[Piece],
    max_height: i32,
    reachable: &R,
    rules: &CoverRules,
    use_hold: bool,
) -> bool {
    BuildUp {
        operations,
        pieces,
        max_height,
        reachable,
        rules,
    }
    .run(field, use_hold)
}
