//! Can a piece get to a given resting position under a drop rule?

use std::ops::ControlFlow;

use crate::config::DropType;
use crate::kicks::Direction;
use crate::movegen::{best_spin, lines_cleared, softdrop_search, Placement};
use finder_core::{Field, Piece, Rotation, SpinType};

/// Reachability check for a position that already fits and rests on ground.
pub trait Reachable: Sync {
    fn checks(
        &self,
        field: &Field,
        piece: Piece,
        rotation: Rotation,
        x: i32,
        y: i32,
        max_height: i32,
    ) -> bool;

    /// Best spin the piece can lock with there. Rules without turns never spin.
    fn spin(
        &self,
        _field: &Field,
        _piece: Piece,
        _rotation: Rotation,
        _x: i32,
        _y: i32,
        _max_height: i32,
    ) -> SpinType {
        SpinType::None
    }
}

/// Straight drop from above the stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct HarddropReachable;

impl Reachable for HarddropReachable {
    fn checks(
        &self,
        field: &Field,
        piece: Piece,
        rotation: Rotation,
        x: i32,
        y: i32,
        max_height: i32,
    ) -> bool {
        let mino = piece.mino(rotation);
        y + mino.max_y() < max_height && field.can_reach_on_harddrop(mino, x, y)
    }
}

/// Any path of shifts, drops and kicked turns from spawn.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftdropReachable;

impl Reachable for SoftdropReachable {
    fn checks(
        &self,
        field: &Field,
        piece: Piece,
        rotation: Rotation,
        x: i32,
        y: i32,
        max_height: i32,
    ) -> bool {
        let placement = Placement::new(rotation, x, y);
        softdrop_reaches(field, piece, placement, max_height, &Direction::QUARTER)
    }

    fn spin(
        &self,
        field: &Field,
        piece: Piece,
        rotation: Rotation,
        x: i32,
        y: i32,
        max_height: i32,
    ) -> SpinType {
        let placement = Placement::new(rotation, x, y);
        best_spin(field, piece, placement, max_height, &Direction::QUARTER)
    }
}

fn softdrop_reaches(
    field: &Field,
    piece: Piece,
    placement: Placement,
    max_height: i32,
    turns: &[Direction],
) -> bool {
    let target = placement.canonical(piece);
    softdrop_search(field, piece, max_height, turns, |p| {
        if p.canonical(piece) == target {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}

impl Reachable for DropType {
    fn checks(
        &self,
        field: &Field,
        piece: Piece,
        rotation: Rotation,
        x: i32,
        y: i32,
        max_height: i32,
    ) -> bool {
        let Some(turns) = self.turns(piece) else {
            return HarddropReachable.checks(field, piece, rotation, x, y, max_height);
        };
        let placement = Placement::new(rotation, x, y);
        if !softdrop_reaches(field, piece, placement, max_height, turns) {
            return false;
        }
        match (piece, self.required_tspin()) {
            (Piece::T, Some(min_lines)) => {
                let spin = best_spin(field, piece, placement, max_height, turns);
                spin.is_tspin(lines_cleared(field, piece, &placement), min_lines)
            }
            _ => true,
        }
    }

    fn spin(
        &self,
        field: &Field,
        piece: Piece,
        rotation: Rotation,
        x: i32,
        y: i32,
        max_height: i32,
    ) -> SpinType {
        match self.turns(piece) {
            Some(turns) => {
                best_spin(field, piece, Placement::new(rotation, x, y), max_height, turns)
            }
            None => SpinType::None,
        }
    }
}
