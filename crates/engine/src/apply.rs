use crate::movegen::Placement;
use finder_core::{Field, Piece};

/// Place a piece and clear lines. Returns the new field and the removed rows.
pub fn apply_placement(field: &Field, piece: Piece, placement: &Placement) -> (Field, u64) {
    let mut next = *field;
    let undo = apply_placement_mut(&mut next, piece, placement);
    (next, undo.cleared_key)
}

/// Undo info for unapply_placement - the placement and the rows it cleared
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoInfo {
    pub piece: Piece,
    pub placement: Placement,
    /// Key of the rows removed right after the piece locked.
    pub cleared_key: u64,
}

/// Apply placement in-place, returns undo info for reversal
#[inline]
pub fn apply_placement_mut(field: &mut Field, piece: Piece, placement: &Placement) -> UndoInfo {
    field.put(piece.mino(placement.rotation), placement.x, placement.y);
    let cleared_key = field.clear_line_return_key();
    UndoInfo {
        piece,
        placement: *placement,
        cleared_key,
    }
}

/// Undo a placement - restores field to state before apply_placement_mut
#[inline]
pub fn unapply_placement(field: &mut Field, undo: &UndoInfo) {
    field.insert_filled_line_with_key(undo.cleared_key);
    let p = undo.placement;
    field.remove(undo.piece.mino(p.rotation), p.x, p.y);
}
