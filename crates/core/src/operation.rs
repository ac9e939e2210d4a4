//! Placement records in the frame of the starting field.

use serde::{Deserialize, Serialize};

use crate::key::{compressed_row, expand_key, original_row, rows_between};
use crate::{Field, Piece, Rotation};

/// How a piece locked after its last move.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SpinType {
    #[default]
    None,
    Mini,
    Full,
}

impl SpinType {
    /// Whether a lock with this spin that cleared `lines` rows is a T-spin of
    /// at least `min_lines` lines. With `min_lines == 0` any spin counts, minis
    /// included; otherwise only a full spin does.
    pub fn is_tspin(self, lines: u32, min_lines: u32) -> bool {
        match min_lines {
            0 => self != SpinType::None,
            _ => self == SpinType::Full && lines >= min_lines,
        }
    }
}

/// One placed piece.
///
/// `x`/`y` is the rotation anchor in the starting field, before any rows were
/// cleared: `y + min_y` is the row the piece's lowest block lands on.
/// `need_deleted_key` lists the rows inside the piece's vertical span that must
/// already be cleared when it is placed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub struct Operation {
    pub piece: Piece,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    pub need_deleted_key: u64,
    pub hold_used: bool,
}

impl Operation {
    pub fn new(piece: Piece, rotation: Rotation, x: i32, y: i32) -> Self {
        Self {
            piece,
            rotation,
            x,
            y,
            need_deleted_key: 0,
            hold_used: false,
        }
    }

    pub fn with_need_deleted_key(mut self, key: u64) -> Self {
        self.need_deleted_key = key;
        self
    }

    pub fn with_hold(mut self) -> Self {
        self.hold_used = true;
        self
    }

    /// Lift a placement made on a field whose `cleared` rows are gone back into
    /// the starting frame.
    pub fn from_compressed(
        piece: Piece,
        rotation: Rotation,
        x: i32,
        y: i32,
        cleared: u64,
    ) -> Self {
        let mino = piece.mino(rotation);
        let bottom = original_row(y + mino.min_y(), cleared);
        let top = original_row(y + mino.max_y(), cleared);
        Self {
            piece,
            rotation,
            x,
            y: bottom - mino.min_y(),
            need_deleted_key: cleared & rows_between(bottom + 1, top),
            hold_used: false,
        }
    }

    /// Anchor row on a field whose `cleared` rows are gone.
    pub fn compressed_y(&self, cleared: u64) -> i32 {
        let min_y = self.piece.mino(self.rotation).min_y();
        compressed_row(self.y + min_y, cleared) - min_y
    }

    /// Cells of this piece in the starting frame.
    pub fn footprint(&self, max_height: i32) -> Field {
        let mut field = Field::new(max_height);
        field.put(self.piece.mino(self.rotation), self.x, self.y);
        field.insert_blank_line_with_key(self.need_deleted_key);
        field
    }
}

/// Rows of the starting frame removed by a clear that reported `key` on a field
/// whose `cleared` rows were already gone.
pub fn lift_cleared_key(key: u64, cleared: u64) -> u64 {
    expand_key(key, cleared)
}
