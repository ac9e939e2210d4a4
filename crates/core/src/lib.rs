//! Finder core crate - pieces, shape table, bitboard fields and placement records.

mod error;
pub mod field;
pub mod key;
mod operation;
mod piece;
mod snapshot;

pub use error::ParseError;
pub use field::{
    BitField, Field, LargeField, MiddleField, SmallField, BOARD_HEIGHT, FIELD_WIDTH,
    MAX_FIELD_HEIGHT,
};
pub use operation::{lift_cleared_key, Operation, SpinType};
pub use piece::{Mino, Piece, Rotation};
pub use snapshot::FieldSnapshot;
