use thiserror::Error;

/// Rejected boundary input: piece letters, field art and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown piece character {0:?}")]
    UnknownPiece(char),
    #[error("unexpected cell character {0:?}")]
    UnexpectedCell(char),
    #[error("row {row} is {width} cells wide, expected 10")]
    RowWidth { row: usize, width: usize },
    #[error("{rows} rows do not fit in a field of height {max_height}")]
    TooTall { rows: usize, max_height: i32 },
    #[error("field height {0} is outside 1..=24")]
    Height(i32),
    #[error("snapshot holds {0} boards, expected 1, 2 or 4")]
    BoardCount(usize),
    #[error("{boards} boards cannot hold a field of height {max_height}")]
    Capacity { boards: usize, max_height: i32 },
    #[error("board {0} has bits outside its 60 cells")]
    StrayBits(usize),
    #[error("unknown {kind} {name:?}")]
    UnknownName { kind: &'static str, name: String },
}
