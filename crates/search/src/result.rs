use finder_core::{Field, Operation, Piece};
use serde::{Deserialize, Serialize};

/// One distinct final state with a representative path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub field: Field,
    pub max_height: i32,
    pub depth: usize,
    /// Piece left in the hold slot.
    pub hold: Option<Piece>,
    pub operations: Vec<Operation>,
}

impl SearchResult {
    /// Pieces in the order they were placed.
    pub fn placed_pieces(&self) -> Vec<Piece> {
        self.operations.iter().map(|op| op.piece).collect()
    }

    pub fn uses_hold(&self) -> bool {
        self.operations.iter().any(|op| op.hold_used)
    }

    /// Every placed cell drawn on an empty starting field.
    pub fn footprint(&self) -> Field {
        let mut cells = Field::new(self.max_height);
        for op in &self.operations {
            cells.merge(&op.footprint(self.max_height));
        }
        cells
    }
}
