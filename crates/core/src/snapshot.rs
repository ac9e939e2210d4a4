//! Boundary form of a field: raw board words plus the declared height.

use serde::{Deserialize, Serialize};

use crate::field::{Field, MAX_FIELD_HEIGHT, VALID_BOARD_RANGE};
use crate::ParseError;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub boards: Vec<u64>,
    pub max_height: u8,
}

impl FieldSnapshot {
    /// Snapshot of `field` declared at `max_height` rows.
    pub fn new(field: &Field, max_height: i32) -> Self {
        assert!(
            (1..=field.max_field_height()).contains(&max_height),
            "height {max_height} does not fit a {}-board field",
            field.board_count()
        );
        Self {
            boards: field.boards().to_vec(),
            max_height: max_height as u8,
        }
    }
}

impl From<Field> for FieldSnapshot {
    fn from(field: Field) -> Self {
        FieldSnapshot::new(&field, field.max_field_height())
    }
}

impl TryFrom<FieldSnapshot> for Field {
    type Error = ParseError;

    fn try_from(snapshot: FieldSnapshot) -> Result<Self, Self::Error> {
        let max_height = snapshot.max_height as i32;
        if !(1..=MAX_FIELD_HEIGHT).contains(&max_height) {
            return Err(ParseError::Height(max_height));
        }
        let boards = snapshot.boards.len();
        if !matches!(boards, 1 | 2 | 4) {
            return Err(ParseError::BoardCount(boards));
        }
        if max_height > boards as i32 * 6 {
            return Err(ParseError::Capacity { boards, max_height });
        }
        if let Some(i) = snapshot
            .boards
            .iter()
            .position(|b| b & !VALID_BOARD_RANGE != 0)
        {
            return Err(ParseError::StrayBits(i));
        }
        Ok(Field::from_boards(&snapshot.boards))
    }
}
