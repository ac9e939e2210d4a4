use finder_core::{Field, Operation, Piece};

/// Identity of a frontier entry: two orders with the same key have the same
/// future.
pub type OrderKey = (Field, Option<Piece>);

/// A partial path: the field it left behind and how it got there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub field: Field,
    pub hold: Option<Piece>,
    /// Rows of the starting field cleared so far.
    pub cleared: u64,
    pub operations: Vec<Operation>,
}

impl Order {
    pub fn root(field: Field) -> Self {
        Self {
            field,
            hold: None,
            cleared: 0,
            operations: Vec::new(),
        }
    }

    pub fn key(&self) -> OrderKey {
        (self.field, self.hold)
    }

    /// Row limit left on the compressed field.
    pub fn max_height(&self, start: i32) -> i32 {
        start - self.cleared.count_ones() as i32
    }

    /// Pieces taken from the sequence, counting the held one.
    pub fn drawn(&self) -> usize {
        self.operations.len() + usize::from(self.hold.is_some())
    }
}
