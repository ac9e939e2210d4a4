//! Goal predicates checked against the fields a search ends on.

use finder_core::{Field, FIELD_WIDTH};

/// What a finished path must reach.
///
/// `is_promising` may reject a partial field early; it must never reject a
/// field from which the goal is still reachable with `remaining` pieces while
/// staying below `max_height`.
pub trait Goal: Sync {
    fn is_goal(&self, field: &Field) -> bool;

    fn is_promising(&self, _field: &Field, _remaining: usize, _max_height: i32) -> bool {
        true
    }
}

impl<F> Goal for F
where
    F: Fn(&Field) -> bool + Sync,
{
    fn is_goal(&self, field: &Field) -> bool {
        self(field)
    }
}

/// Every block cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerfectClear;

impl PerfectClear {
    /// Empty cells below `max_height`, split into regions walled off from each
    /// other, each count a multiple of four.
    fn regions_fillable(field: &Field, max_height: i32) -> bool {
        let empty_in = |x: i32| max_height as u32 - field.get_block_count_below_on_x(x, max_height);
        let mut region = empty_in(0);
        for x in 1..FIELD_WIDTH {
            if field.is_wall_between_left(x, max_height) {
                if region % 4 != 0 {
                    return false;
                }
                region = 0;
            }
            region += empty_in(x);
        }
        region % 4 == 0
    }
}

impl Goal for PerfectClear {
    fn is_goal(&self, field: &Field) -> bool {
        field.is_perfect()
    }

    fn is_promising(&self, field: &Field, remaining: usize, max_height: i32) -> bool {
        if field.exists_above(max_height) {
            return false;
        }
        let blocks = field.get_num_of_all_blocks() as usize;
        let placed = blocks + remaining * 4;
        // the last piece has to land on a full clear
        if placed % FIELD_WIDTH as usize != 0 {
            return false;
        }
        let capacity = (max_height * FIELD_WIDTH) as usize;
        if placed > capacity {
            return false;
        }
        // every open cell gets filled only when the rows are used up exactly
        placed < capacity || Self::regions_fillable(field, max_height)
    }
}

/// The final field equals a target pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchesField {
    target: Field,
}

impl MatchesField {
    pub fn new(target: Field) -> Self {
        Self { target }
    }
}

impl Goal for MatchesField {
    fn is_goal(&self, field: &Field) -> bool {
        *field == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_clear_goal() {
        let mut field = Field::new(4);
        assert!(PerfectClear.is_goal(&field));
        field.set_block(0, 0);
        assert!(!PerfectClear.is_goal(&field));
    }

    #[test]
    fn test_closure_goal() {
        let goal = |field: &Field| field.get_num_of_all_blocks() == 4;
        let mut field = Field::new(4);
        assert!(!goal.is_goal(&field));
        for x in 0..4 {
            field.set_block(x, 0);
        }
        assert!(goal.is_goal(&field));
        assert!(goal.is_promising(&field, 3, 4));
    }

    #[test]
    fn test_block_count_parity() {
        let mut field = Field::new(4);
        assert!(PerfectClear.is_promising(&field, 10, 4));
        assert!(PerfectClear.is_promising(&field, 5, 4));
        // 4 * 4 = 16 cells cannot finish a row count
        assert!(!PerfectClear.is_promising(&field, 4, 4));
        // more pieces than the rows can hold
        assert!(!PerfectClear.is_promising(&field, 15, 4));

        field.set_block(0, 0);
        field.set_block(1, 0);
        assert!(!PerfectClear.is_promising(&field, 9, 4));
    }

    #[test]
    fn test_walled_region_parity() {
        // column 2 is sealed: the left region keeps 6 open cells
        let field = Field::from_ascii(
            "
            __X_______
            __X_______
            X_X_______
            X_XXX_____
            ",
            4,
        )
        .unwrap();
        assert_eq!(field.get_num_of_all_blocks(), 8);
        assert!(!PerfectClear.is_promising(&field, 8, 4));
        // with pieces to spare the regions are not checked
        let short = Field::from_ascii("X_XXX_____", 4).unwrap();
        assert!(PerfectClear.is_promising(&short, 4, 4));
    }

    #[test]
    fn test_balanced_regions_pass() {
        // 4 + 4 = 8 blocks stacked in columns 0 and 9 leave two clean regions
        let field = Field::from_ascii(
            "
            X________X
            X________X
            X________X
            X________X
            ",
            4,
        )
        .unwrap();
        assert!(PerfectClear.is_promising(&field, 8, 4));
    }

    #[test]
    fn test_blocks_above_height() {
        let mut field = Field::new(6);
        field.set_block(0, 4);
        assert!(!PerfectClear.is_promising(&field, 9, 4));
    }

    #[test]
    fn test_matches_field() {
        let mut target = Field::new(4);
        target.set_block(3, 0);
        let goal = MatchesField::new(target);
        let mut field = Field::new(4);
        assert!(!goal.is_goal(&field));
        field.set_block(3, 0);
        assert!(goal.is_goal(&field));
    }
}
