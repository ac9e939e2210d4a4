//! perft - brute-force path enumeration for verifying the search
//! every placement path is walked, nothing is deduplicated

use crate::apply::{apply_placement, apply_placement_mut, unapply_placement};
use crate::config::DropType;
use crate::movegen::generate_placements;
use finder_core::{lift_cleared_key, Field, Operation, Piece};
use rayon::prelude::*;

/// One complete placement path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub field: Field,
    pub operations: Vec<Operation>,
    /// Rows of the starting field removed along the way.
    pub cleared: u64,
}

/// perft - counts leaf paths placing every piece of `queue` in order
pub fn perft(field: &Field, queue: &[Piece], max_height: i32, drop: DropType) -> u64 {
    let mut local = *field;
    perft_mut(&mut local, queue, max_height, drop)
}

fn perft_mut(field: &mut Field, queue: &[Piece], max_height: i32, drop: DropType) -> u64 {
    let Some((&piece, rest)) = queue.split_first() else {
        return 1;
    };
    let placements = generate_placements(field, piece, max_height, drop);
    if rest.is_empty() {
        return placements.len() as u64;
    }

    let mut nodes = 0u64;
    for placement in &placements {
        let undo = apply_placement_mut(field, piece, placement);
        let height = max_height - undo.cleared_key.count_ones() as i32;
        nodes += perft_mut(field, rest, height, drop);
        unapply_placement(field, &undo);
    }
    nodes
}

/// Parallel perft - splits top-level placements across threads
pub fn perft_parallel(field: &Field, queue: &[Piece], max_height: i32, drop: DropType) -> u64 {
    let Some((&piece, rest)) = queue.split_first() else {
        return 1;
    };
    generate_placements(field, piece, max_height, drop)
        .as_slice()
        .par_iter()
        .map(|placement| {
            let (next, key) = apply_placement(field, piece, placement);
            perft(&next, rest, max_height - key.count_ones() as i32, drop)
        })
        .sum()
}

/// Every path placing all of `queue`, with operations in the starting frame.
pub fn enumerate_paths(
    field: &Field,
    queue: &[Piece],
    max_height: i32,
    drop: DropType,
) -> Vec<Path> {
    let mut out = Vec::new();
    let mut operations = Vec::with_capacity(queue.len());
    enumerate(field, queue, max_height, drop, 0, &mut operations, &mut out);
    out
}

fn enumerate(
    field: &Field,
    queue: &[Piece],
    max_height: i32,
    drop: DropType,
    cleared: u64,
    operations: &mut Vec<Operation>,
    out: &mut Vec<Path>,
) {
    let Some((&piece, rest)) = queue.split_first() else {
        out.push(Path {
            field: *field,
            operations: operations.clone(),
            cleared,
        });
        return;
    };
    for placement in generate_placements(field, piece, max_height, drop) {
        let (next, key) = apply_placement(field, piece, &placement);
        operations.push(Operation::from_compressed(
            piece,
            placement.rotation,
            placement.x,
            placement.y,
            cleared,
        ));
        enumerate(
            &next,
            rest,
            max_height - key.count_ones() as i32,
            drop,
            cleared | lift_cleared_key(key, cleared),
            operations,
            out,
        );
        operations.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queue_is_one_path() {
        assert_eq!(perft(&Field::new(4), &[], 4, DropType::Softdrop), 1);
        assert_eq!(enumerate_paths(&Field::new(4), &[], 4, DropType::Softdrop).len(), 1);
    }

    #[test]
    fn test_d1_matches_placement_count() {
        let field = Field::new(4);
        assert_eq!(perft(&field, &[Piece::T], 4, DropType::Harddrop), 34);
        assert_eq!(perft(&field, &[Piece::O], 4, DropType::Harddrop), 9);
    }

    #[test]
    fn test_variants_agree() {
        let field = Field::new(4);
        let queue = [Piece::T, Piece::I, Piece::O];
        for drop in [DropType::Harddrop, DropType::Softdrop] {
            let baseline = perft(&field, &queue, 4, drop);
            assert_eq!(perft_parallel(&field, &queue, 4, drop), baseline);
            assert_eq!(enumerate_paths(&field, &queue, 4, drop).len() as u64, baseline);
        }
    }

    #[test]
    fn test_paths_track_cleared_rows() {
        // two O pieces plug both gaps of the bottom row
        let field = Field::from_ascii("__XXXXXX__", 4).unwrap();
        let paths = enumerate_paths(&field, &[Piece::O, Piece::O], 4, DropType::Harddrop);
        let clean: Vec<_> = paths.iter().filter(|p| p.cleared == 0b1).collect();
        assert!(!clean.is_empty());
        for path in clean {
            assert_eq!(path.field.get_num_of_all_blocks(), 4);
        }
    }
}
