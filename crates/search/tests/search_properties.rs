use std::collections::BTreeMap;

use finder_core::{Field, Operation, Piece};
use finder_engine::perft::enumerate_paths;
use finder_engine::DropType;
use finder_search::{PerfectClear, SearchConfig, SearchResult, Searcher};

fn any_field(_: &Field) -> bool {
    true
}

fn search(config: SearchConfig, field: &Field, pieces: &[Piece]) -> Vec<SearchResult> {
    Searcher::new(config).search(field, pieces, &any_field).unwrap()
}

mod dedup {
    use super::*;

    #[test]
    fn test_matches_brute_force_without_hold() {
        let field = Field::new(4);
        let pieces = [Piece::O, Piece::T];
        for drop in [DropType::Harddrop, DropType::Softdrop] {
            let config = SearchConfig::default()
                .with_depth(2)
                .with_hold(false)
                .with_drop(drop);
            let results = search(config, &field, &pieces);

            // smallest path per final field
            let mut expected: BTreeMap<Field, Vec<Operation>> = BTreeMap::new();
            for path in enumerate_paths(&field, &pieces, 4, drop) {
                expected
                    .entry(path.field)
                    .and_modify(|ops| {
                        if path.operations < *ops {
                            *ops = path.operations.clone();
                        }
                    })
                    .or_insert(path.operations);
            }

            assert_eq!(results.len(), expected.len());
            for result in &results {
                assert_eq!(result.hold, None);
                assert_eq!(Some(&result.operations), expected.get(&result.field));
            }
        }
    }

    #[test]
    fn test_results_are_distinct_and_sorted() {
        let config = SearchConfig::default().with_depth(3);
        let results = search(config, &Field::new(4), &[Piece::T, Piece::S, Piece::Z, Piece::I]);
        assert!(!results.is_empty());
        for pair in results.windows(2) {
            assert!((pair[0].field, pair[0].hold) < (pair[1].field, pair[1].hold));
        }
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let field = Field::from_ascii("XX______XX", 4).unwrap();
        let pieces = [Piece::T, Piece::I, Piece::L, Piece::O];
        let one = search(SearchConfig::default().with_depth(3).with_threads(1), &field, &pieces);
        let four = search(SearchConfig::default().with_depth(3).with_threads(4), &field, &pieces);
        let global = search(SearchConfig::default().with_depth(3), &field, &pieces);
        assert_eq!(one, four);
        assert_eq!(one, global);
    }

    #[test]
    fn test_large_field() {
        let config = SearchConfig::default()
            .with_height(24)
            .with_depth(1)
            .with_hold(false);
        let results = search(config, &Field::new(24), &[Piece::I]);
        assert_eq!(results.len(), 17);
        assert!(results.iter().all(|r| r.field.max_field_height() == 24));
    }
}

mod hold {
    use super::*;

    #[test]
    fn test_hold_places_either_piece() {
        let config = SearchConfig::default()
            .with_depth(1)
            .with_drop(DropType::Harddrop);
        let results = search(config, &Field::new(4), &[Piece::O, Piece::I]);
        let placed_o = results.iter().filter(|r| r.hold.is_none()).count();
        let placed_i = results.iter().filter(|r| r.hold == Some(Piece::O)).count();
        assert_eq!(placed_o, 9);
        assert_eq!(placed_i, 17);
        assert_eq!(results.len(), 26);
        for result in &results {
            assert_eq!(result.operations[0].hold_used, result.hold.is_some());
        }
    }

    #[test]
    fn test_hold_reaches_needed_piece() {
        let field = Field::from_ascii("XXXXXX____", 1).unwrap();
        let pieces = [Piece::O, Piece::I];
        let config = SearchConfig::perfect_clear(1).with_depth(1);

        let no_hold = Searcher::new(config.clone().with_hold(false));
        assert!(no_hold.search(&field, &pieces, &PerfectClear).unwrap().is_empty());

        let results = Searcher::new(config).search(&field, &pieces, &PerfectClear).unwrap();
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.hold, Some(Piece::O));
        assert_eq!(result.placed_pieces(), vec![Piece::I]);
        assert!(result.uses_hold());
        assert_eq!((result.operations[0].x, result.operations[0].y), (7, 0));
    }
}

mod perfect_clear {
    use super::*;

    #[test]
    fn test_two_line_pc_with_o_pieces() {
        let searcher = Searcher::new(SearchConfig::perfect_clear(2).with_hold(false));
        let results = searcher
            .search(&Field::new(2), &[Piece::O; 5], &PerfectClear)
            .unwrap();
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.field.is_perfect());
        assert_eq!(result.depth, 5);

        // the pieces tile both rows of the starting field exactly once
        let cells = result.footprint();
        assert_eq!(cells.get_num_of_all_blocks(), 20);
        assert_eq!(cells.get_block_count_on_y(0), 10);
        assert_eq!(cells.get_block_count_on_y(1), 10);
    }

    #[test]
    fn test_operations_stay_in_starting_frame() {
        // an I on the bottom clears a row; the next I lands on the row above it
        let field = Field::from_ascii(
            "
            XXXXXX____
            XXXXXX____
            ",
            2,
        )
        .unwrap();
        let searcher = Searcher::new(SearchConfig::perfect_clear(2).with_depth(2).with_hold(false));
        let results = searcher
            .search(&field, &[Piece::I, Piece::I], &PerfectClear)
            .unwrap();
        assert_eq!(results.len(), 1);
        let ops = &results[0].operations;
        assert_eq!((ops[0].x, ops[0].y), (7, 0));
        assert_eq!((ops[1].x, ops[1].y), (7, 1));
        assert_eq!(ops[1].need_deleted_key, 0);
    }

    #[test]
    fn test_no_solution() {
        let searcher = Searcher::new(SearchConfig::perfect_clear(2).with_hold(false));
        let results = searcher
            .search(&Field::new(2), &[Piece::S; 5], &PerfectClear)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_result_json() {
        let searcher = Searcher::new(SearchConfig::perfect_clear(2).with_hold(false));
        let results = searcher
            .search(&Field::new(2), &[Piece::O; 5], &PerfectClear)
            .unwrap();
        let json = serde_json::to_string(&results[0]).unwrap();
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results[0]);
    }
}
