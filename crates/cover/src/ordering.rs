//! Catalogues of piece orderings.

use finder_core::Piece;

/// Canonical form of an ordering catalogue.
///
/// Each ordering is cut to the pieces a search of `depth` can draw: `depth`
/// without hold, `depth + 1` with it. With hold the first two pieces are both
/// available from the start, so their order is irrelevant and they are sorted.
/// Duplicates are removed and the result is sorted.
pub fn reduce_orderings(
    orderings: &[Vec<Piece>],
    depth: usize,
    use_hold: bool,
) -> Vec<Vec<Piece>> {
    let len = if use_hold { depth + 1 } else { depth };
    let mut reduced: Vec<Vec<Piece>> = orderings
        .iter()
        .map(|ordering| {
            let mut pieces = ordering[..len.min(ordering.len())].to_vec();
            if use_hold && pieces.len() >= 2 && pieces[1] < pieces[0] {
                pieces.swap(0, 1);
            }
            pieces
        })
        .collect();
    reduced.sort_unstable();
    reduced.dedup();
    reduced
}

/// Number of each piece kind, indexed by [`Piece::index`].
pub(crate) fn piece_counts(pieces: impl IntoIterator<Item = Piece>) -> [u8; 7] {
    let mut counts = [0u8; 7];
    for piece in pieces {
        counts[piece.index()] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Vec<Piece> {
        Piece::parse_sequence(s).unwrap()
    }

    #[test]
    fn test_truncate_and_dedup() {
        let orderings = vec![parse("TIO"), parse("TIS"), parse("OIT")];
        let reduced = reduce_orderings(&orderings, 2, false);
        assert_eq!(reduced, vec![parse("OI"), parse("TI")]);
    }

    #[test]
    fn test_hold_swaps_first_two() {
        let orderings = vec![parse("TIO"), parse("ITO"), parse("ITS")];
        let reduced = reduce_orderings(&orderings, 2, true);
        assert_eq!(reduced, vec![parse("ITO"), parse("ITS")]);
    }

    #[test]
    fn test_short_orderings_are_kept() {
        let reduced = reduce_orderings(&[parse("T")], 3, false);
        assert_eq!(reduced, vec![parse("T")]);
    }

    #[test]
    fn test_piece_counts() {
        let counts = piece_counts(parse("TTIO"));
        assert_eq!(counts[Piece::T.index()], 2);
        assert_eq!(counts[Piece::I.index()], 1);
        assert_eq!(counts[Piece::S.index()], 0);
    }
}
