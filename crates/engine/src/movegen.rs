//! Legal placement generation for one piece on one field.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use smallvec::SmallVec;

use crate::config::DropType;
use crate::kicks::{kicks_for, Direction};
use crate::movement::{try_drop, try_move, try_rotate};
use finder_core::{Field, Piece, Rotation, SpinType, FIELD_WIDTH};

/// Locked piece position on the field it was generated for.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Placement {
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(rotation: Rotation, x: i32, y: i32) -> Self {
        Self { rotation, x, y }
    }

    /// Same cells, expressed with the piece's canonical rotation.
    pub fn canonical(self, piece: Piece) -> Self {
        let (rotation, x, y) = piece.canonical_placement(self.rotation, self.x, self.y);
        Self { rotation, x, y }
    }
}

pub type Placements = SmallVec<[Placement; 64]>;

/// Anchor rows tracked by the visited bitsets.
const MAX_ANCHOR_Y: i32 = 32;

/// Visited anchors, one `u32` row bitset per rotation and column.
#[derive(Default)]
struct Visited([[u32; FIELD_WIDTH as usize]; 4]);

impl Visited {
    /// Mark and report whether the state is new.
    #[inline]
    fn insert(&mut self, rotation: Rotation, x: i32, y: i32) -> bool {
        if !(0..MAX_ANCHOR_Y).contains(&y) {
            return false;
        }
        let slot = &mut self.0[rotation.index()][x as usize];
        let bit = 1u32 << y;
        let fresh = *slot & bit == 0;
        *slot |= bit;
        fresh
    }

    fn contains(&self, rotation: Rotation, x: i32, y: i32) -> bool {
        (0..MAX_ANCHOR_Y).contains(&y)
            && (0..FIELD_WIDTH).contains(&x)
            && self.0[rotation.index()][x as usize] & (1u32 << y) != 0
    }
}

/// Generate all distinct placements of `piece` whose blocks stay below `max_height`.
///
/// Placements are canonical (symmetric rotations collapsed) and sorted.
pub fn generate_placements(
    field: &Field,
    piece: Piece,
    max_height: i32,
    drop: DropType,
) -> Placements {
    let Some(turns) = drop.turns(piece) else {
        let mut out = harddrop_placements(field, piece, max_height);
        out.sort_unstable();
        return out;
    };

    let mut out = Placements::new();
    let mut seen = Visited::default();
    let mut states = Visited::default();
    let _ = softdrop_walk(field, piece, max_height, turns, &mut states, |p| {
        let c = p.canonical(piece);
        if seen.insert(c.rotation, c.x, c.y) {
            out.push(c);
        }
        ControlFlow::<()>::Continue(())
    });
    if let (Piece::T, Some(min_lines)) = (piece, drop.required_tspin()) {
        out.retain(|p| {
            let spin = spin_from(&states, field, piece, *p, turns);
            spin.is_tspin(lines_cleared(field, piece, p), min_lines)
        });
    }
    out.sort_unstable();
    out
}

/// Rows a placement would clear.
pub(crate) fn lines_cleared(field: &Field, piece: Piece, placement: &Placement) -> u32 {
    let mut after = *field;
    after.put(piece.mino(placement.rotation), placement.x, placement.y);
    after.clear_line()
}

/// Number of distinct placements.
pub fn count_placements(field: &Field, piece: Piece, max_height: i32, drop: DropType) -> usize {
    generate_placements(field, piece, max_height, drop).len()
}

fn harddrop_placements(field: &Field, piece: Piece, max_height: i32) -> Placements {
    let mut out = Placements::new();
    for &rotation in piece.distinct_rotations() {
        let mino = piece.mino(rotation);
        let start_y = max_height - mino.min_y();
        for x in -mino.min_x()..FIELD_WIDTH - mino.max_x() {
            let y = field.get_y_on_harddrop(mino, x, start_y);
            if y + mino.max_y() < max_height {
                out.push(Placement::new(rotation, x, y));
            }
        }
    }
    out
}

/// Breadth-first walk from spawn over shifts, one-row drops and the given turns.
///
/// `on_lock` sees every grounded state whose blocks stay below `max_height`,
/// in any rotation (not canonical). Breaking out of `on_lock` stops the walk.
pub(crate) fn softdrop_search<B>(
    field: &Field,
    piece: Piece,
    max_height: i32,
    turns: &[Direction],
    on_lock: impl FnMut(Placement) -> ControlFlow<B>,
) -> ControlFlow<B> {
    softdrop_walk(field, piece, max_height, turns, &mut Visited::default(), on_lock)
}

/// The walk behind [`softdrop_search`]; every state it reaches ends up in `visited`.
fn softdrop_walk<B>(
    field: &Field,
    piece: Piece,
    max_height: i32,
    turns: &[Direction],
    visited: &mut Visited,
    mut on_lock: impl FnMut(Placement) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let spawn_rotation = Rotation::North;
    let spawn_x = piece.spawn_x();
    let spawn_y = max_height - piece.mino(spawn_rotation).min_y();
    if !field.can_put(piece.mino(spawn_rotation), spawn_x, spawn_y) {
        return ControlFlow::Continue(());
    }

    let mut queue = VecDeque::new();
    visit_state(visited, &mut queue, max_height, piece, spawn_rotation, spawn_x, spawn_y);

    while let Some(state) = queue.pop_front() {
        let mino = piece.mino(state.rotation);
        if state.y + mino.max_y() < max_height && field.is_on_ground(mino, state.x, state.y) {
            on_lock(state)?;
        }

        for dx in [-1, 1] {
            if let Some(nx) = try_move(field, piece, state.rotation, state.x, state.y, dx) {
                visit_state(visited, &mut queue, max_height, piece, state.rotation, nx, state.y);
            }
        }
        if let Some(ny) = try_drop(field, piece, state.rotation, state.x, state.y) {
            visit_state(visited, &mut queue, max_height, piece, state.rotation, state.x, ny);
        }
        for &direction in turns {
            let turned = try_rotate(field, piece, state.rotation, state.x, state.y, direction);
            if let Some(turn) = turned {
                visit_state(visited, &mut queue, max_height, piece, turn.rotation, turn.x, turn.y);
            }
        }
    }
    ControlFlow::Continue(())
}

/// Best spin `piece` can lock with at `target`, arriving by a turn from a
/// state the soft drop walk reaches.
pub(crate) fn best_spin(
    field: &Field,
    piece: Piece,
    target: Placement,
    max_height: i32,
    turns: &[Direction],
) -> SpinType {
    if piece != Piece::T {
        return SpinType::None;
    }
    let mut states = Visited::default();
    let _ = softdrop_walk(field, piece, max_height, turns, &mut states, |_| {
        ControlFlow::<()>::Continue(())
    });
    spin_from(&states, field, piece, target, turns)
}

fn spin_from(
    states: &Visited,
    field: &Field,
    piece: Piece,
    target: Placement,
    turns: &[Direction],
) -> SpinType {
    let mut best = SpinType::None;
    for &direction in turns {
        let from = direction.reverse().apply(target.rotation);
        for &(dx, dy) in kicks_for(piece, from, direction) {
            let (x, y) = (target.x - dx as i32, target.y - dy as i32);
            if !states.contains(from, x, y) {
                continue;
            }
            // the turn only lands on target if no earlier kick test fits
            if let Some(turn) = try_rotate(field, piece, from, x, y, direction) {
                if Placement::new(turn.rotation, turn.x, turn.y) == target {
                    best = best.max(turn.spin_type);
                }
            }
        }
    }
    best
}

/// Queue a state unless it was seen or floats above the spawn row.
fn visit_state(
    visited: &mut Visited,
    queue: &mut VecDeque<Placement>,
    max_height: i32,
    piece: Piece,
    rotation: Rotation,
    x: i32,
    y: i32,
) {
    if y + piece.mino(rotation).min_y() > max_height {
        return;
    }
    if visited.insert(rotation, x, y) {
        queue.push_back(Placement::new(rotation, x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field_counts() {
        // flat floor: every distinct rotation fits in every column
        let field = Field::new(4);
        for drop in [DropType::Harddrop, DropType::Softdrop, DropType::Rotation180] {
            assert_eq!(count_placements(&field, Piece::O, 4, drop), 9);
            assert_eq!(count_placements(&field, Piece::I, 4, drop), 17);
            assert_eq!(count_placements(&field, Piece::T, 4, drop), 34);
            assert_eq!(count_placements(&field, Piece::S, 4, drop), 17);
            assert_eq!(count_placements(&field, Piece::L, 4, drop), 34);
        }
    }

    #[test]
    fn test_vertical_i_needs_four_rows() {
        let field = Field::new(3);
        let placements = generate_placements(&field, Piece::I, 3, DropType::Harddrop);
        assert_eq!(placements.len(), 7);
        assert!(placements.iter().all(|p| p.rotation == Rotation::North));
    }

    #[test]
    fn test_placements_rest_on_ground() {
        let field = Field::from_ascii(
            "
            ____X_____
            X___XX___X
            XX_XXXX_XX
            ",
            4,
        )
        .unwrap();
        for piece in Piece::ALL {
            for drop in DropType::ALL {
                for p in generate_placements(&field, piece, 4, drop) {
                    let mino = piece.mino(p.rotation);
                    assert!(field.can_put(mino, p.x, p.y), "{piece:?} {p:?}");
                    assert!(field.is_on_ground(mino, p.x, p.y), "{piece:?} {p:?}");
                    assert!(p.y + mino.max_y() < 4);
                }
            }
        }
    }

    #[test]
    fn test_softdrop_reaches_tuck() {
        // only a sideways slide gets under the overhang
        let field = Field::from_ascii(
            "
            XXXX______
            __________
            __________
            ",
            4,
        )
        .unwrap();
        let hard = generate_placements(&field, Piece::O, 4, DropType::Harddrop);
        let soft = generate_placements(&field, Piece::O, 4, DropType::Softdrop);
        for x in 0..=3 {
            let tuck = Placement::new(Rotation::North, x, 0);
            assert!(!hard.contains(&tuck));
            assert!(soft.contains(&tuck));
        }
        for p in &hard {
            assert!(soft.contains(p), "{p:?}");
        }
    }

    #[test]
    fn test_softdrop_tspin_slot() {
        // T-shaped hole under an overhang, filled by dropping upright then turning
        let field = Field::from_ascii(
            "
            XXX_______
            XX___XXXXX
            XXX_XXXXXX
            ",
            4,
        )
        .unwrap();
        let slot = Placement::new(Rotation::South, 3, 1);
        assert!(field.can_put(Piece::T.mino(Rotation::South), 3, 1));
        let hard = generate_placements(&field, Piece::T, 4, DropType::Harddrop);
        let soft = generate_placements(&field, Piece::T, 4, DropType::Softdrop);
        assert!(!hard.contains(&slot));
        assert!(soft.contains(&slot));
    }

    #[test]
    fn test_tspin_drops_filter_t_only() {
        let field = Field::from_ascii(
            "
            XXX_______
            XX___XXXXX
            XXX_XXXXXX
            ",
            4,
        )
        .unwrap();
        let slot = Placement::new(Rotation::South, 3, 1);
        let tsd = generate_placements(&field, Piece::T, 4, DropType::TSpinDouble);
        assert_eq!(tsd.as_slice(), &[slot]);
        assert!(generate_placements(&field, Piece::T, 4, DropType::TSpinTriple).is_empty());
        let any = generate_placements(&field, Piece::T, 4, DropType::AnyTSpin);
        assert!(any.contains(&slot));
        assert_eq!(
            generate_placements(&field, Piece::O, 4, DropType::TSpinDouble),
            generate_placements(&field, Piece::O, 4, DropType::Softdrop)
        );
    }

    #[test]
    fn test_t_only_softdrop() {
        let field = Field::from_ascii(
            "
            XXXX______
            __________
            __________
            ",
            4,
        )
        .unwrap();
        for piece in Piece::ALL {
            let expected = if piece == Piece::T {
                DropType::Softdrop
            } else {
                DropType::Harddrop
            };
            assert_eq!(
                generate_placements(&field, piece, 4, DropType::SoftdropTOnly),
                generate_placements(&field, piece, 4, expected),
                "{piece:?}"
            );
        }
    }

    #[test]
    fn test_half_turns_extend_softdrop() {
        let field = Field::from_ascii(
            "
            ____X_____
            X___XX___X
            XX_XXXX_XX
            ",
            4,
        )
        .unwrap();
        for piece in Piece::ALL {
            let soft = generate_placements(&field, piece, 4, DropType::Softdrop);
            let half = generate_placements(&field, piece, 4, DropType::Rotation180);
            for p in &soft {
                assert!(half.contains(p), "{piece:?} {p:?}");
            }
        }
    }

    #[test]
    fn test_blocked_spawn_has_no_placements() {
        let mut field = Field::new(6);
        for y in 0..6 {
            field.fill_line(y);
        }
        field.remove_block(0, 0);
        assert!(generate_placements(&field, Piece::T, 4, DropType::Softdrop).is_empty());
        assert!(generate_placements(&field, Piece::T, 4, DropType::Harddrop).is_empty());
    }

    #[test]
    fn test_output_is_sorted_and_canonical() {
        let field = Field::new(4);
        let placements = generate_placements(&field, Piece::S, 4, DropType::Softdrop);
        assert!(placements.windows(2).all(|w| w[0] < w[1]));
        assert!(placements
            .iter()
            .all(|p| Piece::S.distinct_rotations().contains(&p.rotation)));
    }
}
