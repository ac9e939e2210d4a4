//! SRS kick tables for piece rotation.
//! Kicks are derived from the guideline offset tables: for a turn from state
//! `a` to state `b`, test `i` moves the piece by `offset[a][i] - offset[b][i]`.

use finder_core::{Field, Piece, Rotation, FIELD_WIDTH};

/// Which way to turn.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Direction {
    Right,
    Left,
    /// 180 degree turn.
    Half,
}

impl Direction {
    /// Plain SRS turns.
    pub const QUARTER: [Direction; 2] = [Direction::Right, Direction::Left];
    pub const ALL: [Direction; 3] = [Direction::Right, Direction::Left, Direction::Half];

    pub fn apply(self, rotation: Rotation) -> Rotation {
        match self {
            Direction::Right => rotation.cw(),
            Direction::Left => rotation.ccw(),
            Direction::Half => rotation.flip(),
        }
    }

    /// The turn that undoes this one.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Half => Direction::Half,
        }
    }
}

type Offsets = [[(i8, i8); 5]; 4];

const JLSTZ_OFFSETS: Offsets = [
    [(0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

const I_OFFSETS: Offsets = [
    [(0, 0), (-1, 0), (2, 0), (-1, 0), (2, 0)],
    [(-1, 0), (0, 0), (0, 0), (0, 1), (0, -2)],
    [(-1, 1), (1, 1), (-2, 1), (1, 0), (-2, 0)],
    [(0, 1), (0, 1), (0, 1), (0, -1), (0, 2)],
];

// O only has its first column; the rest is never read
const O_OFFSETS: Offsets = [
    [(0, 0); 5],
    [(0, -1); 5],
    [(-1, -1); 5],
    [(-1, 0); 5],
];

/// kicks[from][direction]
type KickTable = [[[(i8, i8); 5]; 2]; 4];

const fn build_kicks(offsets: &Offsets) -> KickTable {
    let mut table = [[[(0i8, 0i8); 5]; 2]; 4];
    let mut from = 0;
    while from < 4 {
        // right then left
        let targets = [(from + 1) % 4, (from + 3) % 4];
        let mut d = 0;
        while d < 2 {
            let to = targets[d];
            let mut i = 0;
            while i < 5 {
                table[from][d][i] = (
                    offsets[from][i].0 - offsets[to][i].0,
                    offsets[from][i].1 - offsets[to][i].1,
                );
                i += 1;
            }
            d += 1;
        }
        from += 1;
    }
    table
}

static JLSTZ_KICKS: KickTable = build_kicks(&JLSTZ_OFFSETS);
static I_KICKS: KickTable = build_kicks(&I_OFFSETS);
static O_KICKS: KickTable = build_kicks(&O_OFFSETS);

/// 180 turns, SRS+ style. JLSTZ get six tests; the first is the plain turn.
type HalfTable = [[(i8, i8); 6]; 4];

static JLSTZ_HALF_KICKS: HalfTable = [
    [(0, 0), (0, 1), (1, 1), (-1, 1), (1, 0), (-1, 0)],
    [(0, 0), (1, 0), (1, 2), (1, 1), (0, 2), (0, 1)],
    [(0, 0), (0, -1), (-1, -1), (1, -1), (-1, 0), (1, 0)],
    [(0, 0), (-1, 0), (-1, 2), (-1, 1), (0, 2), (0, 1)],
];

/// I and O only get the plain turn, taken from their offset tables.
const fn build_half_plain(offsets: &Offsets) -> HalfTable {
    let mut table = [[(0i8, 0i8); 6]; 4];
    let mut from = 0;
    while from < 4 {
        let to = (from + 2) % 4;
        table[from][0] = (
            offsets[from][0].0 - offsets[to][0].0,
            offsets[from][0].1 - offsets[to][0].1,
        );
        from += 1;
    }
    table
}

static I_HALF_KICKS: HalfTable = build_half_plain(&I_OFFSETS);
static O_HALF_KICKS: HalfTable = build_half_plain(&O_OFFSETS);

/// Ordered kick tests for turning `piece` one step in `direction` from `from`.
pub fn kicks_for(piece: Piece, from: Rotation, direction: Direction) -> &'static [(i8, i8)] {
    let d = match direction {
        Direction::Right => 0,
        Direction::Left => 1,
        Direction::Half => {
            return match piece {
                Piece::I => &I_HALF_KICKS[from.index()][..1],
                Piece::O => &O_HALF_KICKS[from.index()][..1],
                _ => &JLSTZ_HALF_KICKS[from.index()],
            };
        }
    };
    match piece {
        Piece::I => &I_KICKS[from.index()][d],
        Piece::O => &O_KICKS[from.index()][d][..1],
        _ => &JLSTZ_KICKS[from.index()][d],
    }
}

/// Get kick offsets for a rotation transition.
/// Returns slice of (dx, dy) offsets to try in order; empty when `to == from`.
pub fn get_kicks(piece: Piece, from: Rotation, to: Rotation) -> &'static [(i8, i8)] {
    match Direction::ALL.into_iter().find(|d| d.apply(from) == to) {
        Some(direction) => kicks_for(piece, from, direction),
        None => &[],
    }
}

/// Successful rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kick {
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    pub offset: (i8, i8),
    /// Position of `offset` in the test order; 0 is the plain turn for JLSTZ.
    pub index: usize,
}

impl Kick {
    /// The last test of a quarter turn, the one that lifts a T-spin triple
    /// from mini to full.
    pub const LAST_QUARTER_TEST: usize = 4;
}

/// Turn the piece at `(x, y)` and return the first kick test that fits.
///
/// Each test is bounds-checked before touching the field.
pub fn resolve_rotation(
    field: &Field,
    piece: Piece,
    from: Rotation,
    direction: Direction,
    x: i32,
    y: i32,
) -> Option<Kick> {
    let to = direction.apply(from);
    let mino = piece.mino(to);
    let min_x = -mino.min_x();
    let max_x = FIELD_WIDTH - mino.max_x();
    let min_y = -mino.min_y();
    kicks_for(piece, from, direction)
        .iter()
        .enumerate()
        .find_map(|(index, &(dx, dy))| {
            let tx = x + dx as i32;
            let ty = y + dy as i32;
            let in_bounds = min_x <= tx && tx < max_x && min_y <= ty;
            (in_bounds && field.can_put(mino, tx, ty)).then_some(Kick {
                rotation: to,
                x: tx,
                y: ty,
                offset: (dx, dy),
                index,
            })
        })
}
