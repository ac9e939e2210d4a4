//! field representation - 10 columns packed row-major into 6-row u64 boards
//! bit `x + y*10` of board `i` is cell (x, 6i + y)

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::piece::Mino;
use crate::snapshot::FieldSnapshot;
use crate::ParseError;

pub const FIELD_WIDTH: i32 = 10;
/// Rows held by one board word.
pub const BOARD_HEIGHT: i32 = 6;
pub const MAX_FIELD_HEIGHT: i32 = 24;
/// The 60 cells of one board.
pub const VALID_BOARD_RANGE: u64 = 0x0fff_ffff_ffff_ffff;

const ROW_MASK: u64 = 0x3ff;

const fn repeat_rows(row: u64) -> u64 {
    let mut mask = 0u64;
    let mut y = 0;
    while y < BOARD_HEIGHT {
        mask |= row << (y * FIELD_WIDTH);
        y += 1;
    }
    mask
}

/// Column 0 of every row.
const ROW_START: u64 = repeat_rows(1);

const COLUMN_MASKS: [u64; 10] = {
    let mut masks = [0u64; 10];
    let mut x = 0;
    while x < 10 {
        masks[x] = repeat_rows(1 << x);
        x += 1;
    }
    masks
};

/// Cells of the lowest `rows` rows of one board.
#[inline]
fn rows_mask(rows: i32) -> u64 {
    match rows {
        i32::MIN..=0 => 0,
        r if r >= BOARD_HEIGHT => VALID_BOARD_RANGE,
        _ => (1u64 << (rows * FIELD_WIDTH)) - 1,
    }
}

/// Column 0 bit of each full row in `board`.
#[inline]
fn full_rows(board: u64) -> u64 {
    let mut m = board;
    m &= m >> 1;
    m &= m >> 2;
    m &= m >> 4;
    m &= m >> 2;
    m & ROW_START
}

#[inline]
fn assert_cell(x: i32, y: i32, height: i32) {
    assert!(
        (0..FIELD_WIDTH).contains(&x) && (0..height).contains(&y),
        "cell ({x}, {y}) outside a field of height {height}"
    );
}

/// Bitboard of `N` board words, `6 * N` rows tall.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BitField<const N: usize> {
    boards: [u64; N],
}

/// Up to 6 rows.
pub type SmallField = BitField<1>;
/// Up to 12 rows.
pub type MiddleField = BitField<2>;
/// Up to 24 rows.
pub type LargeField = BitField<4>;

impl<const N: usize> Default for BitField<N> {
    fn default() -> Self {
        Self { boards: [0; N] }
    }
}

impl<const N: usize> BitField<N> {
    pub const MAX_HEIGHT: i32 = N as i32 * BOARD_HEIGHT;

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw words. Bits outside the 60-cell range are a contract violation.
    pub fn from_boards(boards: [u64; N]) -> Self {
        assert!(
            boards.iter().all(|b| b & !VALID_BOARD_RANGE == 0),
            "board word has bits outside the field"
        );
        Self { boards }
    }

    #[inline]
    pub fn boards(&self) -> &[u64; N] {
        &self.boards
    }

    #[inline]
    pub fn board(&self, index: usize) -> u64 {
        assert!(index < N, "board {index} out of {N}");
        self.boards[index]
    }

    #[inline]
    fn row(&self, y: i32) -> u64 {
        let i = (y / BOARD_HEIGHT) as usize;
        (self.boards[i] >> ((y % BOARD_HEIGHT) * FIELD_WIDTH)) & ROW_MASK
    }

    /// Occupancy bits of row `y`, column x at bit x.
    pub fn row_bits(&self, y: i32) -> u16 {
        assert_cell(0, y, Self::MAX_HEIGHT);
        self.row(y) as u16
    }

    pub fn set_block(&mut self, x: i32, y: i32) {
        assert_cell(x, y, Self::MAX_HEIGHT);
        self.boards[(y / BOARD_HEIGHT) as usize] |= 1u64 << (x + (y % BOARD_HEIGHT) * FIELD_WIDTH);
    }

    pub fn remove_block(&mut self, x: i32, y: i32) {
        assert_cell(x, y, Self::MAX_HEIGHT);
        self.boards[(y / BOARD_HEIGHT) as usize] &=
            !(1u64 << (x + (y % BOARD_HEIGHT) * FIELD_WIDTH));
    }

    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        assert_cell(x, y, Self::MAX_HEIGHT);
        self.boards[(y / BOARD_HEIGHT) as usize] & (1u64 << (x + (y % BOARD_HEIGHT) * FIELD_WIDTH))
            == 0
    }

    /// Boards overlapping rows `[y + min_y, y + max_y]`.
    #[inline]
    fn span(mino: &Mino, x: i32, y: i32) -> Range<usize> {
        let bottom = y + mino.min_y();
        assert!(
            bottom >= 0 && x + mino.min_x() >= 0 && x + mino.max_x() < FIELD_WIDTH,
            "{:?} {:?} at ({x}, {y}) leaves the field",
            mino.piece,
            mino.rotation
        );
        let lo = (bottom / BOARD_HEIGHT) as usize;
        let hi = ((y + mino.max_y()) / BOARD_HEIGHT) as usize + 1;
        lo..hi.min(N)
    }

    /// Place a piece. Every cell must lie inside the field.
    pub fn put(&mut self, mino: &Mino, x: i32, y: i32) {
        assert!(y + mino.max_y() < Self::MAX_HEIGHT, "piece top above the field");
        for i in Self::span(mino, x, y) {
            self.boards[i] |= mino.mask(x, y - i as i32 * BOARD_HEIGHT);
        }
    }

    pub fn remove(&mut self, mino: &Mino, x: i32, y: i32) {
        assert!(y + mino.max_y() < Self::MAX_HEIGHT, "piece top above the field");
        for i in Self::span(mino, x, y) {
            self.boards[i] &= !mino.mask(x, y - i as i32 * BOARD_HEIGHT);
        }
    }

    /// No overlap with the piece. Cells above the field count as open sky.
    #[inline]
    pub fn can_put(&self, mino: &Mino, x: i32, y: i32) -> bool {
        Self::span(mino, x, y)
            .all(|i| self.boards[i] & mino.mask(x, y - i as i32 * BOARD_HEIGHT) == 0)
    }

    /// Resting on the floor or on a block.
    pub fn is_on_ground(&self, mino: &Mino, x: i32, y: i32) -> bool {
        y <= -mino.min_y() || !self.can_put(mino, x, y - 1)
    }

    pub fn is_perfect(&self) -> bool {
        self.boards.iter().all(|&b| b == 0)
    }

    /// Any block at row `y` or above.
    pub fn exists_above(&self, y: i32) -> bool {
        let y = y.max(0);
        self.boards.iter().enumerate().any(|(i, &b)| {
            let local = y - i as i32 * BOARD_HEIGHT;
            local < BOARD_HEIGHT && b & !rows_mask(local) != 0
        })
    }

    /// Column mask of rows below `max_y`, per board.
    #[inline]
    fn column_below(x: i32, max_y: i32, i: usize) -> u64 {
        COLUMN_MASKS[x as usize] & rows_mask(max_y - i as i32 * BOARD_HEIGHT)
    }

    /// Every row below `max_y` has column `x` filled.
    pub fn is_filled_in_column(&self, x: i32, max_y: i32) -> bool {
        assert!((0..FIELD_WIDTH).contains(&x));
        self.boards.iter().enumerate().all(|(i, &b)| {
            let mask = Self::column_below(x, max_y, i);
            b & mask == mask
        })
    }

    /// No row below `max_y` is open in both column `x - 1` and column `x`,
    /// so nothing can pass between the two sides.
    pub fn is_wall_between_left(&self, x: i32, max_y: i32) -> bool {
        assert!((1..FIELD_WIDTH).contains(&x));
        self.boards.iter().enumerate().all(|(i, &b)| {
            let open = !b;
            let right = open & Self::column_below(x, max_y, i);
            let left = open & Self::column_below(x - 1, max_y, i);
            (left << 1) & right == 0
        })
    }

    pub fn get_block_count_below_on_x(&self, x: i32, max_y: i32) -> u32 {
        assert!((0..FIELD_WIDTH).contains(&x));
        self.boards
            .iter()
            .enumerate()
            .map(|(i, &b)| (b & Self::column_below(x, max_y, i)).count_ones())
            .sum()
    }

    pub fn get_block_count_on_y(&self, y: i32) -> u32 {
        assert_cell(0, y, Self::MAX_HEIGHT);
        self.row(y).count_ones()
    }

    pub fn get_num_of_all_blocks(&self) -> u32 {
        self.boards.iter().map(|b| b.count_ones()).sum()
    }

    /// Anchor row a piece dropped from `start_y` comes to rest on.
    pub fn get_y_on_harddrop(&self, mino: &Mino, x: i32, start_y: i32) -> i32 {
        let floor = -mino.min_y();
        let mut y = start_y - 1;
        while y >= floor {
            if !self.can_put(mino, x, y) {
                return y + 1;
            }
            y -= 1;
        }
        floor
    }

    /// Nothing blocks a straight drop from the top of the field down to `y`.
    pub fn can_reach_on_harddrop(&self, mino: &Mino, x: i32, y: i32) -> bool {
        let ceiling = Self::MAX_HEIGHT - mino.max_y();
        (y + 1..ceiling).all(|yy| self.can_put(mino, x, yy))
    }

    pub fn fill_line(&mut self, y: i32) {
        assert_cell(0, y, Self::MAX_HEIGHT);
        self.boards[(y / BOARD_HEIGHT) as usize] |= ROW_MASK << ((y % BOARD_HEIGHT) * FIELD_WIDTH);
    }

    /// Remove every full row and drop the rows above. Returns the removed rows as a key.
    pub fn clear_line_return_key(&mut self) -> u64 {
        let mut key = 0u64;
        let mut out = [0u64; N];
        let mut dst = 0i32;
        for i in 0..N {
            let board = self.boards[i];
            let full = full_rows(board);
            let base = i as i32 * BOARD_HEIGHT;
            if full == 0 && dst == base {
                out[i] = board;
                dst += BOARD_HEIGHT;
                continue;
            }
            for y in 0..BOARD_HEIGHT {
                if full & (1u64 << (y * FIELD_WIDTH)) != 0 {
                    key |= 1u64 << (base + y);
                    continue;
                }
                let row = (board >> (y * FIELD_WIDTH)) & ROW_MASK;
                out[(dst / BOARD_HEIGHT) as usize] |= row << ((dst % BOARD_HEIGHT) * FIELD_WIDTH);
                dst += 1;
            }
        }
        self.boards = out;
        key
    }

    /// Number of rows removed.
    pub fn clear_line(&mut self) -> u32 {
        self.clear_line_return_key().count_ones()
    }

    fn insert_line_with_key(&mut self, key: u64, line: u64) {
        if key == 0 {
            return;
        }
        assert!(
            key >> Self::MAX_HEIGHT == 0,
            "line key {key:#x} exceeds {} rows",
            Self::MAX_HEIGHT
        );
        let mut out = [0u64; N];
        let mut src = 0i32;
        for y in 0..Self::MAX_HEIGHT {
            let row = if key & (1u64 << y) != 0 {
                line
            } else {
                let row = self.row(src);
                src += 1;
                row
            };
            out[(y / BOARD_HEIGHT) as usize] |= row << ((y % BOARD_HEIGHT) * FIELD_WIDTH);
        }
        self.boards = out;
    }

    /// Put back full rows at the positions in `key`; inverse of `clear_line_return_key`.
    pub fn insert_filled_line_with_key(&mut self, key: u64) {
        self.insert_line_with_key(key, ROW_MASK);
    }

    /// Open empty rows at the positions in `key`, lifting the rows above.
    pub fn insert_blank_line_with_key(&mut self, key: u64) {
        self.insert_line_with_key(key, 0);
    }

    #[inline]
    fn assert_fits<const M: usize>(other: &BitField<M>) {
        assert!(
            M <= N || other.boards[N..].iter().all(|&b| b == 0),
            "{M}-board field does not fit in {N} boards"
        );
    }

    pub fn merge<const M: usize>(&mut self, other: &BitField<M>) {
        Self::assert_fits(other);
        for (b, o) in self.boards.iter_mut().zip(other.boards.iter()) {
            *b |= o;
        }
    }

    pub fn reduce<const M: usize>(&mut self, other: &BitField<M>) {
        Self::assert_fits(other);
        for (b, o) in self.boards.iter_mut().zip(other.boards.iter()) {
            *b &= !o;
        }
    }

    pub fn can_merge<const M: usize>(&self, other: &BitField<M>) -> bool {
        Self::assert_fits(other);
        self.boards
            .iter()
            .zip(other.boards.iter())
            .all(|(b, o)| b & o == 0)
    }

    /// Every block of `child` is also a block here.
    pub fn contains<const M: usize>(&self, child: &BitField<M>) -> bool {
        Self::assert_fits(child);
        self.boards
            .iter()
            .zip(child.boards.iter())
            .all(|(b, c)| b & c == *c)
    }

    /// Copy into `M` boards. Rows above the new capacity are dropped.
    pub fn resize<const M: usize>(&self) -> BitField<M> {
        let mut boards = [0u64; M];
        for (dst, src) in boards.iter_mut().zip(self.boards.iter()) {
            *dst = *src;
        }
        BitField { boards }
    }

    /// Shift every block `n` columns left; blocks pushed past column 0 vanish.
    pub fn slide_left(&mut self, n: i32) {
        assert!((0..=FIELD_WIDTH).contains(&n));
        let keep = repeat_rows(ROW_MASK >> n);
        for b in &mut self.boards {
            *b = (*b >> n) & keep;
        }
    }

    /// Shift every block `n` columns right; blocks pushed past column 9 vanish.
    pub fn slide_right(&mut self, n: i32) {
        assert!((0..=FIELD_WIDTH).contains(&n));
        let keep = repeat_rows((ROW_MASK << n) & ROW_MASK);
        for b in &mut self.boards {
            *b = (*b << n) & keep;
        }
    }

    /// Drop the bottom row and lower everything above by one.
    pub fn slide_down(&mut self) {
        for i in 0..N {
            let above = if i + 1 < N {
                self.boards[i + 1] & ROW_MASK
            } else {
                0
            };
            self.boards[i] = (self.boards[i] >> FIELD_WIDTH)
                | (above << ((BOARD_HEIGHT - 1) * FIELD_WIDTH));
        }
    }

    /// Swap blocks and holes.
    pub fn inverse(&mut self) {
        for b in &mut self.boards {
            *b = !*b & VALID_BOARD_RANGE;
        }
    }
}

macro_rules! dispatch {
    ($field:expr, $f:ident => $body:expr) => {
        match $field {
            Field::Small($f) => $body,
            Field::Middle($f) => $body,
            Field::Large($f) => $body,
        }
    };
}

/// A field of one of the three board-count tiers.
///
/// Equality, ordering and hashing compare the board words zero-padded to four
/// words, so equal cells compare equal across tiers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(into = "FieldSnapshot", try_from = "FieldSnapshot")]
pub enum Field {
    Small(SmallField),
    Middle(MiddleField),
    Large(LargeField),
}

impl Field {
    /// Smallest tier holding `max_height` rows.
    pub fn new(max_height: i32) -> Self {
        match max_height {
            1..=6 => Field::Small(SmallField::new()),
            7..=12 => Field::Middle(MiddleField::new()),
            13..=MAX_FIELD_HEIGHT => Field::Large(LargeField::new()),
            _ => panic!("field height {max_height} is outside 1..=24"),
        }
    }

    /// Build from 1, 2 or 4 raw board words.
    pub fn from_boards(boards: &[u64]) -> Self {
        match *boards {
            [a] => Field::Small(BitField::from_boards([a])),
            [a, b] => Field::Middle(BitField::from_boards([a, b])),
            [a, b, c, d] => Field::Large(BitField::from_boards([a, b, c, d])),
            _ => panic!("{} boards do not form a field", boards.len()),
        }
    }

    /// Parse rows drawn top to bottom, `X`/`#` for blocks and `_`/`.` for holes.
    ///
    /// The last line is row 0. Blank lines are skipped.
    pub fn from_ascii(art: &str, max_height: i32) -> Result<Self, ParseError> {
        if !(1..=MAX_FIELD_HEIGHT).contains(&max_height) {
            return Err(ParseError::Height(max_height));
        }
        let rows: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if rows.len() > max_height as usize {
            return Err(ParseError::TooTall {
                rows: rows.len(),
                max_height,
            });
        }
        let mut field = Field::new(max_height);
        for (i, line) in rows.iter().rev().enumerate() {
            let width = line.chars().count();
            if width != FIELD_WIDTH as usize {
                return Err(ParseError::RowWidth { row: i, width });
            }
            for (x, c) in line.chars().enumerate() {
                match c {
                    'X' | '#' => field.set_block(x as i32, i as i32),
                    '_' | '.' => {}
                    other => return Err(ParseError::UnexpectedCell(other)),
                }
            }
        }
        Ok(field)
    }

    pub fn boards(&self) -> &[u64] {
        dispatch!(self, f => f.boards().as_slice())
    }

    pub fn board_count(&self) -> usize {
        self.boards().len()
    }

    pub fn board(&self, index: usize) -> u64 {
        dispatch!(self, f => f.board(index))
    }

    /// Rows this tier can hold.
    pub fn max_field_height(&self) -> i32 {
        self.board_count() as i32 * BOARD_HEIGHT
    }

    /// Board words zero-padded to the largest tier.
    pub fn padded(&self) -> [u64; 4] {
        let mut out = [0u64; 4];
        out[..self.board_count()].copy_from_slice(self.boards());
        out
    }

    pub fn row_bits(&self, y: i32) -> u16 {
        dispatch!(self, f => f.row_bits(y))
    }

    pub fn set_block(&mut self, x: i32, y: i32) {
        dispatch!(self, f => f.set_block(x, y))
    }

    pub fn remove_block(&mut self, x: i32, y: i32) {
        dispatch!(self, f => f.remove_block(x, y))
    }

    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        dispatch!(self, f => f.is_empty(x, y))
    }

    #[inline]
    pub fn put(&mut self, mino: &Mino, x: i32, y: i32) {
        dispatch!(self, f => f.put(mino, x, y))
    }

    #[inline]
    pub fn remove(&mut self, mino: &Mino, x: i32, y: i32) {
        dispatch!(self, f => f.remove(mino, x, y))
    }

    #[inline]
    pub fn can_put(&self, mino: &Mino, x: i32, y: i32) -> bool {
        dispatch!(self, f => f.can_put(mino, x, y))
    }

    #[inline]
    pub fn is_on_ground(&self, mino: &Mino, x: i32, y: i32) -> bool {
        dispatch!(self, f => f.is_on_ground(mino, x, y))
    }

    pub fn is_perfect(&self) -> bool {
        dispatch!(self, f => f.is_perfect())
    }

    pub fn exists_above(&self, y: i32) -> bool {
        dispatch!(self, f => f.exists_above(y))
    }

    pub fn is_filled_in_column(&self, x: i32, max_y: i32) -> bool {
        dispatch!(self, f => f.is_filled_in_column(x, max_y))
    }

    pub fn is_wall_between_left(&self, x: i32, max_y: i32) -> bool {
        dispatch!(self, f => f.is_wall_between_left(x, max_y))
    }

    pub fn get_block_count_below_on_x(&self, x: i32, max_y: i32) -> u32 {
        dispatch!(self, f => f.get_block_count_below_on_x(x, max_y))
    }

    pub fn get_block_count_on_y(&self, y: i32) -> u32 {
        dispatch!(self, f => f.get_block_count_on_y(y))
    }

    pub fn get_num_of_all_blocks(&self) -> u32 {
        dispatch!(self, f => f.get_num_of_all_blocks())
    }

    #[inline]
    pub fn get_y_on_harddrop(&self, mino: &Mino, x: i32, start_y: i32) -> i32 {
        dispatch!(self, f => f.get_y_on_harddrop(mino, x, start_y))
    }

    #[inline]
    pub fn can_reach_on_harddrop(&self, mino: &Mino, x: i32, y: i32) -> bool {
        dispatch!(self, f => f.can_reach_on_harddrop(mino, x, y))
    }

    pub fn fill_line(&mut self, y: i32) {
        dispatch!(self, f => f.fill_line(y))
    }

    pub fn clear_line_return_key(&mut self) -> u64 {
        dispatch!(self, f => f.clear_line_return_key())
    }

    pub fn clear_line(&mut self) -> u32 {
        dispatch!(self, f => f.clear_line())
    }

    pub fn insert_filled_line_with_key(&mut self, key: u64) {
        dispatch!(self, f => f.insert_filled_line_with_key(key))
    }

    pub fn insert_blank_line_with_key(&mut self, key: u64) {
        dispatch!(self, f => f.insert_blank_line_with_key(key))
    }

    pub fn merge(&mut self, other: &Field) {
        dispatch!(other, o => dispatch!(self, f => f.merge(o)))
    }

    pub fn reduce(&mut self, other: &Field) {
        dispatch!(other, o => dispatch!(self, f => f.reduce(o)))
    }

    pub fn can_merge(&self, other: &Field) -> bool {
        dispatch!(other, o => dispatch!(self, f => f.can_merge(o)))
    }

    pub fn contains(&self, child: &Field) -> bool {
        dispatch!(child, c => dispatch!(self, f => f.contains(c)))
    }

    /// Smallest tier covering `max_height`; rows above it are dropped.
    pub fn freeze(&self, max_height: i32) -> Field {
        match Field::new(max_height) {
            Field::Small(_) => Field::Small(dispatch!(self, f => f.resize::<1>())),
            Field::Middle(_) => Field::Middle(dispatch!(self, f => f.resize::<2>())),
            Field::Large(_) => Field::Large(dispatch!(self, f => f.resize::<4>())),
        }
    }

    pub fn slide_left(&mut self, n: i32) {
        dispatch!(self, f => f.slide_left(n))
    }

    pub fn slide_right(&mut self, n: i32) {
        dispatch!(self, f => f.slide_right(n))
    }

    pub fn slide_down(&mut self) {
        dispatch!(self, f => f.slide_down())
    }

    pub fn inverse(&mut self) {
        dispatch!(self, f => f.inverse())
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.padded() == other.padded()
    }
}

impl Eq for Field {}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        self.padded().cmp(&other.padded())
    }
}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.padded().hash(state);
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.max_field_height()).rev() {
            let row = self.row_bits(y);
            for x in 0..FIELD_WIDTH {
                write!(f, "{}", if row >> x & 1 == 1 { 'X' } else { '_' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
