//! Piece kinds, rotation states and the precomputed shape table.

use serde::{Deserialize, Serialize};

use crate::ParseError;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub enum Piece {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default, Serialize, Deserialize,
)]
pub enum Rotation {
    /// Spawn state.
    #[default]
    North,
    /// One right (clockwise) turn from spawn.
    East,
    South,
    /// One left turn from spawn.
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn cw(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub fn ccw(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

impl Piece {
    pub const ALL: [Piece; 7] = [
        Piece::I,
        Piece::O,
        Piece::T,
        Piece::S,
        Piece::Z,
        Piece::J,
        Piece::L,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_char(c: char) -> Result<Self, ParseError> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Piece::I),
            'O' => Ok(Piece::O),
            'T' => Ok(Piece::T),
            'S' => Ok(Piece::S),
            'Z' => Ok(Piece::Z),
            'J' => Ok(Piece::J),
            'L' => Ok(Piece::L),
            _ => Err(ParseError::UnknownPiece(c)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Piece::I => 'I',
            Piece::O => 'O',
            Piece::T => 'T',
            Piece::S => 'S',
            Piece::Z => 'Z',
            Piece::J => 'J',
            Piece::L => 'L',
        }
    }

    /// Parse a run of piece letters such as `"TIOSZJL"`. Whitespace is skipped.
    pub fn parse_sequence(s: &str) -> Result<Vec<Piece>, ParseError> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(Piece::from_char)
            .collect()
    }

    /// Shape record for this piece in `rot`.
    #[inline]
    pub fn mino(self, rot: Rotation) -> &'static Mino {
        &MINOS[self.index()][rot.index()]
    }

    /// Cell offsets relative to the rotation anchor.
    pub fn minos(self, rot: Rotation) -> [(i8, i8); 4] {
        self.mino(rot).cells
    }

    /// Rotations with pairwise distinct footprints.
    pub fn distinct_rotations(self) -> &'static [Rotation] {
        match self {
            Piece::O => &[Rotation::North],
            Piece::I | Piece::S | Piece::Z => &[Rotation::North, Rotation::East],
            _ => &Rotation::ALL,
        }
    }

    /// Map a placement to the rotation that owns its footprint.
    ///
    /// O is symmetric under every rotation, I/S/Z under a half turn. The
    /// anchor is moved so that the occupied cells stay exactly where they were.
    pub fn canonical_placement(self, rot: Rotation, x: i32, y: i32) -> (Rotation, i32, i32) {
        let target = match (self, rot) {
            (Piece::O, _) => Rotation::North,
            (Piece::I | Piece::S | Piece::Z, Rotation::South) => Rotation::North,
            (Piece::I | Piece::S | Piece::Z, Rotation::West) => Rotation::East,
            _ => rot,
        };
        if target == rot {
            return (rot, x, y);
        }
        let from = self.mino(rot);
        let to = self.mino(target);
        (
            target,
            x + from.min_x() - to.min_x(),
            y + from.min_y() - to.min_y(),
        )
    }

    /// Spawn column of the rotation anchor.
    pub fn spawn_x(self) -> i32 {
        4
    }
}

/// Immutable shape of one piece in one rotation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Mino {
    pub piece: Piece,
    pub rotation: Rotation,
    pub cells: [(i8, i8); 4],
    min_x: i8,
    max_x: i8,
    min_y: i8,
    max_y: i8,
    /// Cells packed with the bounding box's lower-left corner at bit 0.
    base_mask: u64,
}

impl Mino {
    #[inline]
    pub fn min_x(&self) -> i32 {
        self.min_x as i32
    }

    #[inline]
    pub fn max_x(&self) -> i32 {
        self.max_x as i32
    }

    #[inline]
    pub fn min_y(&self) -> i32 {
        self.min_y as i32
    }

    #[inline]
    pub fn max_y(&self) -> i32 {
        self.max_y as i32
    }

    /// Occupancy mask of the piece anchored at `(x, y)` inside one 6-row board.
    ///
    /// `y` is the anchor row relative to the board's lowest row. Cells that fall
    /// below row 0 or above row 5 of that board are dropped. `x` must keep the
    /// piece within the 10 columns.
    #[inline]
    pub fn mask(&self, x: i32, y: i32) -> u64 {
        let left = x + self.min_x();
        debug_assert!((0..10).contains(&left) && x + self.max_x() < 10);
        let bottom = y + self.min_y();
        if bottom >= 6 || bottom + 4 <= 0 {
            return 0;
        }
        let mask = if bottom >= 0 {
            self.base_mask << (bottom * 10)
        } else {
            self.base_mask >> (-bottom * 10)
        };
        (mask << left) & crate::field::VALID_BOARD_RANGE
    }
}

const fn spawn_cells(piece: Piece) -> [(i8, i8); 4] {
    match piece {
        Piece::I => [(0, 0), (-1, 0), (1, 0), (2, 0)],
        Piece::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        Piece::T => [(0, 0), (-1, 0), (1, 0), (0, 1)],
        Piece::S => [(0, 0), (-1, 0), (0, 1), (1, 1)],
        Piece::Z => [(0, 0), (1, 0), (0, 1), (-1, 1)],
        Piece::J => [(0, 0), (-1, 0), (1, 0), (-1, 1)],
        Piece::L => [(0, 0), (-1, 0), (1, 0), (1, 1)],
    }
}

const fn rotate_cell(cell: (i8, i8), rotation: Rotation) -> (i8, i8) {
    let (x, y) = cell;
    match rotation {
        Rotation::North => (x, y),
        Rotation::East => (y, -x),
        Rotation::South => (-x, -y),
        Rotation::West => (-y, x),
    }
}

const fn build_mino(piece: Piece, rotation: Rotation) -> Mino {
    let spawn = spawn_cells(piece);
    let mut cells = [(0i8, 0i8); 4];
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (i8::MAX, i8::MIN, i8::MAX, i8::MIN);
    let mut i = 0;
    while i < 4 {
        let c = rotate_cell(spawn[i], rotation);
        cells[i] = c;
        if c.0 < min_x {
            min_x = c.0;
        }
        if c.0 > max_x {
            max_x = c.0;
        }
        if c.1 < min_y {
            min_y = c.1;
        }
        if c.1 > max_y {
            max_y = c.1;
        }
        i += 1;
    }
    let mut base_mask = 0u64;
    let mut i = 0;
    while i < 4 {
        let bx = (cells[i].0 - min_x) as u32;
        let by = (cells[i].1 - min_y) as u32;
        base_mask |= 1u64 << (bx + by * 10);
        i += 1;
    }
    Mino {
        piece,
        rotation,
        cells,
        min_x,
        max_x,
        min_y,
        max_y,
        base_mask,
    }
}

const fn build_piece(piece: Piece) -> [Mino; 4] {
    [
        build_mino(piece, Rotation::North),
        build_mino(piece, Rotation::East),
        build_mino(piece, Rotation::South),
        build_mino(piece, Rotation::West),
    ]
}

static MINOS: [[Mino; 4]; 7] = [
    build_piece(Piece::I),
    build_piece(Piece::O),
    build_piece(Piece::T),
    build_piece(Piece::S),
    build_piece(Piece::Z),
    build_piece(Piece::J),
    build_piece(Piece::L),
];
