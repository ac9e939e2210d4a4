//! Single-step piece movement on a field, with spin detection.

use crate::kicks::{resolve_rotation, Direction, Kick};
use finder_core::{Field, Piece, Rotation, SpinType, FIELD_WIDTH};

/// Result of a rotation attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationResult {
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    /// Spin the piece would lock with if it stayed here.
    pub spin_type: SpinType,
    pub kick_index: usize,
}

/// Try to rotate a piece one step, applying kicks if necessary.
/// Returns None if no kick test fits.
#[inline]
pub fn try_rotate(
    field: &Field,
    piece: Piece,
    rotation: Rotation,
    x: i32,
    y: i32,
    direction: Direction,
) -> Option<RotationResult> {
    let kick = resolve_rotation(field, piece, rotation, direction, x, y)?;
    let spin_type =
        detect_tspin(field, piece, kick.rotation, kick.x, kick.y, direction, kick.index);
    Some(RotationResult {
        rotation: kick.rotation,
        x: kick.x,
        y: kick.y,
        spin_type,
        kick_index: kick.index,
    })
}

/// Three-corner T-spin rule.
///
/// Walls and the floor count as filled corners. Both front corners filled
/// makes a full spin; otherwise the last quarter-turn kick still does.
pub fn detect_tspin(
    field: &Field,
    piece: Piece,
    rotation: Rotation,
    x: i32,
    y: i32,
    direction: Direction,
    kick_index: usize,
) -> SpinType {
    if piece != Piece::T {
        return SpinType::None;
    }

    let filled = |cx: i32, cy: i32| {
        if cx < 0 || cx >= FIELD_WIDTH || cy < 0 {
            return true;
        }
        cy < field.max_field_height() && !field.is_empty(cx, cy)
    };
    // top-left, top-right, bottom-left, bottom-right
    let corners = [
        filled(x - 1, y + 1),
        filled(x + 1, y + 1),
        filled(x - 1, y - 1),
        filled(x + 1, y - 1),
    ];
    if corners.iter().filter(|&&c| c).count() < 3 {
        return SpinType::None;
    }

    let front = match rotation {
        Rotation::North => [0, 1],
        Rotation::East => [1, 3],
        Rotation::South => [2, 3],
        Rotation::West => [0, 2],
    };
    let tst_kick = direction != Direction::Half && kick_index == Kick::LAST_QUARTER_TEST;
    if front.iter().all(|&i| corners[i]) || tst_kick {
        SpinType::Full
    } else {
        SpinType::Mini
    }
}

/// Try to move piece horizontally
#[inline]
pub fn try_move(
    field: &Field,
    piece: Piece,
    rotation: Rotation,
    x: i32,
    y: i32,
    dx: i32,
) -> Option<i32> {
    let mino = piece.mino(rotation);
    let new_x = x + dx;
    let in_bounds = new_x + mino.min_x() >= 0 && new_x + mino.max_x() < FIELD_WIDTH;
    (in_bounds && field.can_put(mino, new_x, y)).then_some(new_x)
}

/// Try to move piece down one row
#[inline]
pub fn try_drop(field: &Field, piece: Piece, rotation: Rotation, x: i32, y: i32) -> Option<i32> {
    let mino = piece.mino(rotation);
    let new_y = y - 1;
    (new_y + mino.min_y() >= 0 && field.can_put(mino, x, new_y)).then_some(new_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_stops_at_walls() {
        let field = Field::new(6);
        assert_eq!(try_move(&field, Piece::T, Rotation::North, 1, 0, -1), None);
        assert_eq!(try_move(&field, Piece::T, Rotation::North, 1, 0, 1), Some(2));
        assert_eq!(try_move(&field, Piece::I, Rotation::North, 7, 0, 1), None);
    }

    #[test]
    fn test_move_blocked_by_stack() {
        let mut field = Field::new(6);
        field.set_block(6, 0);
        assert_eq!(try_move(&field, Piece::T, Rotation::North, 4, 0, 1), None);
    }

    #[test]
    fn test_rotation_reports_kick_and_spin() {
        // T-spin triple well: the last kick test drops the T two rows
        let field = Field::from_ascii(
            "
            __X_______
            XX___XXXXX
            XX_XXXXXXX
            XX__XXXXXX
            XX_XXXXXXX
            ",
            6,
        )
        .unwrap();
        let result = try_rotate(&field, Piece::T, Rotation::North, 3, 3, Direction::Right).unwrap();
        assert_eq!((result.rotation, result.x, result.y), (Rotation::East, 2, 1));
        assert_eq!(result.kick_index, 4);
        assert_eq!(result.spin_type, SpinType::Full);

        // out in the open there is nothing to spin against
        let open = Field::new(6);
        let result = try_rotate(&open, Piece::T, Rotation::North, 4, 2, Direction::Right).unwrap();
        assert_eq!(result.spin_type, SpinType::None);
    }

    #[test]
    fn test_tspin_corner_rule() {
        // T pointing up at (4, 1): front corners are (3, 2) and (5, 2)
        let mut mini = Field::new(4);
        mini.set_block(3, 2);
        mini.set_block(3, 0);
        mini.set_block(5, 0);
        let detect = |field: &Field, index| {
            detect_tspin(field, Piece::T, Rotation::North, 4, 1, Direction::Left, index)
        };
        assert_eq!(detect(&mini, 0), SpinType::Mini);
        assert_eq!(detect(&mini, 4), SpinType::Full);

        let mut full = Field::new(4);
        full.set_block(3, 2);
        full.set_block(5, 2);
        full.set_block(3, 0);
        assert_eq!(detect(&full, 0), SpinType::Full);

        let mut two = Field::new(4);
        two.set_block(3, 2);
        two.set_block(5, 2);
        assert_eq!(detect(&two, 0), SpinType::None);

        // only T spins
        assert_eq!(
            detect_tspin(&full, Piece::S, Rotation::North, 4, 1, Direction::Left, 0),
            SpinType::None
        );
    }

    #[test]
    fn test_floor_and_wall_count_as_corners() {
        // T pointing right against the left wall
        let mut wall = Field::new(4);
        wall.set_block(1, 2);
        wall.set_block(1, 0);
        assert_eq!(
            detect_tspin(&wall, Piece::T, Rotation::East, 0, 1, Direction::Right, 0),
            SpinType::Full
        );
        // flat T on the floor with one front corner filled
        let mut floor = Field::new(4);
        floor.set_block(3, 1);
        assert_eq!(
            detect_tspin(&floor, Piece::T, Rotation::North, 4, 0, Direction::Right, 0),
            SpinType::Mini
        );
        // half turns never take the triple upgrade
        let mut side = Field::new(4);
        side.set_block(3, 2);
        side.set_block(3, 0);
        side.set_block(5, 0);
        assert_eq!(
            detect_tspin(&side, Piece::T, Rotation::North, 4, 1, Direction::Half, 4),
            SpinType::Mini
        );
    }

    #[test]
    fn test_drop_stops_at_floor() {
        let field = Field::new(6);
        assert_eq!(try_drop(&field, Piece::T, Rotation::North, 4, 1), Some(0));
        assert_eq!(try_drop(&field, Piece::T, Rotation::North, 4, 0), None);
        assert_eq!(try_drop(&field, Piece::T, Rotation::East, 4, 1), None);
    }
}
