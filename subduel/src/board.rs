//! Geometry of the 5x5 game board: coordinates, bounds checks, neighbor
//! enumeration and cardinal direction arithmetic.
//!
//! Everything in this module is a pure function over value types. Occupancy
//! and legality live in [`fleet`][crate::fleet] and the flow machines.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cells along each edge of the board.
pub const BOARD_SIZE: usize = 5;

/// Longest distance a submarine may move in one action.
pub const MAX_MOVE_DISTANCE: u8 = 2;

/// Check whether the 1-indexed pair `(x, y)` lies on the board.
pub fn in_board(x: usize, y: usize) -> bool {
    (1..=BOARD_SIZE).contains(&x) && (1..=BOARD_SIZE).contains(&y)
}

/// The coordinates of a single board cell. Both axes are 1-indexed, so the
/// corners of the board are `(1, 1)` and `(BOARD_SIZE, BOARD_SIZE)`.
///
/// Serializes as `{"x": .., "y": ..}`, the form the action endpoint expects
/// for attack targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal position of the cell.
    pub x: usize,
    /// Vertical position of the cell.
    pub y: usize,
}

impl Coordinate {
    /// Construct a [`Coordinate`] from the given `x` and `y`.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Check whether this coordinate lies on the board.
    pub fn in_board(&self) -> bool {
        in_board(self.x, self.y)
    }

    /// Offset this coordinate by `(dx, dy)`, returning `None` if the result
    /// leaves the board. Offsets that would wrap below 1 are out of bounds,
    /// not wrapped.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Coordinate> {
        let x = add_offset(self.x, dx)?;
        let y = add_offset(self.y, dy)?;
        if in_board(x, y) {
            Some(Coordinate { x, y })
        } else {
            None
        }
    }

    /// Step `dist` cells along `dir`, returning `None` if the result leaves
    /// the board.
    pub fn step(self, dir: Direction, dist: u8) -> Option<Coordinate> {
        let (dx, dy) = dir.offsets();
        self.offset(dx * dist as isize, dy * dist as isize)
    }

    /// The up-to-8 in-bounds cells at Chebyshev distance 1 from this cell.
    /// Never yields the cell itself.
    pub fn neighbors8(self) -> impl Iterator<Item = Coordinate> {
        const DELTAS: [(isize, isize); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        DELTAS.iter().filter_map(move |&(dx, dy)| self.offset(dx, dy))
    }
}

/// Apply a signed offset to a 1-indexed axis value without underflowing.
fn add_offset(value: usize, delta: isize) -> Option<usize> {
    if delta < 0 {
        value.checked_sub(delta.unsigned_abs())
    } else {
        value.checked_add(delta as usize)
    }
}

impl From<(usize, usize)> for Coordinate {
    /// Construct a [`Coordinate`] from the given `(x, y)` pair.
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction of a move. North points toward smaller `y`, south
/// toward larger `y`, east toward larger `x` and west toward smaller `x`.
///
/// Serializes as the lowercase direction name used on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All four directions, in the order candidate rays are walked.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit offsets `(dx, dy)` of one step along this direction.
    pub fn offsets(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Lowercase wire name of this direction.
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Reason a pair of cells does not decompose into a legal cardinal move.
///
/// Candidate computation only ever offers destinations on a cardinal ray at
/// distance 1 or 2, so hitting this error from a selected candidate means the
/// candidate set was computed wrong. It is a bug signal, not a user error.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum GeometryError {
    /// The cells differ on both axes.
    #[error("cells {from} and {to} do not share a row or column")]
    Diagonal { from: Coordinate, to: Coordinate },
    /// The cells are on a shared axis but the gap is not 1 or 2.
    #[error("cells {from} and {to} are {distance} apart; moves cover 1 or {MAX_MOVE_DISTANCE} cells")]
    DistanceOutOfRange {
        from: Coordinate,
        to: Coordinate,
        distance: usize,
    },
}

/// Decompose the displacement from `from` to `to` into the cardinal direction
/// and distance the action endpoint expects.
///
/// Fails with [`GeometryError`] for diagonal pairs and for distances outside
/// `1..=MAX_MOVE_DISTANCE` (including `from == to`).
pub fn direction_and_distance(
    from: Coordinate,
    to: Coordinate,
) -> Result<(Direction, u8), GeometryError> {
    let dx = to.x as isize - from.x as isize;
    let dy = to.y as isize - from.y as isize;

    if dx != 0 && dy != 0 {
        return Err(GeometryError::Diagonal { from, to });
    }

    let distance = dx.unsigned_abs() + dy.unsigned_abs();
    if distance < 1 || distance > MAX_MOVE_DISTANCE as usize {
        return Err(GeometryError::DistanceOutOfRange { from, to, distance });
    }

    let direction = if dx > 0 {
        Direction::East
    } else if dx < 0 {
        Direction::West
    } else if dy > 0 {
        Direction::South
    } else {
        Direction::North
    };

    Ok((direction, distance as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_of_center_cell() {
        let neighbors: Vec<_> = Coordinate::new(3, 3).neighbors8().collect();
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.iter().all(|c| c.in_board()));
        assert!(!neighbors.contains(&Coordinate::new(3, 3)));
    }

    #[test]
    fn neighbors_truncated_at_corner() {
        let neighbors: Vec<_> = Coordinate::new(1, 1).neighbors8().collect();
        assert_eq!(neighbors.len(), 3);
        for expected in &[(2, 1), (1, 2), (2, 2)] {
            assert!(neighbors.contains(&Coordinate::from(*expected)));
        }
    }

    #[test]
    fn neighbors_truncated_at_edge() {
        let neighbors: Vec<_> = Coordinate::new(1, 3).neighbors8().collect();
        assert_eq!(neighbors.len(), 5);
    }

    #[test]
    fn bounds_check() {
        assert!(in_board(1, 1));
        assert!(in_board(5, 5));
        assert!(!in_board(0, 3));
        assert!(!in_board(3, 6));
    }

    #[test]
    fn step_stops_at_board_edge() {
        let start = Coordinate::new(2, 1);
        assert_eq!(start.step(Direction::North, 1), None);
        assert_eq!(start.step(Direction::South, 2), Some(Coordinate::new(2, 3)));
        assert_eq!(start.step(Direction::West, 2), None);
    }

    #[test]
    fn decompose_two_north() {
        let (dir, dist) =
            direction_and_distance(Coordinate::new(3, 3), Coordinate::new(3, 1)).unwrap();
        assert_eq!(dir, Direction::North);
        assert_eq!(dist, 2);
    }

    #[test]
    fn decompose_one_east() {
        let (dir, dist) =
            direction_and_distance(Coordinate::new(3, 3), Coordinate::new(4, 3)).unwrap();
        assert_eq!(dir, Direction::East);
        assert_eq!(dist, 1);
    }

    #[test]
    fn diagonal_pair_is_an_error() {
        let err =
            direction_and_distance(Coordinate::new(3, 3), Coordinate::new(4, 4)).unwrap_err();
        assert!(matches!(err, GeometryError::Diagonal { .. }));
    }

    #[test]
    fn distance_out_of_range_is_an_error() {
        let err =
            direction_and_distance(Coordinate::new(1, 1), Coordinate::new(1, 4)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::DistanceOutOfRange { distance: 3, .. }
        ));
        // A zero-length "move" is equally out of range.
        let err =
            direction_and_distance(Coordinate::new(2, 2), Coordinate::new(2, 2)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::DistanceOutOfRange { distance: 0, .. }
        ));
    }

    #[test]
    fn direction_serializes_lowercase() {
        for (dir, name) in &[
            (Direction::North, "\"north\""),
            (Direction::South, "\"south\""),
            (Direction::East, "\"east\""),
            (Direction::West, "\"west\""),
        ] {
            assert_eq!(serde_json::to_string(dir).unwrap(), *name);
        }
    }
}
