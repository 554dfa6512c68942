//! Sliding tile puzzles (8-puzzle, 15-puzzle, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Cost, Environment, Transition};
use crate::error::ValidationError;

fn default_puzzle_name() -> String {
    "puzzle".to_string()
}

/// Serializable puzzle description: tiles in row-major order, `0` is the blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleDefinition {
    #[serde(default = "default_puzzle_name")]
    pub name: String,
    pub tiles: Vec<u8>,
}

/// Direction the blank moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileMove {
    Up,
    Down,
    Left,
    Right,
}

impl TileMove {
    const ALL: [TileMove; 4] = [TileMove::Up, TileMove::Down, TileMove::Left, TileMove::Right];
}

impl fmt::Display for TileMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TileMove::Up => "up",
            TileMove::Down => "down",
            TileMove::Left => "left",
            TileMove::Right => "right",
        })
    }
}

/// n x n sliding puzzle. The goal is `1, 2, ..., n*n - 1, 0`.
///
/// Heuristic: sum of Manhattan distances of every tile to its goal cell.
#[derive(Debug, Clone)]
pub struct SlidingPuzzle {
    name: String,
    size: usize,
    start: Vec<u8>,
}

impl SlidingPuzzle {
    pub fn from_definition(definition: &PuzzleDefinition) -> Result<Self, ValidationError> {
        let puzzle = Self {
            name: definition.name.clone(),
            size: side_length(definition.tiles.len())?,
            start: definition.tiles.clone(),
        };
        puzzle.validate()?;
        Ok(puzzle)
    }

    /// The solved board of side `size` with `moves` applied to the blank.
    /// Moves that would leave the board are skipped.
    pub fn scrambled(
        name: &str,
        size: usize,
        moves: &[TileMove],
    ) -> Result<Self, ValidationError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&size) {
            return Err(ValidationError::new(
                "size",
                format!("side must be between {MIN_SIDE} and {MAX_SIDE}, got {size}"),
            ));
        }
        let mut tiles: Vec<u8> = (1..size * size)
            .map(|tile| tile as u8)
            .chain(std::iter::once(0))
            .collect();
        for &mv in moves {
            if let Some(next) = slide(&tiles, size, mv) {
                tiles = next;
            }
        }
        Ok(Self {
            name: name.to_string(),
            size,
            start: tiles,
        })
    }

    /// A 3x3 instance twelve blank moves away from the goal.
    pub fn eight_puzzle() -> Self {
        use TileMove::*;
        Self::scrambled(
            "8-puzzle",
            3,
            &[Up, Left, Up, Left, Down, Right, Down, Left, Up, Right, Right, Up],
        )
        .unwrap_or_else(|e| unreachable!("8-puzzle preset: {e}"))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[u8] {
        &self.start
    }
}

/// Tiles are `u8`, so a board holds at most 256 cells.
const MIN_SIDE: usize = 2;
const MAX_SIDE: usize = 16;

fn side_length(len: usize) -> Result<usize, ValidationError> {
    let side = (len as f64).sqrt().round() as usize;
    if len > MAX_SIDE * MAX_SIDE || side < MIN_SIDE || side * side != len {
        return Err(ValidationError::new(
            "tiles",
            format!("expected a square board from 2x2 to 16x16, got {len} tiles"),
        ));
    }
    Ok(side)
}

/// Moves the blank one cell, or `None` if that leaves the board.
fn slide(tiles: &[u8], size: usize, mv: TileMove) -> Option<Vec<u8>> {
    let blank = tiles.iter().position(|&t| t == 0)?;
    let (r, c) = (blank / size, blank % size);
    let target = match mv {
        TileMove::Up if r > 0 => blank - size,
        TileMove::Down if r + 1 < size => blank + size,
        TileMove::Left if c > 0 => blank - 1,
        TileMove::Right if c + 1 < size => blank + 1,
        _ => return None,
    };
    let mut next = tiles.to_vec();
    next.swap(blank, target);
    Some(next)
}

fn inversions(tiles: &[u8]) -> usize {
    let values: Vec<u8> = tiles.iter().copied().filter(|&t| t != 0).collect();
    let mut count = 0;
    for i in 0..values.len() {
        for j in i + 1..values.len() {
            if values[i] > values[j] {
                count += 1;
            }
        }
    }
    count
}

impl Environment for SlidingPuzzle {
    type State = Vec<u8>;
    type Action = TileMove;

    fn name(&self) -> &str {
        &self.name
    }

    fn initial_state(&self) -> Vec<u8> {
        self.start.clone()
    }

    fn is_goal(&self, state: &Vec<u8>) -> bool {
        let last = state.len() - 1;
        state[last] == 0 && state[..last].iter().enumerate().all(|(i, &t)| t as usize == i + 1)
    }

    fn transitions(&self, state: &Vec<u8>) -> Vec<Transition<Vec<u8>, TileMove>> {
        TileMove::ALL
            .iter()
            .filter_map(|&mv| slide(state, self.size, mv).map(|next| Transition::new(mv, next, 1.0)))
            .collect()
    }

    fn heuristic(&self, state: &Vec<u8>) -> Option<Cost> {
        let n = self.size;
        let distance: usize = state
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != 0)
            .map(|(i, &t)| {
                let goal = t as usize - 1;
                (i / n).abs_diff(goal / n) + (i % n).abs_diff(goal % n)
            })
            .sum();
        Some(distance as Cost)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let n = self.size;
        if self.start.len() != n * n {
            return Err(ValidationError::new(
                "tiles",
                format!("expected {} tiles, got {}", n * n, self.start.len()),
            ));
        }
        let mut seen = vec![false; n * n];
        for (i, &t) in self.start.iter().enumerate() {
            let slot = seen.get_mut(t as usize).ok_or_else(|| {
                ValidationError::new(format!("tiles[{i}]"), format!("tile {t} out of range"))
            })?;
            if std::mem::replace(slot, true) {
                return Err(ValidationError::new(
                    format!("tiles[{i}]"),
                    format!("duplicate tile {t}"),
                ));
            }
        }

        // Odd width: solvable iff inversions are even. Even width: iff
        // inversions plus the blank's row counted from the bottom (1-based) is odd.
        let inv = inversions(&self.start);
        let solvable = if n % 2 == 1 {
            inv % 2 == 0
        } else {
            let blank = self.start.iter().position(|&t| t == 0).unwrap_or(0);
            let row_from_bottom = n - blank / n;
            (inv + row_from_bottom) % 2 == 1
        };
        if !solvable {
            return Err(ValidationError::new("tiles", "configuration is not solvable"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(tiles: &[u8]) -> Result<SlidingPuzzle, ValidationError> {
        SlidingPuzzle::from_definition(&PuzzleDefinition {
            name: "p".into(),
            tiles: tiles.to_vec(),
        })
    }

    #[test]
    fn test_goal_detection() {
        let p = puzzle(&[1, 2, 3, 4, 5, 6, 7, 8, 0]).unwrap();
        assert!(p.is_goal(&p.initial_state()));
        assert_eq!(p.heuristic(&p.initial_state()), Some(0.0));
    }

    #[test]
    fn test_corner_blank_has_two_moves() {
        let p = puzzle(&[1, 2, 3, 4, 5, 6, 7, 8, 0]).unwrap();
        let moves: Vec<TileMove> = p
            .transitions(&p.initial_state())
            .iter()
            .map(|t| t.action)
            .collect();
        assert_eq!(moves, vec![TileMove::Up, TileMove::Left]);
    }

    #[test]
    fn test_unsolvable_rejected() {
        let err = puzzle(&[2, 1, 3, 4, 5, 6, 7, 8, 0]).unwrap_err();
        assert_eq!(err.field, "tiles");
    }

    #[test]
    fn test_even_width_parity() {
        let solved: Vec<u8> = (1..16).chain(std::iter::once(0)).collect();
        assert!(puzzle(&solved).is_ok());
        let mut swapped = solved.clone();
        swapped.swap(0, 1);
        assert!(puzzle(&swapped).is_err());
    }

    #[test]
    fn test_duplicate_tile_rejected() {
        let err = puzzle(&[1, 1, 3, 4, 5, 6, 7, 8, 0]).unwrap_err();
        assert_eq!(err.field, "tiles[1]");
    }

    #[test]
    fn test_non_square_rejected() {
        assert_eq!(puzzle(&[1, 2, 0]).unwrap_err().field, "tiles");
    }

    #[test]
    fn test_manhattan_heuristic() {
        let p = puzzle(&[1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
        assert_eq!(p.heuristic(&p.initial_state()), Some(1.0));
    }

    #[test]
    fn test_eight_puzzle_preset_is_solvable() {
        let p = SlidingPuzzle::eight_puzzle();
        assert!(p.validate().is_ok());
        assert!(!p.is_goal(&p.initial_state()));
    }

    #[test]
    fn test_scrambled_rejects_degenerate_sides() {
        for size in [0, 1, 17] {
            let err = SlidingPuzzle::scrambled("p", size, &[TileMove::Up]).unwrap_err();
            assert_eq!(err.field, "size");
        }
    }

    #[test]
    fn test_scrambled_largest_board_keeps_every_tile() {
        let p = SlidingPuzzle::scrambled("p", 16, &[TileMove::Up, TileMove::Left]).unwrap();
        assert!(p.validate().is_ok());
        let mut tiles = p.initial_state();
        tiles.sort_unstable();
        assert!(tiles.iter().enumerate().all(|(i, &t)| t as usize == i));
    }
}
