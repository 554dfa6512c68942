//! 4-connected grid worlds parsed from ASCII rows.
//!
//! | symbol | meaning |
//! |--------|---------|
//! | `.` | free cell, entering costs 1 |
//! | `~` | mud, entering costs 3 |
//! | `#` | wall |
//! | `S` | start (exactly one) |
//! | `G` | goal (at least one) |

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Cost, Environment, Transition};
use crate::error::ValidationError;

const MUD_COST: Cost = 3.0;

fn default_grid_name() -> String {
    "grid".to_string()
}

/// Serializable grid description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridDefinition {
    #[serde(default = "default_grid_name")]
    pub name: String,
    pub rows: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Free,
    Mud,
    Wall,
}

/// Direction of a single grid step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridMove {
    Up,
    Down,
    Left,
    Right,
}

impl GridMove {
    const ALL: [GridMove; 4] = [GridMove::Up, GridMove::Down, GridMove::Left, GridMove::Right];

    fn delta(self) -> (isize, isize) {
        match self {
            GridMove::Up => (-1, 0),
            GridMove::Down => (1, 0),
            GridMove::Left => (0, -1),
            GridMove::Right => (0, 1),
        }
    }
}

impl fmt::Display for GridMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GridMove::Up => "up",
            GridMove::Down => "down",
            GridMove::Left => "left",
            GridMove::Right => "right",
        })
    }
}

/// Grid pathfinding environment. States are `(row, col)`.
///
/// The heuristic is the Manhattan distance to the nearest goal, which is
/// admissible and consistent because no step costs less than 1.
#[derive(Debug, Clone)]
pub struct GridWorld {
    name: String,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: (usize, usize),
    goals: Vec<(usize, usize)>,
}

impl GridWorld {
    /// Parses and validates a grid.
    pub fn from_definition(definition: &GridDefinition) -> Result<Self, ValidationError> {
        let rows = &definition.rows;
        if rows.is_empty() {
            return Err(ValidationError::new("rows", "must not be empty"));
        }
        let width = rows[0].chars().count();
        if width == 0 {
            return Err(ValidationError::new("rows[0]", "must not be empty"));
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut start = None;
        let mut goals = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != width {
                return Err(ValidationError::new(
                    format!("rows[{r}]"),
                    format!("expected width {width}, got {len}"),
                ));
            }
            for (c, symbol) in row.chars().enumerate() {
                let cell = match symbol {
                    '.' => Cell::Free,
                    '~' => Cell::Mud,
                    '#' => Cell::Wall,
                    'S' => {
                        if start.replace((r, c)).is_some() {
                            return Err(ValidationError::new(
                                format!("rows[{r}][{c}]"),
                                "more than one start cell",
                            ));
                        }
                        Cell::Free
                    }
                    'G' => {
                        goals.push((r, c));
                        Cell::Free
                    }
                    other => {
                        return Err(ValidationError::new(
                            format!("rows[{r}][{c}]"),
                            format!("unknown symbol {other:?}"),
                        ))
                    }
                };
                cells.push(cell);
            }
        }

        let start = start.ok_or_else(|| ValidationError::new("rows", "no start cell 'S'"))?;
        if goals.is_empty() {
            return Err(ValidationError::new("rows", "no goal cell 'G'"));
        }

        Ok(Self {
            name: definition.name.clone(),
            width,
            height: rows.len(),
            cells,
            start,
            goals,
        })
    }

    /// A small maze with a mud patch; shortest path costs 17.
    pub fn maze() -> Self {
        let definition = GridDefinition {
            name: "maze".to_string(),
            rows: [
                "S..#......",
                ".#.#.####.",
                ".#...#....",
                ".####~#.#.",
                "......#.#G",
            ]
            .iter()
            .map(|r| r.to_string())
            .collect(),
        };
        Self::from_definition(&definition).unwrap_or_else(|e| unreachable!("maze preset: {e}"))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn cell(&self, r: usize, c: usize) -> Cell {
        self.cells[r * self.width + c]
    }
}

impl Environment for GridWorld {
    type State = (usize, usize);
    type Action = GridMove;

    fn name(&self) -> &str {
        &self.name
    }

    fn initial_state(&self) -> (usize, usize) {
        self.start
    }

    fn is_goal(&self, state: &(usize, usize)) -> bool {
        self.goals.contains(state)
    }

    fn transitions(&self, &(r, c): &(usize, usize)) -> Vec<Transition<(usize, usize), GridMove>> {
        GridMove::ALL
            .iter()
            .filter_map(|&mv| {
                let (dr, dc) = mv.delta();
                let nr = r.checked_add_signed(dr).filter(|&v| v < self.height)?;
                let nc = c.checked_add_signed(dc).filter(|&v| v < self.width)?;
                match self.cell(nr, nc) {
                    Cell::Wall => None,
                    Cell::Free => Some(Transition::new(mv, (nr, nc), 1.0)),
                    Cell::Mud => Some(Transition::new(mv, (nr, nc), MUD_COST)),
                }
            })
            .collect()
    }

    fn heuristic(&self, &(r, c): &(usize, usize)) -> Option<Cost> {
        self.goals
            .iter()
            .map(|&(gr, gc)| (r.abs_diff(gr) + c.abs_diff(gc)) as Cost)
            .min_by(|a, b| a.total_cmp(b))
    }
}
