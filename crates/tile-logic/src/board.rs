//! Board state and move transitions
//!
//! The session engine only depends on [`BoardRules`]; [`Classic2048`] is the
//! rule set the program ships with.

use serde::{Deserialize, Serialize};
use crate::random::SeededRng;

/// Board edge length
pub const BOARD_SIZE: usize = 4;

/// Tile value that puts a player in the hall of fame
pub const WINNING_TILE: u16 = 2048;

/// Top tile of a freshly started board (before any spawn)
pub const START_TOP_TILE: u16 = 2;

/// RNG stream reserved for the two opening spawns
const OPENING_STREAM: u32 = u32::MAX;

pub type Grid = [[u16; BOARD_SIZE]; BOARD_SIZE];

/// Slide direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
}

/// Board cells plus the running score and best tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    pub cells: Grid,
    pub score: u32,
    pub top_tile: u16,
}

impl Board {
    /// Board from raw cells, score and top tile recomputed from scratch
    pub fn from_cells(cells: Grid) -> Self {
        let top_tile = cells.iter().flatten().copied().max().unwrap_or(0);
        Self { cells, score: 0, top_tile }
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empty = Vec::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                if tile == 0 {
                    empty.push((r, c));
                }
            }
        }
        empty
    }

    /// Sum of every tile on the board
    pub fn tile_sum(&self) -> u32 {
        self.cells.iter().flatten().map(|&t| t as u32).sum()
    }

    /// True when no slide in any direction can change the board
    pub fn is_stuck(&self) -> bool {
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                let tile = self.cells[r][c];
                if tile == 0 {
                    return false;
                }
                if c + 1 < BOARD_SIZE && tile == self.cells[r][c + 1] {
                    return false;
                }
                if r + 1 < BOARD_SIZE && tile == self.cells[r + 1][c] {
                    return false;
                }
            }
        }
        true
    }

    /// Place a 2 (or a 4, one time in ten) on a seeded-random empty cell.
    /// Returns the spawned value, or `None` on a full board.
    fn spawn_tile(&mut self, seed: &[u8; 32], move_index: u32) -> Option<u16> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let mut rng = SeededRng::new(seed, move_index);
        rng.mix(self.cells.iter().flatten().map(|&t| t as u64));

        let (r, c) = empty[rng.next_range(empty.len() as u32) as usize];
        let value = if rng.next_percent() < 10 { 4 } else { 2 };
        self.cells[r][c] = value;
        self.top_tile = self.top_tile.max(value);
        Some(value)
    }
}

/// Result of applying one direction to a board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub board: Board,
    /// Sum of the tiles created by merges in this move
    pub gained: u32,
    /// False when the slide moved nothing; no tile is spawned in that case
    pub changed: bool,
}

/// Pure state transition used by the session engine.
///
/// Implementations must be deterministic in all of their inputs.
pub trait BoardRules {
    /// Canonical opening board for a session seeded by `seed`
    fn start(&self, seed: &[u8; 32]) -> Board;

    /// Apply `direction`; `move_index` is the session's move counter before the move
    fn apply(
        &self,
        board: &Board,
        direction: Direction,
        seed: &[u8; 32],
        move_index: u32,
    ) -> MoveOutcome;

    /// True when the session can make no further move
    fn is_terminal(&self, board: &Board) -> bool;
}

/// 4x4 slide-and-merge rules
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classic2048;

impl BoardRules for Classic2048 {
    fn start(&self, seed: &[u8; 32]) -> Board {
        let mut board = Board {
            cells: [[0; BOARD_SIZE]; BOARD_SIZE],
            score: 0,
            top_tile: START_TOP_TILE,
        };
        board.spawn_tile(seed, OPENING_STREAM);
        board.spawn_tile(seed, OPENING_STREAM - 1);
        board
    }

    fn apply(
        &self,
        board: &Board,
        direction: Direction,
        seed: &[u8; 32],
        move_index: u32,
    ) -> MoveOutcome {
        let mut next = *board;
        let mut gained = 0u32;

        for i in 0..BOARD_SIZE {
            let mut line = read_line(&board.cells, direction, i);
            let (line_gain, line_max) = slide_and_merge(&mut line);
            write_line(&mut next.cells, direction, i, &line);
            gained = gained.saturating_add(line_gain);
            next.top_tile = next.top_tile.max(line_max);
        }

        if next.cells == board.cells {
            return MoveOutcome { board: *board, gained: 0, changed: false };
        }

        next.score = next.score.saturating_add(gained);
        next.spawn_tile(seed, move_index);

        MoveOutcome { board: next, gained, changed: true }
    }

    fn is_terminal(&self, board: &Board) -> bool {
        board.is_stuck()
    }
}

/// Cells of line `i`, ordered from the edge the tiles slide toward
fn read_line(cells: &Grid, direction: Direction, i: usize) -> [u16; BOARD_SIZE] {
    let mut line = [0u16; BOARD_SIZE];
    for (k, slot) in line.iter_mut().enumerate() {
        let (r, c) = line_coords(direction, i, k);
        *slot = cells[r][c];
    }
    line
}

fn write_line(cells: &mut Grid, direction: Direction, i: usize, line: &[u16; BOARD_SIZE]) {
    for (k, &tile) in line.iter().enumerate() {
        let (r, c) = line_coords(direction, i, k);
        cells[r][c] = tile;
    }
}

fn line_coords(direction: Direction, i: usize, k: usize) -> (usize, usize) {
    let last = BOARD_SIZE - 1;
    match direction {
        Direction::Left => (i, k),
        Direction::Right => (i, last - k),
        Direction::Up => (k, i),
        Direction::Down => (last - k, i),
    }
}

/// Compact a line toward index 0 and merge equal neighbours once.
/// Returns (merge score, largest merged tile).
fn slide_and_merge(line: &mut [u16; BOARD_SIZE]) -> (u32, u16) {
    let mut packed = [0u16; BOARD_SIZE];
    let mut len = 0;
    for &tile in line.iter().filter(|&&t| t != 0) {
        packed[len] = tile;
        len += 1;
    }

    let mut out = [0u16; BOARD_SIZE];
    let mut gained = 0u32;
    let mut max_merged = 0u16;
    let mut pos = 0;
    let mut i = 0;
    while i < len {
        let tile = packed[i];
        let merged = if i + 1 < len && packed[i + 1] == tile {
            tile.checked_mul(2)
        } else {
            None
        };

        match merged {
            Some(value) => {
                out[pos] = value;
                gained += value as u32;
                max_merged = max_merged.max(value);
                i += 2;
            }
            None => {
                out[pos] = tile;
                i += 1;
            }
        }
        pos += 1;
    }

    *line = out;
    (gained, max_merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SEED: [u8; 32] = [9u8; 32];

    fn count_tiles(board: &Board) -> usize {
        board.cells.iter().flatten().filter(|&&t| t != 0).count()
    }

    #[test]
    fn test_slide_and_merge_cases() {
        let cases: [([u16; 4], [u16; 4], u32); 6] = [
            ([2, 2, 0, 0], [4, 0, 0, 0], 4),
            ([2, 2, 2, 2], [4, 4, 0, 0], 8),
            ([2, 2, 4, 0], [4, 4, 0, 0], 4),
            ([0, 4, 0, 4], [8, 0, 0, 0], 8),
            ([2, 4, 8, 16], [2, 4, 8, 16], 0),
            ([4, 4, 4, 0], [8, 4, 0, 0], 8),
        ];

        for (input, expected, score) in cases {
            let mut line = input;
            let (gained, _) = slide_and_merge(&mut line);
            assert_eq!(line, expected, "input {:?}", input);
            assert_eq!(gained, score, "input {:?}", input);
        }
    }

    #[test]
    fn test_merge_overflow_is_skipped() {
        let mut line = [32768, 32768, 0, 0];
        let (gained, _) = slide_and_merge(&mut line);
        assert_eq!(line, [32768, 32768, 0, 0]);
        assert_eq!(gained, 0);
    }

    #[test]
    fn test_start_board_has_two_tiles() {
        let board = Classic2048.start(&SEED);
        assert_eq!(count_tiles(&board), 2);
        assert_eq!(board.score, 0);
        assert!(board.top_tile >= START_TOP_TILE);
        for &tile in board.cells.iter().flatten() {
            assert!(tile == 0 || tile == 2 || tile == 4);
        }
    }

    #[test]
    fn test_start_board_is_deterministic() {
        assert_eq!(Classic2048.start(&SEED), Classic2048.start(&SEED));
    }

    #[test]
    fn test_each_direction_slides_to_its_edge() {
        let mut cells = [[0u16; 4]; 4];
        cells[1][1] = 2;
        cells[1][2] = 2;
        let board = Board::from_cells(cells);

        let left = Classic2048.apply(&board, Direction::Left, &SEED, 0);
        assert!(left.changed);
        assert_eq!(left.board.cells[1][0], 4);
        assert_eq!(left.gained, 4);
        assert_eq!(left.board.score, 4);

        let right = Classic2048.apply(&board, Direction::Right, &SEED, 0);
        assert_eq!(right.board.cells[1][3], 4);

        let up = Classic2048.apply(&board, Direction::Up, &SEED, 0);
        assert_eq!(up.board.cells[0][1], 2);
        assert_eq!(up.board.cells[0][2], 2);
        assert_eq!(up.gained, 0);

        let down = Classic2048.apply(&board, Direction::Down, &SEED, 0);
        assert_eq!(down.board.cells[3][1], 2);
        assert_eq!(down.board.cells[3][2], 2);
    }

    #[test]
    fn test_unchanged_move_spawns_nothing() {
        let mut cells = [[0u16; 4]; 4];
        cells[0][0] = 2;
        cells[0][1] = 4;
        let board = Board::from_cells(cells);

        let outcome = Classic2048.apply(&board, Direction::Left, &SEED, 0);
        assert!(!outcome.changed);
        assert_eq!(outcome.board, board);
        assert_eq!(outcome.gained, 0);
    }

    #[test]
    fn test_top_tile_tracks_merges() {
        let mut cells = [[0u16; 4]; 4];
        cells[2][0] = 1024;
        cells[2][1] = 1024;
        let board = Board::from_cells(cells);

        let outcome = Classic2048.apply(&board, Direction::Left, &SEED, 5);
        assert_eq!(outcome.board.top_tile, WINNING_TILE);
        assert_eq!(outcome.board.cells[2][0], WINNING_TILE);
    }

    #[test]
    fn test_terminal_detection() {
        let stuck = Board::from_cells([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(Classic2048.is_terminal(&stuck));
        for dir in Direction::ALL {
            assert!(!Classic2048.apply(&stuck, dir, &SEED, 0).changed);
        }

        let mut mergeable = stuck;
        mergeable.cells[3][3] = 4;
        assert!(!Classic2048.is_terminal(&mergeable));

        let mut open = stuck;
        open.cells[0][0] = 0;
        assert!(!Classic2048.is_terminal(&open));
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        let tile = prop_oneof![Just(0u16), Just(2u16), Just(4u16), Just(8u16), Just(16u16)];
        proptest::array::uniform4(proptest::array::uniform4(tile)).prop_map(Board::from_cells)
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_apply_is_deterministic(
            board in arb_board(),
            dir in arb_direction(),
            idx in 0u32..1000,
        ) {
            let a = Classic2048.apply(&board, dir, &SEED, idx);
            let b = Classic2048.apply(&board, dir, &SEED, idx);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_changed_move_conserves_tiles_plus_one_spawn(
            board in arb_board(),
            dir in arb_direction(),
        ) {
            let outcome = Classic2048.apply(&board, dir, &SEED, 0);
            if outcome.changed {
                let spawned = outcome.board.tile_sum() - board.tile_sum();
                prop_assert!(spawned == 2 || spawned == 4);
                prop_assert_eq!(outcome.board.score, board.score + outcome.gained);
            } else {
                prop_assert_eq!(outcome.board, board);
            }
        }
    }
}
