use std::fmt;
use std::str::FromStr;

use log::{debug, log_enabled, trace, Level};
use super::ops;
use crate::error::EngineError;
use crate::random::{RandomSource, RngSource};

/// Side length of the board.
pub const SIZE: usize = 4;

/// A tile of this value wins the game.
pub const WINNING_TILE: u32 = 2048;

/// Largest tile [`Board::from_cells`] accepts. One more merge still fits in
/// a `u32`; merging past that panics.
pub const MAX_TILE: u32 = 1 << 30;

/// Grid of cell values indexed `[x][y]`: `x` is the row, `y` the column.
pub type Cells = [[u32; SIZE]; SIZE];

/// A direction to move/merge tiles.
///
/// Up/Down move along `x` (toward row 0 / row 3), Left/Right along `y`
/// (toward column 0 / column 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// Accepts `up/down/left/right` (any case) and the keys `w/s/a/d`.
impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Move::Up),
            "down" | "s" => Ok(Move::Down),
            "left" | "a" => Ok(Move::Left),
            "right" | "d" => Ok(Move::Right),
            _ => Err(EngineError::UnknownMove(s.to_string())),
        }
    }
}

/// What a single [`Board::make_move`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Score gained from merges during this move.
    pub merged: u64,
    /// Whether the slide/merge altered the grid (the spawn is not counted).
    pub changed: bool,
    /// Cell that received the spawned tile, if any cell was free.
    pub spawned: Option<(usize, usize)>,
}

/// 4x4 2048 board: cells, move/score counters, and the randomness source
/// used for spawning.
///
/// ```
/// use game2048::engine::{Board, Move};
/// use game2048::random::ScriptedSource;
///
/// // Spawn 2 at free index 0, then 2 at free index 0 again -> (0,0) and (0,1).
/// let mut board = Board::with_source(ScriptedSource::new([0], [2]));
/// board.initialize();
/// let outcome = board.make_move(Move::Right);
/// assert_eq!(board.value_at(0, 3), 4);
/// assert_eq!(outcome.merged, 4);
/// assert_eq!((board.moves(), board.score()), (1, 4));
/// ```
#[derive(Clone)]
pub struct Board<S = RngSource> {
    cells: Cells,
    moves: u64,
    score: u64,
    source: S,
}

impl Board<RngSource> {
    /// Empty board backed by an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_source(RngSource::from_entropy())
    }

    /// Empty board backed by a reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self::with_source(RngSource::seeded(seed))
    }
}

impl Default for Board<RngSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RandomSource> Board<S> {
    /// Empty board (all cells 0, counters 0) spawning through `source`.
    pub fn with_source(source: S) -> Self {
        Board {
            cells: [[0; SIZE]; SIZE],
            moves: 0,
            score: 0,
            source,
        }
    }

    /// Board holding `cells` with zeroed counters.
    ///
    /// Every cell must be 0 or a power of two in `2..=MAX_TILE`.
    pub fn from_cells(cells: Cells, source: S) -> Result<Self, EngineError> {
        for (x, row) in cells.iter().enumerate() {
            for (y, &value) in row.iter().enumerate() {
                if !ops::is_tile_value(value) {
                    return Err(EngineError::InvalidTile { x, y, value });
                }
            }
        }
        Ok(Board {
            cells,
            moves: 0,
            score: 0,
            source,
        })
    }

    /// Spawn the two starting tiles.
    ///
    /// Intended for a fresh board. Calling it again is allowed and simply
    /// spawns two more tiles.
    pub fn initialize(&mut self) {
        self.spawn();
        self.spawn();
    }

    /// Slide/merge in `direction`, count the move, then spawn one tile if any
    /// cell is free.
    ///
    /// The move counter advances even when nothing shifts. On a full board no
    /// tile is spawned and the source is not consulted.
    pub fn make_move(&mut self, direction: Move) -> MoveOutcome {
        let before = self.cells;
        let merged = ops::shift_cells(&mut self.cells, direction);
        self.score += merged;
        self.moves += 1;
        let changed = self.cells != before;

        let spawned = if ops::count_free(&self.cells) > 0 {
            Some(self.spawn())
        } else {
            None
        };

        if log_enabled!(Level::Debug) && self.is_over() {
            debug!(
                "game over after {} moves (score {}, won: {})",
                self.moves,
                self.score,
                self.is_won()
            );
        }

        MoveOutcome {
            merged,
            changed,
            spawned,
        }
    }

    // Caller guarantees at least one free cell.
    fn spawn(&mut self) -> (usize, usize) {
        let free = ops::count_free(&self.cells);
        let index = self.source.pick_free_cell_index(free);
        let value = self.source.pick_spawn_value();
        assert!(
            index < free,
            "random source picked free cell {index} of {free}"
        );
        let (x, y) = match ops::nth_free_cell(&self.cells, index) {
            Some(cell) => cell,
            None => panic!("spawn requested on a full board"),
        };
        self.cells[x][y] = value;
        trace!("spawned {value} at ({x}, {y})");
        (x, y)
    }
}

impl<S> Board<S> {
    /// Value at row `x`, column `y` (0 if empty).
    ///
    /// # Panics
    /// If either coordinate is outside `0..4`; see [`Board::try_value_at`].
    #[inline]
    pub fn value_at(&self, x: usize, y: usize) -> u32 {
        match self.try_value_at(x, y) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    #[inline]
    pub fn try_value_at(&self, x: usize, y: usize) -> Result<u32, EngineError> {
        self.cells
            .get(x)
            .and_then(|row| row.get(y))
            .copied()
            .ok_or(EngineError::OutOfRange { x, y })
    }

    #[inline]
    pub fn moves(&self) -> u64 {
        self.moves
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// True if any cell holds [`WINNING_TILE`].
    pub fn is_won(&self) -> bool {
        self.cells.iter().flatten().any(|&v| v == WINNING_TILE)
    }

    /// True once the game is won, or when the board is full and no two
    /// orthogonally adjacent cells match.
    ///
    /// A won board counts as over even if moves remain.
    pub fn is_over(&self) -> bool {
        if self.is_won() {
            return true;
        }
        if ops::count_free(&self.cells) != 0 {
            return false;
        }
        !(0..SIZE)
            .flat_map(|x| (0..SIZE).map(move |y| (x, y)))
            .any(|(x, y)| ops::has_mergeable_neighbour(&self.cells, x, y))
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn free_cells(&self) -> usize {
        ops::count_free(&self.cells)
    }

    /// Highest tile value present (0 on an empty board).
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Copy of the grid, indexed `[x][y]`.
    #[inline]
    pub fn cells(&self) -> Cells {
        self.cells
    }

    /// Give back the randomness source, e.g. to continue a scripted replay.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S> fmt::Debug for Board<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("cells", &self.cells)
            .field("moves", &self.moves)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

/// Header line with counters, then one line per row; every cell is followed
/// by five spaces and empty cells print as `.`.
impl<S> fmt::Display for Board<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Moves: {}   Score: {}", self.moves, self.score)?;
        for row in &self.cells {
            for &value in row {
                write!(f, "{}     ", ops::format_val(value))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedSource;

    fn board(cells: Cells) -> Board<ScriptedSource> {
        Board::from_cells(cells, ScriptedSource::new([0], [2])).unwrap()
    }

    #[test]
    fn new_board_is_empty() {
        let b = Board::seeded(1);
        for x in 0..SIZE {
            for y in 0..SIZE {
                assert_eq!(b.value_at(x, y), 0);
            }
        }
        assert_eq!((b.moves(), b.score(), b.free_cells()), (0, 0, 16));
    }

    #[test]
    fn try_value_at_reports_out_of_range() {
        let b = Board::seeded(1);
        assert_eq!(b.try_value_at(3, 3), Ok(0));
        assert_eq!(b.try_value_at(4, 0), Err(EngineError::OutOfRange { x: 4, y: 0 }));
        assert_eq!(b.try_value_at(0, 7), Err(EngineError::OutOfRange { x: 0, y: 7 }));
    }

    #[test]
    #[should_panic(expected = "outside the 4x4 board")]
    fn value_at_panics_out_of_range() {
        Board::seeded(1).value_at(0, 4);
    }

    #[test]
    fn from_cells_rejects_non_tiles() {
        let mut cells = [[0; SIZE]; SIZE];
        cells[2][1] = 6;
        let err = Board::from_cells(cells, ScriptedSource::default()).unwrap_err();
        assert_eq!(err, EngineError::InvalidTile { x: 2, y: 1, value: 6 });
    }

    #[test]
    fn from_cells_rejects_tiles_that_could_overflow() {
        let mut cells = [[0; SIZE]; SIZE];
        cells[0][0] = 1 << 31;
        cells[0][1] = 1 << 31;
        let err = Board::from_cells(cells, ScriptedSource::default()).unwrap_err();
        assert_eq!(err, EngineError::InvalidTile { x: 0, y: 0, value: 1 << 31 });
    }

    #[test]
    fn largest_accepted_tiles_merge() {
        let mut b = board([[MAX_TILE, MAX_TILE, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]);
        let outcome = b.make_move(Move::Left);
        assert_eq!(b.value_at(0, 0), 1 << 31);
        assert_eq!(outcome.merged, 1 << 31);
        assert_eq!(b.score(), 1 << 31);
    }

    #[test]
    fn into_source_returns_the_partly_consumed_script() {
        let mut b = Board::with_source(ScriptedSource::new([3, 0, 7], [4, 2, 8]));
        b.initialize();
        assert_eq!((b.value_at(0, 3), b.value_at(0, 0)), (4, 2));
        let mut rest = b.into_source();
        assert_eq!(rest.pick_free_cell_index(14), 7);
        assert_eq!(rest.pick_spawn_value(), 8);
    }

    #[test]
    fn move_counter_advances_without_change() {
        // Already packed left with no pairs: only the spawn alters the grid.
        let mut b = board([[2, 4, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]);
        let outcome = b.make_move(Move::Left);
        assert!(!outcome.changed);
        assert_eq!(outcome.merged, 0);
        assert_eq!(outcome.spawned, Some((0, 2)));
        assert_eq!(b.moves(), 1);
        assert_eq!(b.value_at(0, 0), 2);
        assert_eq!(b.value_at(0, 1), 4);
    }

    #[test]
    fn full_board_without_merges_does_not_spawn() {
        let cells = [[2, 4, 8, 16], [16, 8, 4, 2], [2, 4, 8, 16], [16, 8, 4, 2]];
        // An empty script panics if the board ever draws from it.
        let mut b = Board::from_cells(cells, ScriptedSource::default()).unwrap();
        assert!(b.is_over());
        for dir in Move::ALL {
            let outcome = b.make_move(dir);
            assert_eq!(outcome, MoveOutcome::default());
        }
        assert_eq!(b.cells(), cells);
        assert_eq!(b.moves(), 4);
        assert!(b.is_over());
        assert!(!b.is_won());
    }

    #[test]
    fn full_board_merge_then_spawn() {
        let cells = [[2, 2, 8, 16], [16, 8, 4, 2], [2, 4, 8, 16], [16, 8, 4, 2]];
        let mut b = board(cells);
        assert!(!b.is_over());
        let outcome = b.make_move(Move::Left);
        assert_eq!(outcome.merged, 4);
        assert!(outcome.changed);
        assert_eq!(outcome.spawned, Some((0, 3)));
        assert_eq!(b.cells()[0], [4, 8, 16, 2]);
    }

    #[test]
    fn is_over_checks_both_axes() {
        let vertical = [[2, 4, 8, 16], [2, 8, 4, 32], [4, 2, 8, 16], [8, 4, 2, 4]];
        assert!(!board(vertical).is_over());
        let horizontal = [[2, 4, 8, 16], [16, 8, 4, 2], [2, 4, 8, 16], [16, 8, 2, 2]];
        assert!(!board(horizontal).is_over());
        let stuck = [[2, 4, 8, 16], [16, 8, 4, 2], [2, 4, 8, 16], [16, 8, 4, 2]];
        assert!(board(stuck).is_over());
    }

    #[test]
    fn winning_tile_ends_game_even_with_moves_left() {
        let mut cells = [[0; SIZE]; SIZE];
        cells[1][2] = WINNING_TILE;
        let b = board(cells);
        assert!(b.is_won());
        assert!(b.is_over());
        assert_eq!(b.highest_tile(), WINNING_TILE);
    }

    #[test]
    fn test_move_from_str() {
        assert_eq!("up".parse::<Move>(), Ok(Move::Up));
        assert_eq!("S".parse::<Move>(), Ok(Move::Down));
        assert_eq!(" Left\n".parse::<Move>(), Ok(Move::Left));
        assert_eq!("d".parse::<Move>(), Ok(Move::Right));
        assert_eq!(
            "north".parse::<Move>(),
            Err(EngineError::UnknownMove("north".to_string()))
        );
        for dir in Move::ALL {
            assert_eq!(dir.to_string().parse::<Move>(), Ok(dir));
        }
    }

    #[test]
    fn display_renders_counters_and_rows() {
        let mut b = board([[0, 0, 0, 0], [0, 1024, 0, 0], [0; SIZE], [0, 0, 0, 2]]);
        b.moves = 12;
        b.score = 340;
        let expected = "Moves: 12   Score: 340\n\
                        .     .     .     .     \n\
                        .     1024     .     .     \n\
                        .     .     .     .     \n\
                        .     .     .     2     \n";
        assert_eq!(b.to_string(), expected);
    }
}
