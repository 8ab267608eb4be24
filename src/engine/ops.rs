use super::state::{Cells, Move, MAX_TILE, SIZE};

/// Cell coordinates of one line, ordered from its scan origin to its far end.
pub(crate) type LinePath = [(usize, usize); SIZE];

/// Coordinates of line `line` as traversed by `direction`.
///
/// Up/Down walk a column, Left/Right walk a row. The first entry is where
/// tiles pile up after the move.
pub(crate) fn line_path(direction: Move, line: usize) -> LinePath {
    let mut path = [(0, 0); SIZE];
    for (step, slot) in path.iter_mut().enumerate() {
        let far = SIZE - 1 - step;
        *slot = match direction {
            Move::Up => (step, line),
            Move::Down => (far, line),
            Move::Left => (line, step),
            Move::Right => (line, far),
        };
    }
    path
}

/// Slide/merge every line of `cells` in `direction`. No randomness.
///
/// Returns the score gained from merges.
pub(crate) fn shift_cells(cells: &mut Cells, direction: Move) -> u64 {
    let mut gained = 0;
    for line in 0..SIZE {
        let path = line_path(direction, line);
        let mut values = path.map(|(x, y)| cells[x][y]);
        gained += slide_line(&mut values);
        for (&(x, y), &value) in path.iter().zip(values.iter()) {
            cells[x][y] = value;
        }
    }
    gained
}

/// Merge then compact a line toward index 0, returning the score gained.
pub(crate) fn slide_line(line: &mut [u32; SIZE]) -> u64 {
    let gained = merge_pass(line);
    compact(line);
    gained
}

// Merges are decided on pre-slide positions: each occupied cell looks past
// gaps to the next occupied cell only, and merges with it at most once.
fn merge_pass(line: &mut [u32; SIZE]) -> u64 {
    let mut gained = 0;
    for idx in 0..SIZE - 1 {
        let value = line[idx];
        if value == 0 {
            continue;
        }
        let next = (idx + 1..SIZE).find(|&n| line[n] != 0);
        if let Some(next) = next {
            if line[next] == value {
                let doubled = match value.checked_mul(2) {
                    Some(doubled) => doubled,
                    None => panic!("merging two {value} tiles overflows u32"),
                };
                line[idx] = doubled;
                line[next] = 0;
                gained += 2 * u64::from(value);
            }
        }
    }
    gained
}

fn compact(line: &mut [u32; SIZE]) {
    let mut lowest = 0;
    for idx in 0..SIZE {
        let value = line[idx];
        if value != 0 {
            line[idx] = 0;
            line[lowest] = value;
            lowest += 1;
        }
    }
}

/// Count the number of empty cells.
pub(crate) fn count_free(cells: &Cells) -> usize {
    cells.iter().flatten().filter(|&&v| v == 0).count()
}

/// The `index`-th empty cell in row-major order (`x` outer, `y` inner).
pub(crate) fn nth_free_cell(cells: &Cells, index: usize) -> Option<(usize, usize)> {
    (0..SIZE)
        .flat_map(|x| (0..SIZE).map(move |y| (x, y)))
        .filter(|&(x, y)| cells[x][y] == 0)
        .nth(index)
}

/// True if the cell equals its upward or left neighbour.
///
/// Checking only these two covers every orthogonal pair exactly once.
pub(crate) fn has_mergeable_neighbour(cells: &Cells, x: usize, y: usize) -> bool {
    let value = cells[x][y];
    (x > 0 && cells[x - 1][y] == value) || (y > 0 && cells[x][y - 1] == value)
}

/// True for 0 (empty) and powers of two in `2..=MAX_TILE`.
#[inline]
pub(crate) fn is_tile_value(value: u32) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

pub(crate) fn format_val(value: u32) -> String {
    match value {
        0 => String::from("."),
        v => v.to_string(),
    }
}
