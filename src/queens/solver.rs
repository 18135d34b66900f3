use crate::dlx::{DlxError, ExactCover};
use itertools::Itertools;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::path::Path;

/// A constraint of the N-Queens problem.
///
/// Every row and column needs exactly one queen. Diagonals hold at most one queen, so
/// they are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Requirement {
    /// Row `r` holds a queen.
    Row(usize),
    /// Column `c` holds a queen.
    Column(usize),
    /// The `r + c` diagonal holds a queen.
    Diagonal(usize),
    /// The `r + n - 1 - c` diagonal holds a queen.
    AntiDiagonal(usize),
}

/// Placing a queen on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Queen {
    /// 0-based row.
    pub row: usize,
    /// 0-based column.
    pub col: usize,
}

impl Queen {
    /// A queen on `row`, `col`.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn requirements(self, size: usize) -> [Requirement; 4] {
        [
            Requirement::Row(self.row),
            Requirement::Column(self.col),
            Requirement::Diagonal(self.row + self.col),
            Requirement::AntiDiagonal(self.row + size - 1 - self.col),
        ]
    }
}

/// An `n`×`n` board, possibly with some queens already placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queens {
    size: usize,
    placed: Vec<Option<usize>>,
}

impl Queens {
    /// An empty board.
    ///
    /// # Errors
    ///
    /// [`DlxError::InvalidPuzzle`] for a zero-sized board.
    pub fn new(size: usize) -> Result<Self, DlxError> {
        Self::with_placed(vec![None; size])
    }

    /// A board where row `r` already holds a queen in column `placed[r]`, if any.
    ///
    /// # Errors
    ///
    /// [`DlxError::InvalidPuzzle`] for a zero-sized board or a column out of range.
    pub fn with_placed(placed: Vec<Option<usize>>) -> Result<Self, DlxError> {
        let size = placed.len();
        if size == 0 {
            return Err(DlxError::InvalidPuzzle("board has no rows".to_owned()));
        }
        if let Some((row, col)) = placed
            .iter()
            .enumerate()
            .find_map(|(row, col)| col.filter(|&c| c >= size).map(|c| (row, c)))
        {
            return Err(DlxError::InvalidPuzzle(format!(
                "queen at row {row} column {col} is off the board"
            )));
        }
        Ok(Self { size, placed })
    }

    /// Board side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Builds the exact cover problem. A row with a queen already on it only gets that
    /// one action.
    ///
    /// # Errors
    ///
    /// Never in practice; the construction is checked by [`ExactCover`].
    pub fn to_problem(&self) -> Result<ExactCover<Requirement, Queen>, DlxError> {
        let n = self.size;
        let diagonals = 2 * n - 1;

        let mandatory = (0..n)
            .map(Requirement::Row)
            .chain((0..n).map(Requirement::Column));
        let optional = (0..diagonals)
            .map(Requirement::Diagonal)
            .chain((0..diagonals).map(Requirement::AntiDiagonal));

        let actions = self.placed.iter().enumerate().flat_map(|(row, placed)| {
            let columns = placed.map_or_else(|| (0..n).collect_vec(), |col| vec![col]);
            columns.into_iter().map(move |col| {
                let queen = Queen::new(row, col);
                (queen, queen.requirements(n))
            })
        });

        ExactCover::from_parts(mandatory, actions, optional)
    }

    /// Turns a solution into one queen column per row.
    #[must_use]
    pub fn decode(&self, solution: &[Queen]) -> Placement {
        let mut columns = self.placed.clone();
        for queen in solution {
            if let Some(slot) = columns.get_mut(queen.row) {
                *slot = Some(queen.col);
            }
        }
        Placement(columns)
    }
}

impl Display for Queens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Placement(self.placed.clone()))
    }
}

/// Queen column per row; `None` for an empty row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placement(pub Vec<Option<usize>>);

impl Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.0.len();
        for (row, col) in self.0.iter().enumerate() {
            let line: String = (0..size)
                .map(|c| if *col == Some(c) { 'Q' } else { '.' })
                .collect();
            if row + 1 < size {
                writeln!(f, "{line}")?;
            } else {
                write!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

/// Parses a board: `n` lines of `n` characters, `Q` marking a placed queen.
///
/// # Errors
///
/// [`DlxError::Parse`] for ragged lines or two queens on one row, and
/// [`DlxError::InvalidPuzzle`] for an empty board.
pub fn parse_board<B: BufRead>(reader: B) -> Result<Queens, DlxError> {
    let lines: Vec<String> = reader
        .lines()
        .map_ok(|line| line.trim().to_owned())
        .filter_ok(|line| !line.is_empty())
        .collect::<Result<_, _>>()?;

    let size = lines.len();
    let mut placed = Vec::with_capacity(size);
    for (index, line) in lines.iter().enumerate() {
        let cells = line.chars().collect_vec();
        if cells.len() != size {
            return Err(DlxError::parse(
                index + 1,
                format!("expected {size} squares, found {}", cells.len()),
            ));
        }
        let mut queens = cells.iter().positions(|&c| c == 'Q');
        let col = queens.next();
        if queens.next().is_some() {
            return Err(DlxError::parse(index + 1, "more than one queen on the row"));
        }
        placed.push(col);
    }

    Queens::with_placed(placed)
}

/// Opens and parses a board file.
///
/// # Errors
///
/// See [`parse_board`].
pub fn parse_board_file<P: AsRef<Path>>(path: P) -> Result<Queens, DlxError> {
    let file = std::fs::File::open(path)?;
    parse_board(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(queens: &Queens) -> usize {
        let problem = queens.to_problem().unwrap();
        let result = problem.solver().solve(&mut ());
        assert!(result.solutions.iter().all(|s| problem.verify(s)));
        result.solutions.len()
    }

    #[test]
    fn test_counts() {
        for (n, expected) in [(4, 2), (6, 4), (7, 40), (8, 92)] {
            assert_eq!(count(&Queens::new(n).unwrap()), expected, "{n}-queens");
        }
    }

    #[test]
    fn test_zero_size() {
        assert!(matches!(Queens::new(0), Err(DlxError::InvalidPuzzle(_))));
    }

    #[test]
    fn test_placement_display() {
        let board = Queens::new(4).unwrap();
        let solution = board
            .to_problem()
            .unwrap()
            .into_solver()
            .first()
            .unwrap();
        let placement = board.decode(&solution);
        assert_eq!(placement.0.iter().flatten().count(), 4);

        let text = placement.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().all(|line| line.matches('Q').count() == 1));
    }

    #[test]
    fn test_finish_board() {
        let board = parse_board(
            "\
Q.......
........
........
........
........
........
........
........
"
            .as_bytes(),
        )
        .unwrap();
        assert_eq!(board.size(), 8);
        // 4 of the 92 solutions have a queen in the corner.
        assert_eq!(count(&board), 4);
    }

    #[test]
    fn test_conflicting_board_has_no_solution() {
        let board = parse_board("Q...\n.Q..\n....\n....\n".as_bytes()).unwrap();
        assert_eq!(count(&board), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_board("Q..\n...\n".as_bytes()),
            Err(DlxError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_board("QQ\n..\n".as_bytes()),
            Err(DlxError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_board("".as_bytes()),
            Err(DlxError::InvalidPuzzle(_))
        ));
    }
}
