use crate::dlx::{DlxError, ExactCover};
use itertools::Itertools;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::path::Path;

/// Cell values by row; `0` marks an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board(Vec<Vec<usize>>);

impl Board {
    /// Wraps rows of cell values.
    #[must_use]
    pub const fn new(board: Vec<Vec<usize>>) -> Self {
        Self(board)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the board has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.0.iter().map(Vec::as_slice)
    }
}

impl From<Vec<Vec<usize>>> for Board {
    fn from(board: Vec<Vec<usize>>) -> Self {
        Self::new(board)
    }
}

impl From<Board> for Vec<Vec<usize>> {
    fn from(board: Board) -> Self {
        board.0
    }
}

impl<const N: usize> From<[[usize; N]; N]> for Board {
    fn from(board: [[usize; N]; N]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

/// Reference puzzles used by the tests and benchmarks.
pub const EXAMPLE_FOUR: [[usize; 4]; 4] = [[1, 0, 0, 4], [0, 4, 1, 0], [2, 0, 0, 3], [0, 3, 2, 0]];

/// A classic 9x9 puzzle with a unique solution.
pub const EXAMPLE_NINE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// A 16x16 puzzle.
pub const EXAMPLE_SIXTEEN: [[usize; 16]; 16] = [
    [0, 11, 0, 0, 0, 2, 3, 14, 0, 0, 9, 12, 0, 0, 0, 16],
    [15, 12, 0, 0, 0, 11, 0, 1, 13, 10, 0, 0, 0, 0, 7, 2],
    [0, 0, 10, 0, 0, 0, 0, 0, 16, 11, 0, 1, 6, 4, 12, 3],
    [0, 16, 14, 1, 0, 4, 0, 6, 0, 3, 0, 15, 0, 8, 0, 0],
    [1, 6, 5, 12, 0, 0, 11, 0, 0, 9, 8, 0, 0, 0, 0, 0],
    [0, 0, 0, 7, 14, 1, 8, 0, 0, 15, 6, 0, 13, 5, 0, 4],
    [4, 15, 8, 0, 9, 13, 0, 0, 0, 0, 7, 16, 3, 0, 0, 0],
    [0, 9, 13, 0, 0, 0, 0, 15, 10, 0, 0, 0, 7, 6, 0, 11],
    [14, 0, 6, 11, 0, 0, 0, 12, 7, 0, 0, 0, 0, 3, 13, 0],
    [0, 0, 0, 5, 8, 14, 0, 0, 0, 0, 13, 11, 0, 1, 2, 6],
    [13, 0, 16, 4, 0, 15, 5, 0, 0, 1, 12, 6, 8, 0, 0, 0],
    [0, 0, 0, 0, 0, 16, 10, 0, 0, 8, 0, 0, 11, 9, 4, 5],
    [0, 0, 11, 0, 1, 0, 14, 0, 5, 0, 3, 0, 15, 7, 16, 0],
    [5, 13, 15, 3, 16, 0, 4, 7, 0, 0, 0, 0, 0, 2, 0, 0],
    [16, 1, 0, 0, 0, 0, 12, 2, 14, 0, 15, 0, 0, 0, 3, 8],
    [9, 0, 0, 0, 13, 5, 0, 0, 8, 6, 16, 0, 0, 0, 10, 0],
];

/// Supported board sides.
#[derive(Debug, Clone, PartialEq, Eq, Copy, PartialOrd, Ord, Hash)]
pub enum Size {
    /// 4x4 with 2x2 blocks.
    Four = 4,
    /// 9x9 with 3x3 blocks.
    Nine = 9,
    /// 16x16 with 4x4 blocks.
    Sixteen = 16,
    /// 25x25 with 5x5 blocks.
    TwentyFive = 25,
}

impl TryFrom<usize> for Size {
    type Error = DlxError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            9 => Ok(Self::Nine),
            16 => Ok(Self::Sixteen),
            25 => Ok(Self::TwentyFive),
            _ => Err(DlxError::InvalidPuzzle(format!(
                "unsupported board size {value}, expected 4, 9, 16 or 25"
            ))),
        }
    }
}

impl From<Size> for usize {
    fn from(size: Size) -> Self {
        size as Self
    }
}

impl Size {
    /// Side of one block.
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            Self::Four => 2,
            Self::Nine => 3,
            Self::Sixteen => 4,
            Self::TwentyFive => 5,
        }
    }

    /// Index of the block holding `row`, `col`, counted row-major.
    #[must_use]
    pub const fn block_of(self, row: usize, col: usize) -> usize {
        let block = self.block_size();
        (row / block) * block + col / block
    }
}

/// One Sudoku rule instance. All of them are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constraint {
    /// The cell holds some number.
    Cell {
        /// 0-based row.
        row: usize,
        /// 0-based column.
        col: usize,
    },
    /// The row holds `num`.
    Row {
        /// 0-based row.
        row: usize,
        /// Number, from 1.
        num: usize,
    },
    /// The column holds `num`.
    Col {
        /// 0-based column.
        col: usize,
        /// Number, from 1.
        num: usize,
    },
    /// The block holds `num`.
    Block {
        /// Block index, row-major from 0.
        block: usize,
        /// Number, from 1.
        num: usize,
    },
}

/// Writing `num` into a cell. Rows and columns are 0-based, numbers 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Candidate {
    /// 0-based row.
    pub row: usize,
    /// 0-based column.
    pub col: usize,
    /// Number written, from 1.
    pub num: usize,
}

impl Candidate {
    /// Candidate `num` for the cell at `row`, `col`.
    #[must_use]
    pub const fn new(row: usize, col: usize, num: usize) -> Self {
        Self { row, col, num }
    }

    /// The four constraints this candidate satisfies.
    #[must_use]
    pub const fn constraints(self, size: Size) -> [Constraint; 4] {
        let Self { row, col, num } = self;
        [
            Constraint::Cell { row, col },
            Constraint::Row { row, num },
            Constraint::Col { col, num },
            Constraint::Block {
                block: size.block_of(row, col),
                num,
            },
        ]
    }
}

/// A validated Sudoku board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    board: Board,
    size: Size,
}

impl Sudoku {
    /// Checks the board shape and cell values.
    ///
    /// # Errors
    ///
    /// [`DlxError::InvalidPuzzle`] if the board is not square, has an unsupported size,
    /// or holds a number larger than its side.
    pub fn new(board: Board) -> Result<Self, DlxError> {
        let size = Size::try_from(board.len())?;
        let side = usize::from(size);

        for (r, row) in board.rows().enumerate() {
            if row.len() != side {
                return Err(DlxError::InvalidPuzzle(format!(
                    "row {} has {} cells, expected {side}",
                    r + 1,
                    row.len()
                )));
            }
            if let Some(&num) = row.iter().find(|&&num| num > side) {
                return Err(DlxError::InvalidPuzzle(format!(
                    "row {} holds {num}, larger than {side}",
                    r + 1
                )));
            }
        }

        Ok(Self { board, size })
    }

    /// The cell values.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The board side.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Builds the exact cover problem: one cell constraint per cell plus one row,
    /// column and block constraint per number. A given cell only gets its given
    /// candidate; an empty one gets every number.
    ///
    /// # Errors
    ///
    /// Never in practice; the construction is checked by [`ExactCover`].
    pub fn to_problem(&self) -> Result<ExactCover<Constraint, Candidate>, DlxError> {
        let side = usize::from(self.size);
        let cells = (0..side).cartesian_product(0..side);

        let cell_constraints = cells
            .clone()
            .map(|(row, col)| Constraint::Cell { row, col });
        let number_constraints = (0..side)
            .cartesian_product(1..=side)
            .flat_map(|(i, num)| {
                [
                    Constraint::Row { row: i, num },
                    Constraint::Col { col: i, num },
                    Constraint::Block { block: i, num },
                ]
            });

        let size = self.size;
        let actions = cells.flat_map(|(row, col)| {
            let given = self.board.0[row][col];
            let numbers = if given == 0 { 1..=side } else { given..=given };
            numbers.map(move |num| {
                let candidate = Candidate::new(row, col, num);
                (candidate, candidate.constraints(size))
            })
        });

        ExactCover::from_parts(cell_constraints.chain(number_constraints), actions, [])
    }

    /// Fills the board with the candidates of a solution.
    #[must_use]
    pub fn decode(&self, solution: &[Candidate]) -> Self {
        let mut board = self.board.0.clone();
        for candidate in solution {
            if let Some(cell) = board
                .get_mut(candidate.row)
                .and_then(|row| row.get_mut(candidate.col))
            {
                *cell = candidate.num;
            }
        }
        Self {
            board: Board::new(board),
            size: self.size,
        }
    }

    /// Whether every cell is filled and no row, column or block repeats a number.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let side = usize::from(self.size);
        let complete = |cells: Vec<usize>| cells.into_iter().sorted().eq(1..=side);

        (0..side).all(|i| {
            complete(self.board.0[i].clone())
                && complete((0..side).map(|r| self.board.0[r][i]).collect())
                && complete(
                    (0..side)
                        .cartesian_product(0..side)
                        .filter(|&(r, c)| self.size.block_of(r, c) == i)
                        .map(|(r, c)| self.board.0[r][c])
                        .collect(),
                )
        })
    }

    /// Row slices, top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.board.rows()
    }
}

impl Display for Sudoku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = usize::from(self.size);
        let width = side.to_string().len();
        let lines = self.board.rows().map(|row| {
            row.iter()
                .map(|&num| {
                    if num == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{num:>width$}")
                    }
                })
                .join(" ")
        });
        write!(f, "{}", lines.format("\n"))
    }
}

impl TryFrom<Board> for Sudoku {
    type Error = DlxError;

    fn try_from(board: Board) -> Result<Self, Self::Error> {
        Self::new(board)
    }
}

impl From<Sudoku> for Board {
    fn from(sudoku: Sudoku) -> Self {
        sudoku.board
    }
}

/// Parses a board: one row per line, cells separated by whitespace, `0` or `.` for an
/// empty cell. Blank lines are skipped.
///
/// # Errors
///
/// [`DlxError::Parse`] for a cell that is not a number, and the errors of
/// [`Sudoku::new`].
pub fn parse_sudoku<B: BufRead>(reader: B) -> Result<Sudoku, DlxError> {
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let row: Vec<usize> = line
            .split_whitespace()
            .map(|cell| match cell {
                "." => Ok(0),
                _ => cell
                    .parse::<usize>()
                    .map_err(|e| DlxError::parse(index + 1, format!("bad cell `{cell}`: {e}"))),
            })
            .collect::<Result<_, _>>()?;
        rows.push(row);
    }

    Sudoku::new(Board::new(rows))
}

/// Opens and parses a Sudoku file.
///
/// # Errors
///
/// See [`parse_sudoku`].
pub fn parse_sudoku_file<P: AsRef<Path>>(path: P) -> Result<Sudoku, DlxError> {
    let file = std::fs::File::open(path)?;
    parse_sudoku(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(sudoku: &Sudoku) -> Vec<Sudoku> {
        let problem = sudoku.to_problem().unwrap();
        let result = problem.solver().solve(&mut ());
        assert!(result.solutions.iter().all(|s| problem.verify(s)));
        result
            .solutions
            .iter()
            .map(|solution| sudoku.decode(solution))
            .collect()
    }

    #[test]
    fn test_solve_nine() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE_NINE)).unwrap();
        let solutions = solve(&sudoku);
        assert_eq!(solutions.len(), 1);

        let expected = Board::from([
            [5, 3, 4, 6, 7, 8, 9, 1, 2],
            [6, 7, 2, 1, 9, 5, 3, 4, 8],
            [1, 9, 8, 3, 4, 2, 5, 6, 7],
            [8, 5, 9, 7, 6, 1, 4, 2, 3],
            [4, 2, 6, 8, 5, 3, 7, 9, 1],
            [7, 1, 3, 9, 2, 4, 8, 5, 6],
            [9, 6, 1, 5, 3, 7, 2, 8, 4],
            [2, 8, 7, 4, 1, 9, 6, 3, 5],
            [3, 4, 5, 2, 8, 6, 1, 7, 9],
        ]);
        assert_eq!(solutions[0].board, expected);
        assert!(solutions[0].is_solved());
        assert!(!sudoku.is_solved());
    }

    #[test]
    fn test_solve_four() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE_FOUR)).unwrap();
        let solutions = solve(&sudoku);
        assert_eq!(solutions.len(), 1);
        assert_eq!(
            solutions[0].board,
            Board::from([[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]])
        );
    }

    #[test]
    fn test_problem_shape() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE_NINE)).unwrap();
        let problem = sudoku.to_problem().unwrap();
        assert_eq!(problem.mandatory().len(), 4 * 81);
        let givens = EXAMPLE_NINE.iter().flatten().filter(|&&n| n != 0).count();
        assert_eq!(problem.actions().len(), givens + (81 - givens) * 9);
    }

    #[test]
    fn test_invalid_boards() {
        assert!(matches!(
            Sudoku::new(Board::new(vec![vec![0; 5]; 5])),
            Err(DlxError::InvalidPuzzle(_))
        ));
        assert!(matches!(
            Sudoku::new(Board::new(vec![vec![0; 4], vec![0; 4], vec![0; 3], vec![0; 4]])),
            Err(DlxError::InvalidPuzzle(_))
        ));
        assert!(matches!(
            Sudoku::new(Board::from([[5, 0, 0, 0], [0; 4], [0; 4], [0; 4]])),
            Err(DlxError::InvalidPuzzle(_))
        ));
    }

    #[test]
    fn test_parse_and_display() {
        let text = "1 . . 4\n. 4 1 0\n\n2 0 0 3\n0 3 2 .\n";
        let sudoku = parse_sudoku(text.as_bytes()).unwrap();
        assert_eq!(sudoku.board, Board::from(EXAMPLE_FOUR));
        assert_eq!(sudoku.to_string(), "1 . . 4\n. 4 1 .\n2 . . 3\n. 3 2 .");
    }

    #[test]
    fn test_board_matches_size() {
        let sudoku = Sudoku::try_from(Board::from(EXAMPLE_FOUR)).unwrap();
        assert_eq!(sudoku.size(), Size::Four);
        assert_eq!(sudoku.board(), &Board::from(EXAMPLE_FOUR));
        assert!(sudoku.board().rows().all(|row| row.len() == 4));

        let solved = sudoku.decode(&[Candidate::new(0, 1, 2), Candidate::new(9, 9, 1)]);
        assert_eq!(solved.size(), Size::Four);
        assert_eq!(solved.board().rows().next(), Some(&[1, 2, 0, 4][..]));
        assert!(!solved.is_solved());

        assert!(Sudoku::try_from(Board::new(vec![vec![0; 9]; 4])).is_err());
    }

    #[test]
    fn test_parse_bad_cell() {
        let err = parse_sudoku("1 2 3 x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DlxError::Parse { line: 1, .. }));
    }
}
