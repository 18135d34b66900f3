#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use dlx_solver::dlx::{
    ColumnSelection, Dlx, ExactCover, FirstColumn, RandomOrder, RowOrdering, SearchHooks,
    SearchResult, SolutionLimit, text,
};
use dlx_solver::dumbbells::solver::{SkipSwappedPieces, parse_dumbbells_file};
use dlx_solver::queens::solver::{Queens, parse_board_file};
use dlx_solver::skyscrapers::solver::parse_skyscrapers_file;
use dlx_solver::sudoku::solver::parse_sudoku_file;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

const MIB: f64 = 1024.0 * 1024.0;

/// Board side used by `queens` when neither `--size` nor `--board` is given.
const DEFAULT_QUEENS: usize = 8;

/// Defines the command-line interface for the exact cover solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "dlx-solver",
    version,
    about = "An exact cover solver using Dancing Links"
)]
pub(crate) struct Cli {
    /// An optional path argument. If provided without a subcommand, it's treated as the
    /// path to an exact cover file in DLX text format.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `queens`, `sudoku`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

impl Cli {
    /// The options of the subcommand being run, or the top-level ones.
    pub(crate) fn common(&self) -> &CommonOptions {
        match &self.command {
            Some(
                Commands::File { common, .. }
                | Commands::Text { common, .. }
                | Commands::Queens { common, .. }
                | Commands::Sudoku { common, .. }
                | Commands::Skyscrapers { common, .. }
                | Commands::Dumbbells { common, .. }
                | Commands::Dir { common, .. },
            ) => common,
            Some(Commands::Completions { .. }) | None => &self.common,
        }
    }
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve an exact cover file in DLX text format.
    File {
        /// Path to the `.xc` file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve an exact cover problem given as DLX text.
    Text {
        /// The item line followed by one option per line (e.g. "a b | c\na c\nb").
        /// A literal `\n` also separates lines.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve N-Queens, optionally finishing a board with queens already placed.
    Queens {
        /// Board side length. Defaults to 8, or to the size of `--board`.
        #[arg(short = 'n', long)]
        size: Option<usize>,

        /// A board file of `.` and `Q` squares.
        #[arg(short, long)]
        board: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a Sudoku puzzle.
    Sudoku {
        /// Path to the Sudoku file, one row per line with `0` or `.` for empty cells.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a skyscrapers puzzle.
    Skyscrapers {
        /// Path to the puzzle file: size, four clue lines, then the given heights.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Place dumbbells over the marked cells of a grid.
    Dumbbells {
        /// Path to the puzzle file: the number of dumbbells, then the grid.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.xc` and `.sudoku` file under a directory.
    Dir {
        /// The directory to walk.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Branch column heuristics selectable from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ColumnStrategy {
    /// The column with the fewest remaining rows.
    #[default]
    MinimumRemaining,
    /// The first remaining column.
    First,
}

/// Row orders selectable from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum RowStrategy {
    /// Rows in the order the actions were declared.
    #[default]
    Stable,
    /// Rows shuffled by a seeded generator.
    Random,
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug logging of the search.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check every solution found against the problem.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print every solution instead of only the first.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// Stop after this many solutions.
    #[arg(long)]
    pub(crate) limit: Option<usize>,

    /// How the column to branch on is chosen.
    #[arg(long, value_enum, default_value_t = ColumnStrategy::MinimumRemaining)]
    pub(crate) columns: ColumnStrategy,

    /// The order in which the rows of the branch column are tried.
    #[arg(long, value_enum, default_value_t = RowStrategy::Stable)]
    pub(crate) rows: RowStrategy,

    /// Seed for `--rows random`. Without it every run shuffles differently.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

/// Builds the configured engine and runs it.
fn run<R, A, H>(
    problem: &ExactCover<R, A>,
    hooks: &mut H,
    common: &CommonOptions,
) -> (SearchResult<A>, Duration)
where
    R: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    H: SearchHooks<A>,
{
    let solver = problem.solver();
    let random = || {
        common
            .seed
            .map_or_else(RandomOrder::default, RandomOrder::with_seed)
    };

    match (common.columns, common.rows) {
        (ColumnStrategy::MinimumRemaining, RowStrategy::Stable) => {
            timed_search(solver, hooks, common.limit)
        }
        (ColumnStrategy::MinimumRemaining, RowStrategy::Random) => {
            timed_search(solver.with_row_ordering(random()), hooks, common.limit)
        }
        (ColumnStrategy::First, RowStrategy::Stable) => {
            timed_search(solver.with_column_selection(FirstColumn), hooks, common.limit)
        }
        (ColumnStrategy::First, RowStrategy::Random) => timed_search(
            solver
                .with_column_selection(FirstColumn)
                .with_row_ordering(random()),
            hooks,
            common.limit,
        ),
    }
}

fn timed_search<R, A, S, O, H>(
    solver: Dlx<R, A, S, O>,
    hooks: &mut H,
    limit: Option<usize>,
) -> (SearchResult<A>, Duration)
where
    A: Clone + Debug,
    S: ColumnSelection<R>,
    O: RowOrdering<A>,
    H: SearchHooks<A>,
{
    let time = Instant::now();
    let result = match limit {
        Some(limit) => solver.solve(&mut SolutionLimit::new(hooks, limit)),
        None => solver.solve(hooks),
    };
    (result, time.elapsed())
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
fn memory_usage() -> (f64, f64) {
    let read = || -> Result<(usize, usize), tikv_jemalloc_ctl::Error> {
        epoch::advance()?;
        Ok((stats::allocated::read()?, stats::resident::read()?))
    };

    match read() {
        Ok((allocated, resident)) => (allocated as f64 / MIB, resident as f64 / MIB),
        Err(e) => {
            log::warn!("jemalloc statistics unavailable: {e}");
            (0.0, 0.0)
        }
    }
}

/// Solves a problem, then verifies and reports the results.
///
/// `render` turns a solution into the text printed for it.
///
/// # Errors
///
/// If a solution fails verification.
pub(crate) fn solve_and_report<R, A, H>(
    problem: &ExactCover<R, A>,
    hooks: &mut H,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
    render: impl Fn(&[A]) -> String,
) -> Result<(), String>
where
    R: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    H: SearchHooks<A>,
{
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    log::info!(
        "{} mandatory and {} optional requirement(s), {} action(s), {} node(s)",
        problem.mandatory().len(),
        problem.optional().len(),
        problem.actions().len(),
        problem.incidence_count(),
    );

    let (result, elapsed) = run(problem, hooks, common);
    let (allocated, resident) = memory_usage();

    if common.verify {
        verify_solutions(problem, &result.solutions)?;
    }

    if common.stats {
        print_stats(parse_time, elapsed, problem, &result, allocated, resident);
    }

    print_solutions(&result, common.print_solution, render);
    Ok(())
}

/// Checks every solution against `problem`.
///
/// # Errors
///
/// Names how many solutions are not exact covers.
pub(crate) fn verify_solutions<R, A>(
    problem: &ExactCover<R, A>,
    solutions: &[Vec<A>],
) -> Result<(), String>
where
    R: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    let failed = solutions.iter().filter(|s| !problem.verify(s)).count();
    println!("Verified: {:?}", failed == 0);
    if failed > 0 {
        return Err(format!(
            "{failed} of {} solution(s) failed verification",
            solutions.len()
        ));
    }
    Ok(())
}

fn print_solutions<A>(result: &SearchResult<A>, print_all: bool, render: impl Fn(&[A]) -> String) {
    let Some((first, rest)) = result.solutions.split_first() else {
        println!("\nNO SOLUTION");
        return;
    };

    println!("Solution:\n{}", render(first));
    if print_all {
        for (index, solution) in rest.iter().enumerate() {
            println!("\nSolution {}:\n{}", index + 2, render(solution));
        }
    }

    println!(
        "\nSOLVED: {} solution(s){}",
        result.solutions.len(),
        if result.aborted { ", search stopped early" } else { "" }
    );
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats<R, A>(
    parse_time: Duration,
    elapsed: Duration,
    problem: &ExactCover<R, A>,
    result: &SearchResult<A>,
    allocated: f64,
    resident: f64,
) where
    R: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    let elapsed_secs = elapsed.as_secs_f64();
    let s = &result.stats;

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Requirements (mandatory)", problem.mandatory().len());
    stat_line("Requirements (optional)", problem.optional().len());
    stat_line("Actions", problem.actions().len());
    stat_line("Matrix nodes", problem.incidence_count());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Frames", s.frames, elapsed_secs);
    stat_line_with_rate("Selections", s.selections, elapsed_secs);
    stat_line_with_rate("Pruned", s.pruned, elapsed_secs);
    stat_line("Solutions", s.solutions);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

fn check_file(path: &Path, kind: &str) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("{kind} file does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Provided path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Inline input may spell line breaks as a literal `\n`.
fn unescape_lines(input: &str) -> String {
    input.replace("\\n", "\n")
}

/// Solve a DLX text file.
///
/// # Errors
///
/// If the file doesn't exist or doesn't parse.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    check_file(path, "Exact cover")?;

    let time = Instant::now();
    let problem =
        text::parse_file(path).map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    solve_and_report(&problem, &mut (), common, Some(path), parse_time, |s| {
        text::format_solution(&problem, s)
    })
}

/// Solve DLX text given on the command line.
///
/// # Errors
///
/// If the text doesn't parse.
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let problem = text::parse_str(&unescape_lines(input))
        .map_err(|e| format!("Error parsing input: {e}"))?;
    let parse_time = time.elapsed();

    solve_and_report(&problem, &mut (), common, None, parse_time, |s| {
        text::format_solution(&problem, s)
    })
}

/// Solve N-Queens on an empty board of `size`, or finish the board in `board`.
///
/// # Errors
///
/// If the board file is missing or malformed, or disagrees with `size`.
pub(crate) fn solve_queens(
    size: Option<usize>,
    board: Option<&Path>,
    common: &CommonOptions,
) -> Result<(), String> {
    let time = Instant::now();
    let queens = match board {
        Some(path) => {
            check_file(path, "Board")?;
            let queens =
                parse_board_file(path).map_err(|e| format!("Error parsing board file: {e}"))?;
            if let Some(size) = size.filter(|&size| size != queens.size()) {
                return Err(format!(
                    "Board is {0}x{0}, but a size of {size} was requested",
                    queens.size()
                ));
            }
            queens
        }
        None => Queens::new(size.unwrap_or(DEFAULT_QUEENS)).map_err(|e| e.to_string())?,
    };

    println!("Board:\n{queens}");

    let problem = queens.to_problem().map_err(|e| e.to_string())?;
    let parse_time = time.elapsed();

    solve_and_report(&problem, &mut (), common, board, parse_time, |s| {
        queens.decode(s).to_string()
    })
}

/// Solve a sudoku file.
///
/// # Errors
///
/// If the sudoku doesn't exist or doesn't parse.
pub(crate) fn solve_sudoku(path: &Path, common: &CommonOptions) -> Result<(), String> {
    check_file(path, "Sudoku")?;

    let time = Instant::now();
    let sudoku = parse_sudoku_file(path).map_err(|e| format!("Error parsing Sudoku file: {e}"))?;
    println!("Parsed Sudoku:\n{sudoku}");

    let problem = sudoku.to_problem().map_err(|e| e.to_string())?;
    let parse_time = time.elapsed();

    solve_and_report(&problem, &mut (), common, Some(path), parse_time, |s| {
        sudoku.decode(s).to_string()
    })
}

/// Solve a skyscrapers file, checking the clues as rows and columns fill up.
///
/// # Errors
///
/// If the puzzle doesn't exist or doesn't parse.
pub(crate) fn solve_skyscrapers(path: &Path, common: &CommonOptions) -> Result<(), String> {
    check_file(path, "Skyscrapers")?;

    let time = Instant::now();
    let puzzle = parse_skyscrapers_file(path)
        .map_err(|e| format!("Error parsing skyscrapers file: {e}"))?;
    let problem = puzzle.to_problem().map_err(|e| e.to_string())?;
    let parse_time = time.elapsed();

    let mut hooks = puzzle.hooks();
    solve_and_report(&problem, &mut hooks, common, Some(path), parse_time, |s| {
        puzzle.decode(s).to_string()
    })
}

/// Solve a dumbbells file, skipping layouts that only swap pieces.
///
/// # Errors
///
/// If the puzzle doesn't exist or doesn't parse.
pub(crate) fn solve_dumbbells(path: &Path, common: &CommonOptions) -> Result<(), String> {
    check_file(path, "Dumbbells")?;

    let time = Instant::now();
    let puzzle =
        parse_dumbbells_file(path).map_err(|e| format!("Error parsing dumbbells file: {e}"))?;
    println!("Parsed grid:\n{puzzle}");

    let problem = puzzle.to_problem().map_err(|e| e.to_string())?;
    let parse_time = time.elapsed();

    solve_and_report(
        &problem,
        &mut SkipSwappedPieces,
        common,
        Some(path),
        parse_time,
        |s| puzzle.decode(s).to_string(),
    )
}

/// Solves a directory of puzzle files.
/// Every `.xc` file is read as DLX text and every `.sudoku` file as a Sudoku board;
/// anything else is skipped.
///
/// # Errors
///
/// If `path` is not a directory, or on the first file that fails.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!(
            "Provided path is not a directory: {}",
            path.display()
        ));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
    {
        let file_path = entry.path();
        match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("xc") => solve_file(file_path, common)?,
            Some("sudoku") => solve_sudoku(file_path, common)?,
            _ => eprintln!("Skipping unsupported file: {}", file_path.display()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn common(args: &[&str]) -> CommonOptions {
        let args = ["dlx-solver", "text", "--input", "a"]
            .into_iter()
            .chain(args.iter().copied());
        let cli = Cli::try_parse_from(args).unwrap();
        cli.common().clone()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let options = common(&[]);
        assert!(options.verify);
        assert!(options.stats);
        assert!(!options.print_solution);
        assert_eq!(options.limit, None);
        assert_eq!(options.columns, ColumnStrategy::MinimumRemaining);
        assert_eq!(options.rows, RowStrategy::Stable);
    }

    #[test]
    fn test_strategy_options() {
        let options = common(&[
            "--columns",
            "first",
            "--rows",
            "random",
            "--seed",
            "7",
            "--limit",
            "3",
            "--stats",
            "false",
        ]);
        assert_eq!(options.columns, ColumnStrategy::First);
        assert_eq!(options.rows, RowStrategy::Random);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.limit, Some(3));
        assert!(!options.stats);
    }

    #[test]
    fn test_bare_path() {
        let cli = Cli::try_parse_from(["dlx-solver", "puzzle.xc"]).unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("puzzle.xc")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_queens_arguments() {
        let cli = Cli::try_parse_from(["dlx-solver", "queens", "-n", "6", "-p"]).unwrap();
        let Some(Commands::Queens {
            size,
            board,
            common,
        }) = cli.command
        else {
            panic!("expected the queens subcommand");
        };
        assert_eq!(size, Some(6));
        assert_eq!(board, None);
        assert!(common.print_solution);
    }

    #[test]
    fn test_unescape_lines() {
        assert_eq!(unescape_lines("a b\\na\\nb"), "a b\na\nb");
        assert_eq!(unescape_lines("a b\na"), "a b\na");
    }

    #[test]
    fn test_every_strategy_finds_all_solutions() {
        let problem = text::parse_str("a b c\na b\nc\na\nb c\nb\n").unwrap();
        for columns in [ColumnStrategy::MinimumRemaining, ColumnStrategy::First] {
            for rows in [RowStrategy::Stable, RowStrategy::Random] {
                let mut options = common(&[]);
                options.columns = columns;
                options.rows = rows;
                options.seed = Some(3);

                let (result, _) = run(&problem, &mut (), &options);
                assert_eq!(result.solutions.len(), 3, "{columns:?} {rows:?}");
                assert!(verify_solutions(&problem, &result.solutions).is_ok());
            }
        }
    }

    #[test]
    fn test_limit() {
        let problem = text::parse_str("a b c\na b\nc\na\nb c\nb\n").unwrap();
        let mut options = common(&[]);
        options.limit = Some(1);

        let (result, _) = run(&problem, &mut (), &options);
        assert_eq!(result.solutions.len(), 1);
        assert!(result.aborted);
    }

    #[test]
    fn test_solve_text_errors() {
        let options = common(&[]);
        assert!(solve_text("a b\\na\\nb", &options).is_ok());
        assert!(solve_text("a b\\nc", &options).is_err());
    }

    #[test]
    fn test_missing_files() {
        let options = common(&[]);
        let missing = Path::new("does/not/exist");
        assert!(solve_file(missing, &options).is_err());
        assert!(solve_sudoku(missing, &options).is_err());
        assert!(solve_dir(missing, &options).is_err());
        assert!(solve_queens(None, Some(missing), &options).is_err());
    }
}
