#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! # dlx-solver
//!
//! `dlx-solver` is a command-line exact cover solver built on Knuth's Dancing Links
//! and Algorithm X. It reads general exact cover instances in DLX text format and
//! includes front-ends that encode puzzles as exact cover problems.
//!
//! ## Usage
//!
//! ```sh
//! dlx-solver [OPTIONS] [PATH] [SUBCOMMAND]
//! ```
//!
//! A bare `PATH` is solved as a DLX text file.
//!
//! ### Subcommands
//!
//! -   `file --path <p>`: solve a DLX text file.
//! -   `text --input <s>`: solve DLX text given inline.
//! -   `queens [--size <n>] [--board <p>]`: N-Queens, optionally finishing a board.
//! -   `sudoku --path <p>`: 4x4, 9x9, 16x16 or 25x25 Sudoku.
//! -   `skyscrapers --path <p>`: Latin square with visibility clues.
//! -   `dumbbells --path <p>`: place three-cell pieces over marked cells.
//! -   `dir --path <d>`: solve every `.xc` and `.sudoku` file under a directory.
//! -   `completions <shell>`: print a shell completion script.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: log the search (`RUST_LOG` overrides the level).
//! -   `--verify <bool>`: check every solution (default: `true`).
//! -   `--stats <bool>`: print problem and search statistics (default: `true`).
//! -   `-p, --print-solution`: print every solution, not only the first.
//! -   `--limit <n>`: stop after `n` solutions.
//! -   `--columns <minimum-remaining|first>`: branch column heuristic.
//! -   `--rows <stable|random>` and `--seed <u64>`: order of the rows tried.
//!
//! ## Example Invocations
//!
//! ```sh
//! dlx-solver problem.xc
//! dlx-solver text --input "a b c\na b\nc\nb c\na"
//! dlx-solver queens --size 10 --stats false
//! dlx-solver sudoku --path puzzle.sudoku --columns first
//! ```

use crate::command_line::cli::{
    Cli, Commands, solve_dir, solve_dumbbells, solve_file, solve_queens, solve_skyscrapers,
    solve_sudoku, solve_text,
};
use crate::command_line::logger::init_logger;
use clap::{CommandFactory, Parser};

mod command_line;

/// Global allocator using `tikv-jemallocator` for memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.common().debug);

    let result = match &cli.command {
        None => match &cli.path {
            Some(path) => solve_file(path, &cli.common),
            None => Err("No command provided. Use --help for more information.".to_owned()),
        },
        Some(Commands::File { path, common }) => solve_file(path, common),
        Some(Commands::Text { input, common }) => solve_text(input, common),
        Some(Commands::Queens {
            size,
            board,
            common,
        }) => solve_queens(*size, board.as_deref(), common),
        Some(Commands::Sudoku { path, common }) => solve_sudoku(path, common),
        Some(Commands::Skyscrapers { path, common }) => solve_skyscrapers(path, common),
        Some(Commands::Dumbbells { path, common }) => solve_dumbbells(path, common),
        Some(Commands::Dir { path, common }) => solve_dir(path, common),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_owned();
            clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
