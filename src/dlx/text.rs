#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reader for exact cover instances written as plain text.
//!
//! The layout follows Knuth's DLX programs:
//! - Lines whose first non-blank character is `|` are comments; blank lines are skipped.
//!   An item line therefore always starts with at least one primary item.
//! - The first remaining line names the items. Items before a lone `|` token are primary
//!   (mandatory), items after it are secondary (optional).
//! - Every further line is an option: the names of the items it covers.
//!
//! Options become actions identified by their 0-based index in the file.
//!
//! ```text
//! | Knuth's example
//! a b c d e f g
//! c e
//! a d g
//! b c f
//! a d f
//! b g
//! d e g
//! ```

use crate::dlx::error::DlxError;
use crate::dlx::problem::ExactCover;
use itertools::Itertools;
use std::io::{self, BufRead};
use std::path::Path;

/// An instance read from text: item names as requirements, option indices as actions.
pub type TextProblem = ExactCover<String, usize>;

/// Parses a DLX text instance from a `BufRead` source.
///
/// # Errors
///
/// - [`DlxError::Io`] if reading fails.
/// - [`DlxError::Parse`] if the item line is missing, names an item twice or has more
///   than one `|`, or if an option is malformed (unknown item, item repeated, empty).
pub fn parse_dlx<B: BufRead>(reader: B) -> Result<TextProblem, DlxError> {
    let mut problem: Option<TextProblem> = None;
    let mut line_count = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        line_count = number;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('|') {
            continue;
        }

        match problem.as_mut() {
            None => problem = Some(parse_items(trimmed, number)?),
            Some(problem) => {
                let option = problem.actions().len();
                problem
                    .add_action(option, trimmed.split_whitespace().map(str::to_owned))
                    .map_err(|err| DlxError::parse(number, err.to_string()))?;
            }
        }
    }

    problem.ok_or_else(|| DlxError::parse(line_count + 1, "missing item line"))
}

/// Parses a DLX text instance held in a string.
///
/// # Errors
///
/// See [`parse_dlx`].
pub fn parse_str(input: &str) -> Result<TextProblem, DlxError> {
    parse_dlx(input.as_bytes())
}

/// Opens and parses a DLX text file.
///
/// # Errors
///
/// See [`parse_dlx`]; opening the file can also fail with [`DlxError::Io`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<TextProblem, DlxError> {
    let file = std::fs::File::open(path)?;
    parse_dlx(io::BufReader::new(file))
}

/// Renders one option the way it was written: its item names separated by spaces.
#[must_use]
pub fn format_option(problem: &TextProblem, option: usize) -> String {
    problem
        .satisfied_by(&option)
        .map(|items| items.into_iter().join(" "))
        .unwrap_or_default()
}

/// Renders a solution as one option per line, sorted by option index.
#[must_use]
pub fn format_solution(problem: &TextProblem, solution: &[usize]) -> String {
    solution
        .iter()
        .sorted_unstable()
        .map(|&option| format_option(problem, option))
        .join("\n")
}

fn parse_items(line: &str, number: usize) -> Result<TextProblem, DlxError> {
    let tokens = line.split_whitespace().collect_vec();
    let separators = tokens.iter().filter(|&&token| token == "|").count();
    if separators > 1 {
        return Err(DlxError::parse(number, "more than one `|` in the item line"));
    }

    let (primary, secondary) = match tokens.iter().position(|&token| token == "|") {
        Some(split) => (&tokens[..split], &tokens[split + 1..]),
        None => (&tokens[..], &[][..]),
    };

    ExactCover::new(
        primary.iter().map(|&item| item.to_owned()),
        secondary.iter().map(|&item| item.to_owned()),
    )
    .map_err(|err| DlxError::parse(number, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNUTH: &str = "\
| Knuth's example
a b c d e f g

c e
a d g
b c f
a d f
b g
d e g
";

    #[test]
    fn test_parse_knuth() {
        let problem = parse_str(KNUTH).unwrap();
        assert_eq!(problem.mandatory().len(), 7);
        assert!(problem.optional().is_empty());
        assert_eq!(problem.actions(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(format_option(&problem, 3), "a d f");

        let result = problem.solver().solve(&mut ());
        assert_eq!(result.solutions.len(), 1);
        assert_eq!(
            format_solution(&problem, &result.solutions[0]),
            "c e\na d f\nb g"
        );
    }

    #[test]
    fn test_secondary_items() {
        let problem = parse_str("p q | x\np x\nq x\np\nq\n").unwrap();
        assert_eq!(problem.mandatory(), &["p".to_owned(), "q".to_owned()]);
        assert_eq!(problem.optional(), &["x".to_owned()]);

        let result = problem.solver().solve(&mut ());
        assert_eq!(result.solutions.len(), 3);
        assert!(result.solutions.iter().all(|s| problem.verify(s)));
    }

    #[test]
    fn test_unknown_item() {
        let err = parse_str("a b\na\nb z\n").unwrap_err();
        assert!(matches!(err, DlxError::Parse { line: 3, .. }));
        assert!(err.to_string().contains("\"z\""));
    }

    #[test]
    fn test_duplicate_item() {
        let err = parse_str("a b a\n").unwrap_err();
        assert!(matches!(err, DlxError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_two_separators() {
        let err = parse_str("a | b | c\n").unwrap_err();
        assert!(matches!(err, DlxError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_item_line() {
        let err = parse_str("| only a comment\n\n").unwrap_err();
        assert!(matches!(err, DlxError::Parse { line: 3, .. }));
        assert!(parse_str("").is_err());
    }

    #[test]
    fn test_repeated_item_in_option() {
        let err = parse_str("a b\na a\n").unwrap_err();
        assert!(matches!(err, DlxError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_file("/definitely/not/here.xc").unwrap_err();
        assert!(matches!(err, DlxError::Io(_)));
    }
}
