use criterion::{Criterion, criterion_group, criterion_main};
use dlx_solver::dlx::{FirstColumn, RandomOrder, text};
use dlx_solver::dumbbells::solver::{SkipSwappedPieces, parse_dumbbells};
use dlx_solver::queens::solver::Queens;
use dlx_solver::sudoku::solver::{Board, EXAMPLE_NINE, EXAMPLE_SIXTEEN, Sudoku};
use std::hint::black_box;
use std::time::Duration;

fn bench_sudoku(c: &mut Criterion) {
    let nine = Sudoku::new(Board::from(EXAMPLE_NINE)).unwrap();
    let nine = nine.to_problem().unwrap();

    let sixteen = Sudoku::new(Board::from(EXAMPLE_SIXTEEN)).unwrap();
    let sixteen = sixteen.to_problem().unwrap();

    c.bench_function("sudoku 9x9 - build", |b| {
        b.iter(|| black_box(nine.solver()));
    });

    c.bench_function("sudoku 9x9 - all solutions", |b| {
        b.iter(|| black_box(nine.solver().solve(&mut ())));
    });

    c.bench_function("sudoku 16x16 - first solution", |b| {
        b.iter(|| black_box(sixteen.solver().first()));
    });
}

fn bench_queens(c: &mut Criterion) {
    let mut group = c.benchmark_group("queens");
    group.measurement_time(Duration::from_secs(10));

    let eight = Queens::new(8).unwrap().to_problem().unwrap();
    let ten = Queens::new(10).unwrap().to_problem().unwrap();

    group.bench_function("8 - minimum remaining", |b| {
        b.iter(|| black_box(eight.solver().solve(&mut ())));
    });

    group.bench_function("8 - first column", |b| {
        b.iter(|| {
            black_box(
                eight
                    .solver()
                    .with_column_selection(FirstColumn)
                    .solve(&mut ()),
            )
        });
    });

    group.bench_function("8 - random rows", |b| {
        b.iter(|| {
            black_box(
                eight
                    .solver()
                    .with_row_ordering(RandomOrder::with_seed(42))
                    .solve(&mut ()),
            )
        });
    });

    group.bench_function("10 - all solutions", |b| {
        b.iter(|| black_box(ten.solver().solve(&mut ())));
    });

    group.bench_function("10 - first solution", |b| {
        b.iter(|| black_box(ten.solver().first()));
    });

    group.finish();
}

fn bench_pruning(c: &mut Criterion) {
    let puzzle = parse_dumbbells("3\n.......\n.o.o.o.\n.......\n.o.o.o.\n.......\n".as_bytes())
        .unwrap();
    let problem = puzzle.to_problem().unwrap();

    c.bench_function("dumbbells - unpruned", |b| {
        b.iter(|| black_box(problem.solver().solve(&mut ())));
    });

    c.bench_function("dumbbells - skip swapped pieces", |b| {
        b.iter(|| black_box(problem.solver().solve(&mut SkipSwappedPieces)));
    });
}

fn bench_text(c: &mut Criterion) {
    let input = "\
| Knuth's example from the Dancing Links paper
a b c d e f g
c e
a d g
b c f
a d f
b g
d e g
";

    c.bench_function("text - parse and solve", |b| {
        b.iter(|| {
            let problem = text::parse_str(black_box(input)).unwrap();
            black_box(problem.into_solver().solve(&mut ()))
        });
    });
}

criterion_group!(benches, bench_sudoku, bench_queens, bench_pruning, bench_text);

criterion_main!(benches);
