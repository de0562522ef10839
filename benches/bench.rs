use criterion::black_box as bb;
use criterion::Criterion;
use criterion::{criterion_group, criterion_main};

use areashell::{Expression, Figure, Prover, ProverConf, Statement, Theorem};

fn half() -> Expression {
    Expression::fraction(Expression::from(1), Expression::from(2))
}

/// Midpoints M of AB and N of AC: MN / BC = 1/2.
fn midline_ratio() -> Theorem {
    let mut figure = Figure::new();
    let a = figure.free("A").unwrap();
    let b = figure.free("B").unwrap();
    let c = figure.free("C").unwrap();
    let m = figure.midpoint("M", &a, &b).unwrap();
    let n = figure.midpoint("N", &a, &c).unwrap();
    let statement = Statement::Equal(Expression::ratio(m, n, b, c), half());
    Theorem::new("midline ratio", figure, statement)
}

/// Same midpoints: MN parallel to BC.
fn midline_parallel() -> Theorem {
    let mut figure = Figure::new();
    let a = figure.free("A").unwrap();
    let b = figure.free("B").unwrap();
    let c = figure.free("C").unwrap();
    let m = figure.midpoint("M", &a, &b).unwrap();
    let n = figure.midpoint("N", &a, &c).unwrap();
    Theorem::new("midline parallel", figure, Statement::Parallel(m, n, b, c))
}

/// The diagonals of a parallelogram bisect each other.
fn parallelogram_diagonals() -> Theorem {
    let mut figure = Figure::new();
    let a = figure.free("A").unwrap();
    let b = figure.free("B").unwrap();
    let c = figure.free("C").unwrap();
    let d = figure.pratio("D", &c, &b, &a, Expression::one()).unwrap();
    let o = figure.intersection("O", &a, &c, &b, &d).unwrap();
    let statement = Statement::Equal(Expression::ratio(a.clone(), o, a, c), half());
    Theorem::new("parallelogram diagonals", figure, statement)
}

fn proving(c: &mut Criterion) {
    let prover = Prover::new(ProverConf::builder().numeric_check(false).build());
    for theorem in [midline_ratio(), midline_parallel(), parallelogram_diagonals()] {
        c.bench_function(theorem.name(), |b| {
            b.iter(|| prover.prove(bb(&theorem)).unwrap())
        });
    }
}

fn numeric(c: &mut Criterion) {
    let theorem = parallelogram_diagonals();
    let prover = Prover::default();
    c.bench_function("parallelogram diagonals with numeric check", |b| {
        b.iter(|| prover.prove(bb(&theorem)).unwrap())
    });
}

criterion_group!(benches, proving, numeric);
criterion_main!(benches);
