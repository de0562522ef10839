use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use areashell::uniformize::{uniformize, CollinearMemo};
use areashell::{Expression, Point, SumOfProducts};

const ROUNDS: usize = 64;

fn points() -> Vec<Point> {
    ["A", "B", "C", "D", "E"].into_iter().map(Point::free).collect()
}

fn pick<'a>(rng: &mut ChaCha8Rng, points: &'a [Point]) -> &'a Point {
    &points[rng.gen_range(0..points.len())]
}

/// A random fraction-free expression over areas, Pythagoras differences and
/// small integers.
fn random_expr(rng: &mut ChaCha8Rng, points: &[Point], depth: usize) -> Expression {
    let leaf = depth == 0 || rng.gen_bool(0.3);
    if leaf {
        return match rng.gen_range(0..3) {
            0 => Expression::from(rng.gen_range(-3..=3_i64)),
            1 => Expression::area(
                pick(rng, points).clone(),
                pick(rng, points).clone(),
                pick(rng, points).clone(),
            ),
            _ => Expression::pythagoras(
                pick(rng, points).clone(),
                pick(rng, points).clone(),
                pick(rng, points).clone(),
            ),
        };
    }
    match rng.gen_range(0..4) {
        0 => Expression::negate(random_expr(rng, points, depth - 1)),
        1 => Expression::sum(
            random_expr(rng, points, depth - 1),
            random_expr(rng, points, depth - 1),
        ),
        2 => Expression::difference(
            random_expr(rng, points, depth - 1),
            random_expr(rng, points, depth - 1),
        ),
        _ => Expression::product(
            random_expr(rng, points, depth - 1),
            random_expr(rng, points, depth - 1),
        ),
    }
}

fn sop(e: &Expression) -> SumOfProducts {
    uniformize(e).to_sum_of_products().unwrap().normalized()
}

#[test]
fn simplify_is_idempotent() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let points = points();
    for _ in 0..ROUNDS {
        let e = random_expr(&mut rng, &points, 4);
        let once = e.simplify().unwrap();
        assert_eq!(once.simplify().unwrap(), once, "{e}");
    }
}

#[test]
fn uniformize_is_idempotent() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let points = points();
    let memo = CollinearMemo::new();
    for _ in 0..ROUNDS {
        let e = random_expr(&mut rng, &points, 4);
        let once = e.uniformize(&memo);
        assert_eq!(once.uniformize(&memo), once, "{e}");
    }
}

#[test]
fn area_is_antisymmetric() {
    let points = points();
    let memo = CollinearMemo::new();
    for a in &points {
        for b in &points {
            for c in &points {
                let abc = Expression::area(a.clone(), b.clone(), c.clone())
                    .uniformize(&memo)
                    .simplify()
                    .unwrap();
                let acb = Expression::area(a.clone(), c.clone(), b.clone())
                    .uniformize(&memo)
                    .simplify()
                    .unwrap();
                assert_eq!(Expression::negate(abc).simplify().unwrap(), acb);
            }
        }
    }
}

#[test]
fn degenerate_areas_vanish() {
    let points = points();
    for a in &points {
        for b in &points {
            for e in [
                Expression::area(a.clone(), a.clone(), b.clone()),
                Expression::area(a.clone(), b.clone(), a.clone()),
            ] {
                assert_eq!(uniformize(&e).simplify().unwrap(), Expression::zero(), "{e}");
            }
        }
    }
}

#[test]
fn ratio_identities() {
    let points = points();
    for a in &points {
        for b in points.iter().filter(|b| *b != a) {
            let same = Expression::ratio(a.clone(), b.clone(), a.clone(), b.clone());
            assert_eq!(uniformize(&same).simplify().unwrap(), Expression::one());
            let flipped = Expression::ratio(a.clone(), b.clone(), b.clone(), a.clone());
            assert_eq!(uniformize(&flipped).simplify().unwrap(), Expression::from(-1));
        }
    }
}

/// `(1 / f) * (e * f)` as one fraction simplifies back to `e`.
fn assert_round_trip(e: &Expression, f: &Expression) {
    let wrapped = Expression::product(
        Expression::fraction(Expression::one(), f.clone()),
        Expression::product(e.clone(), f.clone()),
    );
    let single = wrapped.reduce_to_single_fraction().unwrap();
    let (numerator, denominator) = single.numerator_denominator();
    assert!(!numerator.contains_fraction() && !denominator.contains_fraction());
    assert_eq!(
        single.simplify().unwrap(),
        e.simplify().unwrap(),
        "{e} over {f} became {single}"
    );
}

#[test]
fn single_fraction_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let points = points();
    let mut checked = 0;
    while checked < ROUNDS {
        let e = uniformize(&random_expr(&mut rng, &points, 3));
        let f = uniformize(&random_expr(&mut rng, &points, 2));
        if sop(&f).is_zero() {
            continue;
        }
        assert_round_trip(&e, &f);
        checked += 1;
    }
}

#[test]
fn single_fraction_round_trip_negative_constant() {
    let points = points();
    let abd = uniformize(&Expression::area(
        points[0].clone(),
        points[1].clone(),
        points[3].clone(),
    ));
    let cbd = uniformize(&Expression::pythagoras(
        points[2].clone(),
        points[1].clone(),
        points[3].clone(),
    ));
    let minus_two = Expression::from(-2);
    assert_round_trip(&Expression::negate(abd.clone()), &minus_two);
    assert_round_trip(&abd, &Expression::from(-3));
    assert_round_trip(
        &cbd,
        &Expression::sum(Expression::negate(Expression::from(2)), minus_two),
    );
    assert_round_trip(&Expression::product(abd, cbd), &Expression::from(-1));
}

#[test]
fn equal_polynomials_share_terms() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let points = points();
    for _ in 0..ROUNDS {
        let x = random_expr(&mut rng, &points, 3);
        let y = random_expr(&mut rng, &points, 3);
        // (x + y)(x - y) = x^2 - y^2
        let lhs = Expression::product(
            Expression::sum(x.clone(), y.clone()),
            Expression::difference(x.clone(), y.clone()),
        );
        let rhs = Expression::difference(
            Expression::product(x.clone(), x),
            Expression::product(y.clone(), y),
        );
        assert_eq!(sop(&lhs), sop(&rhs));

        // scaling does not change the normalized form
        let scaled = Expression::product(Expression::from(-6), lhs);
        assert_eq!(sop(&scaled), sop(&rhs));
    }
}
