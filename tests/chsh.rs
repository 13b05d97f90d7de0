//! End-to-end solves of the CHSH Bell inequality relaxation

use approx::assert_abs_diff_eq;
use moment_sdp::*;

/// Level-1 relaxation over the words {1, A0, A1, B0, B1}.
///
/// A0, A1 and B0, B1 are projectors (outcome 0 of Alice's and Bob's two
/// dichotomic measurements); Alice's operators commute with Bob's.
///
/// Monomials: 0 = 1, 1 = A0, 2 = A1, 3 = B0, 4 = B1, 5 = A0A1, 6 = B0B1,
/// 7 = A0B0, 8 = A0B1, 9 = A1B0, 10 = A1B1.
fn chsh_gram() -> MomentMatrix {
    MomentMatrix::from_lower_rows(&[
        vec![0],
        vec![1, 1],
        vec![2, 5, 2],
        vec![3, 7, 9, 3],
        vec![4, 8, 10, 6, 4],
    ])
    .with_identity(IDENTITY)
}

/// CHSH = Σ_xy (-1)^(xy) <(2A_x - 1)(2B_y - 1)>
///      = 2 - 4<A0> - 4<B0> + 4(<A0B0> + <A0B1> + <A1B0> - <A1B1>)
fn chsh_objective() -> Vec<i64> {
    vec![2, -4, 0, -4, 0, 0, 0, 4, 4, 4, -4]
}

fn tsirelson() -> f64 {
    8f64.sqrt()
}

#[test]
fn test_chsh_reaches_tsirelson_bound() {
    let relaxation = MomentRelaxation::new(chsh_gram(), chsh_objective());
    let encoder = SdpEncoder::new(&relaxation).unwrap();

    assert_eq!(encoder.dim(), 5);
    assert_eq!(encoder.constraint_count(), 10);

    let raw = encoder.solve_raw(&SolverConfig::default()).unwrap();
    assert_eq!(raw.status, SolutionStatus::Optimal);

    let outcome = decode(encoder.program(), &raw);
    let Outcome::OptimumFound {
        objective_value,
        primal_matrix,
        dual_vector,
    } = outcome
    else {
        panic!("expected an optimum");
    };

    assert_abs_diff_eq!(objective_value, tsirelson(), epsilon = 1e-9);

    // the solver's own objective comes from the primal side; at the default
    // tolerances the two differ by at most the stopping gap
    assert_abs_diff_eq!(raw.reported_objective, objective_value, epsilon = 1e-8);

    assert_eq!(dual_vector.len(), 11);
    assert_eq!(dual_vector[0], 1.0);
    // <A0> and <B0> are probabilities
    for &k in &[1, 2, 3, 4] {
        assert!(dual_vector[k] > -1e-7 && dual_vector[k] < 1.0 + 1e-7);
    }

    assert_eq!(primal_matrix.dim(), (5, 5));
    for r in 0..5 {
        assert!(primal_matrix[[r, r]] > -1e-7);
        for c in 0..5 {
            assert_eq!(primal_matrix[[r, c]], primal_matrix[[c, r]]);
        }
    }
}

#[test]
fn test_chsh_complementary_slackness() {
    let relaxation = MomentRelaxation::new(chsh_gram(), chsh_objective());
    let encoder = SdpEncoder::new(&relaxation).unwrap();
    let program = encoder.program();

    let Outcome::OptimumFound {
        primal_matrix,
        dual_vector,
        ..
    } = encoder.solve(&SolverConfig::default()).unwrap()
    else {
        panic!("expected an optimum");
    };

    // moment matrix M(y) = F_0 + Σ y_i F_i, where the constraint matrices hold -F_i
    let mut moment_matrix = program.fixed_matrix().to_dense();
    for (y, constraint) in dual_vector[1..].iter().zip(program.constraint_matrices()) {
        moment_matrix.scaled_add(-y, &constraint.to_dense());
    }

    assert_abs_diff_eq!(moment_matrix[[0, 0]], 1.0, epsilon = 1e-12);
    let slackness: f64 = (&moment_matrix * &primal_matrix).sum();
    assert_abs_diff_eq!(slackness, 0.0, epsilon = 1e-6);
}

#[test]
fn test_chsh_with_cyclotomic_coefficients() {
    let objective: Vec<CyclotomicNumber> = chsh_objective()
        .into_iter()
        .map(CyclotomicNumber::from_integer)
        .collect();
    let relaxation = MomentRelaxation::new(chsh_gram(), objective);

    let outcome = SdpEncoder::new(&relaxation)
        .unwrap()
        .solve(&SolverConfig::default())
        .unwrap();

    assert_abs_diff_eq!(outcome.objective_value().unwrap(), tsirelson(), epsilon = 1e-9);
}

#[test]
fn test_iteration_limit_is_unknown_status() {
    let relaxation = MomentRelaxation::new(chsh_gram(), chsh_objective());
    let encoder = SdpEncoder::new(&relaxation).unwrap();

    let config = SolverConfig::new().with_max_iterations(1);
    let raw = encoder.solve_raw(&config).unwrap();
    assert_eq!(raw.status, SolutionStatus::Unknown);

    let outcome = decode(encoder.program(), &raw);
    assert_eq!(
        outcome,
        Outcome::Failure {
            reason: "The status of the solution could not be determined.".to_string()
        }
    );
}

#[test]
fn test_repeated_solves_are_independent() {
    let relaxation = MomentRelaxation::new(chsh_gram(), chsh_objective());
    let encoder = SdpEncoder::new(&relaxation).unwrap();
    let config = SolverConfig::default();

    let first = encoder.solve_raw(&config).unwrap();
    let second = encoder.solve_raw(&config).unwrap();
    assert_eq!(first.status, second.status);
    assert_eq!(first.duals.len(), second.duals.len());
    assert_abs_diff_eq!(first.reported_objective, second.reported_objective, epsilon = 1e-10);
    for (a, b) in first.packed_primal.iter().zip(&second.packed_primal) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-10);
    }
}

#[test]
fn test_parallel_sessions() {
    let relaxation = MomentRelaxation::new(chsh_gram(), chsh_objective());
    let encoder = SdpEncoder::new(&relaxation).unwrap();

    let values: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..3)
            .map(|_| scope.spawn(|| encoder.solve(&SolverConfig::default()).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().objective_value().unwrap())
            .collect()
    });

    for value in values {
        assert_abs_diff_eq!(value, tsirelson(), epsilon = 1e-9);
    }
}
