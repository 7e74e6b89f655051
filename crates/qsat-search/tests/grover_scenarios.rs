//! End-to-end searches on the seeded statevector simulator.

use qsat_adapter_sim::SimulatorBackend;
use qsat_hal::HalError;
use qsat_logic::Template;
use qsat_search::{
    AmplificationProblem, Grover, PhaseOracle, SearchError, Synthesis, success_probability,
};

const PARTY: &str = "((Olivia & Abe) | (Jin & Amira)) & ~(Abe & Amira)";
const PARTY_SOLUTIONS: [&str; 4] = ["1100", "1110", "0011", "1011"];

const THREE_SAT: &str = "\
c example DIMACS-CNF 3-SAT
p cnf 3 5
-1 -2 -3 0
1 -2 3 0
1 2 -3 0
1 -2 -3 0
-1 2 3 0
";

fn problem(expr: &str) -> AmplificationProblem {
    AmplificationProblem::from_oracle(&PhaseOracle::from_expression(expr).unwrap())
}

#[tokio::test]
async fn test_party_finds_solution_in_one_round() {
    let backend = SimulatorBackend::new().with_seed(7);
    let result = Grover::default()
        .with_seed(7)
        .amplify(&backend, &problem(PARTY))
        .await
        .unwrap();

    assert_eq!(result.iterations, vec![1]);
    assert!(result.oracle_evaluation);
    let found = result.solution().unwrap();
    assert!(PARTY_SOLUTIONS.contains(&found));

    // One application rotates all amplitude onto the four solutions.
    let counts = result.final_counts().unwrap();
    assert_eq!(counts.total_shots(), 1024);
    for (bits, _) in counts.iter() {
        assert!(PARTY_SOLUTIONS.contains(&bits), "unexpected outcome {bits}");
    }
}

#[tokio::test]
async fn test_single_solution_with_optimal_power() {
    let backend = SimulatorBackend::new().with_seed(11);
    let result = Grover::default()
        .with_optimal(1)
        .with_shots(2000)
        .amplify(&backend, &problem("(w ^ x) & ~(y ^ z) & (x & y & z)"))
        .await
        .unwrap();

    assert_eq!(result.iterations, vec![3]);
    assert_eq!(result.solution(), Some("0111"));
    assert_eq!(result.assignment, Some(0b1110));
    let expected = success_probability(1, 4, 3);
    assert!((result.max_probability - expected).abs() < 0.05);
}

#[tokio::test]
async fn test_single_solution_with_growth_schedule() {
    let backend = SimulatorBackend::new().with_seed(3);
    let result = Grover::default()
        .with_seed(3)
        .amplify(&backend, &problem("(w ^ x) & ~(y ^ z) & (x & y & z)"))
        .await
        .unwrap();

    assert!(result.oracle_evaluation);
    assert_eq!(result.top_measurement.as_deref(), Some("0111"));
    assert_eq!(result.rounds(), result.iterations.len());
}

#[tokio::test]
async fn test_dimacs_problem() {
    let oracle = PhaseOracle::from_dimacs(THREE_SAT).unwrap();
    assert_eq!(oracle.truth_table().satisfying_bitstrings(), ["000", "110", "101"]);

    let backend = SimulatorBackend::new().with_seed(5);
    let result = Grover::default()
        .with_optimal(3)
        .amplify(&backend, &AmplificationProblem::from_oracle(&oracle))
        .await
        .unwrap();

    assert_eq!(result.iterations, vec![1]);
    assert!(result.oracle_evaluation);
    assert!(["000", "110", "101"].contains(&result.solution().unwrap()));
}

#[tokio::test]
async fn test_template_problem() {
    let template = Template::new("{a} & {b} & ~{c}").unwrap();
    let expr = template
        .render_pairs(&[("a", "x"), ("b", "y"), ("c", "z")])
        .unwrap();
    let oracle = PhaseOracle::from_expression(&expr).unwrap();
    assert_eq!(oracle.variables(), ["x", "y", "z"]);

    let backend = SimulatorBackend::new().with_seed(13);
    let result = Grover::default()
        .with_optimal(1)
        .amplify(&backend, &AmplificationProblem::from_oracle(&oracle))
        .await
        .unwrap();

    assert_eq!(result.iterations, vec![2]);
    assert_eq!(result.solution(), Some("110"));
}

#[tokio::test]
async fn test_minterm_and_anf_agree() {
    for synthesis in [Synthesis::Anf, Synthesis::Minterm] {
        let expr = qsat_logic::parse("(w ^ x) & ~(y ^ z) & (x & y & z)").unwrap();
        let oracle = PhaseOracle::with_synthesis(expr, synthesis).unwrap();
        let backend = SimulatorBackend::new().with_seed(21);
        let result = Grover::default()
            .with_optimal(1)
            .amplify(&backend, &AmplificationProblem::from_oracle(&oracle))
            .await
            .unwrap();
        assert_eq!(result.solution(), Some("0111"), "{synthesis} oracle");
    }
}

#[tokio::test]
async fn test_unsatisfiable_exhausts_schedule() {
    let backend = SimulatorBackend::new().with_seed(1);
    let result = Grover::default()
        .with_seed(1)
        .amplify(&backend, &problem("a & ~a & b"))
        .await
        .unwrap();

    // ⌈2^(2/2)⌉ = 2 caps the growth powers 1, 1, 1, 2, 2, 2.
    assert_eq!(result.iterations, vec![1, 1, 1, 2, 2, 2]);
    assert!(!result.oracle_evaluation);
    assert!(result.solution().is_none());
    assert!(result.top_measurement.is_some());
}

#[tokio::test]
async fn test_sampled_powers_are_reproducible() {
    let run = || async {
        let backend = SimulatorBackend::new().with_seed(42);
        Grover::default()
            .with_iterations(vec![3, 3, 3, 3])
            .with_sample_from_iterations(true)
            .with_seed(42)
            .amplify(&backend, &problem(PARTY))
            .await
            .unwrap()
    };
    let first = run().await;
    let second = run().await;

    assert_eq!(first, second);
    assert!(first.applied_powers.iter().all(|&p| p < 3));
    assert_eq!(first.iterations.len(), first.applied_powers.len());
}

#[tokio::test]
async fn test_backend_errors_propagate() {
    let backend = SimulatorBackend::new();
    let zero_shots = Grover::default()
        .with_shots(0)
        .amplify(&backend, &problem("a & b"))
        .await;
    assert!(matches!(
        zero_shots,
        Err(SearchError::Backend(HalError::InvalidShots(_)))
    ));

    let narrow = SimulatorBackend::with_max_qubits(2);
    let too_wide = Grover::default()
        .amplify(&narrow, &problem("a & b & c"))
        .await;
    assert!(matches!(too_wide, Err(SearchError::Backend(_))));
}

#[tokio::test]
async fn test_invalid_schedule_rejected_before_running() {
    let backend = SimulatorBackend::new();
    let result = Grover::default()
        .with_growth_rate(0.5)
        .amplify(&backend, &problem("a"))
        .await;
    assert!(matches!(result, Err(SearchError::InvalidGrowthRate(_))));
}

#[tokio::test]
async fn test_result_serializes() {
    let backend = SimulatorBackend::new().with_seed(2);
    let result = Grover::default()
        .with_optimal(4)
        .amplify(&backend, &problem(PARTY))
        .await
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["iterations"], serde_json::json!([1]));
    assert_eq!(json["oracle_evaluation"], serde_json::json!(true));
    assert!(json["circuit_results"][0].is_object());
}
