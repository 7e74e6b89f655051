//! Property-based tests for the expression language.

use proptest::prelude::*;
use qsat_logic::{BoolExpr, Expr, TruthTable, VarId, parse};

const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Expr::Const),
        (0..NAMES.len()).prop_map(|i| Expr::Var(VarId(i))),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| Expr::Not(Box::new(e))),
            prop::collection::vec(inner.clone(), 2..=3).prop_map(Expr::And),
            prop::collection::vec(inner.clone(), 2..=3).prop_map(Expr::Or),
            prop::collection::vec(inner.clone(), 2..=3).prop_map(Expr::Xor),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Expr::Implies(Box::new(a), Box::new(b))),
            (inner.clone(), inner).prop_map(|(a, b)| Expr::Iff(Box::new(a), Box::new(b))),
        ]
    })
}

fn with_all_names(root: Expr) -> BoolExpr {
    BoolExpr::new(root, NAMES.iter().map(ToString::to_string).collect())
}

/// Evaluate the XOR of ANF monomials at `x`.
fn eval_anf(monomials: &[u64], x: u64) -> bool {
    monomials.iter().fold(false, |acc, &m| acc ^ (x & m == m))
}

proptest! {
    #[test]
    fn test_display_reparses_to_same_function(root in arb_expr()) {
        let expr = with_all_names(root);
        let text = expr.to_string();
        let reparsed = parse(&text).unwrap();

        for x in 0..16u64 {
            // Re-parsing renumbers variables by first appearance.
            let mut remapped = 0u64;
            for (i, name) in reparsed.variables().iter().enumerate() {
                let original = expr.variable_index(name).unwrap().0;
                remapped |= ((x >> original) & 1) << i;
            }
            prop_assert_eq!(expr.evaluate(x), reparsed.evaluate(remapped), "{}", text);
        }
    }

    #[test]
    fn test_anf_reconstructs_function(root in arb_expr()) {
        let expr = with_all_names(root);
        let table = expr.truth_table().unwrap();
        let anf = table.anf();
        for x in 0..16u64 {
            prop_assert_eq!(eval_anf(&anf, x), table.value(x));
        }
    }

    #[test]
    fn test_satisfying_matches_evaluate(root in arb_expr()) {
        let expr = with_all_names(root);
        let table = expr.truth_table().unwrap();
        for bits in table.satisfying_bitstrings() {
            prop_assert!(expr.evaluate_bitstring(&bits).unwrap());
        }
        let count = (0..16u64).filter(|&x| expr.evaluate(x)).count();
        prop_assert_eq!(count, table.count_satisfying());
    }

    #[test]
    fn test_truth_table_from_fn_anf_roundtrip(bits in prop::collection::vec(any::<bool>(), 8)) {
        let table = TruthTable::from_fn(3, |x| bits[x as usize]);
        let anf = table.anf();
        for x in 0..8u64 {
            prop_assert_eq!(eval_anf(&anf, x), bits[x as usize]);
        }
    }
}
