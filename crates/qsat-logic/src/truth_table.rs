//! Exhaustive truth tables and algebraic normal form.

use serde::{Deserialize, Serialize};

use crate::bits::to_bitstring;

/// Value of a function for each of the `2^n` assignments of its variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthTable {
    num_variables: usize,
    values: Vec<bool>,
}

impl TruthTable {
    /// Tabulate `f` over every assignment of `num_variables` bits.
    pub fn from_fn(num_variables: usize, f: impl Fn(u64) -> bool) -> Self {
        let values = (0..1u64 << num_variables).map(f).collect();
        Self {
            num_variables,
            values,
        }
    }

    /// Number of input variables.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Number of rows, `2^n`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: a zero-variable table still has one row.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `assignment`.
    pub fn value(&self, assignment: u64) -> bool {
        usize::try_from(assignment)
            .ok()
            .and_then(|i| self.values.get(i).copied())
            .unwrap_or(false)
    }

    /// Satisfying assignments, ascending.
    pub fn satisfying(&self) -> Vec<u64> {
        (0u64..)
            .zip(&self.values)
            .filter_map(|(x, &v)| v.then_some(x))
            .collect()
    }

    /// Satisfying assignments as bitstrings, variable 0 leftmost.
    pub fn satisfying_bitstrings(&self) -> Vec<String> {
        self.satisfying()
            .into_iter()
            .map(|x| to_bitstring(x, self.num_variables))
            .collect()
    }

    /// Number of satisfying assignments.
    pub fn count_satisfying(&self) -> usize {
        self.values.iter().filter(|&&v| v).count()
    }

    /// Whether the function is the same for every assignment.
    pub fn is_constant(&self) -> bool {
        self.values.windows(2).all(|w| w[0] == w[1])
    }

    /// Algebraic normal form: the function as an XOR of AND-monomials.
    ///
    /// Each returned mask is one monomial, bit `i` set when variable `i`
    /// appears in it; the empty mask is the constant 1. Masks are ascending.
    /// Computed with the binary Möbius transform.
    pub fn anf(&self) -> Vec<u64> {
        let mut coeffs = self.values.clone();
        for i in 0..self.num_variables {
            let bit = 1usize << i;
            for x in 0..coeffs.len() {
                if x & bit != 0 {
                    coeffs[x] ^= coeffs[x ^ bit];
                }
            }
        }
        (0u64..)
            .zip(coeffs)
            .filter_map(|(mask, c)| c.then_some(mask))
            .collect()
    }
}
