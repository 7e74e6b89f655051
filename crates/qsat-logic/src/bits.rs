//! Conversions between assignments and bitstrings.
//!
//! Bit `i` of an assignment is the value of variable `i`, and character `i`
//! of a bitstring is the same variable. Variable 0 is therefore the leftmost
//! character, which matches how measured qubits are labelled.

use crate::error::{LogicError, LogicResult};

/// Render the low `width` bits of `assignment` as a bitstring.
pub fn to_bitstring(assignment: u64, width: usize) -> String {
    (0..width)
        .map(|i| if (assignment >> i) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Parse a bitstring of exactly `width` characters into an assignment.
pub fn parse_bitstring(bits: &str, width: usize) -> LogicResult<u64> {
    let got = bits.chars().count();
    if got != width {
        return Err(LogicError::BitstringLength {
            expected: width,
            got,
        });
    }
    let mut assignment = 0u64;
    for (position, c) in bits.chars().enumerate() {
        match c {
            '0' => {}
            '1' => assignment |= 1 << position,
            found => return Err(LogicError::InvalidBit { position, found }),
        }
    }
    Ok(assignment)
}
