//! Fixed-point fractions used by quorum, majority and veto thresholds.
//! A fraction is an integer scaled by `PERCENTAGE_100` (10^27).

use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer for intermediate products and `Uint256` parameters.
    pub struct U256(4);
}

pub type Fraction = u128;

pub const PERCENTAGE_100: Fraction = 1_000_000_000_000_000_000_000_000_000;
pub const PERCENTAGE_50: Fraction = PERCENTAGE_100 / 2;
pub const PERCENTAGE_10: Fraction = PERCENTAGE_100 / 10;

/// Returns `part / total` as a fraction, rounded down.
/// Zero total yields zero. Saturates at `u128::MAX` if `part` is far above `total`.
pub fn fraction(part: u128, total: u128) -> Fraction {
    if total == 0 {
        return 0;
    }
    mul_div(part, PERCENTAGE_100, total).unwrap_or(u128::MAX)
}

/// Computes `a * b / c` with a 256-bit intermediate product.
/// Returns `None` when `c` is zero or the quotient does not fit into u128.
pub fn mul_div(a: u128, b: u128, c: u128) -> Option<u128> {
    if c == 0 {
        return None;
    }
    let quotient = U256::from(a) * U256::from(b) / U256::from(c);
    u128::try_from(quotient).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_of_supply() {
        assert_eq!(fraction(1000, 2000), PERCENTAGE_50);
        assert_eq!(fraction(200, 2000), PERCENTAGE_10);
        assert_eq!(fraction(0, 2000), 0);
        assert_eq!(fraction(5, 0), 0);
    }

    #[test]
    fn one_third_rounds_down() {
        let expected: u128 = "3".repeat(27).parse().unwrap();
        assert_eq!(fraction(1, 3), expected);
    }

    #[test]
    fn yocto_amounts_do_not_overflow() {
        let one_near = 10u128.pow(24);
        assert_eq!(
            fraction(1_000_000 * one_near, 4_000_000 * one_near),
            PERCENTAGE_100 / 4
        );
    }

    #[test]
    fn mul_div_bounds() {
        assert_eq!(mul_div(u128::MAX, 2, 2), Some(u128::MAX));
        assert_eq!(mul_div(u128::MAX, 2, 1), None);
        assert_eq!(mul_div(7, 3, 0), None);
        assert_eq!(mul_div(7, 3, 2), Some(10));
    }
}
