//! Float helpers that behave the same with and without `std`.

use num_traits::Float;

/// Round half toward positive infinity (`floor(v + 0.5)`).
///
/// Differs from [`f64::round`] on negative halves: `-199.5` rounds to `-199`.
/// Offsets are routinely negative halves, so every rounding step in the
/// layout goes through here.
pub(crate) fn round_half_up(v: f64) -> f64 {
    Float::floor(v + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_halves_round_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(2.4), 2.0);
    }

    #[test]
    fn negative_halves_round_toward_zero() {
        assert_eq!(round_half_up(-199.5), -199.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn non_finite_passes_through() {
        assert!(round_half_up(f64::NAN).is_nan());
        assert_eq!(round_half_up(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_half_up(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }
}
