//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Clamp a value into the range `[min, max]`.
///
/// NaN values are passed through unchanged.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Arithmetic mean of the finite values in a slice, along with the number of values used.
///
/// `NaN` and infinite values are skipped. Returns `None` if no finite values remain.
pub fn finite_mean<T>(values: &[T]) -> Option<(T, usize)>
where
    T: Float,
{
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((T::zero(), 0usize), |(sum, count), &v| (sum + v, count + 1));

    if count == 0 {
        return None;
    }

    T::from(count).map(|n| (sum / n, count))
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle in degrees into the range [0, 360).
pub fn wrap_360<T>(angle_deg: T) -> T
where
    T: Float,
{
    // 360 is always representable so this cannot fail
    let full_turn = T::from(360.0).unwrap_or_else(T::nan);
    let wrapped = rem_euclid(angle_deg, full_turn);

    // Guard the round-off case where rem_euclid returns the modulus itself
    if wrapped >= full_turn {
        T::zero()
    } else {
        wrapped
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0.0, 10.0), (0.0, 1.0), 5.0), 0.5);
        assert_eq!(lin_map((50.0, 500.0), (0.1, 1.0), 500.0), 1.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(20.0, -15.0, 15.0), 15.0);
        assert_eq!(clamp(-20.0, -15.0, 15.0), -15.0);
        assert_eq!(clamp(3.0, -15.0, 15.0), 3.0);
        assert!(clamp(std::f64::NAN, -15.0, 15.0).is_nan());
    }

    #[test]
    fn test_finite_mean() {
        assert_eq!(finite_mean::<f64>(&[]), None);
        assert_eq!(finite_mean(&[std::f64::NAN, std::f64::INFINITY]), None);
        assert_eq!(finite_mean(&[1.0, std::f64::NAN, 3.0]), Some((2.0, 2)));
        assert_eq!(
            finite_mean(&[std::f64::NEG_INFINITY, 4.0, 4.0, 4.0]),
            Some((4.0, 3))
        );
    }

    #[test]
    fn test_wrap_360() {
        assert_eq!(wrap_360(395.0), 35.0);
        assert_eq!(wrap_360(-10.0), 350.0);
        assert_eq!(wrap_360(360.0), 0.0);
        assert_eq!(wrap_360(0.0), 0.0);
        assert_eq!(wrap_360(-720.0), 0.0);
    }
}
