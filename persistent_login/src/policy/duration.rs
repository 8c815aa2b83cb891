use super::types::TimestampBound;

pub const LONG_DURATION_YEARS: i64 = 30;

/// 30 years in seconds. Leap years are ignored.
pub const LONG_DURATION_SECONDS: i64 = LONG_DURATION_YEARS * 365 * 86400;

/// Distance kept between the resulting expiry and the timestamp bound
pub const OVERFLOW_MARGIN_SECONDS: i64 = 5;

/// Lifetime of a long-lived session cookie issued at `now`.
///
/// Normally [`LONG_DURATION_SECONDS`]. When `now + LONG_DURATION_SECONDS` would
/// come within [`OVERFLOW_MARGIN_SECONDS`] of the largest representable
/// timestamp, the duration is clamped to `bound - now - 5` instead, so that
/// `now + duration <= bound - 5` always holds. Never negative.
pub fn compute_long_duration(now: i64, bound: TimestampBound) -> i64 {
    let headroom = bound
        .max_timestamp()
        .saturating_sub(now)
        .saturating_sub(OVERFLOW_MARGIN_SECONDS);

    LONG_DURATION_SECONDS.min(headroom).max(0)
}

/// Whether [`compute_long_duration`] had to shorten the duration at `now`.
pub fn is_clamped(now: i64, bound: TimestampBound) -> bool {
    compute_long_duration(now, bound) < LONG_DURATION_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX32: i64 = i32::MAX as i64;

    #[test]
    fn test_long_duration_is_thirty_years() {
        assert_eq!(LONG_DURATION_SECONDS, 946_080_000);
    }

    #[test]
    fn test_unclamped_duration() {
        // Given a present-day timestamp on a 64-bit platform
        let now = 1_760_000_000;

        // When computing the duration
        let duration = compute_long_duration(now, TimestampBound::Signed64);

        // Then the full 30 years are used
        assert_eq!(duration, LONG_DURATION_SECONDS);
        assert!(!is_clamped(now, TimestampBound::Signed64));
    }

    #[test]
    fn test_near_overflow_duration() {
        let duration = compute_long_duration(MAX32 - 100, TimestampBound::Signed32);
        assert_eq!(duration, 95);
        assert!(is_clamped(MAX32 - 100, TimestampBound::Signed32));
    }

    #[test]
    fn test_present_day_on_32_bit_is_clamped() {
        // 2025-10-09: 30 years ahead is past 2038
        let now = 1_760_000_000;
        let duration = compute_long_duration(now, TimestampBound::Signed32);

        assert_eq!(duration, MAX32 - now - OVERFLOW_MARGIN_SECONDS);
        assert!(duration < LONG_DURATION_SECONDS);
    }

    #[test]
    fn test_boundary_of_the_clamp() {
        // Exactly enough headroom for the full duration plus the margin
        let now = MAX32 - LONG_DURATION_SECONDS - OVERFLOW_MARGIN_SECONDS;
        assert_eq!(
            compute_long_duration(now, TimestampBound::Signed32),
            LONG_DURATION_SECONDS
        );

        // One second later the clamp kicks in
        assert_eq!(
            compute_long_duration(now + 1, TimestampBound::Signed32),
            LONG_DURATION_SECONDS - 1
        );
    }

    #[test]
    fn test_past_the_bound_is_zero() {
        assert_eq!(compute_long_duration(MAX32 - 5, TimestampBound::Signed32), 0);
        assert_eq!(compute_long_duration(MAX32 + 1000, TimestampBound::Signed32), 0);
        assert_eq!(compute_long_duration(i64::MAX, TimestampBound::Signed64), 0);
    }

    #[test]
    fn test_negative_now_does_not_overflow() {
        assert_eq!(
            compute_long_duration(i64::MIN, TimestampBound::Signed64),
            LONG_DURATION_SECONDS
        );
    }
}
