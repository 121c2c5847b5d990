//! Encoded status ranges used by reading-view filters.
//!
//! | code        | matches                      |
//! |-------------|------------------------------|
//! | `1..=5`     | that status only             |
//! | `98`, `99`  | that status only             |
//! | `ab`        | `a <= status <= b`           |
//! | `X99`       | status `X` or well-known     |
//! | `0`, other  | nothing                      |

use crate::vocabulary::TermStatus;

/// Check whether `status` falls in the encoded `range_code`
pub fn status_in_range(status: u16, range_code: u32) -> bool {
    let status = u32::from(status);
    let well_known = u32::from(TermStatus::WELL_KNOWN_CODE);
    let ignored = u32::from(TermStatus::IGNORED_CODE);

    match range_code {
        0 => false,
        1..=5 => status == range_code,
        code if code == ignored || code == well_known => status == code,
        10..=97 => {
            let low = range_code / 10;
            let high = range_code % 10;
            low <= status && status <= high
        }
        100..=999 if range_code % 100 == well_known => {
            status == range_code / 100 || status == well_known
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert!(status_in_range(3, 15));
        assert!(!status_in_range(1, 23));
        assert!(status_in_range(99, 599));
        assert!(status_in_range(5, 599));
        assert!(!status_in_range(4, 599));
    }

    #[test]
    fn test_zero_range_matches_nothing() {
        for status in [1, 2, 3, 4, 5, 98, 99] {
            assert!(!status_in_range(status, 0));
        }
    }

    #[test]
    fn test_single_codes_are_exact() {
        assert!(status_in_range(4, 4));
        assert!(!status_in_range(5, 4));
        assert!(status_in_range(98, 98));
        assert!(!status_in_range(99, 98));
        assert!(status_in_range(99, 99));
    }

    #[test]
    fn test_two_digit_bounds_inclusive() {
        assert!(status_in_range(1, 15));
        assert!(status_in_range(5, 15));
        assert!(!status_in_range(98, 15));
        assert!(status_in_range(4, 34));
        assert!(!status_in_range(2, 34));
    }

    #[test]
    fn test_invalid_codes() {
        assert!(!status_in_range(5, 6));
        assert!(!status_in_range(1, 123));
        assert!(!status_in_range(1, 1000));
    }
}
