//! Hour and day buckets. All timestamps are seconds since the Unix epoch.

use core::ops::Range;

pub const SECONDS_PER_HOUR: u64 = 3600;
pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

pub fn hour_bucket(timestamp: u64) -> u64 {
    timestamp / SECONDS_PER_HOUR
}

pub fn day_bucket(timestamp: u64) -> u64 {
    timestamp / SECONDS_PER_DAY
}

/// Every hour bucket touched by `[arrival, departure]`, both ends included. Empty when arrival is
/// after departure.
pub fn hours_spanned(arrival: u64, departure: u64) -> Range<u64> {
    if arrival > departure {
        return 0..0;
    }
    hour_bucket(arrival)..hour_bucket(departure) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::vec::Vec;

    #[test]
    fn hour_buckets() {
        // 01.01.2021 10:00:00 UTC
        let t = 1_609_495_200;
        let minute = 60;

        assert_eq!(
            hours_spanned(t, t + 59 * minute).collect::<Vec<_>>(),
            [447_082]
        );
        assert_eq!(
            hours_spanned(t, t + 60 * minute).collect::<Vec<_>>(),
            [447_082, 447_083]
        );
        assert_eq!(hours_spanned(t, t - minute).count(), 0);
        assert_eq!(
            hours_spanned(t - minute, t).collect::<Vec<_>>(),
            [447_081, 447_082]
        );
        assert_eq!(hours_spanned(t, t + 20 * SECONDS_PER_HOUR - 1).count(), 20);
        assert_eq!(hours_spanned(t + 10, t + 5).count(), 0);
        assert_eq!(hours_spanned(t, t).count(), 1);
    }

    #[test]
    fn day_buckets() {
        let t = 1_609_495_200;
        assert_eq!(day_bucket(t), 18_628);
        assert_eq!(day_bucket(18_628 * SECONDS_PER_DAY - 1), 18_627);
        assert_eq!(hour_bucket(t), 447_082);
    }
}
