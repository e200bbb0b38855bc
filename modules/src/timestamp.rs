use core::fmt::{Display, Error as FmtError, Formatter};
use core::ops::Add;
use core::time::Duration;

use chrono::{offset::Utc, DateTime, TimeZone};
use flex_error::define_error;
use serde_derive::{Deserialize, Serialize};

pub const ZERO_DURATION: Duration = Duration::from_secs(0);

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A point in time with nanosecond precision, or nothing at all.
///
/// On the wire (commitments, sign bytes) a timestamp is a `u64` count of
/// nanoseconds since the Unix epoch, with `0` standing for "not set". The
/// domain type keeps that distinction explicit through the inner `Option`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Default, Deserialize, Serialize, Hash)]
pub struct Timestamp {
    time: Option<DateTime<Utc>>,
}

/// Outcome of comparing a deadline against a clock reading.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Expiry {
    Expired,
    NotExpired,
    InvalidTimestamp,
}

impl Timestamp {
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Timestamp, TimestampError> {
        if nanoseconds == 0 {
            return Ok(Timestamp::none());
        }

        // chrono only takes signed seconds; u64::MAX / 1e9 always fits in i64.
        let secs = (nanoseconds / NANOS_PER_SEC) as i64;
        let nanos = (nanoseconds % NANOS_PER_SEC) as u32;

        Utc.timestamp_opt(secs, nanos)
            .single()
            .map(Timestamp::from_datetime)
            .ok_or_else(|| TimestampError::invalid_conversion(nanoseconds))
    }

    pub fn none() -> Self {
        Timestamp { time: None }
    }

    pub fn from_datetime(time: DateTime<Utc>) -> Timestamp {
        Timestamp { time: Some(time) }
    }

    pub fn is_set(&self) -> bool {
        self.time.is_some()
    }

    /// Nanoseconds since the epoch, `0` when unset. Times before the epoch
    /// cannot be constructed from the wire and collapse to `0`.
    pub fn nanoseconds(&self) -> u64 {
        self.time.map_or(0, |time| {
            let secs = u64::try_from(time.timestamp()).unwrap_or_default();
            secs * NANOS_PER_SEC + u64::from(time.timestamp_subsec_nanos())
        })
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Time elapsed from `earlier` to `self`. `None` if either side is unset
    /// or `earlier` is in fact later.
    pub fn duration_since(&self, earlier: &Timestamp) -> Option<Duration> {
        match (self.time, earlier.time) {
            (Some(now), Some(then)) => now.signed_duration_since(then).to_std().ok(),
            _ => None,
        }
    }

    /// `Expired` when `self` is strictly after `deadline`.
    pub fn check_expiry(&self, deadline: &Timestamp) -> Expiry {
        match (self.time, deadline.time) {
            (Some(now), Some(deadline)) if now > deadline => Expiry::Expired,
            (Some(_), Some(_)) => Expiry::NotExpired,
            _ => Expiry::InvalidTimestamp,
        }
    }

    /// True when `self` is set, `deadline` is set, and `self >= deadline`.
    /// This is the packet timeout rule: a packet times out once the
    /// destination clock reaches its timeout timestamp.
    pub fn has_reached(&self, deadline: &Timestamp) -> bool {
        match (self.time, deadline.time) {
            (Some(now), Some(deadline)) => now >= deadline,
            _ => false,
        }
    }

    pub fn after(&self, other: &Timestamp) -> bool {
        match (self.time, other.time) {
            (Some(t1), Some(t2)) => t1 > t2,
            _ => false,
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self.time {
            Some(time) => write!(f, "Timestamp({})", time.to_rfc3339()),
            None => write!(f, "Timestamp(NoTimestamp)"),
        }
    }
}

impl Add<Duration> for Timestamp {
    type Output = Result<Timestamp, TimestampError>;

    fn add(self, duration: Duration) -> Self::Output {
        match self.time {
            Some(time) => {
                let delta = chrono::Duration::from_std(duration)
                    .map_err(|_| TimestampError::overflow())?;
                time.checked_add_signed(delta)
                    .map(Timestamp::from_datetime)
                    .ok_or_else(TimestampError::overflow)
            }
            None => Ok(self),
        }
    }
}

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    TimestampError {
        Overflow
            | _ | { "timestamp overflow when adding a duration" },

        InvalidConversion
            { nanoseconds: u64 }
            | e | { format_args!("cannot convert {} nanoseconds into a timestamp", e.nanoseconds) },
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;
    use test_log::test;

    use super::{Expiry, Timestamp, ZERO_DURATION};

    #[test]
    fn zero_nanoseconds_is_unset() {
        let unset = Timestamp::from_nanoseconds(0).unwrap();
        assert!(!unset.is_set());
        assert_eq!(unset.nanoseconds(), 0);
        assert_eq!(unset, Timestamp::none());
    }

    #[test]
    fn nanoseconds_survive_conversion() {
        for nanos in [1, 1_000_000_000, 1_600_000_000_123_456_789, u64::MAX] {
            let ts = Timestamp::from_nanoseconds(nanos).unwrap();
            assert_eq!(ts.nanoseconds(), nanos);
        }
    }

    #[test]
    fn expiry_comparisons() {
        let unset = Timestamp::none();
        let t1 = Timestamp::from_nanoseconds(1).unwrap();
        let t2 = Timestamp::from_nanoseconds(2).unwrap();

        assert_eq!(t1.check_expiry(&t2), Expiry::NotExpired);
        assert_eq!(t1.check_expiry(&t1), Expiry::NotExpired);
        assert_eq!(t2.check_expiry(&t1), Expiry::Expired);
        assert_eq!(t1.check_expiry(&unset), Expiry::InvalidTimestamp);

        assert!(t1.has_reached(&t1));
        assert!(t2.has_reached(&t1));
        assert!(!t1.has_reached(&t2));
        assert!(!t1.has_reached(&unset));
    }

    #[test]
    fn arithmetic() {
        let unset = Timestamp::none();
        let t100 = Timestamp::from_nanoseconds(100).unwrap();
        let t150 = Timestamp::from_nanoseconds(150).unwrap();

        assert_eq!((t100 + ZERO_DURATION).unwrap(), t100);
        assert_eq!((t100 + Duration::from_nanos(50)).unwrap(), t150);
        assert_eq!((unset + Duration::from_secs(1)).unwrap(), unset);
        assert_eq!(t150.duration_since(&t100), Some(Duration::from_nanos(50)));
        assert_eq!(t100.duration_since(&t150), None);
    }
}
