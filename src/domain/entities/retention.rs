//! Retention policy for redirect records and their images.

use chrono::{DateTime, Duration, Utc};

/// How long redirect records stay resolvable.
///
/// `Permanent` keeps every record forever (unbounded growth). `MaxAge` makes
/// records older than the given age unresolvable and eligible for pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    #[default]
    Permanent,
    MaxAge(Duration),
}

impl RetentionPolicy {
    /// Builds a policy from an optional number of days.
    pub fn from_days(days: Option<u32>) -> Self {
        match days {
            Some(d) => Self::MaxAge(Duration::days(i64::from(d))),
            None => Self::Permanent,
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent)
    }

    /// Oldest creation time still retained at `now`, if records can expire.
    ///
    /// An age reaching past the earliest representable time yields `None`:
    /// nothing is old enough to expire.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Permanent => None,
            Self::MaxAge(age) => now.checked_sub_signed(*age),
        }
    }

    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.cutoff(now).is_some_and(|cutoff| created_at < cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_never_expires() {
        let policy = RetentionPolicy::Permanent;
        let old = Utc::now() - Duration::days(10_000);

        assert!(!policy.is_expired(old, Utc::now()));
        assert!(policy.cutoff(Utc::now()).is_none());
    }

    #[test]
    fn test_max_age_expires_old_records() {
        let policy = RetentionPolicy::from_days(Some(30));
        let now = Utc::now();

        assert!(policy.is_expired(now - Duration::days(31), now));
        assert!(!policy.is_expired(now - Duration::days(29), now));
    }

    #[test]
    fn test_out_of_range_age_expires_nothing() {
        let policy = RetentionPolicy::from_days(Some(u32::MAX));
        let now = Utc::now();

        assert!(policy.cutoff(now).is_none());
        assert!(!policy.is_expired(now - Duration::days(10_000), now));
    }

    #[test]
    fn test_from_days_none_is_permanent() {
        assert_eq!(RetentionPolicy::from_days(None), RetentionPolicy::Permanent);
    }
}
