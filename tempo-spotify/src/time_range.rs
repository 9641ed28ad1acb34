//! Lenient normalization of user-supplied time-range arguments.

/// Coarse window over which the "top" queries are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeRange {
    Short,
    #[default]
    Medium,
    Long,
}

// Approximate window sizes in days, used to map a raw day count to the
// nearest bucket.
const SHORT_DAYS: u64 = 28;
const MEDIUM_DAYS: u64 = 180;
const LONG_DAYS: u64 = 365;

impl TimeRange {
    /// Normalize a raw argument to a bucket.
    ///
    /// Accepts single-letter and word aliases (`s`, `short`, `short_term`),
    /// or a numeric day count mapped to the nearest bucket. Anything
    /// unrecognized, including no argument at all, falls back to `Medium`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "s" | "short" | "short_term" => Self::Short,
            "m" | "medium" | "medium_term" => Self::Medium,
            "l" | "long" | "long_term" => Self::Long,
            other => match other.parse::<u64>() {
                Ok(days) => Self::from_days(days),
                Err(_) => Self::default(),
            },
        }
    }

    /// Map a day count to the nearest bucket by midpoint.
    fn from_days(days: u64) -> Self {
        if days <= SHORT_DAYS.midpoint(MEDIUM_DAYS) {
            Self::Short
        } else if days <= MEDIUM_DAYS.midpoint(LONG_DAYS) {
            Self::Medium
        } else {
            Self::Long
        }
    }

    /// Value accepted by the Spotify `time_range` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Short => "short_term",
            Self::Medium => "medium_term",
            Self::Long => "long_term",
        }
    }
}
