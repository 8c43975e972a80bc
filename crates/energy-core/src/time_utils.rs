use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Uses the `iana-time-zone` crate directly – no subprocess calls.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve the `"auto"` sentinel to the system timezone; pass anything else
/// through unchanged.
///
/// A detected zone unknown to `chrono-tz` resolves to `"UTC"`.
pub fn resolve_timezone_name(name: &str) -> String {
    if !name.eq_ignore_ascii_case("auto") {
        return name.to_string();
    }
    let detected = get_system_timezone();
    if TimezoneHandler::validate_timezone(&detected) {
        detected
    } else {
        warn!("System timezone \"{}\" not recognised, using UTC", detected);
        "UTC".to_string()
    }
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Naive layouts accepted for meter timestamps, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses meter timestamps into wall-clock time.
///
/// Offset-bearing values keep the wall clock of their own offset unless a
/// target zone is set, in which case they are converted into it first.
/// Naive values are always taken as already local.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimezoneHandler {
    target_tz: Option<Tz>,
}

impl TimezoneHandler {
    /// Create a handler converting offset-bearing values into the given
    /// IANA timezone.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { target_tz: Some(tz) }
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// Zone offset-bearing values are converted into, if any.
    pub fn target_tz(&self) -> Option<Tz> {
        self.target_tz
    }

    fn wall_clock(&self, dt: DateTime<FixedOffset>) -> NaiveDateTime {
        match self.target_tz {
            Some(tz) => dt.with_timezone(&tz).naive_local(),
            None => dt.naive_local(),
        }
    }

    /// Parse a timestamp cell into local wall-clock time.
    ///
    /// Accepts RFC 3339 (with `Z` or a numeric offset), naive
    /// `YYYY-MM-DD[T ]HH:MM[:SS[.f]]` and bare `YYYY-MM-DD` (midnight).
    /// Returns `None` for empty strings or unrecognised formats.
    pub fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(self.wall_clock(dt));
        }
        // RFC 3339 requires the `T`; some exporters put a space there instead.
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Some(self.wall_clock(dt));
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

/// Render a local timestamp the way the cleaned export writes it:
/// `YYYY-MM-DD HH:MM:SS`, with a fractional part only when non-zero.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
