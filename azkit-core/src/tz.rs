//! Timezone lookups over the IANA database bundled with `chrono-tz`.

use chrono_tz::{America, Asia, Europe, TZ_VARIANTS};

pub use chrono_tz::Tz as TimeZone;

/// Region prefixes of the canonical, commonly used zone names.
const COMMON_PREFIXES: [&str; 12] = [
    "Africa/",
    "America/",
    "Antarctica/",
    "Arctic/",
    "Asia/",
    "Atlantic/",
    "Australia/",
    "Europe/",
    "Indian/",
    "Pacific/",
    "Canada/",
    "US/",
];

pub struct Tz;

impl Tz {
    /// Common zone names, sorted. Legacy aliases such as `EST5EDT` or
    /// `Etc/GMT+3` are left out; `GMT` and `UTC` are kept.
    pub fn common_timezones() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = TZ_VARIANTS
            .iter()
            .map(|tz| tz.name())
            .filter(|name| {
                matches!(*name, "GMT" | "UTC")
                    || COMMON_PREFIXES.iter().any(|p| name.starts_with(p))
            })
            .collect();
        names.sort_unstable();
        names
    }

    /// Every zone name in the database, sorted.
    pub fn all_timezones() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = TZ_VARIANTS.iter().map(|tz| tz.name()).collect();
        names.sort_unstable();
        names
    }

    pub fn lookup(name: &str) -> Option<TimeZone> {
        name.parse().ok()
    }

    pub fn gmt_tz() -> TimeZone {
        chrono_tz::GMT
    }

    pub fn paris_tz() -> TimeZone {
        Europe::Paris
    }

    pub fn tokyo_tz() -> TimeZone {
        Asia::Tokyo
    }

    pub fn uk_tz() -> TimeZone {
        Europe::London
    }

    pub fn eastus_tz() -> TimeZone {
        America::New_York
    }

    pub fn westus_tz() -> TimeZone {
        America::Los_Angeles
    }
}
