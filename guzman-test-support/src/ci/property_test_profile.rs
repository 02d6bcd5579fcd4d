//! Property-test run profile read from the environment.
//!
//! `PROGTEST_CASES` overrides the number of cases per property and
//! `GUZMAN_PBT_FORK` toggles proptest's forked execution. Invalid values are
//! logged and ignored.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const GUZMAN_PBT_FORK_ENV_KEY: &str = "GUZMAN_PBT_FORK";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads a profile, falling back to the given defaults for unset or
    /// invalid variables.
    ///
    /// # Examples
    /// ```
    /// use guzman_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: Override::read(PROGTEST_CASES_ENV_KEY, parse_cases).or(default_cases),
            fork: Override::read(GUZMAN_PBT_FORK_ENV_KEY, parse_switch).or(default_fork),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether proptest cases run in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

/// Outcome of looking up one environment override.
#[derive(Debug, PartialEq, Eq)]
enum Override<T> {
    Unset,
    Valid(T),
    Invalid {
        key: &'static str,
        raw: String,
        reason: &'static str,
    },
}

impl<T> Override<T> {
    fn read(key: &'static str, parse: fn(&str) -> Result<T, &'static str>) -> Self {
        match env::var(key) {
            Ok(raw) => match parse(&raw) {
                Ok(value) => Self::Valid(value),
                Err(reason) => Self::Invalid { key, raw, reason },
            },
            Err(_) => Self::Unset,
        }
    }

    fn or(self, default: T) -> T {
        match self {
            Self::Unset => default,
            Self::Valid(value) => value,
            Self::Invalid { key, raw, reason } => {
                tracing::warn!(
                    env = key,
                    raw = %raw,
                    reason,
                    "invalid property-test profile override; using default",
                );
                default
            }
        }
    }
}

fn parse_cases(raw: &str) -> Result<u32, &'static str> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0"),
        Ok(cases) => Ok(cases),
        Err(_) => Err("cases must be a positive integer"),
    }
}

fn parse_switch(raw: &str) -> Result<bool, &'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off"),
    }
}
