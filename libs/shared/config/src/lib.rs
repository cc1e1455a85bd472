use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_port: u16,
    pub policy: SchedulingPolicy,
}

/// Tunable scheduling rules. Defaults apply when the environment does not
/// override them.
#[derive(Debug, Clone)]
pub struct SchedulingPolicy {
    /// How far ahead an appointment may be booked, in days.
    pub max_advance_days: i64,
    /// How long a scheduled appointment may stay unconfirmed before the
    /// sweep expires it, in hours.
    pub expiry_hours: i64,
    /// Interval between expiration sweep runs, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            max_advance_days: 30,
            expiry_hours: 24,
            sweep_interval_secs: 300,
        }
    }
}

impl SchedulingPolicy {
    pub fn is_valid(&self) -> bool {
        self.max_advance_days > 0 && self.expiry_hours > 0 && self.sweep_interval_secs > 0
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = SchedulingPolicy::default();
        let config = Self {
            listen_port: parse_env("SANA_LISTEN_PORT", 3000),
            policy: SchedulingPolicy {
                max_advance_days: parse_env("SANA_MAX_ADVANCE_DAYS", defaults.max_advance_days),
                expiry_hours: parse_env("SANA_EXPIRY_HOURS", defaults.expiry_hours),
                sweep_interval_secs: parse_env(
                    "SANA_SWEEP_INTERVAL_SECS",
                    defaults.sweep_interval_secs,
                ),
            },
        };

        if !config.policy.is_valid() {
            warn!("Scheduling policy misconfigured - zero or negative values supplied");
        }

        config
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        let policy = SchedulingPolicy::default();
        assert!(policy.is_valid());
        assert_eq!(policy.max_advance_days, 30);
        assert_eq!(policy.expiry_hours, 24);
    }

    #[test]
    fn parse_env_falls_back_on_missing_variable() {
        assert_eq!(parse_env("SANA_TEST_UNSET_VARIABLE", 42_i64), 42);
    }
}
