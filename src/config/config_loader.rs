use anyhow::{Context, Result, bail};
use std::str::FromStr;

use crate::{
    application::usercases::subscription_onboarding::{DEFAULT_VERIFY_MODE, SubscriptionOptions},
    config::{
        config_model::{Admin, DotEnvyConfig, LeaseMonitor, Server, Storage, YouTube},
        stage::Stage,
    },
    domain::value_objects::leases::{DEFAULT_RENEW_WINDOW, LeaseMonitorConfig},
};

pub const DEFAULT_HUB_URL: &str = "https://pubsubhubbub.appspot.com/subscribe";
pub const DEFAULT_LEASE_SECONDS: i64 = 864_000;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let stage = match var("STAGE") {
        Some(raw) => Stage::try_from(raw.as_str())?,
        None => Stage::default(),
    };

    let server = Server {
        port: parse(&var, "SERVER_PORT")?.context("SERVER_PORT is invalid")?,
        body_limit: parse(&var, "SERVER_BODY_LIMIT")?.unwrap_or(1),
        timeout: parse(&var, "SERVER_TIMEOUT")?.unwrap_or(30),
    };

    let admin = Admin {
        token: var("ADMIN_TOKEN").context("ADMIN_TOKEN is invalid")?,
    };

    let storage = Storage {
        submissions_file: var("SUBMISSIONS_FILE")
            .unwrap_or_else(|| "data/submissions.json".to_string()),
        streamers_file: var("STREAMERS_FILE").unwrap_or_else(|| "data/streamers.json".to_string()),
    };

    let lease_seconds = parse(&var, "YOUTUBE_LEASE_SECONDS")?.unwrap_or(DEFAULT_LEASE_SECONDS);
    let youtube = YouTube {
        hub_url: var("YOUTUBE_HUB_URL").unwrap_or_else(|| DEFAULT_HUB_URL.to_string()),
        callback_url: var("YOUTUBE_CALLBACK_URL"),
        lease_seconds,
        verify_mode: var("YOUTUBE_VERIFY_MODE").unwrap_or_else(|| DEFAULT_VERIFY_MODE.to_string()),
        api_key: var("YOUTUBE_API_KEY"),
    };

    let renew_window: f64 = parse(&var, "LEASE_RENEW_WINDOW")?.unwrap_or(DEFAULT_RENEW_WINDOW);
    if !renew_window.is_finite() {
        bail!("LEASE_RENEW_WINDOW is invalid");
    }
    let lease_monitor = LeaseMonitor {
        renew_window,
        default_lease_seconds: parse(&var, "LEASE_DEFAULT_SECONDS")?.unwrap_or(lease_seconds),
    };

    Ok(DotEnvyConfig {
        stage,
        server,
        admin,
        storage,
        youtube,
        lease_monitor,
    })
}

fn parse<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| raw.parse::<T>().with_context(|| format!("{key} is invalid")))
        .transpose()
}

impl DotEnvyConfig {
    pub fn subscription_options(&self) -> SubscriptionOptions {
        SubscriptionOptions {
            hub_url: Some(self.youtube.hub_url.clone()),
            callback_url: self.youtube.callback_url.clone(),
            lease_seconds: self.youtube.lease_seconds,
            verify_mode: Some(self.youtube.verify_mode.clone()),
        }
    }

    pub fn lease_monitor_config(&self) -> LeaseMonitorConfig {
        LeaseMonitorConfig {
            renew_window: self.lease_monitor.renew_window,
            default_lease_seconds: self.lease_monitor.default_lease_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = load_from(env(&[("SERVER_PORT", "8080"), ("ADMIN_TOKEN", "t0ken")])).unwrap();

        assert_eq!(config.stage, Stage::Local);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.body_limit, 1);
        assert_eq!(config.storage.streamers_file, "data/streamers.json");
        assert_eq!(config.youtube.hub_url, DEFAULT_HUB_URL);
        assert_eq!(config.youtube.callback_url, None);
        assert_eq!(config.lease_monitor.default_lease_seconds, DEFAULT_LEASE_SECONDS);

        let options = config.subscription_options();
        assert_eq!(options.verify_mode.as_deref(), Some("async"));
        assert_eq!(config.lease_monitor_config().renew_window, 0.05);
    }

    #[test]
    fn explicit_settings_are_used() {
        let config = load_from(env(&[
            ("STAGE", "prod"),
            ("SERVER_PORT", "9000"),
            ("ADMIN_TOKEN", "t0ken"),
            ("YOUTUBE_CALLBACK_URL", "https://catalog.example/api/v1/websub/youtube"),
            ("YOUTUBE_LEASE_SECONDS", "3600"),
            ("LEASE_RENEW_WINDOW", "0.1"),
        ]))
        .unwrap();

        assert_eq!(config.stage, Stage::Production);
        assert_eq!(config.youtube.lease_seconds, 3600);
        assert_eq!(config.lease_monitor.default_lease_seconds, 3600);
        assert_eq!(config.lease_monitor.renew_window, 0.1);
        assert!(config.subscription_options().callback_url.is_some());
    }

    #[test]
    fn required_and_malformed_values_fail() {
        let missing_token = load_from(env(&[("SERVER_PORT", "8080")])).unwrap_err();
        assert!(missing_token.to_string().contains("ADMIN_TOKEN"));

        let bad_port =
            load_from(env(&[("SERVER_PORT", "eighty"), ("ADMIN_TOKEN", "t")])).unwrap_err();
        assert!(bad_port.to_string().contains("SERVER_PORT"));
    }
}
