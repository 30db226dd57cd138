use crate::config::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub stage: Stage,
    pub server: Server,
    pub admin: Admin,
    pub storage: Storage,
    pub youtube: YouTube,
    pub lease_monitor: LeaseMonitor,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Clone)]
pub struct Admin {
    pub token: String,
}

impl std::fmt::Debug for Admin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admin").field("token", &"<redacted>").finish()
    }
}

#[derive(Debug, Clone)]
pub struct Storage {
    pub submissions_file: String,
    pub streamers_file: String,
}

#[derive(Clone)]
pub struct YouTube {
    pub hub_url: String,
    pub callback_url: Option<String>,
    pub lease_seconds: i64,
    pub verify_mode: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for YouTube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTube")
            .field("hub_url", &self.hub_url)
            .field("callback_url", &self.callback_url)
            .field("lease_seconds", &self.lease_seconds)
            .field("verify_mode", &self.verify_mode)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LeaseMonitor {
    pub renew_window: f64,
    pub default_lease_seconds: i64,
}
