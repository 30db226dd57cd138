pub mod lease_monitor;
pub mod streamers;
pub mod submissions;
pub mod subscription_onboarding;
