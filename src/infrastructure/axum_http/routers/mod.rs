pub mod streamers;
pub mod submissions;
pub mod subscriptions;
pub mod websub;
