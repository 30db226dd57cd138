pub mod channel_resolver;
pub mod hub_client;
