pub mod channel_resolver;
pub mod entity_store;
pub mod hub_client;
