pub mod alias;
pub mod channel_url;
pub mod clock;
pub mod enums;
pub mod hub_verifications;
pub mod leases;
pub mod operation_context;
pub mod streamers;
pub mod submissions;
