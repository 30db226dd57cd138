pub mod streamers;
pub mod submissions;
