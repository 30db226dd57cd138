pub mod lease_statuses;
pub mod process_actions;
pub mod submission_statuses;
