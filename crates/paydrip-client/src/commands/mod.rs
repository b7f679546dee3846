pub mod common;
pub mod disburse;
pub mod expiring;
pub mod options;
pub mod plan;
pub mod preview;
pub mod transition;
