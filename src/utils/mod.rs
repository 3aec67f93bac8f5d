//! Small shared utilities

pub mod helpers;
pub mod search;
