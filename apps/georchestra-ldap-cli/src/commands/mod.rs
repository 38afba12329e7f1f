//! Command implementations

pub mod membership;
pub mod roles;
pub mod users;
