// Visited-place store: per-user records of places the user has been to.

pub mod handlers;
pub mod store;
pub mod validation;
