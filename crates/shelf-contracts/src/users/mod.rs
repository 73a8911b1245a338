//! User contracts

pub mod update;

pub use update::{UpdateUserContract, UpdateUserForm, UpdateUserPayload};
