//! Loaders and actions

pub mod auth;
pub mod dashboard;
pub mod locations;
pub mod notifications;
pub mod settings;
