//! # shelf-auth
//!
//! Authentication and authorization for Shelf RS.
//!
//! ## Features
//!
//! - Cookie sessions with a flash notification queue
//! - Password sign-in against Supabase auth
//! - Role-based permission checks for organization members

pub mod password;
pub mod permissions;
pub mod session;

pub use password::{AuthError, AuthenticatedUser, MemoryAuthenticator, PasswordAuthenticator, SupabaseAuth};
pub use permissions::{require_permission, validate_permission};
pub use session::{
    extract_session_id, AuthSession, CookieConfig, MemorySessionStore, SameSite, Session,
    SessionError, SessionStore,
};
