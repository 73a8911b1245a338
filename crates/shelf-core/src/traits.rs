//! Core traits shared by contracts, services and the auth layer

/// Primary key type. Rows are keyed by opaque string ids (cuid).
pub type Id = String;

/// The signed-in user a request acts on behalf of
pub trait UserContext: Send + Sync {
    fn user_id(&self) -> &str;
    fn email(&self) -> &str;

    /// Whether this context acts on the given user's own records
    fn is_self(&self, user_id: &str) -> bool {
        self.user_id() == user_id
    }
}
