//! Values kept in the admin session.

/// Session keys for admin state.
pub mod keys {
    /// Set to `true` once the credential pair has been accepted.
    pub const ADMIN_LOGGED_IN: &str = "adminLogado";

    /// The password recovery flow in progress, if any.
    pub const RECOVERY: &str = "recovery";
}
