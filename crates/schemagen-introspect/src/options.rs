use std::time::Duration;

/// Connection parameters resolved by the caller.
///
/// `user` and `password` override whatever the URL carries; drivers apply
/// them after parsing the URL.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Options controlling what an extraction covers and how long it may run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Restrict extraction to these schemas. `None` means every schema
    /// except the backend's system namespaces.
    pub schemas: Option<Vec<String>>,
    /// Upper bound on the extraction await, enforced by the caller around
    /// [`crate::Session::extract_model`]. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}
