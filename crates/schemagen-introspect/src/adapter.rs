use async_trait::async_trait;

use schemagen_core::{Model, Result};

use crate::options::{ConnectOptions, ExtractOptions};

/// Implemented once per supported database kind.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Identifier the driver is registered under (e.g. `postgres`).
    fn id(&self) -> &'static str;

    /// Open a live session. The returned session owns its connection and
    /// must be closed by the caller exactly once.
    async fn connect(&self, opts: &ConnectOptions) -> Result<Box<dyn Session>>;
}

/// A live connection for one extraction run.
#[async_trait]
pub trait Session: Send {
    /// Extract the full schema model over the pinned connection.
    async fn extract_model(&mut self, opts: &ExtractOptions) -> Result<Model>;

    /// Release the underlying connection. Further calls are no-ops.
    async fn close(&mut self) -> Result<()>;
}
