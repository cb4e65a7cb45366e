//! Database drivers for schemagen.
//!
//! A [`Driver`] knows how to open a [`Session`] against one kind of
//! database; a session owns a single pinned connection and extracts the
//! schema model over it. Drivers are looked up by identifier in the
//! [`DriverRegistry`], so an unknown identifier fails before anything
//! touches the network.

pub mod adapter;
pub mod options;
pub mod postgres;
pub mod registry;

pub use adapter::{Driver, Session};
pub use options::{ConnectOptions, ExtractOptions};
pub use postgres::PostgresDriver;
pub use registry::{DriverRegistry, UnknownDriver};
