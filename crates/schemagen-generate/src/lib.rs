//! Source generation for corrected schema models.
//!
//! [`SourceGenerator`] renders one Rust module per table plus a package
//! index from embedded templates and writes them under an output
//! directory. The qualified names baked into the generated constants are
//! taken from the model as given, so whatever correction ran before
//! generation is what consumers see.

pub mod error;
pub mod generator;
pub mod idents;
pub mod report;
pub mod types;

pub use error::GenerationError;
pub use generator::SourceGenerator;
pub use report::GenerationReport;
