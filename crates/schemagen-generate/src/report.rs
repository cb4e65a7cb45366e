use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Directory the package was written into.
    pub root: PathBuf,
    /// Every file written, in emission order.
    pub files: Vec<PathBuf>,
    /// Tables rendered.
    pub tables: usize,
    pub bytes_written: u64,
}
