//! Content loaders for reading combat data from files.

pub mod archetype;
pub mod config;
pub mod factory;

pub use archetype::{Archetype, ArchetypeLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

use combat_core::{CombatError, ValidationError};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Lifts a core validation failure into a load error naming the file.
pub(crate) fn invalid(path: &Path, error: ValidationError) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid content in {}: {} [{}]",
        path.display(),
        error,
        error.error_code()
    )
}
