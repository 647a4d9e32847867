//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::loaders::{Archetype, ArchetypeLoader, ConfigLoader, LoadResult};

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// └── archetypes/
///     ├── fighter.ron
///     └── duelist.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat configuration from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("combat.toml"))
    }

    /// Load `archetypes/<name>.ron`.
    pub fn load_archetype(&self, name: &str) -> LoadResult<Archetype> {
        let path = self.data_dir.join("archetypes").join(format!("{name}.ron"));
        ArchetypeLoader::load(&path)
    }
}
