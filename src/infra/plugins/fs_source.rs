use crate::core::plugins::{LoaderError, PluginSection, PluginSource, DESCRIPTOR_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Plugin tree on the local filesystem.
pub struct FsPluginSource {
    root: PathBuf,
}

impl FsPluginSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn section_dir(&self, plugin: &str, section: PluginSection) -> PathBuf {
        self.root.join(plugin).join(section.dir_name())
    }

    /// Entry names under `dir` whose file type passes `keep`, sorted.
    fn entries(
        dir: &Path,
        keep: impl Fn(&fs::FileType) -> bool,
    ) -> Result<Vec<String>, LoaderError> {
        let io_err = |source| LoaderError::Io {
            path: dir.display().to_string(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let file_type = entry.file_type().map_err(io_err)?;
            if !keep(&file_type) {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!("Skipping non UTF-8 entry {:?} in {}", raw, dir.display()),
            }
        }

        names.sort();
        Ok(names)
    }

    fn read(path: &Path) -> Result<String, LoaderError> {
        fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl PluginSource for FsPluginSource {
    fn list_plugins(&self) -> Result<Vec<String>, LoaderError> {
        if !self.root.is_dir() {
            return Err(LoaderError::MissingRoot(self.root.display().to_string()));
        }
        Self::entries(&self.root, |t| t.is_dir())
    }

    fn read_descriptor(&self, plugin: &str) -> Result<Option<String>, LoaderError> {
        let path = self.root.join(plugin).join(DESCRIPTOR_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    fn has_section(&self, plugin: &str, section: PluginSection) -> Result<bool, LoaderError> {
        Ok(self.section_dir(plugin, section).is_dir())
    }

    fn list_section(
        &self,
        plugin: &str,
        section: PluginSection,
    ) -> Result<Vec<String>, LoaderError> {
        Self::entries(&self.section_dir(plugin, section), |t| t.is_file())
    }

    fn read_file(
        &self,
        plugin: &str,
        section: PluginSection,
        file: &str,
    ) -> Result<String, LoaderError> {
        Self::read(&self.section_dir(plugin, section).join(file))
    }
}
