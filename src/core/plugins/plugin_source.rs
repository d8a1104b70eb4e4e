use super::plugin_loader::LoaderError;
use super::plugin_models::PluginSection;

/// Storage port for the plugin tree.
///
/// Reads happen once at boot, so the trait is synchronous.
pub trait PluginSource: Send + Sync {
    /// Names of the plugin folders directly under the root, sorted.
    fn list_plugins(&self) -> Result<Vec<String>, LoaderError>;

    /// Raw `plugin.json`, if the plugin has one.
    fn read_descriptor(&self, plugin: &str) -> Result<Option<String>, LoaderError>;

    fn has_section(&self, plugin: &str, section: PluginSection) -> Result<bool, LoaderError>;

    /// Regular files in a section folder, sorted. Subfolders are not listed.
    fn list_section(&self, plugin: &str, section: PluginSection)
        -> Result<Vec<String>, LoaderError>;

    fn read_file(
        &self,
        plugin: &str,
        section: PluginSection,
        file: &str,
    ) -> Result<String, LoaderError>;
}
