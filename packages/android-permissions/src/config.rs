use serde::Deserialize;

/// Android 6.0 (Marshmallow, `Build.VERSION_CODES.M`) introduced runtime permissions.
///
/// Below this level every permission is granted at install time. The Java plugin checks
/// the same constant, so the two sides always agree on whether a dialog exists.
pub const RUNTIME_PERMISSIONS_MIN_SDK: i32 = 23;

/// Whether a device at `sdk_int` asks the user for dangerous permissions at runtime.
pub const fn has_runtime_permissions(sdk_int: i32) -> bool {
    sdk_int >= RUNTIME_PERMISSIONS_MIN_SDK
}

/// Settings for the native side of the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PluginConfig {
    /// Fully qualified name of the Java plugin class shipped in the APK.
    pub plugin_class: String,
}

impl PluginConfig {
    pub const DEFAULT_PLUGIN_CLASS: &'static str = "dev.dioxus.permissions.PermissionsPlugin";

    pub fn with_plugin_class(mut self, class: impl Into<String>) -> Self {
        self.plugin_class = class.into();
        self
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            plugin_class: Self::DEFAULT_PLUGIN_CLASS.to_string(),
        }
    }
}
