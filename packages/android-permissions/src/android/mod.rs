//! JNI backend for the permission bridge.
//!
//! Requires `dev.dioxus.permissions.PermissionsPlugin` (see `android/` in this crate) to
//! be packaged in the APK.

mod activity;
mod plugin;

pub use activity::{attach_current_thread, current_activity, java_vm};
pub use plugin::JniPermissionService;

use crate::{AndroidPermissionsManager, PluginConfig, Result};

impl AndroidPermissionsManager<JniPermissionService> {
    /// A manager for the activity registered in the ndk context, using the bundled plugin.
    pub fn from_ndk_context() -> Result<Self> {
        Self::from_ndk_context_with_config(PluginConfig::default())
    }

    pub fn from_ndk_context_with_config(config: PluginConfig) -> Result<Self> {
        let activity = current_activity()?;
        Ok(Self::new(JniPermissionService::with_config(config), activity))
    }
}
