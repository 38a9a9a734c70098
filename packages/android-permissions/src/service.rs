use std::sync::Arc;

use crate::{PermissionRequestResult, Result};

/// The native plugin that actually talks to the Android permission APIs.
///
/// Every method takes the host activity explicitly. Implementations report failures
/// as-is; callers see exactly what the platform returned.
pub trait PermissionService {
    /// Handle to the foreground activity the calls are made on behalf of.
    type Context;

    fn is_permission_granted(&self, context: &Self::Context, permission: &str) -> Result<bool>;

    /// Whether the OS suggests explaining the permission before asking again.
    fn should_show_request_permission(
        &self,
        context: &Self::Context,
        permission: &str,
    ) -> Result<bool>;

    /// Start an asynchronous request for `permissions`.
    ///
    /// Must return without waiting for the user, and must not report any outcome before
    /// returning. The service keeps `callback` alive until it has reported one outcome for
    /// each permission, then drops it.
    fn request_permission_async(
        &self,
        context: &Self::Context,
        permissions: &[&str],
        callback: Arc<dyn PermissionRequestResult>,
    ) -> Result<()>;

    /// Open the system settings page for this application.
    fn go_to_app_settings(&self, context: &Self::Context) -> Result<()>;
}

impl<S: PermissionService + ?Sized> PermissionService for Arc<S> {
    type Context = S::Context;

    fn is_permission_granted(&self, context: &Self::Context, permission: &str) -> Result<bool> {
        (**self).is_permission_granted(context, permission)
    }

    fn should_show_request_permission(
        &self,
        context: &Self::Context,
        permission: &str,
    ) -> Result<bool> {
        (**self).should_show_request_permission(context, permission)
    }

    fn request_permission_async(
        &self,
        context: &Self::Context,
        permissions: &[&str],
        callback: Arc<dyn PermissionRequestResult>,
    ) -> Result<()> {
        (**self).request_permission_async(context, permissions, callback)
    }

    fn go_to_app_settings(&self, context: &Self::Context) -> Result<()> {
        (**self).go_to_app_settings(context)
    }
}
