use std::sync::Arc;

use crate::{AndroidPermission, PermissionRequestResult, PermissionService, Result};

/// Entry point for querying and requesting runtime permissions.
///
/// The manager owns a [`PermissionService`] and the activity handle it should act on.
/// Both are created once by the host and reused for every call.
///
/// ```rust,ignore
/// let manager = AndroidPermissionsManager::new(JniPermissionService::new(), activity);
///
/// if !manager.is_permission_granted(AndroidPermission::Camera)? {
///     manager.request_permission(
///         AndroidPermission::Camera,
///         PermissionCallback::new()
///             .on_granted(|_| start_preview())
///             .on_denied(|_| show_placeholder()),
///     )?;
/// }
/// ```
pub struct AndroidPermissionsManager<S: PermissionService> {
    service: S,
    context: S::Context,
}

impl<S> Clone for AndroidPermissionsManager<S>
where
    S: PermissionService + Clone,
    S::Context: Clone,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            context: self.context.clone(),
        }
    }
}

impl<S> std::fmt::Debug for AndroidPermissionsManager<S>
where
    S: PermissionService + std::fmt::Debug,
    S::Context: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidPermissionsManager")
            .field("service", &self.service)
            .field("context", &self.context)
            .finish()
    }
}

impl<S: PermissionService> AndroidPermissionsManager<S> {
    pub fn new(service: S, context: S::Context) -> Self {
        Self { service, context }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn context(&self) -> &S::Context {
        &self.context
    }

    pub fn is_permission_granted(&self, permission: AndroidPermission) -> Result<bool> {
        let granted = self
            .service
            .is_permission_granted(&self.context, permission.as_str())?;
        tracing::trace!("{permission} granted: {granted}");
        Ok(granted)
    }

    /// Whether the app should explain why it needs `permission` before requesting it again.
    pub fn should_show_request_permission(&self, permission: AndroidPermission) -> Result<bool> {
        let rationale = self
            .service
            .should_show_request_permission(&self.context, permission.as_str())?;
        tracing::trace!("{permission} needs rationale: {rationale}");
        Ok(rationale)
    }

    pub fn request_permission(
        &self,
        permission: AndroidPermission,
        callback: impl PermissionRequestResult + 'static,
    ) -> Result<()> {
        self.request_permissions(&[permission], callback)
    }

    /// Ask the user for every permission in `permissions`.
    ///
    /// Returns as soon as the request has been handed to the service. `callback` is never
    /// called from inside this method: it is notified later, once per permission, on a
    /// thread chosen by the service (the UI thread for the JNI backend, including on
    /// devices below API 23 where every permission is reported granted). An empty list is
    /// ignored and `callback` is dropped without being called.
    pub fn request_permissions(
        &self,
        permissions: &[AndroidPermission],
        callback: impl PermissionRequestResult + 'static,
    ) -> Result<()> {
        if permissions.is_empty() {
            tracing::warn!("Ignoring permission request with no permissions");
            return Ok(());
        }

        let ids: Vec<&'static str> = permissions.iter().map(|p| p.as_str()).collect();
        tracing::debug!("Requesting permissions {ids:?}");

        self.service
            .request_permission_async(&self.context, &ids, Arc::new(callback))
    }

    pub fn go_to_app_settings(&self) -> Result<()> {
        tracing::debug!("Opening application settings");
        self.service.go_to_app_settings(&self.context)
    }
}
