//! Result sinks for asynchronous permission requests.
//!
//! The permission service reports back through [`PermissionRequestResult`], once per
//! requested permission. [`PermissionCallback`] is the closure-based implementation most
//! callers want.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Receives the outcome of a permission request.
///
/// The service calls exactly one of these methods for every permission in a request,
/// from whatever thread it happens to run on. Duplicate notifications, or notifications
/// for permissions that were never requested, are passed through unchecked.
pub trait PermissionRequestResult: Send + Sync {
    /// The user granted the permission.
    fn on_permission_granted(&self, permission: &str);

    /// The user denied the permission.
    fn on_permission_denied(&self, permission: &str);

    /// The user denied the permission and asked not to be prompted again.
    ///
    /// Defaults to [`on_permission_denied`](Self::on_permission_denied).
    fn on_permission_denied_and_dont_ask_again(&self, permission: &str) {
        self.on_permission_denied(permission);
    }
}

/// One resolved permission, as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "permission", rename_all = "snake_case")]
pub enum PermissionOutcome {
    Granted(String),
    Denied(String),
    DeniedAndDontAskAgain(String),
}

impl PermissionOutcome {
    /// The OS identifier of the permission this outcome is about.
    pub fn permission(&self) -> &str {
        match self {
            PermissionOutcome::Granted(id)
            | PermissionOutcome::Denied(id)
            | PermissionOutcome::DeniedAndDontAskAgain(id) => id,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionOutcome::Granted(_))
    }

    /// Route this outcome to the matching method of `sink`.
    pub fn deliver_to(&self, sink: &(impl PermissionRequestResult + ?Sized)) {
        match self {
            PermissionOutcome::Granted(id) => sink.on_permission_granted(id),
            PermissionOutcome::Denied(id) => sink.on_permission_denied(id),
            PermissionOutcome::DeniedAndDontAskAgain(id) => {
                sink.on_permission_denied_and_dont_ask_again(id)
            }
        }
    }
}

type Handler = Box<dyn Fn(&str) + Send + Sync + 'static>;

/// A bundle of optional handlers, one per outcome.
///
/// Missing handlers are skipped silently. When no "don't ask again" handler is set, that
/// outcome is routed to the denied handler instead.
///
/// ```rust
/// use dioxus_android_permissions::{PermissionCallback, PermissionRequestResult};
///
/// let callback = PermissionCallback::new()
///     .on_granted(|permission| println!("{permission} granted"))
///     .on_denied(|permission| println!("{permission} denied"));
///
/// // Falls back to the denied handler.
/// callback.on_permission_denied_and_dont_ask_again("android.permission.CAMERA");
/// ```
#[derive(Default)]
pub struct PermissionCallback {
    granted: Option<Handler>,
    denied: Option<Handler>,
    denied_and_dont_ask_again: Option<Handler>,
}

impl PermissionCallback {
    /// A callback with no handlers registered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_granted(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.granted = Some(Box::new(f));
        self
    }

    pub fn on_denied(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.denied = Some(Box::new(f));
        self
    }

    pub fn on_denied_and_dont_ask_again(
        mut self,
        f: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.denied_and_dont_ask_again = Some(Box::new(f));
        self
    }
}

impl PermissionRequestResult for PermissionCallback {
    fn on_permission_granted(&self, permission: &str) {
        tracing::debug!("permission {permission} granted");
        if let Some(granted) = &self.granted {
            granted(permission);
        }
    }

    fn on_permission_denied(&self, permission: &str) {
        tracing::debug!("permission {permission} denied");
        if let Some(denied) = &self.denied {
            denied(permission);
        }
    }

    fn on_permission_denied_and_dont_ask_again(&self, permission: &str) {
        tracing::debug!("permission {permission} denied, don't ask again");
        if let Some(handler) = &self.denied_and_dont_ask_again {
            handler(permission);
        } else if let Some(denied) = &self.denied {
            denied(permission);
        }
    }
}

impl fmt::Debug for PermissionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionCallback")
            .field("granted", &self.granted.is_some())
            .field("denied", &self.denied.is_some())
            .field(
                "denied_and_dont_ask_again",
                &self.denied_and_dont_ask_again.is_some(),
            )
            .finish()
    }
}
