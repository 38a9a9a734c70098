//! # Android runtime permissions
//!
//! Query and request Android's "dangerous" permissions from Rust, and get told how the
//! user answered.
//!
//! Requests are asynchronous. Hand [`AndroidPermissionsManager::request_permissions`] a
//! [`PermissionCallback`] and it is called back once per permission with one of three
//! outcomes: granted, denied, or denied with "don't ask again" checked. If no handler is
//! registered for the last case, the denied handler runs instead.
//!
//! ```rust,ignore
//! use dioxus_android_permissions::{AndroidPermission, AndroidPermissionsManager, PermissionCallback};
//!
//! let manager = AndroidPermissionsManager::from_ndk_context()?;
//! manager.request_permissions(
//!     &[AndroidPermission::Camera, AndroidPermission::RecordAudio],
//!     PermissionCallback::new()
//!         .on_granted(|permission| tracing::info!("{permission} granted"))
//!         .on_denied(|permission| tracing::info!("{permission} denied")),
//! )?;
//! ```
//!
//! The platform side is abstracted behind [`PermissionService`]. On Android the
//! [`android::JniPermissionService`] implementation drives the bundled Java plugin.

mod callback;
mod config;
mod error;
mod manager;
mod pending;
mod permission;
mod service;

#[cfg(target_os = "android")]
pub mod android;

pub use callback::{PermissionCallback, PermissionOutcome, PermissionRequestResult};
pub use config::{has_runtime_permissions, PluginConfig, RUNTIME_PERMISSIONS_MIN_SDK};
pub use error::{Error, Result};
pub use manager::AndroidPermissionsManager;
pub use pending::PendingRequests;
pub use permission::{AndroidPermission, ANDROID_PERMISSION_PREFIX};
pub use service::PermissionService;
