/// Result type for permission operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the permission bridge.
///
/// Failures from the platform are forwarded as-is; the bridge never retries or
/// recovers on its own.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The identifier is not one of the catalogued dangerous permissions.
    #[error("unknown android permission `{0}`")]
    UnknownPermission(String),

    /// The permission service failed to carry out the call.
    #[error("permission service error: {0}")]
    Service(String),

    /// The ndk context did not provide a usable VM or activity.
    #[cfg(target_os = "android")]
    #[error("no android activity is available")]
    ActivityUnavailable,

    /// A JNI call failed.
    #[cfg(target_os = "android")]
    #[error(transparent)]
    Jni(#[from] jni::errors::Error),
}
