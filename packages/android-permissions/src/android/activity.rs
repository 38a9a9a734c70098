use std::sync::OnceLock;

use jni::{
    objects::{GlobalRef, JObject},
    AttachGuard, JavaVM,
};

use crate::{Error, Result};

/// Cached reference to the Android activity.
static ACTIVITY: OnceLock<GlobalRef> = OnceLock::new();
static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

/// The process-wide `JavaVM`, taken from the ndk context on first use.
pub fn java_vm() -> Result<&'static JavaVM> {
    if let Some(vm) = JAVA_VM.get() {
        return Ok(vm);
    }

    let ctx = ndk_context::android_context();
    if ctx.vm().is_null() {
        return Err(Error::ActivityUnavailable);
    }

    let raw_vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }?;
    // A racing thread may have stored its own handle first; both wrap the same VM.
    let _ = JAVA_VM.set(raw_vm);
    JAVA_VM.get().ok_or(Error::ActivityUnavailable)
}

/// Attach the calling thread to the VM, or reuse its existing attachment.
pub fn attach_current_thread() -> Result<AttachGuard<'static>> {
    Ok(java_vm()?.attach_current_thread()?)
}

/// A global reference to the activity hosting the app.
///
/// The reference is created once and shared by every later caller.
pub fn current_activity() -> Result<GlobalRef> {
    if let Some(activity) = ACTIVITY.get() {
        return Ok(activity.clone());
    }

    let ctx = ndk_context::android_context();
    if ctx.context().is_null() {
        return Err(Error::ActivityUnavailable);
    }

    let env = attach_current_thread()?;
    let raw_activity = unsafe { JObject::from_raw(ctx.context() as jni::sys::jobject) };
    let global = env.new_global_ref(&raw_activity)?;
    match ACTIVITY.set(global) {
        Ok(()) => ACTIVITY.get().cloned().ok_or(Error::ActivityUnavailable),
        Err(global) => {
            drop(global);
            ACTIVITY.get().cloned().ok_or(Error::ActivityUnavailable)
        }
    }
}
