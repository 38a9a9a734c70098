use std::{
    ffi::c_void,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{Arc, OnceLock},
};

use jni::{
    objects::{GlobalRef, JClass, JObject, JString, JValue},
    sys::jlong,
    JNIEnv, NativeMethod,
};

use super::activity::attach_current_thread;
use crate::{
    has_runtime_permissions, PendingRequests, PermissionRequestResult, PermissionService,
    PluginConfig, Result,
};

const PERMISSION_GRANTED: i32 = 0;
const APP_SETTINGS_REQUEST_CODE: i32 = 1;
const ACTION_APPLICATION_DETAILS_SETTINGS: &str = "android.settings.APPLICATION_DETAILS_SETTINGS";

/// Must match `requestPermissionsAsync` in PermissionsPlugin.java
const REQUEST_METHOD: &str = "requestPermissionsAsync";
const REQUEST_SIGNATURE: &str = "(Landroid/app/Activity;[Ljava/lang/String;J)V";

/// Must match the `native` declarations in PermissionsPlugin.java
const OUTCOME_SIGNATURE: &str = "(JLjava/lang/String;)V";
const RELEASE_SIGNATURE: &str = "(J)V";

/// Sinks of requests the plugin has not released yet. Java only ever holds their ids.
static PENDING: OnceLock<PendingRequests> = OnceLock::new();

fn pending() -> &'static PendingRequests {
    PENDING.get_or_init(PendingRequests::new)
}

/// [`PermissionService`] backed by the `PermissionsPlugin` Java class over JNI.
///
/// Grant and rationale queries go straight to the activity. Requests are handed to the
/// plugin, which shows the system dialog and reports each result through native methods
/// registered by this type.
#[derive(Debug, Default)]
pub struct JniPermissionService {
    config: PluginConfig,
    plugin_class: OnceLock<GlobalRef>,
    sdk_int: OnceLock<i32>,
}

impl JniPermissionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PluginConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    fn sdk_int(&self, env: &mut JNIEnv<'_>) -> Result<i32> {
        if let Some(sdk) = self.sdk_int.get() {
            return Ok(*sdk);
        }
        let sdk = env
            .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
            .and_then(|value| value.i())
            .map_err(|err| clear_exception(env, err))?;
        Ok(*self.sdk_int.get_or_init(|| sdk))
    }

    fn has_runtime_permissions(&self, env: &mut JNIEnv<'_>) -> Result<bool> {
        Ok(has_runtime_permissions(self.sdk_int(env)?))
    }

    /// Load the plugin class through the activity's class loader and register our natives.
    fn plugin_class(&self, env: &mut JNIEnv<'_>, activity: &JObject<'_>) -> Result<&GlobalRef> {
        if let Some(class) = self.plugin_class.get() {
            return Ok(class);
        }

        let class = load_plugin_class(env, activity, &self.config.plugin_class)
            .map_err(|err| clear_exception(env, err))?;
        register_natives(env, &class).map_err(|err| clear_exception(env, err))?;

        tracing::debug!("Loaded permission plugin {}", self.config.plugin_class);
        let global = env.new_global_ref(class)?;
        Ok(self.plugin_class.get_or_init(|| global))
    }
}

impl PermissionService for JniPermissionService {
    type Context = GlobalRef;

    fn is_permission_granted(&self, activity: &GlobalRef, permission: &str) -> Result<bool> {
        let mut env = attach_current_thread()?;
        if !self.has_runtime_permissions(&mut env)? {
            return Ok(true);
        }

        let permission = env.new_string(permission)?;
        let status = env
            .call_method(
                activity,
                "checkSelfPermission",
                "(Ljava/lang/String;)I",
                &[JValue::Object(&permission)],
            )
            .and_then(|value| value.i())
            .map_err(|err| clear_exception(&mut env, err))?;

        Ok(status == PERMISSION_GRANTED)
    }

    fn should_show_request_permission(
        &self,
        activity: &GlobalRef,
        permission: &str,
    ) -> Result<bool> {
        let mut env = attach_current_thread()?;
        if !self.has_runtime_permissions(&mut env)? {
            return Ok(false);
        }

        let permission = env.new_string(permission)?;
        let rationale = env
            .call_method(
                activity,
                "shouldShowRequestPermissionRationale",
                "(Ljava/lang/String;)Z",
                &[JValue::Object(&permission)],
            )
            .and_then(|value| value.z())
            .map_err(|err| clear_exception(&mut env, err))?;

        Ok(rationale)
    }

    fn request_permission_async(
        &self,
        activity: &GlobalRef,
        permissions: &[&str],
        callback: Arc<dyn PermissionRequestResult>,
    ) -> Result<()> {
        let mut env = attach_current_thread()?;

        // Always go through the plugin, even below API 23, so outcomes are delivered
        // on the UI thread after this call returns.
        let class = self.plugin_class(&mut env, activity.as_obj())?;

        let array = env.new_object_array(
            permissions.len() as i32,
            "java/lang/String",
            &JObject::null(),
        )?;
        for (index, permission) in permissions.iter().enumerate() {
            let permission = env.new_string(permission)?;
            env.set_object_array_element(&array, index as i32, permission)?;
        }

        let request_id = pending().insert(callback);

        let class: &JClass = class.as_obj().into();
        let result = env.call_static_method(
            class,
            REQUEST_METHOD,
            REQUEST_SIGNATURE,
            &[
                JValue::Object(activity.as_obj()),
                JValue::Object(&array),
                JValue::Long(request_id),
            ],
        );

        if let Err(err) = result {
            // The plugin never saw the id, so nothing else will release it.
            pending().release(request_id);
            return Err(clear_exception(&mut env, err));
        }

        Ok(())
    }

    fn go_to_app_settings(&self, activity: &GlobalRef) -> Result<()> {
        let mut env = attach_current_thread()?;
        open_app_settings(&mut env, activity.as_obj())
            .map_err(|err| clear_exception(&mut env, err))
    }
}

fn open_app_settings(env: &mut JNIEnv<'_>, activity: &JObject<'_>) -> jni::errors::Result<()> {
    let action = env.new_string(ACTION_APPLICATION_DETAILS_SETTINGS)?;
    let intent = env.new_object(
        "android/content/Intent",
        "(Ljava/lang/String;)V",
        &[JValue::Object(&action)],
    )?;

    let package_name = env
        .call_method(activity, "getPackageName", "()Ljava/lang/String;", &[])?
        .l()?;
    let scheme = env.new_string("package")?;
    let uri = env
        .call_static_method(
            "android/net/Uri",
            "fromParts",
            "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)Landroid/net/Uri;",
            &[
                JValue::Object(&scheme),
                JValue::Object(&package_name),
                JValue::Object(&JObject::null()),
            ],
        )?
        .l()?;

    env.call_method(
        &intent,
        "setData",
        "(Landroid/net/Uri;)Landroid/content/Intent;",
        &[JValue::Object(&uri)],
    )?;
    env.call_method(
        activity,
        "startActivityForResult",
        "(Landroid/content/Intent;I)V",
        &[JValue::Object(&intent), JValue::Int(APP_SETTINGS_REQUEST_CODE)],
    )?;
    Ok(())
}

/// Load a class that ships in the APK.
///
/// `FindClass` on a natively attached thread only sees the system class loader, so we go
/// through the activity's loader instead.
fn load_plugin_class<'env>(
    env: &mut JNIEnv<'env>,
    activity: &JObject<'_>,
    class_name: &str,
) -> jni::errors::Result<JClass<'env>> {
    let loader = env
        .call_method(activity, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])?
        .l()?;
    let class_name = env.new_string(class_name)?;
    let class = env
        .call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&class_name)],
        )?
        .l()?;
    Ok(class.into())
}

fn register_natives(env: &mut JNIEnv<'_>, class: &JClass<'_>) -> jni::errors::Result<()> {
    env.register_native_methods(
        class,
        &[
            NativeMethod {
                name: "nativeOnPermissionGranted".into(),
                sig: OUTCOME_SIGNATURE.into(),
                fn_ptr: native_on_permission_granted as *mut c_void,
            },
            NativeMethod {
                name: "nativeOnPermissionDenied".into(),
                sig: OUTCOME_SIGNATURE.into(),
                fn_ptr: native_on_permission_denied as *mut c_void,
            },
            NativeMethod {
                name: "nativeOnPermissionDeniedAndDontAskAgain".into(),
                sig: OUTCOME_SIGNATURE.into(),
                fn_ptr: native_on_permission_denied_and_dont_ask_again as *mut c_void,
            },
            NativeMethod {
                name: "nativeRelease".into(),
                sig: RELEASE_SIGNATURE.into(),
                fn_ptr: native_release as *mut c_void,
            },
        ],
    )
}

/// Log and clear any pending Java exception so the next JNI call starts clean.
fn clear_exception(env: &mut JNIEnv<'_>, err: jni::errors::Error) -> crate::Error {
    if matches!(env.exception_check(), Ok(true)) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    tracing::warn!("JNI call failed: {err}");
    err.into()
}

/// Hand one outcome to the sink registered under `request_id`.
///
/// Ids the registry does not know (already released, or left over from a previous process)
/// are ignored.
fn deliver(
    env: &mut JNIEnv<'_>,
    request_id: jlong,
    permission: JString<'_>,
    f: impl FnOnce(&dyn PermissionRequestResult, &str),
) {
    let Some(sink) = pending().get(request_id) else {
        tracing::debug!("Ignoring permission result for unknown request {request_id}");
        return;
    };

    let permission: String = match env.get_string(&permission) {
        Ok(permission) => permission.into(),
        Err(err) => {
            tracing::warn!("Dropping permission result with unreadable name: {err}");
            return;
        }
    };

    // Unwinding into the JVM is undefined behavior.
    if catch_unwind(AssertUnwindSafe(|| f(&*sink, &permission))).is_err() {
        tracing::error!("Permission handler for {permission} panicked");
    }
}

extern "system" fn native_on_permission_granted<'a>(
    mut env: JNIEnv<'a>,
    _class: JClass<'a>,
    request_id: jlong,
    permission: JString<'a>,
) {
    deliver(&mut env, request_id, permission, |sink, id| {
        sink.on_permission_granted(id)
    })
}

extern "system" fn native_on_permission_denied<'a>(
    mut env: JNIEnv<'a>,
    _class: JClass<'a>,
    request_id: jlong,
    permission: JString<'a>,
) {
    deliver(&mut env, request_id, permission, |sink, id| {
        sink.on_permission_denied(id)
    })
}

extern "system" fn native_on_permission_denied_and_dont_ask_again<'a>(
    mut env: JNIEnv<'a>,
    _class: JClass<'a>,
    request_id: jlong,
    permission: JString<'a>,
) {
    deliver(&mut env, request_id, permission, |sink, id| {
        sink.on_permission_denied_and_dont_ask_again(id)
    })
}

/// Called by the plugin once a request is finished, resolved or not.
extern "system" fn native_release<'a>(_env: JNIEnv<'a>, _class: JClass<'a>, request_id: jlong) {
    if !pending().release(request_id) {
        tracing::debug!("Permission request {request_id} was already released");
    }
}
