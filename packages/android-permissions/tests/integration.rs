use std::sync::{Arc, Mutex};

use dioxus_android_permissions::{
    AndroidPermission, AndroidPermissionsManager, Error, PendingRequests, PermissionCallback,
    PermissionOutcome, PermissionRequestResult, PermissionService, Result,
};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    IsGranted(String, String),
    ShouldShow(String, String),
    Request(String, Vec<String>),
    Settings(String),
}

/// Stands in for the native plugin: records every call and keeps request sinks around so
/// tests can report outcomes later.
#[derive(Default)]
struct MockService {
    calls: Mutex<Vec<Call>>,
    granted: Vec<&'static str>,
    rationale: Vec<&'static str>,
    pending: Mutex<Vec<Arc<dyn PermissionRequestResult>>>,
    fail: bool,
}

impl MockService {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Deliver an outcome to the sink of the `index`th request.
    fn report(&self, index: usize, outcome: PermissionOutcome) {
        let sink = self.pending.lock().unwrap()[index].clone();
        outcome.deliver_to(&*sink);
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Service("plugin not loaded".to_string()));
        }
        Ok(())
    }
}

impl PermissionService for MockService {
    type Context = String;

    fn is_permission_granted(&self, context: &String, permission: &str) -> Result<bool> {
        self.check()?;
        self.calls
            .lock()
            .unwrap()
            .push(Call::IsGranted(context.clone(), permission.to_string()));
        Ok(self.granted.iter().any(|p| *p == permission))
    }

    fn should_show_request_permission(&self, context: &String, permission: &str) -> Result<bool> {
        self.check()?;
        self.calls
            .lock()
            .unwrap()
            .push(Call::ShouldShow(context.clone(), permission.to_string()));
        Ok(self.rationale.iter().any(|p| *p == permission))
    }

    fn request_permission_async(
        &self,
        context: &String,
        permissions: &[&str],
        callback: Arc<dyn PermissionRequestResult>,
    ) -> Result<()> {
        self.check()?;
        self.calls.lock().unwrap().push(Call::Request(
            context.clone(),
            permissions.iter().map(|p| p.to_string()).collect(),
        ));
        self.pending.lock().unwrap().push(callback);
        Ok(())
    }

    fn go_to_app_settings(&self, context: &String) -> Result<()> {
        self.check()?;
        self.calls
            .lock()
            .unwrap()
            .push(Call::Settings(context.clone()));
        Ok(())
    }
}

type Log = Arc<Mutex<Vec<(&'static str, String)>>>;

fn recorder(log: &Log, tag: &'static str) -> impl Fn(&str) + Send + Sync + 'static {
    let log = log.clone();
    move |permission| log.lock().unwrap().push((tag, permission.to_string()))
}

fn manager() -> AndroidPermissionsManager<Arc<MockService>> {
    AndroidPermissionsManager::new(Arc::new(MockService::default()), "MainActivity".to_string())
}

fn entries(log: &Log) -> Vec<(&'static str, String)> {
    log.lock().unwrap().clone()
}

#[test]
fn test_canonical_identifiers() {
    assert_eq!(AndroidPermission::Camera.as_str(), "android.permission.CAMERA");
    assert_eq!(
        AndroidPermission::RecordAudio.as_str(),
        "android.permission.RECORD_AUDIO"
    );
    assert_eq!(
        AndroidPermission::AccessFineLocation.to_string(),
        "android.permission.ACCESS_FINE_LOCATION"
    );

    for permission in AndroidPermission::ALL {
        assert_eq!(
            permission.as_str(),
            format!("android.permission.{}", permission.name())
        );
        assert_eq!(permission.as_str().parse::<AndroidPermission>().ok(), Some(*permission));
    }
}

#[test]
fn test_permission_serde_uses_identifier() {
    let json = serde_json::to_string(&[AndroidPermission::Camera, AndroidPermission::ReadSms]).unwrap();
    assert_eq!(json, r#"["android.permission.CAMERA","android.permission.READ_SMS"]"#);

    let parsed: Vec<AndroidPermission> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, vec![AndroidPermission::Camera, AndroidPermission::ReadSms]);

    assert!(serde_json::from_str::<AndroidPermission>(r#""CAMERA""#).is_err());
}

#[test]
fn test_granted_invokes_only_granted_handler() {
    let manager = manager();
    let log = Log::default();

    manager
        .request_permission(
            AndroidPermission::Camera,
            PermissionCallback::new()
                .on_granted(recorder(&log, "granted"))
                .on_denied(recorder(&log, "denied"))
                .on_denied_and_dont_ask_again(recorder(&log, "forever")),
        )
        .unwrap();

    assert!(entries(&log).is_empty());

    manager
        .service()
        .report(0, PermissionOutcome::Granted("android.permission.CAMERA".into()));

    assert_eq!(
        entries(&log),
        vec![("granted", "android.permission.CAMERA".to_string())]
    );
}

#[test]
fn test_dont_ask_again_falls_back_to_denied() {
    let manager = manager();
    let log = Log::default();

    manager
        .request_permission(
            AndroidPermission::Camera,
            PermissionCallback::new()
                .on_granted(recorder(&log, "granted"))
                .on_denied(recorder(&log, "denied")),
        )
        .unwrap();
    manager.service().report(
        0,
        PermissionOutcome::DeniedAndDontAskAgain("android.permission.CAMERA".into()),
    );

    assert_eq!(
        entries(&log),
        vec![("denied", "android.permission.CAMERA".to_string())]
    );
}

#[test]
fn test_dont_ask_again_handler_wins_over_denied() {
    let manager = manager();
    let log = Log::default();

    manager
        .request_permission(
            AndroidPermission::Camera,
            PermissionCallback::new()
                .on_denied(recorder(&log, "denied"))
                .on_denied_and_dont_ask_again(recorder(&log, "forever")),
        )
        .unwrap();
    manager.service().report(
        0,
        PermissionOutcome::DeniedAndDontAskAgain("android.permission.CAMERA".into()),
    );

    assert_eq!(
        entries(&log),
        vec![("forever", "android.permission.CAMERA".to_string())]
    );
}

#[test]
fn test_no_handlers_is_a_noop() {
    let manager = manager();

    manager
        .request_permission(AndroidPermission::Camera, PermissionCallback::new())
        .unwrap();

    let service = manager.service();
    service.report(0, PermissionOutcome::Granted("android.permission.CAMERA".into()));
    service.report(0, PermissionOutcome::Denied("android.permission.CAMERA".into()));
    service.report(
        0,
        PermissionOutcome::DeniedAndDontAskAgain("android.permission.CAMERA".into()),
    );
}

#[test]
fn test_multiple_permissions_resolve_independently() {
    let manager = manager();
    let log = Log::default();

    manager
        .request_permissions(
            &[AndroidPermission::Camera, AndroidPermission::RecordAudio],
            PermissionCallback::new()
                .on_granted(recorder(&log, "granted"))
                .on_denied(recorder(&log, "denied")),
        )
        .unwrap();

    assert_eq!(
        manager.service().calls(),
        vec![Call::Request(
            "MainActivity".to_string(),
            vec![
                "android.permission.CAMERA".to_string(),
                "android.permission.RECORD_AUDIO".to_string()
            ]
        )]
    );

    let service = manager.service();
    service.report(0, PermissionOutcome::Granted("android.permission.CAMERA".into()));
    service.report(0, PermissionOutcome::Denied("android.permission.RECORD_AUDIO".into()));

    assert_eq!(
        entries(&log),
        vec![
            ("granted", "android.permission.CAMERA".to_string()),
            ("denied", "android.permission.RECORD_AUDIO".to_string()),
        ]
    );
}

#[test]
fn test_unrequested_and_duplicate_outcomes_pass_through() {
    let manager = manager();
    let log = Log::default();

    manager
        .request_permission(
            AndroidPermission::Camera,
            PermissionCallback::new().on_granted(recorder(&log, "granted")),
        )
        .unwrap();

    let service = manager.service();
    service.report(0, PermissionOutcome::Granted("android.permission.CAMERA".into()));
    service.report(0, PermissionOutcome::Granted("android.permission.CAMERA".into()));
    service.report(0, PermissionOutcome::Granted("android.permission.SEND_SMS".into()));

    assert_eq!(entries(&log).len(), 3);
}

#[test]
fn test_empty_request_never_reaches_service() {
    let manager = manager();
    let log = Log::default();

    manager
        .request_permissions(&[], PermissionCallback::new().on_granted(recorder(&log, "granted")))
        .unwrap();

    assert!(manager.service().calls().is_empty());
    assert!(entries(&log).is_empty());
}

#[test]
fn test_queries_forward_identifier_and_context() {
    let service = MockService {
        granted: vec!["android.permission.CAMERA"],
        rationale: vec!["android.permission.READ_CONTACTS"],
        ..Default::default()
    };
    let manager = AndroidPermissionsManager::new(service, "GameActivity".to_string());

    assert!(manager.is_permission_granted(AndroidPermission::Camera).unwrap());
    assert!(!manager.is_permission_granted(AndroidPermission::RecordAudio).unwrap());
    assert!(manager
        .should_show_request_permission(AndroidPermission::ReadContacts)
        .unwrap());
    manager.go_to_app_settings().unwrap();

    assert_eq!(
        manager.service().calls(),
        vec![
            Call::IsGranted("GameActivity".into(), "android.permission.CAMERA".into()),
            Call::IsGranted("GameActivity".into(), "android.permission.RECORD_AUDIO".into()),
            Call::ShouldShow("GameActivity".into(), "android.permission.READ_CONTACTS".into()),
            Call::Settings("GameActivity".into()),
        ]
    );
}

#[test]
fn test_service_errors_propagate_unchanged() {
    let service = MockService {
        fail: true,
        ..Default::default()
    };
    let manager = AndroidPermissionsManager::new(service, "MainActivity".to_string());

    let err = manager
        .is_permission_granted(AndroidPermission::Camera)
        .unwrap_err();
    assert!(matches!(err, Error::Service(ref msg) if msg == "plugin not loaded"));

    assert!(manager
        .request_permission(AndroidPermission::Camera, PermissionCallback::new())
        .is_err());
    assert!(manager.go_to_app_settings().is_err());
}

#[test]
fn test_callbacks_can_run_on_another_thread() {
    let manager = manager();
    let log = Log::default();

    manager
        .request_permission(
            AndroidPermission::BodySensors,
            PermissionCallback::new().on_granted(recorder(&log, "granted")),
        )
        .unwrap();

    let service = manager.service().clone();
    std::thread::spawn(move || {
        service.report(
            0,
            PermissionOutcome::Granted("android.permission.BODY_SENSORS".into()),
        )
    })
    .join()
    .unwrap();

    assert_eq!(
        entries(&log),
        vec![("granted", "android.permission.BODY_SENSORS".to_string())]
    );
}

/// Mirrors how the JNI backend hands requests to native code: only ids cross the boundary,
/// and the native side reports by id.
#[derive(Default)]
struct IdBridge {
    pending: PendingRequests,
    requests: Mutex<Vec<(i64, Vec<String>)>>,
}

impl IdBridge {
    fn report(&self, request_id: i64, outcome: PermissionOutcome) {
        if let Some(sink) = self.pending.get(request_id) {
            outcome.deliver_to(&*sink);
        }
    }

    /// What the plugin does when a request ends early: deny the rest, then release.
    fn finish(&self, request_id: i64, unresolved: &[&str]) {
        for permission in unresolved {
            self.report(request_id, PermissionOutcome::Denied(permission.to_string()));
        }
        self.pending.release(request_id);
    }
}

impl PermissionService for IdBridge {
    type Context = ();

    fn is_permission_granted(&self, _: &(), _: &str) -> Result<bool> {
        Ok(false)
    }

    fn should_show_request_permission(&self, _: &(), _: &str) -> Result<bool> {
        Ok(false)
    }

    fn request_permission_async(
        &self,
        _: &(),
        permissions: &[&str],
        callback: Arc<dyn PermissionRequestResult>,
    ) -> Result<()> {
        let id = self.pending.insert(callback);
        self.requests
            .lock()
            .unwrap()
            .push((id, permissions.iter().map(|p| p.to_string()).collect()));
        Ok(())
    }

    fn go_to_app_settings(&self, _: &()) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_request_returns_before_any_outcome() {
    let manager = AndroidPermissionsManager::new(IdBridge::default(), ());
    let log = Log::default();

    manager
        .request_permissions(
            &[AndroidPermission::Camera, AndroidPermission::RecordAudio],
            PermissionCallback::new()
                .on_granted(recorder(&log, "granted"))
                .on_denied(recorder(&log, "denied")),
        )
        .unwrap();

    assert!(entries(&log).is_empty());
    assert_eq!(manager.service().pending.len(), 1);
}

#[test]
fn test_destroyed_request_denies_the_rest_and_ignores_late_outcomes() {
    let manager = AndroidPermissionsManager::new(IdBridge::default(), ());
    let log = Log::default();

    manager
        .request_permissions(
            &[AndroidPermission::Camera, AndroidPermission::RecordAudio],
            PermissionCallback::new()
                .on_granted(recorder(&log, "granted"))
                .on_denied(recorder(&log, "denied")),
        )
        .unwrap();

    let bridge = manager.service();
    let (id, permissions) = bridge.requests.lock().unwrap()[0].clone();
    assert_eq!(
        permissions,
        vec!["android.permission.CAMERA", "android.permission.RECORD_AUDIO"]
    );

    // The camera resolves, then the host is torn down before the microphone does.
    bridge.report(id, PermissionOutcome::Granted("android.permission.CAMERA".into()));
    bridge.finish(id, &["android.permission.RECORD_AUDIO"]);
    assert!(bridge.pending.is_empty());

    // A restored host replaying the old id reaches nothing.
    bridge.report(id, PermissionOutcome::Granted("android.permission.RECORD_AUDIO".into()));
    assert!(!bridge.pending.release(id));

    assert_eq!(
        entries(&log),
        vec![
            ("granted", "android.permission.CAMERA".to_string()),
            ("denied", "android.permission.RECORD_AUDIO".to_string()),
        ]
    );
}
