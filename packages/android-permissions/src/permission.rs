use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Prefix shared by every permission constant in `android.Manifest.permission`.
pub const ANDROID_PERMISSION_PREFIX: &str = "android.permission.";

macro_rules! android_permissions {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal, )*) => {
        /// A "dangerous" Android permission that must be granted by the user at runtime.
        ///
        /// Each variant maps to one of the `android.Manifest.permission` constants
        /// with the protection level `dangerous` (API 23).
        ///
        /// ```rust
        /// use dioxus_android_permissions::AndroidPermission;
        ///
        /// assert_eq!(AndroidPermission::Camera.as_str(), "android.permission.CAMERA");
        /// assert_eq!(AndroidPermission::Camera.name(), "CAMERA");
        /// ```
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum AndroidPermission {
            $( $(#[$meta])* $variant, )*
        }

        impl AndroidPermission {
            /// Every permission in the catalog, in declaration order.
            pub const ALL: &'static [AndroidPermission] = &[ $( AndroidPermission::$variant, )* ];

            /// The bare constant name, e.g. `RECORD_AUDIO`.
            pub const fn name(self) -> &'static str {
                match self {
                    $( AndroidPermission::$variant => $name, )*
                }
            }

            /// The identifier understood by the OS, e.g. `android.permission.RECORD_AUDIO`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( AndroidPermission::$variant => concat!("android.permission.", $name), )*
                }
            }
        }
    };
}

android_permissions! {
    AccessCoarseLocation => "ACCESS_COARSE_LOCATION",
    AccessFineLocation => "ACCESS_FINE_LOCATION",
    AddVoicemail => "ADD_VOICEMAIL",
    BodySensors => "BODY_SENSORS",
    CallPhone => "CALL_PHONE",
    Camera => "CAMERA",
    GetAccounts => "GET_ACCOUNTS",
    ProcessOutgoingCalls => "PROCESS_OUTGOING_CALLS",
    ReadCalendar => "READ_CALENDAR",
    ReadCallLog => "READ_CALL_LOG",
    ReadContacts => "READ_CONTACTS",
    ReadExternalStorage => "READ_EXTERNAL_STORAGE",
    ReadPhoneState => "READ_PHONE_STATE",
    ReadSms => "READ_SMS",
    ReceiveMms => "RECEIVE_MMS",
    ReceiveSms => "RECEIVE_SMS",
    ReceiveWapPush => "RECEIVE_WAP_PUSH",
    RecordAudio => "RECORD_AUDIO",
    SendSms => "SEND_SMS",
    UseSip => "USE_SIP",
    WriteCalendar => "WRITE_CALENDAR",
    WriteCallLog => "WRITE_CALL_LOG",
    WriteContacts => "WRITE_CONTACTS",
    WriteExternalStorage => "WRITE_EXTERNAL_STORAGE",
}

impl AndroidPermission {
    /// Look up a permission by its full OS identifier.
    ///
    /// Returns `None` for identifiers outside the catalog, including the bare
    /// constant name without the `android.permission.` prefix.
    pub fn from_android_str(id: &str) -> Option<Self> {
        let name = id.strip_prefix(ANDROID_PERMISSION_PREFIX)?;
        Self::ALL
            .iter()
            .copied()
            .find(|permission| permission.name() == name)
    }
}

impl fmt::Display for AndroidPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AndroidPermission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_android_str(s).ok_or_else(|| Error::UnknownPermission(s.to_string()))
    }
}

impl AsRef<str> for AndroidPermission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for AndroidPermission {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AndroidPermission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse().map_err(serde::de::Error::custom)
    }
}
