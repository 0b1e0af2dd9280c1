// Wire types for the eero cloud API.
//
// Every endpoint wraps its payload in the same `{meta, data}` envelope.
// The envelope doubles as the error value: when it reports failure the
// payload is never decoded and `Meta` is turned into `Error::Api`.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Status code the API uses (both on the transport and inside `meta`)
/// for a successful call.
pub const SUCCESS_CODE: u16 = 200;

/// Status metadata present on every response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Meta {
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Generic response wrapper. `data` is absent on some success bodies
/// (login/verify) and on most error bodies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub meta: Meta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Meta {
    fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// True only when the transport status, the echoed body status and
    /// the error field all agree on success.
    pub fn is_success(&self, transport_status: u16) -> bool {
        transport_status == SUCCESS_CODE
            && self.code == SUCCESS_CODE
            && self.error_message().is_none()
    }

    /// Build the error reported for a failed call. The body code wins
    /// unless it claims success, in which case the transport status is
    /// the one that disagreed.
    pub fn to_error(&self, transport_status: u16) -> Error {
        let code = if self.code != SUCCESS_CODE {
            self.code
        } else {
            transport_status
        };
        let message = match self.error_message() {
            Some(m) => m.to_string(),
            None => reason_phrase(code),
        };
        Error::Api { code, message }
    }
}

impl<T> Envelope<T> {
    pub fn is_success(&self, transport_status: u16) -> bool {
        self.meta.is_success(transport_status)
    }

    /// Hand out the payload when the call succeeded, otherwise the
    /// envelope itself becomes the error.
    pub fn into_result(self, transport_status: u16) -> Result<Option<T>> {
        if self.is_success(transport_status) {
            Ok(self.data)
        } else {
            Err(self.meta.to_error(transport_status))
        }
    }
}

pub(crate) fn reason_phrase(code: u16) -> String {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("unknown error")
        .to_string()
}

/// Boolean flags sometimes arrive as `null`; treat that like a missing
/// field.
fn null_as_false<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    Option::<bool>::deserialize(d).map(Option::unwrap_or_default)
}

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest<'a> {
    #[serde(rename = "login")]
    pub identifier: &'a str,
}

#[derive(Serialize, Debug, Clone)]
pub struct VerifyRequest<'a> {
    pub code: &'a str,
}

/// Payload of `POST login`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoginData {
    pub user_token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Phone {
    pub value: Option<String>,
    pub country_code: Option<String>,
    pub national_number: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub verified: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Email {
    pub value: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub verified: bool,
}

/// Networks embedded in the account. `count` and `data` are reported
/// separately by the API and are not guaranteed to agree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NetworkList {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub data: Vec<Network>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Account {
    pub name: Option<String>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub log_id: Option<String>,
    #[serde(default)]
    pub networks: NetworkList,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Network {
    /// Resource path, e.g. `/2.2/networks/12345`.
    pub url: String,
    pub name: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DeviceInterface {
    pub frequency: Option<String>,
    pub frequency_unit: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Device {
    pub url: String,
    pub mac: Option<String>,
    pub manufacturer: Option<String>,
    pub ip: Option<String>,
    #[serde(default)]
    pub ips: Vec<String>,
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub connected: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub wireless: bool,
    pub connection_type: Option<String>,
    pub last_active: Option<DateTime<Utc>>,
    pub first_active: Option<DateTime<Utc>>,
    pub interface: Option<DeviceInterface>,
    pub device_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub blacklisted: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_guest: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub paused: bool,
    pub ssid: Option<String>,
    pub display_name: Option<String>,
}
