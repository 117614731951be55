//! Typed access to the remote clinic gateway.
//!
//! The HTTP details sit behind [`Transport`], which sends one JSON request and returns the
//! decoded body. [`Gateway`] turns that into the capability set the dashboard needs: list
//! and detail fetches for any [`Resource`], login, consultation creation and appointment
//! status updates. It also unwraps the gateway's response envelopes, which may be bare
//! (`[...]`, `{...}`) or wrapped (`{"patients": [...]}`, `{"patient": {...}}`).

use crate::constants::{
    CONSULTATION_CREATED_MESSAGE, CONSULTATION_CREATE_PATH, LOGIN_PATH,
    PATIENT_CONSULTATIONS_PATH, PATIENT_EXAMENS_PATH, RENDEZVOUS_UPDATED_MESSAGE,
    RENDEZVOUS_UPDATE_PATH,
};
use crate::models::{Consultation, Examen, NewConsultation, RendezVousStatus, UserProfile};
use crate::resource::{path_with_id, Detailed, Listed, Resource};
use crate::{ClinicError, ClinicResult};
use async_trait::async_trait;
use clinic_types::EmailAddress;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// One request to the gateway, relative to the configured origin.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

/// Sends requests to the gateway.
///
/// Implementations must map a network failure to [`ClinicError::Transport`] and a non-2xx
/// status to [`ClinicError::Http`] (carrying the body's `message` when there is one). An
/// empty 2xx body is returned as `Value::Null`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ClinicResult<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: ApiRequest) -> ClinicResult<Value> {
        (**self).send(request).await
    }
}

/// Login form values.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: impl Into<String>) -> ClinicResult<Self> {
        let password = password.into();
        if password.is_empty() {
            return Err(ClinicError::MissingField("password"));
        }
        Ok(Self {
            email: EmailAddress::parse(email)?,
            password,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: UserProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate<'a> {
    rendez_vous_id: &'a str,
    status: RendezVousStatus,
}

/// Typed gateway client over a [`Transport`].
#[derive(Clone, Debug)]
pub struct Gateway<T> {
    transport: T,
    token: Option<String>,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// Attach the session token sent as a bearer credential on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, method: Method, path: String, body: Option<Value>) -> ClinicResult<Value> {
        tracing::debug!(method = method.as_str(), %path, "gateway request");
        self.transport
            .send(ApiRequest {
                method,
                path,
                body,
                bearer: self.token.clone(),
            })
            .await
    }

    /// Exchange credentials for a session token and profile.
    pub async fn login(&self, credentials: &Credentials) -> ClinicResult<LoginResponse> {
        let body = serde_json::to_value(credentials)?;
        let value = self.send(Method::Post, LOGIN_PATH.into(), Some(body)).await?;

        if value.get("token").and_then(Value::as_str).is_none() {
            return Err(ClinicError::UnexpectedResponse {
                message: response_message(&value),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the whole collection of a listed resource.
    pub async fn fetch_list<R: Listed>(&self) -> ClinicResult<Vec<R>> {
        self.fetch_collection(R::LIST_PATH).await
    }

    /// Fetch a collection from an arbitrary route (for example a per-patient route).
    pub async fn fetch_collection<R: Resource>(&self, path: &str) -> ClinicResult<Vec<R>> {
        let value = self.send(Method::Get, path.to_string(), None).await?;
        let items = extract_collection(value)?;
        let records: Vec<R> = serde_json::from_value(Value::Array(items))?;
        tracing::debug!(kind = R::KIND, count = records.len(), "fetched collection");
        Ok(records)
    }

    /// Fetch one record by identifier.
    ///
    /// A 2xx answer without a record is reported as [`ClinicError::NotFound`], and so is a
    /// 404.
    pub async fn fetch_one<R: Detailed>(&self, id: &str) -> ClinicResult<R> {
        let value = match self
            .send(Method::Get, path_with_id(R::DETAIL_PATH, id), None)
            .await
        {
            Err(ClinicError::Http { status: 404, .. }) => None,
            other => Some(other?),
        };

        let record = value
            .and_then(extract_record)
            .ok_or_else(|| ClinicError::NotFound {
                kind: R::KIND,
                id: id.to_string(),
            })?;
        Ok(serde_json::from_value(record)?)
    }

    pub async fn consultations_for_patient(
        &self,
        patient_id: &str,
    ) -> ClinicResult<Vec<Consultation>> {
        self.fetch_collection(&path_with_id(PATIENT_CONSULTATIONS_PATH, patient_id))
            .await
    }

    pub async fn examens_for_patient(&self, patient_id: &str) -> ClinicResult<Vec<Examen>> {
        self.fetch_collection(&path_with_id(PATIENT_EXAMENS_PATH, patient_id))
            .await
    }

    /// Post a new consultation. Succeeds only on the gateway's creation message.
    pub async fn create_consultation(&self, payload: &NewConsultation) -> ClinicResult<()> {
        let body = serde_json::to_value(payload)?;
        let value = self
            .send(Method::Post, CONSULTATION_CREATE_PATH.into(), Some(body))
            .await?;
        expect_message(&value, CONSULTATION_CREATED_MESSAGE)
    }

    /// Ask the gateway to move an appointment to `status`. Succeeds only on the gateway's
    /// update message.
    pub async fn update_rendezvous_status(
        &self,
        rendezvous_id: &str,
        status: RendezVousStatus,
    ) -> ClinicResult<()> {
        let body = serde_json::to_value(StatusUpdate {
            rendez_vous_id: rendezvous_id,
            status,
        })?;
        let value = self
            .send(
                Method::Put,
                path_with_id(RENDEZVOUS_UPDATE_PATH, rendezvous_id),
                Some(body),
            )
            .await?;
        expect_message(&value, RENDEZVOUS_UPDATED_MESSAGE)
    }
}

/// The `message` string of a gateway response body, if any.
pub fn response_message(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn expect_message(value: &Value, expected: &str) -> ClinicResult<()> {
    match response_message(value) {
        Some(message) if message == expected => Ok(()),
        message => Err(ClinicError::UnexpectedResponse { message }),
    }
}

fn has_identifier(value: &Value) -> bool {
    value.get("_id").is_some() || value.get("id").is_some()
}

/// Unwrap a list response: a bare array, `null`, or an object holding one array field.
fn extract_collection(value: Value) -> ClinicResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ClinicError::UnexpectedResponse {
                message: Some("expected a list of records".into()),
            }),
        _ => Err(ClinicError::UnexpectedResponse {
            message: Some("expected a list of records".into()),
        }),
    }
}

/// Unwrap a detail response: a bare record, an object wrapping one record, or a
/// one-element array. `None` means the gateway answered without a record.
fn extract_record(value: Value) -> Option<Value> {
    match value {
        Value::Object(_) if has_identifier(&value) => Some(value),
        Value::Object(map) => map
            .into_iter()
            .map(|(_, v)| v)
            .find(|v| v.is_object() && has_identifier(v)),
        Value::Array(items) => items.into_iter().find(has_identifier),
        _ => None,
    }
}
