//! Login and logout against `MobileLoginSP`

use serde_json::{Value, json};

use crate::consts::{LOGIN_SERVICE, LOGOUT_SERVICE};
use crate::error::SessionError;

use super::{Credentials, SankhyaClient, Transport};

/// Outcome of a login. An unauthenticated session is still a valid value:
/// calls made with it go out without a token and are rejected by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Session {
    token: Option<String>,
}

impl Session {
    pub(crate) fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub(crate) fn unauthenticated() -> Self {
        Self::default()
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn cookie(&self) -> Option<String> {
        self.token().map(|t| format!("JSESSIONID={t}"))
    }
}

fn login_body(credentials: &Credentials) -> Value {
    json!({
        "serviceName": LOGIN_SERVICE,
        "requestBody": {
            "NOMUSU": { "$": credentials.user },
            "INTERNO": { "$": credentials.password },
        },
    })
}

fn extract_token(value: &Value) -> Result<String, SessionError> {
    match value.pointer("/responseBody/jsessionid/$") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Null) | None => Err(SessionError::MissingToken {
            message: value
                .get("statusMessage")
                .and_then(Value::as_str)
                .unwrap_or("no responseBody.jsessionid")
                .to_string(),
        }),
        Some(Value::String(_)) => Err(SessionError::MissingToken {
            message: "empty jsessionid".to_string(),
        }),
        Some(other) => Ok(other.to_string()),
    }
}

impl<T: Transport> SankhyaClient<T> {
    pub(crate) fn try_login(&self, credentials: &Credentials) -> Result<Session, SessionError> {
        let url = self.endpoint.service_url(LOGIN_SERVICE);
        let bytes = self.transport.post_json(
            &url,
            None,
            &[],
            &login_body(credentials),
            self.options.login_timeout,
        )?;
        let value: Value = serde_json::from_slice(&bytes)?;
        extract_token(&value).map(Session::authenticated)
    }

    /// Log in, falling back to an unauthenticated session on any failure.
    ///
    /// The run keeps going without a token in that case; every query will then
    /// fail on its own and be logged.
    pub(crate) fn login(&self, credentials: &Credentials) -> Session {
        tracing::info!(
            host = %self.endpoint.host,
            port = %self.endpoint.port,
            user = %credentials.user,
            "Logging in to Sankhya"
        );
        match self.try_login(credentials) {
            Ok(session) => {
                tracing::info!("Login successful");
                session
            }
            Err(e) => {
                tracing::error!("Login failed: {e}");
                tracing::warn!("Continuing without a session token; queries will be rejected");
                Session::unauthenticated()
            }
        }
    }

    /// Best-effort logout; the response is never inspected.
    pub(crate) fn logout(&self, session: &Session) {
        let url = self.endpoint.service_url(LOGOUT_SERVICE);
        let cookie = session.cookie();
        let params = [("status", "1"), ("pendingPrinting", "false")];
        if let Err(e) = self.transport.post_query(
            &url,
            cookie.as_deref(),
            &params,
            self.options.query_timeout,
        ) {
            tracing::debug!("Logout request failed: {e}");
        }
        tracing::info!(authenticated = session.is_authenticated(), "Logout finished");
    }
}
