//! Sankhya HTTP service client
//!
//! A client wraps a [`Transport`] and the service endpoint. Login hands back
//! an explicit [`Session`] value that every later call borrows, so there is
//! no hidden per-client token.

mod query;
mod session;
pub(crate) mod transport;

use std::fmt;
use std::time::Duration;

use crate::consts::{DEFAULT_MAX_RESULT_SIZE, LOGIN_TIMEOUT, QUERY_TIMEOUT, SERVICE_PATH};

pub(crate) use session::Session;
pub(crate) use transport::{Transport, UreqTransport};

/// Host and port of the service
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Endpoint {
    pub(crate) host: String,
    pub(crate) port: String,
}

impl Endpoint {
    pub(crate) fn service_url(&self, service: &str) -> String {
        format!(
            "http://{}:{}{SERVICE_PATH}?serviceName={service}&outputType=json",
            self.host, self.port
        )
    }
}

#[derive(Clone, Default)]
pub(crate) struct Credentials {
    pub(crate) user: String,
    pub(crate) password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ClientOptions {
    pub(crate) login_timeout: Duration,
    pub(crate) query_timeout: Duration,
    pub(crate) max_result_size: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            login_timeout: LOGIN_TIMEOUT,
            query_timeout: QUERY_TIMEOUT,
            max_result_size: DEFAULT_MAX_RESULT_SIZE,
        }
    }
}

pub(crate) struct SankhyaClient<T: Transport> {
    transport: T,
    endpoint: Endpoint,
    options: ClientOptions,
}

impl<T: Transport> SankhyaClient<T> {
    pub(crate) fn new(transport: T, endpoint: Endpoint, options: ClientOptions) -> Self {
        Self {
            transport,
            endpoint,
            options,
        }
    }

    pub(crate) fn max_result_size(&self) -> usize {
        self.options.max_result_size
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }
}
