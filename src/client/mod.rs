//! Client layer: shapes requests, drives the retry loop and maps wire
//! outcomes to [`RawResponse`] or [`Error`].

mod config;
mod error;
mod http;
mod retry;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

pub use config::{Config, DEFAULT_TIMEOUT};
pub use error::Error;
pub use retry::FailureKind;

use http::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
use retry::{Decision, RetryState, classify};

use crate::domain::{
    Environment, Language, OperationName, Params, Password, RawResponse, Username,
};
use crate::transport::{decode_operations, encode_request};

/// Operation used by [`AriregisterClient::is_healthy`].
pub const HEALTH_CHECK_OPERATION: &str = "lihtandmed_v2";
/// Registry code looked up by [`AriregisterClient::is_healthy`].
pub const HEALTH_CHECK_REGISTRY_CODE: &str = "10060701";

const DEFAULT_USER_AGENT: &str = concat!("ariregister/", env!("CARGO_PKG_VERSION"));
const REDACTED: &str = "***";

#[derive(Debug, Clone)]
/// Builder for [`AriregisterClient`].
///
/// Use this when you need to check the configuration up front or override the
/// user-agent.
pub struct AriregisterClientBuilder {
    config: Config,
    user_agent: Option<String>,
}

impl AriregisterClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            user_agent: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        self.config.set_credentials(username, password)?;
        Ok(self)
    }

    pub fn language(mut self, language: Language) -> Self {
        self.config.set_language(language);
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.set_environment(environment);
        self
    }

    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.set_timeout(timeout);
        self
    }

    pub fn log_calls(mut self, log_calls: bool) -> Self {
        self.config.set_log_calls(log_calls);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate the configuration and build an [`AriregisterClient`].
    pub fn build(self) -> Result<AriregisterClient, Error> {
        self.config.validate()?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| {
                Error::Configuration(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(AriregisterClient::with_transport(
            self.config,
            Arc::new(ReqwestTransport { client }),
        ))
    }
}

#[derive(Clone)]
/// Client for the e-Business Register SOAP service.
///
/// The configuration sits behind a lock and is read once at the start of every
/// call, so [`AriregisterClient::configure`] affects the next call and never a
/// call already in flight. Clones share the configuration and the HTTP
/// connection pool.
pub struct AriregisterClient {
    config: Arc<RwLock<Config>>,
    http: Arc<dyn HttpTransport>,
}

impl AriregisterClient {
    /// Create a client without validating `config`.
    ///
    /// For validation and a custom user-agent, use [`AriregisterClient::builder`].
    pub fn new(config: Config) -> Self {
        Self::with_transport(
            config,
            Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        )
    }

    pub fn builder(config: Config) -> AriregisterClientBuilder {
        AriregisterClientBuilder::new(config)
    }

    fn with_transport(config: Config, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            http,
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change the configuration in place; the next call sees the result.
    pub fn configure<R>(&self, update: impl FnOnce(&mut Config) -> R) -> R {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut config)
    }

    /// True iff both user name and password are set.
    pub fn configured(&self) -> bool {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .configured()
    }

    /// Call one SOAP operation and return its decoded body.
    ///
    /// `keel` is added from the configuration unless `params` already has it;
    /// both credential fields are always overwritten from the configuration.
    ///
    /// Rate-limited attempts (HTTP 429) are retried after 1, 2 and 4 seconds,
    /// timed-out attempts immediately, up to 3 retries in total. Nothing else is
    /// retried.
    ///
    /// Errors:
    /// - [`Error::Authentication`] when credentials are missing (no request is
    ///   sent) or the service rejects them with HTTP 401/403,
    /// - [`Error::Validation`] for an operation or parameter name that is not a
    ///   valid XML element name,
    /// - [`Error::Api`] for everything else, tagged with its [`FailureKind`].
    pub async fn call(&self, operation: &str, mut params: Params) -> Result<RawResponse, Error> {
        let config = self.config();
        let Some((username, password)) = config.credentials() else {
            return Err(Error::Authentication(
                "username and password must be configured before calling the service".to_owned(),
            ));
        };

        let operation = OperationName::new(operation)?;
        params.insert_if_absent(Language::FIELD, config.language().as_str());
        params.insert(Username::FIELD, username.as_str());
        params.insert(Password::FIELD, password.as_str());

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: config.service_endpoint().to_owned(),
            soap_action: Some(operation.as_str().to_owned()),
            body: Some(encode_request(&operation, &params)?),
            basic_auth: Some((username.clone(), password.clone())),
            timeout: config.timeout(),
        };

        if config.log_calls() {
            tracing::info!(
                operation = %operation,
                endpoint = %request.url,
                params = %redacted(&params),
                "calling e-Business Register"
            );
        }

        let mut retry = RetryState::new();
        loop {
            let attempt = retry.attempts();
            tracing::debug!(operation = %operation, attempt, "sending request");

            let outcome = self.http.execute(request.clone()).await;
            let failure = match classify(operation.as_str(), outcome) {
                Ok(response) => {
                    tracing::debug!(
                        operation = %operation,
                        attempt,
                        status = response.http_status,
                        "request succeeded"
                    );
                    return Ok(response);
                }
                Err(failure) => failure,
            };

            match retry.next(failure.kind) {
                Decision::Retry { delay } => {
                    tracing::warn!(
                        operation = %operation,
                        attempt,
                        kind = ?failure.kind,
                        delay_ms = delay.as_millis() as u64,
                        "retrying request"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Decision::GiveUp => {
                    tracing::warn!(
                        operation = %operation,
                        attempt,
                        kind = ?failure.kind,
                        status = ?failure.status,
                        detail = %failure.detail,
                        "request failed"
                    );
                    return Err(failure.into_error(operation.as_str(), retry.attempts()));
                }
            }
        }
    }

    /// Operation names published in the service WSDL.
    ///
    /// Returns an empty list when credentials are missing or anything goes
    /// wrong fetching or reading the WSDL.
    pub async fn operations(&self) -> Vec<String> {
        let config = self.config();
        let Some((username, password)) = config.credentials() else {
            return Vec::new();
        };

        let request = HttpRequest {
            method: HttpMethod::Get,
            url: config.service_url().to_owned(),
            soap_action: None,
            body: None,
            basic_auth: Some((username.clone(), password.clone())),
            timeout: config.timeout(),
        };

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch WSDL");
                return Vec::new();
            }
        };
        if !(200..=299).contains(&response.status) {
            tracing::warn!(status = response.status, "failed to fetch WSDL");
            return Vec::new();
        }
        decode_operations(&response.body).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to read WSDL");
            Vec::new()
        })
    }

    /// Look up a well-known company; any error means unhealthy.
    pub async fn is_healthy(&self) -> bool {
        let params = Params::new().with("ariregistri_kood", HEALTH_CHECK_REGISTRY_CODE);
        match self.call(HEALTH_CHECK_OPERATION, params).await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "health check failed");
                false
            }
        }
    }
}

fn redacted(params: &Params) -> String {
    let mut params = params.clone();
    if params.contains_key(Password::FIELD) {
        params.insert(Password::FIELD, REDACTED);
    }
    serde_json::to_string(&params).unwrap_or_default()
}
