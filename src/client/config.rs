use std::time::Duration;

use url::Url;

use super::Error;
use crate::domain::{Environment, Language, Password, Username};

/// Per-attempt network timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Credentials {
    username: Username,
    password: Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Settings read by [`AriregisterClient`](super::AriregisterClient) at the
/// start of every call.
///
/// Credentials are stored as a pair: they are either both present or both
/// absent. Switching [`Environment`] replaces the WSDL URL and the endpoint
/// together.
pub struct Config {
    credentials: Option<Credentials>,
    language: Language,
    timeout: Duration,
    environment: Environment,
    service_url: String,
    service_endpoint: String,
    log_calls: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl Config {
    /// Production settings, `eng`, 30 second timeout, no credentials.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self {
            credentials: None,
            language: Language::default(),
            timeout: DEFAULT_TIMEOUT,
            environment,
            service_url: environment.service_url().to_owned(),
            service_endpoint: environment.service_endpoint().to_owned(),
            log_calls: false,
        }
    }

    /// Builder-style [`Config::set_credentials`].
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        self.set_credentials(username, password)?;
        Ok(self)
    }

    /// Replace both credentials. Nothing changes when either one is empty.
    pub fn set_credentials(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), Error> {
        let username =
            Username::new(username).map_err(|err| Error::Configuration(err.to_string()))?;
        let password =
            Password::new(password).map_err(|err| Error::Configuration(err.to_string()))?;
        self.credentials = Some(Credentials { username, password });
        Ok(())
    }

    pub fn clear_credentials(&mut self) {
        self.credentials = None;
    }

    /// True iff both user name and password are set.
    pub fn configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .map(|credentials| credentials.username.as_str())
    }

    pub(crate) fn credentials(&self) -> Option<(&Username, &Password)> {
        self.credentials
            .as_ref()
            .map(|credentials| (&credentials.username, &credentials.password))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Set the language from its code (`eng`/`est`, any case).
    pub fn set_language_code(&mut self, code: &str) -> Result<(), Error> {
        self.language = code
            .parse::<Language>()
            .map_err(|err| Error::Configuration(err.to_string()))?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
        self.service_url = environment.service_url().to_owned();
        self.service_endpoint = environment.service_endpoint().to_owned();
    }

    /// WSDL document URL.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// SOAP endpoint URL.
    pub fn service_endpoint(&self) -> &str {
        &self.service_endpoint
    }

    /// Point the client at a different deployment (proxy, mock server).
    /// The environment flag is left as is.
    pub fn set_service_urls(
        &mut self,
        service_url: impl Into<String>,
        service_endpoint: impl Into<String>,
    ) {
        self.service_url = service_url.into();
        self.service_endpoint = service_endpoint.into();
    }

    pub fn log_calls(&self) -> bool {
        self.log_calls
    }

    /// Emit a `tracing` event with the (redacted) parameters of every attempt.
    pub fn set_log_calls(&mut self, log_calls: bool) {
        self.log_calls = log_calls;
    }

    /// Check the settings that can be wrong without talking to the service.
    pub fn validate(&self) -> Result<(), Error> {
        validate_url("service URL", &self.service_url)?;
        validate_url("service endpoint", &self.service_endpoint)?;
        if self.timeout.is_zero() {
            return Err(Error::Configuration(
                "timeout must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), Error> {
    let url = Url::parse(value)
        .map_err(|err| Error::Configuration(format!("invalid {field} '{value}': {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Configuration(format!(
            "invalid {field} '{value}': scheme must be http or https"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_production_eng_without_credentials() {
        let config = Config::new();
        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.language(), Language::Eng);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.service_endpoint(), "https://ariregxmlv6.rik.ee/");
        assert!(!config.configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn credentials_are_all_or_nothing() {
        let mut config = Config::new();
        assert!(matches!(
            config.set_credentials("user", ""),
            Err(Error::Configuration(_))
        ));
        assert!(!config.configured());
        assert!(config.set_credentials(" ", "pass").is_err());
        assert!(!config.configured());

        config.set_credentials("user", "pass").unwrap();
        assert!(config.configured());
        assert_eq!(config.username(), Some("user"));

        assert!(config.set_credentials("", "other").is_err());
        assert_eq!(config.username(), Some("user"));

        config.clear_credentials();
        assert!(!config.configured());
        assert_eq!(config.username(), None);
    }

    #[test]
    fn switching_environment_updates_both_urls() {
        let mut config = Config::new();
        config.set_environment(Environment::Test);
        assert_eq!(config.service_url(), Environment::Test.service_url());
        assert_eq!(config.service_endpoint(), Environment::Test.service_endpoint());

        config.set_environment(Environment::Production);
        assert_eq!(config.service_url(), "https://ariregxmlv6.rik.ee/?wsdl");
        assert_eq!(config.service_endpoint(), "https://ariregxmlv6.rik.ee/");
    }

    #[test]
    fn unsupported_language_is_a_configuration_error() {
        let mut config = Config::new();
        config.set_language_code("EST").unwrap();
        assert_eq!(config.language(), Language::Est);

        let err = config.set_language_code("fin").unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("fin")));
        assert_eq!(config.language(), Language::Est);
    }

    #[test]
    fn validate_rejects_bad_urls_and_zero_timeout() {
        let mut config = Config::new();
        config.set_service_urls("not a url", "https://example.invalid/");
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        config.set_service_urls("https://example.invalid/?wsdl", "ftp://example.invalid/");
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = Config::new();
        config.set_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }
}
