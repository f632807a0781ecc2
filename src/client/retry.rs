use std::time::Duration;

use super::Error;
use super::http::{HttpResponse, SendError};
use crate::domain::RawResponse;
use crate::transport::{SoapBody, decode_soap_response};

/// Retries after the first attempt; a call makes at most `MAX_RETRIES + 1`
/// network attempts.
pub(crate) const MAX_RETRIES: u32 = 3;

const RATE_LIMIT_STATUS: u16 = 429;
const MAX_BODY_EXCERPT_CHARS: usize = 200;

/// Category of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// HTTP 429.
    RateLimited,
    /// The attempt did not finish within the configured timeout.
    TimedOut,
    /// The service answered with a SOAP fault.
    ServiceFault,
    /// Any other non-2xx HTTP status.
    HttpError,
    /// Connection failures, unreadable responses and everything else.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub detail: String,
}

impl Failure {
    fn new(kind: FailureKind, status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            detail: detail.into(),
        }
    }

    /// Final error for a failure the engine gave up on.
    pub(crate) fn into_error(self, operation: &str, attempts: u32) -> Error {
        let message = match self.kind {
            FailureKind::HttpError if matches!(self.status, Some(401 | 403)) => {
                return Error::Authentication(format!(
                    "credentials rejected calling {operation} (HTTP {})",
                    self.status.unwrap_or_default()
                ));
            }
            FailureKind::RateLimited => format!(
                "rate limit exceeded calling {operation}: still throttled after {attempts} attempts"
            ),
            FailureKind::TimedOut => format!(
                "{operation} timed out after {attempts} attempts: {}",
                self.detail
            ),
            FailureKind::ServiceFault => {
                format!("service fault from {operation}: {}", self.detail)
            }
            FailureKind::HttpError => format!(
                "HTTP {} from {operation}: {}",
                self.status.unwrap_or_default(),
                self.detail
            ),
            FailureKind::Other => format!("{operation} failed: {}", self.detail),
        };
        Error::Api {
            kind: self.kind,
            status: self.status,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry { delay: Duration },
    GiveUp,
}

/// Wait before retry number `retries + 1` of a rate-limited call: 1s, 2s, 4s.
pub(crate) fn backoff_delay(retries: u32) -> Duration {
    Duration::from_secs(1u64 << retries.min(16))
}

pub(crate) fn decide(kind: FailureKind, retries: u32) -> Decision {
    if retries >= MAX_RETRIES {
        return Decision::GiveUp;
    }
    match kind {
        FailureKind::RateLimited => Decision::Retry {
            delay: backoff_delay(retries),
        },
        FailureKind::TimedOut => Decision::Retry {
            delay: Duration::ZERO,
        },
        FailureKind::ServiceFault | FailureKind::HttpError | FailureKind::Other => {
            Decision::GiveUp
        }
    }
}

/// Retry bookkeeping for a single call.
#[derive(Debug, Default)]
pub(crate) struct RetryState {
    retries: u32,
}

impl RetryState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attempts made so far, counting the one that just failed.
    pub(crate) fn attempts(&self) -> u32 {
        self.retries + 1
    }

    pub(crate) fn next(&mut self, kind: FailureKind) -> Decision {
        let decision = decide(kind, self.retries);
        if matches!(decision, Decision::Retry { .. }) {
            self.retries += 1;
        }
        decision
    }
}

/// Turn the outcome of one attempt into a response or a tagged failure.
pub(crate) fn classify(
    operation: &str,
    outcome: Result<HttpResponse, SendError>,
) -> Result<RawResponse, Failure> {
    let response = match outcome {
        Ok(response) => response,
        Err(SendError::Timeout(err)) => {
            return Err(Failure::new(FailureKind::TimedOut, None, err.to_string()));
        }
        Err(SendError::Other(err)) => {
            return Err(Failure::new(FailureKind::Other, None, err.to_string()));
        }
    };

    let status = response.status;
    if status == RATE_LIMIT_STATUS {
        return Err(Failure::new(
            FailureKind::RateLimited,
            Some(status),
            excerpt(&response.body),
        ));
    }

    match decode_soap_response(&response.body) {
        Ok(SoapBody::Fault(fault)) => Err(Failure::new(
            FailureKind::ServiceFault,
            Some(status),
            fault.to_string(),
        )),
        Ok(SoapBody::Response(_)) | Err(_) if !(200..=299).contains(&status) => Err(
            Failure::new(FailureKind::HttpError, Some(status), excerpt(&response.body)),
        ),
        Ok(SoapBody::Response(body)) => Ok(RawResponse {
            operation: operation.to_owned(),
            http_status: status,
            body,
            raw: response.body,
        }),
        Err(err) => Err(Failure::new(FailureKind::Other, Some(status), err.to_string())),
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "empty response body".to_owned();
    }
    let mut excerpt: String = body.chars().take(MAX_BODY_EXCERPT_CHARS).collect();
    if body.chars().count() > MAX_BODY_EXCERPT_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
  <SOAP-ENV:Body><prod:lihtandmed_v2Response xmlns:prod="http://arireg.x-road.eu/producer/">
    <prod:keha><prod:ettevotjad><prod:item><prod:nimi>Test OÜ</prod:nimi></prod:item></prod:ettevotjad></prod:keha>
  </prod:lihtandmed_v2Response></SOAP-ENV:Body></SOAP-ENV:Envelope>"#;

    const FAULT_BODY: &str = r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
  <SOAP-ENV:Body><SOAP-ENV:Fault><faultcode>SOAP-ENV:Server</faultcode>
  <faultstring>Päring ebaõnnestus</faultstring></SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>"#;

    fn response(status: u16, body: &str) -> Result<HttpResponse, SendError> {
        Ok(HttpResponse {
            status,
            body: body.to_owned(),
        })
    }

    fn kind_of(outcome: Result<HttpResponse, SendError>) -> FailureKind {
        classify("lihtandmed_v2", outcome).unwrap_err().kind
    }

    #[test]
    fn successful_envelope_becomes_raw_response() {
        let raw = classify("lihtandmed_v2", response(200, OK_BODY)).unwrap();
        assert_eq!(raw.operation, "lihtandmed_v2");
        assert_eq!(raw.body.name, "lihtandmed_v2Response");
        assert_eq!(
            raw.find_text(&["keha", "ettevotjad", "item", "nimi"]),
            Some("Test OÜ")
        );
        assert!(raw.is_success());
    }

    #[test]
    fn classifies_each_failure_kind() {
        assert_eq!(kind_of(response(429, "")), FailureKind::RateLimited);
        assert_eq!(kind_of(response(429, FAULT_BODY)), FailureKind::RateLimited);
        assert_eq!(kind_of(response(500, FAULT_BODY)), FailureKind::ServiceFault);
        assert_eq!(kind_of(response(200, FAULT_BODY)), FailureKind::ServiceFault);
        assert_eq!(kind_of(response(502, "Bad gateway")), FailureKind::HttpError);
        assert_eq!(kind_of(response(401, "")), FailureKind::HttpError);
        assert_eq!(kind_of(response(200, "not xml <")), FailureKind::Other);
        assert_eq!(
            kind_of(Err(SendError::Timeout("deadline elapsed".into()))),
            FailureKind::TimedOut
        );
        assert_eq!(
            kind_of(Err(SendError::Other("connection refused".into()))),
            FailureKind::Other
        );
    }

    #[test]
    fn fault_detail_is_kept() {
        let failure = classify("lihtandmed_v2", response(500, FAULT_BODY)).unwrap_err();
        assert_eq!(failure.status, Some(500));
        assert!(failure.detail.contains("Päring ebaõnnestus"));
    }

    #[test]
    fn decision_table() {
        assert_eq!(
            decide(FailureKind::RateLimited, 0),
            Decision::Retry {
                delay: Duration::from_secs(1)
            }
        );
        assert_eq!(
            decide(FailureKind::RateLimited, 2),
            Decision::Retry {
                delay: Duration::from_secs(4)
            }
        );
        assert_eq!(decide(FailureKind::RateLimited, 3), Decision::GiveUp);
        assert_eq!(
            decide(FailureKind::TimedOut, 1),
            Decision::Retry {
                delay: Duration::ZERO
            }
        );
        assert_eq!(decide(FailureKind::TimedOut, 3), Decision::GiveUp);
        for kind in [
            FailureKind::ServiceFault,
            FailureKind::HttpError,
            FailureKind::Other,
        ] {
            assert_eq!(decide(kind, 0), Decision::GiveUp);
        }
    }

    #[test]
    fn retry_state_allows_four_attempts() {
        let mut state = RetryState::new();
        let mut delays = Vec::new();
        while let Decision::Retry { delay } = state.next(FailureKind::RateLimited) {
            delays.push(delay.as_secs());
        }
        assert_eq!(delays, [1, 2, 4]);
        assert_eq!(state.attempts(), MAX_RETRIES + 1);
    }

    #[test]
    fn failures_map_to_errors() {
        let err = Failure::new(FailureKind::HttpError, Some(403), "Forbidden")
            .into_error("lihtandmed_v2", 1);
        assert!(matches!(err, Error::Authentication(ref msg) if msg.contains("HTTP 403")));

        let err = Failure::new(FailureKind::RateLimited, Some(429), "")
            .into_error("lihtandmed_v2", 4);
        assert!(matches!(
            err,
            Error::Api {
                kind: FailureKind::RateLimited,
                status: Some(429),
                ref message,
            } if message.contains("4 attempts")
        ));

        let err = Failure::new(FailureKind::Other, None, "connection refused")
            .into_error("lihtandmed_v2", 1);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let failure = classify("op", response(503, &body)).unwrap_err();
        assert_eq!(failure.detail.chars().count(), MAX_BODY_EXCERPT_CHARS + 3);
    }
}
