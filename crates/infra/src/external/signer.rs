use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;

use dtesv_dte::SigningRequest;

use super::{SigningOutcome, SigningService};

/// Signing service reached over HTTP (`POST /firmardocumento/`).
#[derive(Debug, Clone)]
pub struct HttpSigner {
    client: Client,
    timeout: Duration,
}

impl HttpSigner {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(Client::builder().build()?, timeout))
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl SigningService for HttpSigner {
    async fn sign(&self, endpoint: &str, request: &SigningRequest) -> SigningOutcome {
        let sent = self
            .client
            .post(endpoint)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return transport_failure(&e, self.timeout),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return transport_failure(&e, self.timeout),
        };

        interpret_response(status, &text)
    }
}

fn transport_failure(error: &reqwest::Error, timeout: Duration) -> SigningOutcome {
    if error.is_timeout() {
        tracing::error!(timeout_secs = timeout.as_secs_f64(), "signing service timed out");
        return SigningOutcome::Failed {
            message: format!(
                "signing service timed out after {}s",
                timeout.as_secs_f64()
            ),
        };
    }

    tracing::error!(error = %error, "signing service unreachable");
    SigningOutcome::Failed {
        message: format!("could not reach the signing service: {error}"),
    }
}

/// Map a signer reply to an outcome.
///
/// The signer answers `{"status": "OK", "body": "<jws>"}` on success and
/// `{"status": "ERROR", "body": {"mensaje": ...}}` otherwise, sometimes with
/// a non-2xx HTTP status.
pub fn interpret_response(status: StatusCode, text: &str) -> SigningOutcome {
    let Ok(body) = serde_json::from_str::<JsonValue>(text) else {
        tracing::warn!(http_status = %status, "signing service returned a non-JSON body");
        return SigningOutcome::Failed {
            message: format!("unexpected response from the signing service (HTTP {status})"),
        };
    };

    match body.get("status").and_then(JsonValue::as_str) {
        Some("OK") if status.is_success() => match body.get("body").and_then(JsonValue::as_str) {
            Some(artifact) if !artifact.is_empty() => SigningOutcome::Signed {
                artifact: artifact.to_string(),
            },
            _ => {
                tracing::warn!("signing service reported OK without a signed document");
                SigningOutcome::Failed {
                    message: "unexpected response from the signing service: missing signed document"
                        .to_string(),
                }
            }
        },
        Some("OK") => SigningOutcome::Failed {
            message: format!("signing service returned HTTP {status}"),
        },
        _ => {
            let message = error_message(&body).unwrap_or_else(|| "unknown error".to_string());
            tracing::warn!(http_status = %status, reason = %message, "signing service refused the document");
            SigningOutcome::Failed { message }
        }
    }
}

// `mensaje` is a string in most versions of the signer and a list in some.
fn error_message(body: &JsonValue) -> Option<String> {
    match body.get("body")?.get("mensaje")? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(JsonValue::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(status: u16, body: JsonValue) -> SigningOutcome {
        interpret_response(StatusCode::from_u16(status).unwrap(), &body.to_string())
    }

    #[test]
    fn ok_with_string_body_is_signed() {
        assert_eq!(
            outcome(200, json!({"status": "OK", "body": "ABC"})),
            SigningOutcome::Signed { artifact: "ABC".to_string() }
        );
    }

    #[test]
    fn error_status_carries_authority_message() {
        let result = outcome(200, json!({"status": "ERROR", "body": {"mensaje": "Datos inválidos"}}));
        assert_eq!(result, SigningOutcome::Failed { message: "Datos inválidos".to_string() });
    }

    #[test]
    fn error_message_is_read_on_http_error_too() {
        let result = outcome(400, json!({"status": "ERROR", "body": {"mensaje": ["NIT invalido", "clave"]}}));
        assert_eq!(result, SigningOutcome::Failed { message: "NIT invalido; clave".to_string() });
    }

    #[test]
    fn missing_message_is_unknown_error() {
        let result = outcome(200, json!({"status": "ERROR"}));
        assert_eq!(result, SigningOutcome::Failed { message: "unknown error".to_string() });
    }

    #[test]
    fn ok_without_string_body_is_malformed() {
        let SigningOutcome::Failed { message } = outcome(200, json!({"status": "OK", "body": {"x": 1}})) else {
            panic!("expected failure");
        };
        assert!(message.contains("unexpected response"));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let SigningOutcome::Failed { message } =
            interpret_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")
        else {
            panic!("expected failure");
        };
        assert!(message.contains("502"));
    }
}
