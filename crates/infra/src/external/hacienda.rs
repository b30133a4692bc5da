use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;

use super::{ReceptionOutcome, ReceptionRequest, ReceptionService};

/// Only this `estado` counts as accepted.
pub const STATE_PROCESSED: &str = "PROCESADO";

/// Client for the Ministerio de Hacienda reception API.
#[derive(Debug, Clone)]
pub struct HaciendaClient {
    client: Client,
    timeout: Duration,
}

impl HaciendaClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(Client::builder().build()?, timeout))
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl ReceptionService for HaciendaClient {
    async fn submit(&self, endpoint: &str, token: &str, request: &ReceptionRequest) -> ReceptionOutcome {
        let sent = self
            .client
            .post(endpoint)
            .bearer_auth(token)
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

fn transport_failure(error: &reqwest::Error, timeout: Duration) -> ReceptionOutcome {
    let message = if error.is_timeout() {
        format!("Hacienda timed out after {}s", timeout.as_secs_f64())
    } else {
        format!("could not reach Hacienda: {error}")
    };
    tracing::error!(error = %error, "Hacienda request failed");
    ReceptionOutcome::Rejected {
        message,
        response: None,
    }
}

/// Map a reception reply to an outcome: HTTP 200 with `estado == "PROCESADO"`
/// is accepted, everything else is a rejection carrying `descripcionMsg`.
pub fn interpret_response(status: StatusCode, text: &str) -> ReceptionOutcome {
    let Ok(body) = serde_json::from_str::<JsonValue>(text) else {
        tracing::warn!(http_status = %status, "Hacienda returned a non-JSON body");
        return ReceptionOutcome::Rejected {
            message: format!("unexpected response from Hacienda (HTTP {status})"),
            response: None,
        };
    };

    let state = body.get("estado").and_then(JsonValue::as_str);
    if status == StatusCode::OK && state == Some(STATE_PROCESSED) {
        let stamp = body
            .get("selloRecibido")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        return ReceptionOutcome::Accepted {
            stamp,
            response: body,
        };
    }

    let message = body
        .get("descripcionMsg")
        .and_then(JsonValue::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("unknown error")
        .to_string();
    tracing::warn!(
        http_status = %status,
        estado = state.unwrap_or_default(),
        reason = %message,
        "Hacienda rejected the document"
    );

    ReceptionOutcome::Rejected {
        message,
        response: Some(body),
    }
}
