//! External service clients/adapters.
//!
//! The adapters never return transport errors: every failure is folded into
//! an outcome value carrying a human-readable message, so the workflow only
//! has to decide which lifecycle transition to record.

pub mod hacienda;
pub mod signer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use dtesv_dte::SigningRequest;
use dtesv_invoicing::GenerationCode;

pub use hacienda::HaciendaClient;
pub use signer::HttpSigner;

/// Result of one call to the signing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOutcome {
    /// Compact signed JWS returned by the signer.
    Signed { artifact: String },
    Failed { message: String },
}

/// Result of one call to the Hacienda reception API.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceptionOutcome {
    Accepted {
        stamp: Option<String>,
        response: JsonValue,
    },
    Rejected {
        message: String,
        /// Authority response, when one was received at all.
        response: Option<JsonValue>,
    },
}

/// Body posted to the Hacienda reception endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionRequest {
    pub ambiente: String,
    pub id_envio: u64,
    pub version: u8,
    pub tipo_dte: String,
    /// Signed artifact.
    pub documento: String,
    pub codigo_generacion: GenerationCode,
}

#[async_trait]
pub trait SigningService: Send + Sync {
    async fn sign(&self, endpoint: &str, request: &SigningRequest) -> SigningOutcome;
}

#[async_trait]
pub trait ReceptionService: Send + Sync {
    async fn submit(&self, endpoint: &str, token: &str, request: &ReceptionRequest) -> ReceptionOutcome;
}
