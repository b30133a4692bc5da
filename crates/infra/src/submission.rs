//! Sign/submit workflow for DTE documents.
//!
//! ```text
//! sign:    Draft ──(signer OK)──▶ Signed           (failure: stays Draft)
//! submit:  Signed ──(PROCESADO)──▶ Submitted       (anything else: Rejected)
//! ```
//!
//! The client performs the HTTP calls and feeds their outcome back to the
//! [`DteDocument`] aggregate as commands; the aggregate decides the
//! transition. Every applied event is returned wrapped in an
//! [`EventEnvelope`] so the host can persist the audit trail next to the
//! document record.

use chrono::Utc;
use serde_json::Value as JsonValue;

use dtesv_core::{Aggregate, AggregateRoot, DomainError};
use dtesv_events::EventEnvelope;
use dtesv_invoicing::{
    AssignGenerationCode, DteCommand, DteDocument, DteEvent, GenerationCode, Invoice,
    RecordAcceptance, RecordRejection, RecordSignature,
};

use crate::config::DteConfig;
use crate::external::{
    HaciendaClient, HttpSigner, ReceptionOutcome, ReceptionRequest, ReceptionService,
    SigningOutcome, SigningService,
};
use crate::report::DteReport;

/// DTE type sent to reception: Factura.
pub const DTE_TYPE_INVOICE: &str = "01";
/// Reception API version.
pub const RECEPTION_VERSION: u8 = 1;

pub type DteEnvelope = EventEnvelope<DteEvent>;

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Lifecycle violation; nothing was sent and nothing changed.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// Missing or unusable configuration; nothing was sent.
    #[error("configuration error: {0}")]
    Config(String),
    /// The signer refused the document or could not be reached. The document
    /// stays `Draft`; `events` holds the generation code assignment when this
    /// attempt made it.
    #[error("signing failed: {message}")]
    Signing {
        message: String,
        events: Vec<DteEnvelope>,
    },
    /// Hacienda did not accept the document. The document is now `Rejected`;
    /// `events` holds the recorded transition(s).
    #[error("rejected by Hacienda: {message}")]
    Rejected {
        message: String,
        response: Option<JsonValue>,
        events: Vec<DteEnvelope>,
    },
    #[error("could not serialize the DTE document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SubmissionError {
    /// Human-readable message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            SubmissionError::Precondition(m) | SubmissionError::Config(m) => m.clone(),
            SubmissionError::Signing { message, .. } | SubmissionError::Rejected { message, .. } => {
                message.clone()
            }
            SubmissionError::Serialize(e) => e.to_string(),
        }
    }

    /// Events recorded before the failure.
    pub fn events(&self) -> &[DteEnvelope] {
        match self {
            SubmissionError::Signing { events, .. } | SubmissionError::Rejected { events, .. } => {
                events
            }
            _ => &[],
        }
    }
}

impl From<DomainError> for SubmissionError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(m)
            | DomainError::InvariantViolation(m)
            | DomainError::InvalidId(m)
            | DomainError::Conflict(m) => SubmissionError::Precondition(m),
        }
    }
}

/// Result of a full `sign_and_submit` run.
#[derive(Debug, Clone)]
pub struct Submission {
    pub report: DteReport,
    pub events: Vec<DteEnvelope>,
}

/// Drives a [`DteDocument`] through signing and submission.
///
/// Generic over the two external services so hosts and tests can swap the
/// transport; [`SubmissionClient::new`] wires the HTTP adapters.
#[derive(Debug, Clone)]
pub struct SubmissionClient<S, R> {
    config: DteConfig,
    signer: S,
    reception: R,
}

impl SubmissionClient<HttpSigner, HaciendaClient> {
    pub fn new(config: DteConfig) -> Result<Self, SubmissionError> {
        let signer = HttpSigner::new(config.sign_timeout)
            .map_err(|e| SubmissionError::Config(format!("could not build HTTP client: {e}")))?;
        let reception = HaciendaClient::new(config.submit_timeout)
            .map_err(|e| SubmissionError::Config(format!("could not build HTTP client: {e}")))?;
        Ok(Self::with_services(config, signer, reception))
    }
}

impl<S, R> SubmissionClient<S, R>
where
    S: SigningService,
    R: ReceptionService,
{
    pub fn with_services(config: DteConfig, signer: S, reception: R) -> Self {
        Self {
            config,
            signer,
            reception,
        }
    }

    pub fn config(&self) -> &DteConfig {
        &self.config
    }

    /// Build the payload, have it signed, and record the signature.
    ///
    /// The generation code is assigned on the first attempt and kept on the
    /// document, so a retry after a failed signature reuses it.
    pub async fn sign(
        &self,
        invoice: &Invoice,
        document: &mut DteDocument,
    ) -> Result<Vec<DteEnvelope>, SubmissionError> {
        ensure_same_invoice(invoice, document)?;
        document.ensure_can_sign()?;
        let endpoint = self
            .config
            .signing_endpoint()
            .ok_or_else(|| SubmissionError::Config("signing service URL is not configured".to_string()))?;

        let code = document.generation_code().unwrap_or_else(GenerationCode::new);
        let mut events = record(
            document,
            DteCommand::AssignGenerationCode(AssignGenerationCode {
                code,
                occurred_at: Utc::now(),
            }),
        )?;

        let request = self.config.payload_builder().build_with_code(invoice, code);
        let payload_snapshot = serde_json::to_string(&request.dte_json)?;

        tracing::info!(
            document_id = %document.id_typed(),
            invoice = %invoice.name,
            generation_code = %code,
            "signing DTE"
        );

        match self.signer.sign(&endpoint, &request).await {
            SigningOutcome::Signed { artifact } => {
                events.extend(record(
                    document,
                    DteCommand::RecordSignature(RecordSignature {
                        generation_code: code,
                        payload_snapshot,
                        signed_artifact: artifact,
                        occurred_at: Utc::now(),
                    }),
                )?);
                tracing::info!(document_id = %document.id_typed(), generation_code = %code, "DTE signed");
                Ok(events)
            }
            SigningOutcome::Failed { message } => {
                tracing::warn!(
                    document_id = %document.id_typed(),
                    generation_code = %code,
                    reason = %message,
                    "DTE signing failed"
                );
                Err(SubmissionError::Signing { message, events })
            }
        }
    }

    /// Send the signed artifact to Hacienda and record the verdict.
    pub async fn submit(&self, document: &mut DteDocument) -> Result<Vec<DteEnvelope>, SubmissionError> {
        document.ensure_can_submit()?;
        let code = document.generation_code().ok_or_else(|| {
            SubmissionError::Precondition("document has no generation code".to_string())
        })?;
        let token = self
            .config
            .mh_token
            .as_deref()
            .ok_or_else(|| SubmissionError::Config("Hacienda API token is not configured".to_string()))?;

        let request = ReceptionRequest {
            ambiente: self.config.environment.code().to_string(),
            id_envio: document.sequence(),
            version: RECEPTION_VERSION,
            tipo_dte: DTE_TYPE_INVOICE.to_string(),
            documento: document.signed_artifact().unwrap_or_default().to_string(),
            codigo_generacion: code,
        };
        let endpoint = self.config.reception_url();

        tracing::info!(
            document_id = %document.id_typed(),
            generation_code = %code,
            endpoint,
            "submitting DTE to Hacienda"
        );

        match self.reception.submit(endpoint, token, &request).await {
            ReceptionOutcome::Accepted { stamp, response } => {
                let events = record(
                    document,
                    DteCommand::RecordAcceptance(RecordAcceptance {
                        stamp: stamp.clone(),
                        response,
                        occurred_at: Utc::now(),
                    }),
                )?;
                tracing::info!(
                    document_id = %document.id_typed(),
                    generation_code = %code,
                    stamp = stamp.as_deref().unwrap_or_default(),
                    "DTE accepted by Hacienda"
                );
                Ok(events)
            }
            ReceptionOutcome::Rejected { message, response } => {
                let events = record(
                    document,
                    DteCommand::RecordRejection(RecordRejection {
                        message: message.clone(),
                        response: response.clone(),
                        occurred_at: Utc::now(),
                    }),
                )?;
                tracing::warn!(
                    document_id = %document.id_typed(),
                    generation_code = %code,
                    reason = %message,
                    "DTE rejected by Hacienda"
                );
                Err(SubmissionError::Rejected {
                    message,
                    response,
                    events,
                })
            }
        }
    }

    /// `sign` then `submit`, stopping at the first failure.
    pub async fn sign_and_submit(
        &self,
        invoice: &Invoice,
        document: &mut DteDocument,
    ) -> Result<Submission, SubmissionError> {
        let mut events = self.sign(invoice, document).await?;

        match self.submit(document).await {
            Ok(submitted) => events.extend(submitted),
            Err(SubmissionError::Rejected {
                message,
                response,
                events: rejected,
            }) => {
                events.extend(rejected);
                return Err(SubmissionError::Rejected {
                    message,
                    response,
                    events,
                });
            }
            Err(e) => return Err(e),
        }

        Ok(Submission {
            report: DteReport::new(invoice, document, self.config.environment),
            events,
        })
    }

    /// Post hook: run the full workflow when the invoice's journal emits DTEs.
    ///
    /// Returns `Ok(None)` for journals without electronic invoicing.
    pub async fn process_posted_invoice(
        &self,
        invoice: &Invoice,
        document: &mut DteDocument,
    ) -> Result<Option<Submission>, SubmissionError> {
        if !invoice.dte_enabled {
            tracing::debug!(invoice = %invoice.name, "DTE disabled for journal, skipping");
            return Ok(None);
        }
        self.sign_and_submit(invoice, document).await.map(Some)
    }
}

fn ensure_same_invoice(invoice: &Invoice, document: &DteDocument) -> Result<(), SubmissionError> {
    if document.invoice_id() != invoice.id {
        return Err(SubmissionError::Precondition(format!(
            "document belongs to invoice {}, not {}",
            document.invoice_id(),
            invoice.id
        )));
    }
    Ok(())
}

/// Execute a command on the document and wrap the resulting events.
fn record(document: &mut DteDocument, command: DteCommand) -> Result<Vec<DteEnvelope>, SubmissionError> {
    let base = document.version();
    let events = document.execute(&command)?;
    let aggregate_id = document.id().0;

    Ok(events
        .into_iter()
        .zip(base + 1..)
        .map(|(event, seq)| EventEnvelope::wrap(aggregate_id, seq, event))
        .collect())
}
