use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use dtesv_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};
use dtesv_events::Event;

use crate::invoice::InvoiceId;

/// Aggregate type name used in event envelopes.
pub const AGGREGATE_TYPE: &str = "dte.document";

/// DTE document identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DteDocumentId(pub AggregateId);

impl DteDocumentId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DteDocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Unique code identifying a DTE before the tax authority (`codigoGeneracion`).
///
/// Rendered as an uppercase, hyphenated UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GenerationCode(Uuid);

impl GenerationCode {
    /// Fresh random (v4) code.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GenerationCode {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for GenerationCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf = Uuid::encode_buffer();
        f.write_str(self.0.hyphenated().encode_upper(&mut buf))
    }
}

impl core::str::FromStr for GenerationCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("GenerationCode: {e}")))
    }
}

impl Serialize for GenerationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GenerationCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Persisted DTE status.
///
/// `Draft → Signed → Submitted`, with `Signed → Rejected` when the tax
/// authority refuses the document. Nothing ever returns to `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DteStatus {
    #[default]
    Draft,
    Signed,
    Submitted,
    Rejected,
}

impl DteStatus {
    /// Transition table.
    pub fn can_transition_to(self, next: DteStatus) -> bool {
        matches!(
            (self, next),
            (DteStatus::Draft, DteStatus::Signed)
                | (DteStatus::Signed, DteStatus::Submitted)
                | (DteStatus::Signed, DteStatus::Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DteStatus::Submitted | DteStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DteStatus::Draft => "draft",
            DteStatus::Signed => "signed",
            DteStatus::Submitted => "submitted",
            DteStatus::Rejected => "rejected",
        }
    }
}

impl core::fmt::Display for DteStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reception receipt returned by the tax authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorityReceipt {
    /// `selloRecibido`.
    pub stamp: Option<String>,
    /// Full authority response, verbatim.
    pub response: JsonValue,
}

/// Why the tax authority refused a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub message: String,
    pub response: Option<JsonValue>,
}

/// Aggregate root: the electronic document attached to one invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct DteDocument {
    id: DteDocumentId,
    invoice_id: InvoiceId,
    sequence: u64,
    status: DteStatus,
    generation_code: Option<GenerationCode>,
    payload_snapshot: Option<String>,
    signed_artifact: Option<String>,
    receipt: Option<AuthorityReceipt>,
    rejection: Option<Rejection>,
    version: u64,
}

/// Serializable form of a [`DteDocument`], for hosts persisting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DteDocumentSnapshot {
    pub id: DteDocumentId,
    pub invoice_id: InvoiceId,
    /// Host-side sequence number, sent as `idEnvio`.
    pub sequence: u64,
    pub status: DteStatus,
    pub generation_code: Option<GenerationCode>,
    pub payload_snapshot: Option<String>,
    pub signed_artifact: Option<String>,
    pub receipt: Option<AuthorityReceipt>,
    pub rejection: Option<Rejection>,
    pub version: u64,
}

impl DteDocument {
    /// New draft document for an invoice.
    pub fn new(id: DteDocumentId, invoice_id: InvoiceId, sequence: u64) -> Self {
        Self {
            id,
            invoice_id,
            sequence,
            status: DteStatus::Draft,
            generation_code: None,
            payload_snapshot: None,
            signed_artifact: None,
            receipt: None,
            rejection: None,
            version: 0,
        }
    }

    /// Rebuild a document from its persisted form.
    pub fn from_snapshot(snapshot: DteDocumentSnapshot) -> Self {
        Self {
            id: snapshot.id,
            invoice_id: snapshot.invoice_id,
            sequence: snapshot.sequence,
            status: snapshot.status,
            generation_code: snapshot.generation_code,
            payload_snapshot: snapshot.payload_snapshot,
            signed_artifact: snapshot.signed_artifact,
            receipt: snapshot.receipt,
            rejection: snapshot.rejection,
            version: snapshot.version,
        }
    }

    pub fn snapshot(&self) -> DteDocumentSnapshot {
        DteDocumentSnapshot {
            id: self.id,
            invoice_id: self.invoice_id,
            sequence: self.sequence,
            status: self.status,
            generation_code: self.generation_code,
            payload_snapshot: self.payload_snapshot.clone(),
            signed_artifact: self.signed_artifact.clone(),
            receipt: self.receipt.clone(),
            rejection: self.rejection.clone(),
            version: self.version,
        }
    }

    pub fn id_typed(&self) -> DteDocumentId {
        self.id
    }

    pub fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn status(&self) -> DteStatus {
        self.status
    }

    pub fn generation_code(&self) -> Option<GenerationCode> {
        self.generation_code
    }

    pub fn payload_snapshot(&self) -> Option<&str> {
        self.payload_snapshot.as_deref()
    }

    pub fn signed_artifact(&self) -> Option<&str> {
        self.signed_artifact.as_deref()
    }

    pub fn receipt(&self) -> Option<&AuthorityReceipt> {
        self.receipt.as_ref()
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    /// Invariant: signing is only possible on a draft.
    pub fn ensure_can_sign(&self) -> DomainResult<()> {
        if self.status != DteStatus::Draft {
            return Err(DomainError::invariant(format!(
                "document has already been processed (status: {})",
                self.status
            )));
        }
        Ok(())
    }

    /// Invariant: submission needs a signed document with its artifact.
    pub fn ensure_can_submit(&self) -> DomainResult<()> {
        if self.status != DteStatus::Signed {
            return Err(DomainError::invariant(format!(
                "document must be signed before submission (status: {})",
                self.status
            )));
        }
        if self.signed_artifact().is_none_or(|a| a.is_empty()) {
            return Err(DomainError::invariant("signed document not found"));
        }
        Ok(())
    }

    fn ensure_transition(&self, next: DteStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "invalid status transition {} -> {}",
                self.status, next
            )));
        }
        Ok(())
    }
}

impl AggregateRoot for DteDocument {
    type Id = DteDocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AssignGenerationCode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignGenerationCode {
    pub code: GenerationCode,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordSignature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSignature {
    pub generation_code: GenerationCode,
    /// JSON document exactly as it was sent for signing.
    pub payload_snapshot: String,
    pub signed_artifact: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordAcceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAcceptance {
    pub stamp: Option<String>,
    pub response: JsonValue,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordRejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRejection {
    pub message: String,
    pub response: Option<JsonValue>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DteCommand {
    AssignGenerationCode(AssignGenerationCode),
    RecordSignature(RecordSignature),
    RecordAcceptance(RecordAcceptance),
    RecordRejection(RecordRejection),
}

/// Event: GenerationCodeAssigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationCodeAssigned {
    pub document_id: DteDocumentId,
    pub code: GenerationCode,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DocumentSigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSigned {
    pub document_id: DteDocumentId,
    pub generation_code: GenerationCode,
    pub payload_snapshot: String,
    pub signed_artifact: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SubmissionAccepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionAccepted {
    pub document_id: DteDocumentId,
    pub receipt: AuthorityReceipt,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SubmissionRejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRejected {
    pub document_id: DteDocumentId,
    pub rejection: Rejection,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DteEvent {
    GenerationCodeAssigned(GenerationCodeAssigned),
    DocumentSigned(DocumentSigned),
    SubmissionAccepted(SubmissionAccepted),
    SubmissionRejected(SubmissionRejected),
}

impl Event for DteEvent {
    fn aggregate_type(&self) -> &'static str {
        AGGREGATE_TYPE
    }

    fn event_type(&self) -> &'static str {
        match self {
            DteEvent::GenerationCodeAssigned(_) => "dte.document.generation_code_assigned",
            DteEvent::DocumentSigned(_) => "dte.document.signed",
            DteEvent::SubmissionAccepted(_) => "dte.document.submission_accepted",
            DteEvent::SubmissionRejected(_) => "dte.document.submission_rejected",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DteEvent::GenerationCodeAssigned(e) => e.occurred_at,
            DteEvent::DocumentSigned(e) => e.occurred_at,
            DteEvent::SubmissionAccepted(e) => e.occurred_at,
            DteEvent::SubmissionRejected(e) => e.occurred_at,
        }
    }
}

impl Aggregate for DteDocument {
    type Command = DteCommand;
    type Event = DteEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DteEvent::GenerationCodeAssigned(e) => {
                self.generation_code = Some(e.code);
            }
            DteEvent::DocumentSigned(e) => {
                self.generation_code.get_or_insert(e.generation_code);
                self.payload_snapshot = Some(e.payload_snapshot.clone());
                self.signed_artifact = Some(e.signed_artifact.clone());
                self.status = DteStatus::Signed;
            }
            DteEvent::SubmissionAccepted(e) => {
                self.receipt = Some(e.receipt.clone());
                self.status = DteStatus::Submitted;
            }
            DteEvent::SubmissionRejected(e) => {
                self.rejection = Some(e.rejection.clone());
                self.status = DteStatus::Rejected;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DteCommand::AssignGenerationCode(cmd) => self.handle_assign_code(cmd),
            DteCommand::RecordSignature(cmd) => self.handle_signature(cmd),
            DteCommand::RecordAcceptance(cmd) => self.handle_acceptance(cmd),
            DteCommand::RecordRejection(cmd) => self.handle_rejection(cmd),
        }
    }
}

impl DteDocument {
    fn ensure_same_code(&self, code: GenerationCode) -> DomainResult<()> {
        match self.generation_code {
            Some(existing) if existing != code => Err(DomainError::conflict(format!(
                "generation code is already assigned ({existing})"
            ))),
            _ => Ok(()),
        }
    }

    fn handle_assign_code(&self, cmd: &AssignGenerationCode) -> DomainResult<Vec<DteEvent>> {
        self.ensure_can_sign()?;
        self.ensure_same_code(cmd.code)?;

        if self.generation_code.is_some() {
            return Ok(vec![]);
        }

        Ok(vec![DteEvent::GenerationCodeAssigned(GenerationCodeAssigned {
            document_id: self.id,
            code: cmd.code,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_signature(&self, cmd: &RecordSignature) -> DomainResult<Vec<DteEvent>> {
        self.ensure_can_sign()?;
        self.ensure_transition(DteStatus::Signed)?;
        self.ensure_same_code(cmd.generation_code)?;

        if cmd.signed_artifact.is_empty() {
            return Err(DomainError::validation("signed artifact must not be empty"));
        }
        if cmd.payload_snapshot.is_empty() {
            return Err(DomainError::validation("payload snapshot must not be empty"));
        }

        Ok(vec![DteEvent::DocumentSigned(DocumentSigned {
            document_id: self.id,
            generation_code: cmd.generation_code,
            payload_snapshot: cmd.payload_snapshot.clone(),
            signed_artifact: cmd.signed_artifact.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_acceptance(&self, cmd: &RecordAcceptance) -> DomainResult<Vec<DteEvent>> {
        self.ensure_can_submit()?;
        self.ensure_transition(DteStatus::Submitted)?;

        Ok(vec![DteEvent::SubmissionAccepted(SubmissionAccepted {
            document_id: self.id,
            receipt: AuthorityReceipt {
                stamp: cmd.stamp.clone(),
                response: cmd.response.clone(),
            },
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_rejection(&self, cmd: &RecordRejection) -> DomainResult<Vec<DteEvent>> {
        self.ensure_can_submit()?;
        self.ensure_transition(DteStatus::Rejected)?;

        Ok(vec![DteEvent::SubmissionRejected(SubmissionRejected {
            document_id: self.id,
            rejection: Rejection {
                message: cmd.message.clone(),
                response: cmd.response.clone(),
            },
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn draft() -> DteDocument {
        DteDocument::new(
            DteDocumentId::new(AggregateId::new()),
            InvoiceId::new(AggregateId::new()),
            42,
        )
    }

    fn sign_cmd(code: GenerationCode) -> DteCommand {
        DteCommand::RecordSignature(RecordSignature {
            generation_code: code,
            payload_snapshot: "{\"identificacion\":{}}".to_string(),
            signed_artifact: "ABC".to_string(),
            occurred_at: Utc::now(),
        })
    }

    fn signed() -> DteDocument {
        let mut doc = draft();
        doc.execute(&sign_cmd(GenerationCode::new())).unwrap();
        doc
    }

    fn acceptance() -> DteCommand {
        DteCommand::RecordAcceptance(RecordAcceptance {
            stamp: Some("SELLO123ABC".to_string()),
            response: json!({ "estado": "PROCESADO", "selloRecibido": "SELLO123ABC" }),
            occurred_at: Utc::now(),
        })
    }

    fn rejection() -> DteCommand {
        DteCommand::RecordRejection(RecordRejection {
            message: "Documento duplicado".to_string(),
            response: Some(json!({ "estado": "RECHAZADO" })),
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn generation_code_renders_uppercase() {
        let code = GenerationCode::new();
        let text = code.to_string();

        assert_eq!(text, text.to_uppercase());
        assert_eq!(text.len(), 36);
        assert_eq!(text.parse::<GenerationCode>().unwrap(), code);
        assert_eq!(serde_json::to_value(code).unwrap(), json!(text));
    }

    #[test]
    fn signing_a_draft_stores_artifact_and_code() {
        let mut doc = draft();
        let code = GenerationCode::new();

        let events = doc.execute(&sign_cmd(code)).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(doc.status(), DteStatus::Signed);
        assert_eq!(doc.signed_artifact(), Some("ABC"));
        assert_eq!(doc.generation_code(), Some(code));
        assert!(doc.payload_snapshot().is_some());
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn cannot_sign_twice() {
        let doc = signed();
        let err = doc.handle(&sign_cmd(GenerationCode::new())).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("already been processed") => {}
            other => panic!("expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn generation_code_is_assigned_once() {
        let mut doc = draft();
        let first = GenerationCode::new();
        let assign = |code| {
            DteCommand::AssignGenerationCode(AssignGenerationCode {
                code,
                occurred_at: Utc::now(),
            })
        };

        assert_eq!(doc.execute(&assign(first)).unwrap().len(), 1);
        // Re-assigning the same code is a no-op.
        assert!(doc.execute(&assign(first)).unwrap().is_empty());

        let err = doc.handle(&assign(GenerationCode::new())).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = doc.handle(&sign_cmd(GenerationCode::new())).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        doc.execute(&sign_cmd(first)).unwrap();
        assert_eq!(doc.generation_code(), Some(first));
    }

    #[test]
    fn empty_artifact_is_rejected() {
        let doc = draft();
        let cmd = DteCommand::RecordSignature(RecordSignature {
            generation_code: GenerationCode::new(),
            payload_snapshot: "{}".to_string(),
            signed_artifact: String::new(),
            occurred_at: Utc::now(),
        });
        assert!(matches!(doc.handle(&cmd).unwrap_err(), DomainError::Validation(_)));
    }

    #[test]
    fn acceptance_marks_submitted_with_receipt() {
        let mut doc = signed();
        doc.execute(&acceptance()).unwrap();

        assert_eq!(doc.status(), DteStatus::Submitted);
        let receipt = doc.receipt().unwrap();
        assert_eq!(receipt.stamp.as_deref(), Some("SELLO123ABC"));
        assert_eq!(receipt.response["estado"], "PROCESADO");
    }

    #[test]
    fn rejection_is_terminal() {
        let mut doc = signed();
        doc.execute(&rejection()).unwrap();

        assert_eq!(doc.status(), DteStatus::Rejected);
        assert_eq!(doc.rejection().unwrap().message, "Documento duplicado");
        assert!(doc.handle(&acceptance()).is_err());
        assert!(doc.handle(&sign_cmd(GenerationCode::new())).is_err());
    }

    #[test]
    fn cannot_submit_a_draft() {
        let doc = draft();
        let err = doc.handle(&acceptance()).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("must be signed") => {}
            other => panic!("expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn cannot_submit_without_artifact() {
        let mut snapshot = draft().snapshot();
        snapshot.status = DteStatus::Signed;
        let doc = DteDocument::from_snapshot(snapshot);

        let err = doc.ensure_can_submit().unwrap_err();
        assert_eq!(err, DomainError::invariant("signed document not found"));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let doc = signed();
        let json = serde_json::to_string(&doc.snapshot()).unwrap();
        let restored = DteDocument::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(restored, doc);
    }

    #[test]
    fn event_types_are_namespaced() {
        let mut doc = draft();
        let events = doc.execute(&sign_cmd(GenerationCode::new())).unwrap();
        assert_eq!(events[0].event_type(), "dte.document.signed");
    }

    fn any_status() -> impl Strategy<Value = DteStatus> {
        prop_oneof![
            Just(DteStatus::Draft),
            Just(DteStatus::Signed),
            Just(DteStatus::Submitted),
            Just(DteStatus::Rejected),
        ]
    }

    proptest! {
        #[test]
        fn no_transition_returns_to_draft(from in any_status()) {
            prop_assert!(!from.can_transition_to(DteStatus::Draft));
        }

        #[test]
        fn terminal_states_have_no_exits(from in any_status(), to in any_status()) {
            if from.is_terminal() {
                prop_assert!(!from.can_transition_to(to));
            }
        }
    }
}
