//! Invoicing records and the DTE document lifecycle.
//!
//! `invoice` holds the read-only invoice snapshot handed over by the host ERP;
//! `document` holds the electronic-document state this workspace owns
//! (generation code, signed artifact, authority receipt, status), implemented
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod document;
pub mod invoice;

pub use document::{
    AssignGenerationCode, AuthorityReceipt, DocumentSigned, DteCommand, DteDocument,
    DteDocumentId, DteDocumentSnapshot, DteEvent, DteStatus, GenerationCode,
    GenerationCodeAssigned, RecordAcceptance, RecordRejection, RecordSignature, Rejection,
    SubmissionAccepted, SubmissionRejected,
};
pub use invoice::{Invoice, InvoiceId, InvoiceLine, LineKind};
