//! DTE payload builder.
//!
//! Deterministic projection of an invoice (with its company, partner and
//! lines) into the JSON schema of El Salvador's Ministerio de Hacienda for
//! the "Factura" document type. No IO: the only non-deterministic inputs are
//! the generation code and the issue time, and both can be supplied by the
//! caller.

pub mod environment;
pub mod extension;
pub mod identification;
pub mod items;
pub mod parties;
pub mod payload;
pub mod schema;
pub mod summary;
pub mod tax;
pub mod text;
pub mod words;

pub use environment::{Environment, public_consultation_url};
pub use extension::{build_appendix, build_extension};
pub use identification::{build_identification, local_now};
pub use items::build_line_items;
pub use parties::{build_emitter, build_receiver};
pub use payload::{PayloadBuilder, build_payload};
pub use schema::{
    Address, AppendixEntry, DteItem, DteJson, Emitter, Extension, Identification, Receiver,
    SigningRequest, Summary,
};
pub use summary::build_summary;
pub use words::amount_in_words;
