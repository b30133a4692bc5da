//! Parties taking part in a DTE: the emitting company and the receiving
//! partner.
//!
//! These are read-only snapshots of host ERP records. Optional source fields
//! are resolved to the tax authority's fallback values here, so projections
//! never need to probe for missing data.

pub mod party;

pub use party::{Company, ContactInfo, Partner, PartyId};
