use serde::{Deserialize, Serialize};

use dtesv_core::AggregateId;

/// Company NIT used when the emitter has no tax ID on file.
pub const DEFAULT_COMPANY_NIT: &str = "0000000000000";
/// NRC used when the emitter is not registered as a taxpayer.
pub const DEFAULT_COMPANY_NRC: &str = "000000-0";
pub const DEFAULT_ACTIVITY_CODE: &str = "10005";
pub const DEFAULT_ACTIVITY_DESCRIPTION: &str = "Comercio";
pub const DEFAULT_COMPANY_STREET: &str = "San Salvador";
pub const DEFAULT_COMPANY_PHONE: &str = "0000-0000";

/// Receiver identification document type (MH catalog code).
pub const DEFAULT_DOCUMENT_TYPE: &str = "36";
pub const DEFAULT_DOCUMENT_NUMBER: &str = "0000000000";
pub const DEFAULT_DEPARTMENT_CODE: &str = "01";
pub const DEFAULT_PARTNER_STREET: &str = "Ciudad";

/// Party identifier (host record id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(pub AggregateId);

impl PartyId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PartyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Contact information for a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
}

impl ContactInfo {
    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn phone(&self) -> Option<&str> {
        present(&self.phone)
    }

    pub fn street(&self) -> Option<&str> {
        present(&self.street)
    }
}

/// Emitting company (the DTE `emisor`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: PartyId,
    pub name: String,
    /// Tax ID (NIT).
    #[serde(default)]
    pub vat: Option<String>,
    /// Taxpayer registration number.
    #[serde(default)]
    pub nrc: Option<String>,
    #[serde(default)]
    pub activity_code: Option<String>,
    #[serde(default)]
    pub activity_description: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
}

impl Company {
    pub fn new(id: PartyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vat: None,
            nrc: None,
            activity_code: None,
            activity_description: None,
            contact: ContactInfo::default(),
        }
    }

    pub fn nit(&self) -> &str {
        present(&self.vat).unwrap_or(DEFAULT_COMPANY_NIT)
    }

    pub fn nrc(&self) -> &str {
        present(&self.nrc).unwrap_or(DEFAULT_COMPANY_NRC)
    }

    pub fn activity_code(&self) -> &str {
        present(&self.activity_code).unwrap_or(DEFAULT_ACTIVITY_CODE)
    }

    pub fn activity_description(&self) -> &str {
        present(&self.activity_description).unwrap_or(DEFAULT_ACTIVITY_DESCRIPTION)
    }

    pub fn street(&self) -> &str {
        self.contact.street().unwrap_or(DEFAULT_COMPANY_STREET)
    }

    pub fn phone(&self) -> &str {
        self.contact.phone().unwrap_or(DEFAULT_COMPANY_PHONE)
    }

    pub fn email(&self) -> Option<&str> {
        self.contact.email()
    }
}

/// Receiving partner (the DTE `receptor`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartyId,
    pub name: String,
    /// Identification document number (DUI/NIT).
    #[serde(default)]
    pub vat: Option<String>,
    /// MH catalog code of the identification document.
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub nrc: Option<String>,
    /// Department code of the partner's state, e.g. `"06"` for San Salvador.
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
}

impl Partner {
    pub fn new(id: PartyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vat: None,
            document_type: None,
            nrc: None,
            state_code: None,
            contact: ContactInfo::default(),
        }
    }

    pub fn document_type(&self) -> &str {
        present(&self.document_type).unwrap_or(DEFAULT_DOCUMENT_TYPE)
    }

    pub fn document_number(&self) -> &str {
        present(&self.vat).unwrap_or(DEFAULT_DOCUMENT_NUMBER)
    }

    pub fn nrc(&self) -> Option<&str> {
        present(&self.nrc)
    }

    pub fn department_code(&self) -> &str {
        present(&self.state_code).unwrap_or(DEFAULT_DEPARTMENT_CODE)
    }

    pub fn street(&self) -> &str {
        self.contact.street().unwrap_or(DEFAULT_PARTNER_STREET)
    }

    pub fn phone(&self) -> Option<&str> {
        self.contact.phone()
    }

    pub fn email(&self) -> Option<&str> {
        self.contact.email()
    }
}

// Host records use empty strings for unset text fields as often as nulls.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
