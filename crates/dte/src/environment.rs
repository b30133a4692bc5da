//! Hacienda environments (`ambiente`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dtesv_invoicing::GenerationCode;

pub const TEST_RECEPTION_URL: &str = "https://apitest.dtes.mh.gob.sv/fesv/recepciondte";
pub const PRODUCTION_RECEPTION_URL: &str = "https://api.dtes.mh.gob.sv/fesv/recepciondte";
pub const PUBLIC_CONSULTATION_URL: &str = "https://admin.factura.gob.sv/consultaPublica";

/// Target environment of the tax authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Environment {
    /// `"00"` (pruebas).
    #[default]
    Test,
    /// `"01"` (producción).
    Production,
}

impl Environment {
    /// Parse the MH flag. Anything other than `"01"` is the test environment.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "01" => Environment::Production,
            _ => Environment::Test,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Environment::Test => "00",
            Environment::Production => "01",
        }
    }

    pub fn reception_url(self) -> &'static str {
        match self {
            Environment::Test => TEST_RECEPTION_URL,
            Environment::Production => PRODUCTION_RECEPTION_URL,
        }
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        Environment::from_code(&value)
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.code().to_string()
    }
}

/// Public lookup page of a processed document (what the printed QR encodes).
pub fn public_consultation_url(
    environment: Environment,
    code: GenerationCode,
    issue_date: NaiveDate,
) -> String {
    format!(
        "{PUBLIC_CONSULTATION_URL}?ambiente={}&codGen={code}&fechaEmi={}",
        environment.code(),
        issue_date.format("%Y-%m-%d")
    )
}
