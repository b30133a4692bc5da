use chrono::DateTime;
use chrono_tz::Tz;

use dtesv_invoicing::{GenerationCode, Invoice};

use crate::environment::Environment;
use crate::extension::{build_appendix, build_extension};
use crate::identification::{build_identification, local_now};
use crate::items::build_line_items;
use crate::parties::{build_emitter, build_receiver};
use crate::schema::{DteJson, SigningRequest};
use crate::summary::build_summary;

/// Assembles the signing envelope for an invoice.
///
/// Holds the emitter-wide settings that are not part of the invoice record:
/// target environment and the signer's private-key password.
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    environment: Environment,
    signer_password: Option<String>,
    issued_at: Option<DateTime<Tz>>,
}

impl PayloadBuilder {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            signer_password: None,
            issued_at: None,
        }
    }

    pub fn with_signer_password(mut self, password: impl Into<String>) -> Self {
        self.signer_password = Some(password.into());
        self
    }

    /// Pin the issue time instead of reading the clock on every build.
    pub fn with_issue_time(mut self, issued_at: DateTime<Tz>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Build with a fresh generation code.
    pub fn build(&self, invoice: &Invoice) -> SigningRequest {
        self.build_with_code(invoice, GenerationCode::new())
    }

    /// Build with a known generation code (e.g. retrying a failed signature).
    pub fn build_with_code(&self, invoice: &Invoice, code: GenerationCode) -> SigningRequest {
        let issued_at = self.issued_at.unwrap_or_else(local_now);

        let dte_json = DteJson {
            identificacion: build_identification(invoice, self.environment, code, &issued_at),
            emisor: build_emitter(&invoice.company),
            receptor: build_receiver(&invoice.partner),
            cuerpo_documento: build_line_items(invoice).collect(),
            resumen: build_summary(invoice),
            extension: build_extension(invoice),
            apendice: build_appendix(invoice),
        };

        SigningRequest {
            nit: invoice.company.nit().to_string(),
            activo: true,
            password_pri: self.signer_password.clone(),
            dte_json,
        }
    }
}

/// Build the signing envelope for the test environment with a fresh code.
pub fn build_payload(invoice: &Invoice) -> SigningRequest {
    PayloadBuilder::default().build(invoice)
}
