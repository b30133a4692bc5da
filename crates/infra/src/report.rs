//! Outcome summary handed back to the point of sale after submission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dtesv_dte::{Environment, public_consultation_url};
use dtesv_invoicing::{DteDocument, DteStatus, GenerationCode, Invoice};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DteReport {
    pub numero_factura: String,
    pub uuid_generation_code: Option<GenerationCode>,
    pub estado_dte: DteStatus,
    /// Reception stamp (`selloRecibido`).
    pub confirmacion: Option<String>,
    pub fecha_factura: NaiveDate,
    /// Public consultation page; what the printed QR encodes.
    pub qr_link: Option<String>,
}

impl DteReport {
    pub fn new(invoice: &Invoice, document: &DteDocument, environment: Environment) -> Self {
        let code = document.generation_code();
        Self {
            numero_factura: invoice.name.clone(),
            uuid_generation_code: code,
            estado_dte: document.status(),
            confirmacion: document.receipt().and_then(|r| r.stamp.clone()),
            fecha_factura: invoice.invoice_date,
            qr_link: code.map(|c| public_consultation_url(environment, c, invoice.invoice_date)),
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.estado_dte == DteStatus::Submitted
    }
}
