use chrono::{DateTime, Utc};
use chrono_tz::{America::El_Salvador, Tz};

use dtesv_invoicing::{GenerationCode, Invoice};

use crate::environment::Environment;
use crate::schema::Identification;

pub const SCHEMA_VERSION: u8 = 1;
/// `tipoDte` of a Factura.
pub const DOCUMENT_TYPE_FACTURA: &str = "01";
/// Prior-transmission model.
pub const MODEL_PRIOR: u8 = 1;
/// Normal (non-contingency) transmission.
pub const OPERATION_NORMAL: u8 = 1;
pub const CURRENCY: &str = "USD";

/// Current wall-clock time in El Salvador.
pub fn local_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&El_Salvador)
}

/// `identificacion` block.
///
/// The issue date is the invoice date as recorded; the issue time is
/// `issued_at` in El Salvador local time.
pub fn build_identification(
    invoice: &Invoice,
    environment: Environment,
    generation_code: GenerationCode,
    issued_at: &DateTime<Tz>,
) -> Identification {
    let local = issued_at.with_timezone(&El_Salvador);

    Identification {
        version: SCHEMA_VERSION,
        ambiente: environment.code().to_string(),
        tipo_dte: DOCUMENT_TYPE_FACTURA.to_string(),
        numero_control: invoice.name.clone(),
        codigo_generacion: generation_code,
        tipo_modelo: MODEL_PRIOR,
        tipo_operacion: OPERATION_NORMAL,
        fec_emi: invoice.invoice_date.format("%Y-%m-%d").to_string(),
        hor_emi: local.format("%H:%M:%S").to_string(),
        tipo_moneda: CURRENCY.to_string(),
    }
}
