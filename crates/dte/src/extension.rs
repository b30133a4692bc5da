use dtesv_invoicing::Invoice;

use crate::schema::{AppendixEntry, Extension};
use crate::text::{self, OBSERVATIONS_MAX};

/// `extension` block. Only observations are filled in.
pub fn build_extension(invoice: &Invoice) -> Extension {
    Extension {
        nomb_entrega: None,
        docu_entrega: None,
        nomb_recibe: None,
        docu_recibe: None,
        observaciones: text::truncate_opt(
            invoice.narration.as_deref().filter(|n| !n.is_empty()),
            OBSERVATIONS_MAX,
        ),
        placa_vehiculo: None,
    }
}

/// `apendice` block: the internal payment reference.
pub fn build_appendix(invoice: &Invoice) -> Vec<AppendixEntry> {
    vec![AppendixEntry {
        campo: "numeroInterno".to_string(),
        etiqueta: "Número Interno".to_string(),
        valor: invoice.internal_reference().to_string(),
    }]
}
