use rust_decimal::Decimal;

use dtesv_invoicing::Invoice;

use crate::schema::Summary;
use crate::tax::{self, TOTAL_DP};
use crate::words;

/// `condicionOperacion` 1: cash sale.
pub const CONDITION_CASH: u8 = 1;

/// `resumen` block.
///
/// `totalPagar` is the invoice total as recorded by the host, not the sum of
/// the rounded item totals.
pub fn build_summary(invoice: &Invoice) -> Summary {
    let total_gravada = tax::round(tax::with_vat(invoice.amount_untaxed), TOTAL_DP);
    let total_iva = tax::round(invoice.amount_tax, TOTAL_DP);
    let total_letras = invoice
        .amount_in_words
        .clone()
        .filter(|w| !w.trim().is_empty())
        .unwrap_or_else(|| words::amount_in_words(invoice.amount_total));

    Summary {
        total_no_suj: Decimal::ZERO,
        total_exenta: Decimal::ZERO,
        total_gravada,
        sub_total_ventas: total_gravada,
        descu_no_suj: Decimal::ZERO,
        descu_exenta: Decimal::ZERO,
        descu_gravada: Decimal::ZERO,
        porcentaje_descuento: Decimal::ZERO,
        total_descu: Decimal::ZERO,
        tributos: None,
        sub_total: total_gravada,
        iva_rete1: Decimal::ZERO,
        rete_renta: Decimal::ZERO,
        monto_total_operacion: total_gravada,
        total_no_gravado: Decimal::ZERO,
        total_pagar: invoice.amount_total,
        total_letras,
        total_iva,
        saldo_favor: Decimal::ZERO,
        condicion_operacion: CONDITION_CASH,
        pagos: None,
        num_pago_electronico: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::tests::sample_invoice;

    #[test]
    fn totals_follow_recorded_amounts() {
        let invoice = sample_invoice();
        let summary = build_summary(&invoice);

        assert_eq!(summary.total_gravada.to_string(), "226.00");
        assert_eq!(summary.sub_total_ventas, summary.total_gravada);
        assert_eq!(summary.monto_total_operacion, summary.total_gravada);
        assert_eq!(summary.total_iva, Decimal::from(26));
        assert_eq!(summary.total_pagar, invoice.amount_total);
        assert_eq!(summary.total_letras, "DOSCIENTOS VEINTISEIS 00/100 USD");
    }

    #[test]
    fn unmodelled_categories_are_zero() {
        let summary = build_summary(&sample_invoice());

        assert_eq!(summary.total_no_suj, Decimal::ZERO);
        assert_eq!(summary.total_exenta, Decimal::ZERO);
        assert_eq!(summary.total_descu, Decimal::ZERO);
        assert_eq!(summary.condicion_operacion, 1);
        assert!(summary.pagos.is_none());
    }

    #[test]
    fn payable_total_is_not_recomputed() {
        let mut invoice = sample_invoice();
        invoice.amount_total = Decimal::new(22601, 2);

        let summary = build_summary(&invoice);
        assert_eq!(summary.total_pagar, Decimal::new(22601, 2));
        assert_eq!(summary.total_gravada, Decimal::new(22600, 2));
    }

    #[test]
    fn recorded_amount_in_words_wins() {
        let mut invoice = sample_invoice();
        invoice.amount_in_words = Some("Doscientos veintiséis dólares".to_string());

        let summary = build_summary(&invoice);
        assert_eq!(summary.total_letras, "Doscientos veintiséis dólares");
    }
}
