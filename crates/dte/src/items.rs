use rust_decimal::Decimal;

use dtesv_invoicing::{Invoice, InvoiceLine};

use crate::schema::DteItem;
use crate::tax::{self, TOTAL_DP, UNIT_DP};
use crate::text::{self, CODE_MAX, DESCRIPTION_MAX};

/// `uniMedida` 59: unit.
pub const UNIT_OF_MEASURE: u16 = 59;
/// `tipoItem` used when the product does not say (1 = goods).
pub const DEFAULT_ITEM_TYPE: u8 = 1;

/// `cuerpoDocumento` items, one per billable line, numbered from 1.
///
/// Lazy: nothing is computed until iterated. Call again to restart.
pub fn build_line_items(invoice: &Invoice) -> impl Iterator<Item = DteItem> + '_ {
    invoice
        .billable_lines()
        .zip(1u32..)
        .map(|(line, num_item)| build_item(num_item, line))
}

fn build_item(num_item: u32, line: &InvoiceLine) -> DteItem {
    let unit_price = if line.tax_included {
        tax::without_vat(line.price_unit)
    } else {
        line.price_unit
    };

    let precio_uni = tax::round(tax::with_vat(unit_price), UNIT_DP);
    let venta_gravada = tax::round(tax::with_vat(line.price_subtotal), TOTAL_DP);
    let monto_descu = tax::round(
        precio_uni * line.quantity * line.discount / Decimal::ONE_HUNDRED,
        UNIT_DP,
    );
    let iva_item = tax::round(tax::vat_of(line.price_subtotal), UNIT_DP);

    DteItem {
        num_item,
        tipo_item: line.item_type.unwrap_or(DEFAULT_ITEM_TYPE),
        numero_documento: None,
        cantidad: line.quantity,
        codigo: text::truncate_opt(
            line.product_code.as_deref().filter(|c| !c.is_empty()),
            CODE_MAX,
        ),
        cod_tributo: None,
        uni_medida: UNIT_OF_MEASURE,
        descripcion: text::truncate(&line.description, DESCRIPTION_MAX),
        precio_uni,
        monto_descu,
        venta_no_suj: Decimal::ZERO,
        venta_exenta: Decimal::ZERO,
        venta_gravada,
        tributos: None,
        psv: line.price_unit,
        no_gravado: Decimal::ZERO,
        iva_item,
    }
}
