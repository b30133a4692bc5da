#![allow(dead_code)]

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use dtesv_core::AggregateId;
use dtesv_dte::Environment;
use dtesv_infra::{DteConfig, HaciendaClient, HttpSigner, SubmissionClient};
use dtesv_invoicing::{DteDocument, DteDocumentId, Invoice, InvoiceId, InvoiceLine};
use dtesv_parties::{Company, ContactInfo, Partner, PartyId};

pub const TOKEN: &str = "mh-token-123";

/// One product line, 2 × 100.00, totals 200.00 + 26.00 = 226.00.
pub fn sample_invoice() -> Invoice {
    let mut company = Company::new(PartyId::new(AggregateId::new()), "Empresa Test FEL");
    company.vat = Some("06140000000000".to_string());

    let mut partner = Partner::new(PartyId::new(AggregateId::new()), "Cliente Test");
    partner.vat = Some("0000000000".to_string());
    partner.contact = ContactInfo {
        email: Some("cliente@test.com".to_string()),
        phone: Some("2222-2222".to_string()),
        street: Some("Calle Test 123".to_string()),
    };

    Invoice::new(
        InvoiceId::new(AggregateId::new()),
        "INV/2024/0001",
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        company,
        partner,
    )
    .with_line(
        InvoiceLine::product("Producto Test", Decimal::from(2), Decimal::from(100))
            .with_product_code("PROD001")
            .with_item_type(1),
    )
    .with_totals(Decimal::from(200), Decimal::from(26), Decimal::from(226))
}

pub fn draft_for(invoice: &Invoice) -> DteDocument {
    DteDocument::new(DteDocumentId::new(AggregateId::new()), invoice.id, 1)
}

/// Signer and reception both pointed at the mock server.
pub fn config(base_url: &str) -> DteConfig {
    DteConfig::new(Environment::Test)
        .with_signer_url(base_url)
        .with_signer_password("clave-privada")
        .with_mh_token(TOKEN)
        .with_reception_url(format!("{base_url}/fesv/recepciondte"))
        .with_sign_timeout(Duration::from_secs(5))
        .with_submit_timeout(Duration::from_secs(5))
}

pub fn client(config: DteConfig) -> SubmissionClient<HttpSigner, HaciendaClient> {
    dtesv_observability::init_with(dtesv_observability::LogFormat::Compact, "dtesv_infra=debug");
    SubmissionClient::new(config).unwrap()
}
