use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dtesv_core::AggregateId;
use dtesv_parties::{Company, Partner};

/// Invoice identifier (host record id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub AggregateId);

impl InvoiceId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What an invoice line represents.
///
/// Only `Product` lines are billable; sections and notes are layout rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    #[default]
    Product,
    #[serde(rename = "line_section")]
    Section,
    #[serde(rename = "line_note")]
    Note,
}

/// Invoice line as recorded by the host (never mutated here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    #[serde(default)]
    pub kind: LineKind,
    /// Product internal reference.
    #[serde(default)]
    pub product_code: Option<String>,
    /// DTE item type of the product (1 = goods, 2 = services, ...).
    #[serde(default)]
    pub item_type: Option<u8>,
    pub description: String,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    /// Discount percentage (0..=100).
    #[serde(default)]
    pub discount: Decimal,
    /// Tax-exclusive line amount after discount, as computed by the host.
    pub price_subtotal: Decimal,
    /// Whether `price_unit` already includes VAT.
    #[serde(default)]
    pub tax_included: bool,
}

impl InvoiceLine {
    /// Billable product line; the subtotal is `quantity * price_unit`.
    pub fn product(description: impl Into<String>, quantity: Decimal, price_unit: Decimal) -> Self {
        Self {
            kind: LineKind::Product,
            product_code: None,
            item_type: None,
            description: description.into(),
            quantity,
            price_unit,
            discount: Decimal::ZERO,
            price_subtotal: quantity * price_unit,
            tax_included: false,
        }
    }

    pub fn section(title: impl Into<String>) -> Self {
        Self::layout(LineKind::Section, title)
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self::layout(LineKind::Note, text)
    }

    fn layout(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            product_code: None,
            item_type: None,
            description: text.into(),
            quantity: Decimal::ZERO,
            price_unit: Decimal::ZERO,
            discount: Decimal::ZERO,
            price_subtotal: Decimal::ZERO,
            tax_included: false,
        }
    }

    pub fn with_product_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }

    pub fn with_item_type(mut self, item_type: u8) -> Self {
        self.item_type = Some(item_type);
        self
    }

    /// Apply a discount percentage, recomputing the subtotal the way the host does.
    pub fn with_discount(mut self, percent: Decimal) -> Self {
        self.discount = percent;
        self.price_subtotal =
            self.quantity * self.price_unit * (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED;
        self
    }

    pub fn is_billable(&self) -> bool {
        self.kind == LineKind::Product
    }
}

/// Invoice snapshot handed over by the host ERP when a DTE is generated.
///
/// Totals are taken as recorded; nothing here recomputes taxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Invoice number, used as the DTE control number.
    pub name: String,
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub narration: Option<String>,
    pub amount_untaxed: Decimal,
    pub amount_tax: Decimal,
    pub amount_total: Decimal,
    /// Total spelled out by the host, if it has one.
    #[serde(default)]
    pub amount_in_words: Option<String>,
    pub company: Company,
    pub partner: Partner,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
    /// Whether the invoice's journal emits electronic documents.
    #[serde(default)]
    pub dte_enabled: bool,
}

impl Invoice {
    pub fn new(
        id: InvoiceId,
        name: impl Into<String>,
        invoice_date: NaiveDate,
        company: Company,
        partner: Partner,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            invoice_date,
            payment_reference: None,
            narration: None,
            amount_untaxed: Decimal::ZERO,
            amount_tax: Decimal::ZERO,
            amount_total: Decimal::ZERO,
            amount_in_words: None,
            company,
            partner,
            lines: Vec::new(),
            dte_enabled: true,
        }
    }

    pub fn with_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Set the recorded totals (untaxed, tax, total).
    pub fn with_totals(mut self, untaxed: Decimal, tax: Decimal, total: Decimal) -> Self {
        self.amount_untaxed = untaxed;
        self.amount_tax = tax;
        self.amount_total = total;
        self
    }

    pub fn billable_lines(&self) -> impl Iterator<Item = &InvoiceLine> + '_ {
        self.lines.iter().filter(|l| l.is_billable())
    }

    /// Reference shown to the customer; falls back to the invoice number.
    pub fn internal_reference(&self) -> &str {
        self.payment_reference
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.name)
    }
}
