//! VAT constants and rounding helpers.

use rust_decimal::Decimal;

/// IVA rate (13%).
pub const VAT_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// Multiplier turning a tax-exclusive amount into a tax-inclusive one.
pub const VAT_FACTOR: Decimal = Decimal::from_parts(113, 0, 0, false, 2);

/// Decimal places for unit prices and per-item amounts.
pub const UNIT_DP: u32 = 4;

/// Decimal places for monetary totals.
pub const TOTAL_DP: u32 = 2;

/// Round half-to-even and pin the scale, so `113` renders as `113.0000`.
pub fn round(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp(dp);
    rounded.rescale(dp);
    rounded
}

pub fn with_vat(amount: Decimal) -> Decimal {
    amount * VAT_FACTOR
}

pub fn vat_of(amount: Decimal) -> Decimal {
    amount * VAT_RATE
}

/// Strip VAT from a tax-inclusive amount.
pub fn without_vat(amount: Decimal) -> Decimal {
    amount / VAT_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_pins_scale() {
        let value = round(with_vat(Decimal::from(100)), UNIT_DP);
        assert_eq!(value.to_string(), "113.0000");
        assert_eq!(round(Decimal::from(26), TOTAL_DP).to_string(), "26.00");
    }

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(round(Decimal::new(125, 3), TOTAL_DP), Decimal::new(12, 2));
        assert_eq!(round(Decimal::new(135, 3), TOTAL_DP), Decimal::new(14, 2));
    }

    #[test]
    fn without_vat_inverts_with_vat() {
        let gross = with_vat(Decimal::new(5000, 2));
        assert_eq!(round(without_vat(gross), TOTAL_DP), Decimal::new(5000, 2));
    }
}
