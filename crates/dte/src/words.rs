//! Spanish rendering of amounts for `totalLetras`.
//!
//! Format: integer part in uppercase words, then cents as `NN/100 USD`,
//! e.g. `226.00` → `DOSCIENTOS VEINTISEIS 00/100 USD`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const UNITS: [&str; 30] = [
    "CERO",
    "UNO",
    "DOS",
    "TRES",
    "CUATRO",
    "CINCO",
    "SEIS",
    "SIETE",
    "OCHO",
    "NUEVE",
    "DIEZ",
    "ONCE",
    "DOCE",
    "TRECE",
    "CATORCE",
    "QUINCE",
    "DIECISEIS",
    "DIECISIETE",
    "DIECIOCHO",
    "DIECINUEVE",
    "VEINTE",
    "VEINTIUNO",
    "VEINTIDOS",
    "VEINTITRES",
    "VEINTICUATRO",
    "VEINTICINCO",
    "VEINTISEIS",
    "VEINTISIETE",
    "VEINTIOCHO",
    "VEINTINUEVE",
];

const TENS: [&str; 10] = [
    "", "", "", "TREINTA", "CUARENTA", "CINCUENTA", "SESENTA", "SETENTA", "OCHENTA", "NOVENTA",
];

const HUNDREDS: [&str; 10] = [
    "",
    "CIENTO",
    "DOSCIENTOS",
    "TRESCIENTOS",
    "CUATROCIENTOS",
    "QUINIENTOS",
    "SEISCIENTOS",
    "SETECIENTOS",
    "OCHOCIENTOS",
    "NOVECIENTOS",
];

/// Spell out an amount in the DTE convention.
pub fn amount_in_words(amount: Decimal) -> String {
    let amount = amount.abs().round_dp(2);
    let whole = amount.trunc();
    let cents = ((amount - whole) * Decimal::ONE_HUNDRED).to_u64().unwrap_or(0);

    match whole.to_u64() {
        Some(n) => format!("{} {cents:02}/100 USD", spell(n)),
        // Beyond u64: nothing an invoice will carry, keep the digits.
        None => format!("{whole} {cents:02}/100 USD"),
    }
}

/// Spell out a non-negative integer in uppercase Spanish.
pub fn spell(n: u64) -> String {
    if n == 0 {
        return UNITS[0].to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut rest = n;

    for (scale, singular, plural) in [
        (1_000_000_000_000u64, "UN BILLON", "BILLONES"),
        (1_000_000, "UN MILLON", "MILLONES"),
    ] {
        let count = rest / scale;
        rest %= scale;
        match count {
            0 => {}
            1 => parts.push(singular.to_string()),
            _ => parts.push(format!("{} {plural}", apocope(spell(count)))),
        }
    }

    let thousands = rest / 1000;
    rest %= 1000;
    match thousands {
        0 => {}
        1 => parts.push("MIL".to_string()),
        _ => parts.push(format!("{} MIL", apocope(below_thousand(thousands)))),
    }

    if rest > 0 {
        parts.push(below_thousand(rest));
    }

    parts.join(" ")
}

fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    let hundreds = (n / 100) as usize;
    let rest = n % 100;

    if n == 100 {
        return "CIEN".to_string();
    }

    let tail = match rest {
        0 => None,
        1..=29 => Some(UNITS[rest as usize].to_string()),
        _ => {
            let tens = TENS[(rest / 10) as usize];
            match rest % 10 {
                0 => Some(tens.to_string()),
                u => Some(format!("{tens} Y {}", UNITS[u as usize])),
            }
        }
    };

    match (hundreds, tail) {
        (0, Some(t)) => t,
        (h, None) => HUNDREDS[h].to_string(),
        (h, Some(t)) => format!("{} {t}", HUNDREDS[h]),
    }
}

// "UNO" shortens to "UN" in front of MIL / MILLONES.
fn apocope(words: String) -> String {
    match words.strip_suffix("UNO") {
        Some(stem) => format!("{stem}UN"),
        None => words,
    }
}
