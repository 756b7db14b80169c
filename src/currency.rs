//! Currency codes, display-selection parsing, symbols and formatting
//!
//! All persisted monetary amounts in Stockpile are denominated in a single
//! fixed storage currency ([`BASE_CURRENCY`]). Users pick a display currency
//! as a combined `"CODE - Human Name"` string; this module extracts the code
//! from that selection and renders amounts for display.

/// The storage currency: every persisted amount is denominated in it.
/// Never changes at runtime.
pub const BASE_CURRENCY: &str = "NGN";

/// Separator between code and label in a display-currency selection
/// (e.g. `"USD - US Dollar"`).
const SELECTION_SEPARATOR: &str = " - ";

/// Extract the 3-letter currency code from a display-currency selection.
///
/// Takes the text before the first `" - "`, trimmed. Anything that is not
/// exactly three ASCII letters falls back to [`BASE_CURRENCY`]: an
/// unparsable selection must never fail, it just means "storage currency".
///
/// # Example
/// ```
/// use stockpile::currency::extract_code;
///
/// assert_eq!(extract_code("USD - US Dollar"), "USD");
/// assert_eq!(extract_code("eur - Euro"), "EUR");
/// assert_eq!(extract_code(""), "NGN");
/// assert_eq!(extract_code("garbage"), "NGN");
/// ```
pub fn extract_code(selection: &str) -> String {
    let head = selection
        .split(SELECTION_SEPARATOR)
        .next()
        .unwrap_or("")
        .trim();

    if head.len() == 3 && head.chars().all(|c| c.is_ascii_alphabetic()) {
        head.to_ascii_uppercase()
    } else {
        BASE_CURRENCY.to_string()
    }
}

/// Resolve the display symbol for a currency code.
///
/// Static table for determinism across platforms; no locale data involved.
/// Unknown codes render as the code itself.
pub fn symbol(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "¥",
        "INR" => "₹",
        "NGN" => "₦",
        "CAD" => "C$",
        "AUD" => "A$",
        "CHF" => "CHF",
        "NZD" => "NZ$",
        "ZAR" => "R",
        "KRW" => "₩",
        "BRL" => "R$",
        "MXN" => "Mex$",
        "RUB" => "₽",
        "SGD" => "S$",
        "HKD" => "HK$",
        "SEK" => "kr",
        "NOK" => "kr",
        "DKK" => "kr",
        "PLN" => "zł",
        "THB" => "฿",
        "IDR" => "Rp",
        "MYR" => "RM",
        "PHP" => "₱",
        "TRY" => "₺",
        "AED" => "د.إ",
        "SAR" => "﷼",
        "EGP" => "£",
        _ => code,
    }
}

/// Format an amount for display in the given currency.
///
/// Exactly two decimal places, a grouping comma every three integer digits,
/// symbol prefix: `format_amount(1234.5, "USD")` is `"$1,234.50"`.
///
/// Presentation only — never feed the output back into conversion or
/// persistence.
pub fn format_amount(amount: f64, code: &str) -> String {
    format!("{}{}", symbol(code), group_thousands(amount))
}

/// Render with two decimals and comma-grouped integer digits.
fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (number, decimals) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, frac),
        None => (fixed.as_str(), "00"),
    };
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}.{}", sign, grouped, decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_code_basic() {
        assert_eq!(extract_code("USD - US Dollar"), "USD");
        assert_eq!(extract_code("NGN - Nigerian Naira"), "NGN");
        assert_eq!(extract_code("XXX - Unknown Currency"), "XXX");
    }

    #[test]
    fn test_extract_code_bare_code() {
        // A bare 3-letter code without a label is still a valid selection
        assert_eq!(extract_code("USD"), "USD");
        assert_eq!(extract_code("usd"), "USD");
        assert_eq!(extract_code("  GBP  "), "GBP");
    }

    #[test]
    fn test_extract_code_falls_back_to_base() {
        assert_eq!(extract_code(""), BASE_CURRENCY);
        assert_eq!(extract_code("garbage"), BASE_CURRENCY);
        assert_eq!(extract_code(" - no code"), BASE_CURRENCY);
        assert_eq!(extract_code("12$ - Not A Currency"), BASE_CURRENCY);
    }

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(symbol("USD"), "$");
        assert_eq!(symbol("NGN"), "₦");
        assert_eq!(symbol("EUR"), "€");
        // Unknown codes fall back to the code itself
        assert_eq!(symbol("XYZ"), "XYZ");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_amount(0.0, "NGN"), "₦0.00");
        assert_eq!(format_amount(999.999, "EUR"), "€1,000.00");
        assert_eq!(format_amount(1234567.891, "NGN"), "₦1,234,567.89");
    }

    #[test]
    fn test_format_amount_small_and_unknown() {
        assert_eq!(format_amount(42.0, "XYZ"), "XYZ42.00");
        assert_eq!(format_amount(7.5, "USD"), "$7.50");
        assert_eq!(format_amount(100.0, "USD"), "$100.00");
    }
}
