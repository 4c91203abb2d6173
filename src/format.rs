//! Abbreviated currency formatting for goal cards

use serde::{Deserialize, Serialize};

/// Magnitude thresholds and their suffixes, largest first
const UNITS: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];

/// How card values are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyStyle {
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Digits after the decimal mark
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

fn default_symbol() -> String { "R$".to_string() }
fn default_decimals() -> usize { 1 }
fn default_decimal_separator() -> char { ',' }

impl Default for CurrencyStyle {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimals: default_decimals(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

impl CurrencyStyle {
    fn number(&self, value: f64) -> String {
        let text = format!("{:.*}", self.decimals, value);
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}

/// `183600000` → `R$ 183,6M`; sign kept, non-finite values render as zero
pub fn format_abbreviated(value: f64, style: &CurrencyStyle) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let magnitude = value.abs();
    let factor = 10f64.powi(style.decimals as i32);
    let round = |v: f64| (v * factor).round() / factor;

    let mut scaled = round(magnitude);
    let mut suffix = "";
    for (i, &(threshold, unit)) in UNITS.iter().enumerate() {
        if magnitude >= threshold {
            scaled = round(magnitude / threshold);
            suffix = unit;
            // 999_960 at one decimal rounds to 1000.0K, promote to 1.0M
            if scaled >= 1000.0 && i > 0 {
                let (bigger, bigger_unit) = UNITS[i - 1];
                scaled = round(magnitude / bigger);
                suffix = bigger_unit;
            }
            break;
        }
    }
    // Below one thousand, rounding can still reach 1000
    if suffix.is_empty() && scaled >= 1000.0 {
        let (threshold, unit) = UNITS[2];
        scaled = round(magnitude / threshold);
        suffix = unit;
    }

    let sign = if value < 0.0 && scaled > 0.0 { "-" } else { "" };
    let number = style.number(scaled);
    if style.symbol.is_empty() {
        format!("{sign}{number}{suffix}")
    } else {
        format!("{sign}{} {number}{suffix}", style.symbol)
    }
}

/// `0.425` → `42,5%`
pub fn format_percent(ratio: f64, style: &CurrencyStyle) -> String {
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    format!("{}%", style.number(ratio * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> CurrencyStyle {
        CurrencyStyle {
            symbol: String::new(),
            decimals: 2,
            decimal_separator: '.',
        }
    }

    #[test]
    fn test_suffix_thresholds() {
        let style = CurrencyStyle::default();
        assert_eq!(format_abbreviated(183_600_000.0, &style), "R$ 183,6M");
        assert_eq!(format_abbreviated(1_250_000_000.0, &style), "R$ 1,3B");
        assert_eq!(format_abbreviated(15_000.0, &style), "R$ 15,0K");
        assert_eq!(format_abbreviated(999.0, &style), "R$ 999,0");
        assert_eq!(format_abbreviated(0.0, &style), "R$ 0,0");
    }

    #[test]
    fn test_negative_and_non_finite() {
        let style = plain();
        assert_eq!(format_abbreviated(-2_500_000.0, &style), "-2.50M");
        assert_eq!(format_abbreviated(f64::NAN, &style), "0.00");
        assert_eq!(format_abbreviated(-0.001, &style), "0.00");
    }

    #[test]
    fn test_rounding_promotes_unit() {
        let style = CurrencyStyle::default();
        assert_eq!(format_abbreviated(999_960.0, &style), "R$ 1,0M");
        assert_eq!(format_abbreviated(999.96, &style), "R$ 1,0K");
        // B is the largest unit and is never promoted
        assert_eq!(format_abbreviated(4_200_000_000_000.0, &style), "R$ 4200,0B");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(0.425, &CurrencyStyle::default()), "42,5%");
        assert_eq!(format_percent(1.0, &plain()), "100.00%");
    }

    #[test]
    fn test_style_from_json_defaults() {
        let style: CurrencyStyle = serde_json::from_str(r#"{"symbol": "US$"}"#).unwrap();
        assert_eq!(style.symbol, "US$");
        assert_eq!(style.decimals, 1);
        assert_eq!(style.decimal_separator, ',');
    }
}
