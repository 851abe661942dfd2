use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display currencies offered by the showcase. Prices are stored in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Inr,
    Kwd,
    Rub,
}

impl Currency {
    pub const fn ordered() -> [Self; 4] {
        [Self::Usd, Self::Inr, Self::Kwd, Self::Rub]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Inr => "INR",
            Self::Kwd => "KWD",
            Self::Rub => "RUB",
        }
    }

    /// Fixed conversion rate from USD.
    pub const fn rate(self) -> f64 {
        match self {
            Self::Usd => 1.0,
            Self::Inr => 83.5,
            Self::Kwd => 0.31,
            Self::Rub => 91.2,
        }
    }

    pub fn convert(self, price_usd: u64) -> f64 {
        price_usd as f64 * self.rate()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency '{0}', expected one of usd, inr, kwd, rub")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Self::Usd),
            "inr" => Ok(Self::Inr),
            "kwd" => Ok(Self::Kwd),
            "rub" => Ok(Self::Rub),
            _ => Err(UnknownCurrency(raw.to_string())),
        }
    }
}

/// Convert a USD price and render it the way each market expects.
pub fn format_price(price_usd: u64, currency: Currency) -> String {
    let converted = currency.convert(price_usd);
    match currency {
        Currency::Usd => format!("${}", group_thousands(converted.round() as u64, ',')),
        Currency::Inr => format!("₹{}", group_indian(converted.round() as u64)),
        Currency::Kwd => {
            let fils = (converted * 1000.0).round() as u64;
            format!(
                "KWD {}.{:03}",
                group_thousands(fils / 1000, ','),
                fils % 1000
            )
        }
        Currency::Rub => format!(
            "{} ₽",
            group_thousands(converted.round() as u64, '\u{a0}')
        ),
    }
}

/// Western grouping: 1,234,567.
pub fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Indian grouping: last three digits, then pairs (12,34,567).
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::new();
    for (index, digit) in head.chars().enumerate() {
        if index > 0 && (head.len() - index) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push(',');
    grouped.push_str(tail);
    grouped
}
