use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::users::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Telegram Stars.
    Xtr,
    Rub,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Xtr => "XTR",
            Currency::Rub => "RUB",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "XTR" | "STARS" => Ok(Currency::Xtr),
            "RUB" => Ok(Currency::Rub),
            "USD" => Ok(Currency::Usd),
            other => Err(anyhow::anyhow!("Unsupported currency: {}", other)),
        }
    }
}

/// Which partner balance a commission lands in, and by how much.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartnerCredit {
    Stars(i64),
    /// Major units of the primary money currency (RUB).
    Money(f64),
}

/// `floor(amount * percent / 100)`, zero for non-positive inputs.
pub fn commission(amount: i64, percent: i32) -> i64 {
    if amount <= 0 || percent <= 0 {
        return 0;
    }

    amount.saturating_mul(percent as i64) / 100
}

/// Converts a bonus in the payment's minor units into the partner bucket.
pub fn partner_credit(bonus: i64, currency: Currency, usd_to_rub_rate: f64) -> PartnerCredit {
    match currency {
        Currency::Xtr => PartnerCredit::Stars(bonus),
        Currency::Rub => PartnerCredit::Money(bonus as f64 / 100.0),
        Currency::Usd => PartnerCredit::Money(bonus as f64 * usd_to_rub_rate / 100.0),
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PartnerTransaction {
    pub payment_id: String,
    pub partner_id: UserId,
    pub source_user_id: UserId,
    pub amount: i64,
    pub currency: Currency,
    pub bonus_amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_floors() {
        assert_eq!(commission(1000, 10), 100);
        assert_eq!(commission(999, 10), 99);
        assert_eq!(commission(7, 15), 1);
        assert_eq!(commission(6, 15), 0);
    }

    #[test]
    fn commission_is_zero_without_percent_or_amount() {
        assert_eq!(commission(1000, 0), 0);
        assert_eq!(commission(1000, -5), 0);
        assert_eq!(commission(0, 10), 0);
    }

    #[test]
    fn stars_are_credited_one_to_one() {
        assert_eq!(partner_credit(150, Currency::Xtr, 90.0), PartnerCredit::Stars(150));
    }

    #[test]
    fn money_is_credited_in_major_units() {
        assert_eq!(partner_credit(2550, Currency::Rub, 90.0), PartnerCredit::Money(25.5));
        assert_eq!(partner_credit(200, Currency::Usd, 90.0), PartnerCredit::Money(180.0));
    }

    #[test]
    fn currency_parses_case_insensitively() {
        assert_eq!("xtr".parse::<Currency>().unwrap(), Currency::Xtr);
        assert_eq!(" usd ".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("RUB".parse::<Currency>().unwrap(), Currency::Rub);
        assert!("EUR".parse::<Currency>().is_err());
    }
}
