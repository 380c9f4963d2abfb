use serde::Serialize;

use super::partners::Currency;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TokenPackage {
    pub id: &'static str,
    pub tokens: i64,
    pub bonus_spins: i32,
    /// Minor units: stars for XTR, kopecks/cents for money.
    pub price: i64,
    pub currency: Currency,
}

pub static TOKEN_PACKAGES: &[TokenPackage] = &[
    TokenPackage { id: "stars_small", tokens: 100, bonus_spins: 1, price: 50, currency: Currency::Xtr },
    TokenPackage { id: "stars_medium", tokens: 550, bonus_spins: 3, price: 250, currency: Currency::Xtr },
    TokenPackage { id: "stars_large", tokens: 1200, bonus_spins: 8, price: 500, currency: Currency::Xtr },
    TokenPackage { id: "rub_small", tokens: 100, bonus_spins: 1, price: 9_900, currency: Currency::Rub },
    TokenPackage { id: "rub_medium", tokens: 550, bonus_spins: 3, price: 44_900, currency: Currency::Rub },
    TokenPackage { id: "rub_large", tokens: 1200, bonus_spins: 8, price: 89_900, currency: Currency::Rub },
    TokenPackage { id: "usd_small", tokens: 100, bonus_spins: 1, price: 199, currency: Currency::Usd },
    TokenPackage { id: "usd_medium", tokens: 550, bonus_spins: 3, price: 799, currency: Currency::Usd },
    TokenPackage { id: "usd_large", tokens: 1200, bonus_spins: 8, price: 1_499, currency: Currency::Usd },
];

pub fn find_package(id: &str) -> Option<&'static TokenPackage> {
    TOKEN_PACKAGES.iter().find(|package| package.id == id)
}
