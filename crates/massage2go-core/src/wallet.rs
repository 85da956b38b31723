//! Stored payment methods and card entry.
//!
//! Nothing here talks to a payment provider. Cards live in memory for as
//! long as the wallet does; only the last four digits are kept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Eft,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Card,
        PaymentMethod::Eft,
        PaymentMethod::Cash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Eft => "eft",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Eft => "EFT Transfer",
            PaymentMethod::Cash => "Cash on Arrival",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "payment method",
                message: format!("unknown payment method '{s}' (expected card, eft or cash)"),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
}

impl CardBrand {
    /// Cards starting with `4` are Visa, everything else Mastercard.
    pub fn detect(number: &str) -> Self {
        if number.trim_start().starts_with('4') {
            CardBrand::Visa
        } else {
            CardBrand::Mastercard
        }
    }
}

/// Raw card form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    /// `MM/YY`
    pub expiry: String,
    pub cvv: String,
    pub holder: String,
}

impl CardDetails {
    pub fn digits(&self) -> String {
        self.number.chars().filter(char::is_ascii_digit).collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.number.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "Card number" });
        }
        if self.expiry.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "Expiry date" });
        }
        if self.cvv.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "CVV" });
        }
        if self.holder.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "Cardholder name" });
        }

        if self.digits().len() != 16 {
            return Err(ValidationError::InvalidValue {
                field: "card number",
                message: "Card number must be 16 digits".into(),
            });
        }
        if !valid_expiry(self.expiry.trim()) {
            return Err(ValidationError::InvalidValue {
                field: "expiry",
                message: "Expiry must be in MM/YY format".into(),
            });
        }
        let cvv = self.cvv.trim();
        if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidValue {
                field: "cvv",
                message: "CVV must be 3 or 4 digits".into(),
            });
        }
        Ok(())
    }

    /// `•••• •••• •••• 1234`
    pub fn masked(&self) -> String {
        mask_last4(&last4(&self.digits()))
    }
}

fn valid_expiry(expiry: &str) -> bool {
    let Some((mm, yy)) = expiry.split_once('/') else {
        return false;
    };
    let month_ok = mm.len() == 2 && matches!(mm.parse::<u8>(), Ok(1..=12));
    let year_ok = yy.len() == 2 && yy.chars().all(|c| c.is_ascii_digit());
    month_ok && year_ok
}

fn last4(digits: &str) -> String {
    let start = digits.len().saturating_sub(4);
    digits[start..].to_string()
}

fn mask_last4(last4: &str) -> String {
    format!("•••• •••• •••• {last4}")
}

/// Group digits in fours as they are typed. Non-digits are dropped and
/// input is cut at 16 digits.
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).take(16).collect();
    digits
        .chunks(4)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1225` -> `12/25`
pub fn format_expiry(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub id: String,
    #[serde(rename = "type")]
    pub brand: CardBrand,
    pub last4: String,
    pub expiry: String,
    pub is_default: bool,
    pub card_holder: String,
}

impl SavedCard {
    pub fn masked(&self) -> String {
        mask_last4(&self.last4)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wallet {
    cards: Vec<SavedCard>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two cards every account starts with.
    pub fn sample() -> Self {
        Self {
            cards: vec![
                SavedCard {
                    id: "card-1".into(),
                    brand: CardBrand::Visa,
                    last4: "4242".into(),
                    expiry: "12/25".into(),
                    is_default: true,
                    card_holder: "John Doe".into(),
                },
                SavedCard {
                    id: "card-2".into(),
                    brand: CardBrand::Mastercard,
                    last4: "8888".into(),
                    expiry: "08/24".into(),
                    is_default: false,
                    card_holder: "John Doe".into(),
                },
            ],
        }
    }

    pub fn cards(&self) -> &[SavedCard] {
        &self.cards
    }

    pub fn default_card(&self) -> Option<&SavedCard> {
        self.cards.iter().find(|c| c.is_default)
    }

    /// Validate and store a card. The first card is always the default.
    pub fn add(
        &mut self,
        id: impl Into<String>,
        details: &CardDetails,
        make_default: bool,
    ) -> Result<&SavedCard, ValidationError> {
        details.validate()?;
        let is_default = make_default || self.cards.is_empty();
        if is_default {
            for card in &mut self.cards {
                card.is_default = false;
            }
        }
        let digits = details.digits();
        self.cards.push(SavedCard {
            id: id.into(),
            brand: CardBrand::detect(&digits),
            last4: last4(&digits),
            expiry: details.expiry.trim().to_string(),
            is_default,
            card_holder: details.holder.trim().to_string(),
        });
        Ok(&self.cards[self.cards.len() - 1])
    }

    /// Returns false when no card has this id.
    pub fn set_default(&mut self, id: &str) -> bool {
        if !self.cards.iter().any(|c| c.id == id) {
            return false;
        }
        for card in &mut self.cards {
            card.is_default = card.id == id;
        }
        true
    }

    /// The default card can only be removed when it is the last one.
    pub fn remove(&mut self, id: &str) -> Result<Option<SavedCard>, ValidationError> {
        let Some(pos) = self.cards.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        if self.cards[pos].is_default && self.cards.len() > 1 {
            return Err(ValidationError::InvalidValue {
                field: "card",
                message: "Please set another card as default before deleting this one.".into(),
            });
        }
        Ok(Some(self.cards.remove(pos)))
    }
}
