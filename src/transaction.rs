//! The transactions and balance records sent by the transactions service.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, timestamp::Timestamp};

/// Whether a transaction brings money in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    Outcome,
}

impl TransactionType {
    /// The name used on the wire, which is also used as a CSS class.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Outcome => "outcome",
        }
    }
}

/// The category a transaction was filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    /// The service's ID for the category.
    pub id: String,
    /// The category's display name.
    pub title: String,
}

/// A transaction exactly as the service sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// The service's ID for the transaction.
    pub id: String,
    /// A short description of the transaction.
    pub title: String,
    /// Income or outcome.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money, always non-negative. The sign comes from
    /// `transaction_type`.
    pub value: f64,
    /// The category the transaction belongs to.
    pub category: RawCategory,
    /// When the transaction was created.
    pub created_at: Timestamp,
}

/// The account totals as sent by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBalance {
    /// The sum of all incomes.
    pub income: BalanceField,
    /// The sum of all outcomes.
    pub outcome: BalanceField,
    /// Income minus outcome.
    pub total: BalanceField,
}

/// The body of `GET /transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    /// Every transaction, in the order the service listed them.
    pub transactions: Vec<RawTransaction>,
    /// The account totals.
    pub balance: RawBalance,
}

/// A balance amount encoded as a decimal string.
///
/// JSON numbers are accepted too and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BalanceField(String);

impl BalanceField {
    /// Wrap the textual form of a balance amount.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The amount as it was received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the amount to a number.
    ///
    /// `field` names the balance field for error reporting. Surrounding
    /// whitespace is ignored.
    ///
    /// # Errors
    /// Returns [Error::InvalidBalanceField] if the text is not a finite
    /// decimal number.
    pub fn parse(&self, field: &'static str) -> Result<f64, Error> {
        self.0
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| Error::InvalidBalanceField {
                field,
                value: self.0.clone(),
            })
    }
}

impl<'de> Deserialize<'de> for BalanceField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Encoded {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Encoded::deserialize(deserializer)? {
            Encoded::Text(text) => BalanceField(text),
            Encoded::Number(number) => BalanceField(number.to_string()),
        })
    }
}
