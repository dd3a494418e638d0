//! Turns the service's response into the values shown on the dashboard.

use serde::Serialize;

use crate::{
    Error,
    currency::{format_currency, format_value},
    timestamp::Timestamp,
    transaction::{RawBalance, RawTransaction, TransactionType, TransactionsResponse},
};

/// The part of a category shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayCategory {
    /// The category's display name.
    pub title: String,
}

/// A transaction with its value and date formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTransaction {
    /// The service's ID for the transaction.
    pub id: String,
    /// A short description of the transaction.
    pub title: String,
    /// The unformatted amount.
    pub value: f64,
    /// The amount signed by the transaction type, e.g. " 1.500,00" or
    /// "- 500,00".
    pub formatted_value: String,
    /// The creation date as "DD/MM/YYYY".
    pub formatted_date: String,
    /// Income or outcome.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category's display name.
    pub category: DisplayCategory,
    /// When the transaction was created, as received.
    #[serde(rename = "created_at")]
    pub created_at: Timestamp,
}

/// The account totals formatted as currency, e.g. "R$ 5.000,00".
///
/// The default value has empty strings, which is what the dashboard shows
/// before any data has loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayBalance {
    /// The sum of all incomes.
    pub income: String,
    /// The sum of all outcomes.
    pub outcome: String,
    /// Income minus outcome.
    pub total: String,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    /// The transactions in the order the service listed them.
    pub transactions: Vec<DisplayTransaction>,
    /// The account totals.
    pub balance: DisplayBalance,
}

/// Build the dashboard's view state from the service's response.
///
/// # Errors
/// Returns [Error::InvalidBalanceField] if one of the balance amounts is not
/// a number.
pub fn transform(response: TransactionsResponse) -> Result<ViewState, Error> {
    let balance = display_balance(&response.balance)?;
    let transactions = response
        .transactions
        .into_iter()
        .map(display_transaction)
        .collect();

    Ok(ViewState {
        transactions,
        balance,
    })
}

/// Format a transaction amount with a sign taken from `transaction_type`.
///
/// Incomes get a leading space, outcomes a leading "- ". The sign of `value`
/// itself is ignored.
pub fn format_signed_value(transaction_type: TransactionType, value: f64) -> String {
    match transaction_type {
        TransactionType::Income => format!(" {}", format_value(value)),
        TransactionType::Outcome => format!("- {}", format_value(value)),
    }
}

fn display_transaction(transaction: RawTransaction) -> DisplayTransaction {
    DisplayTransaction {
        formatted_value: format_signed_value(transaction.transaction_type, transaction.value),
        formatted_date: transaction.created_at.display_date(),
        id: transaction.id,
        title: transaction.title,
        value: transaction.value,
        transaction_type: transaction.transaction_type,
        category: DisplayCategory {
            title: transaction.category.title,
        },
        created_at: transaction.created_at,
    }
}

fn display_balance(balance: &RawBalance) -> Result<DisplayBalance, Error> {
    Ok(DisplayBalance {
        income: format_currency(balance.income.parse("income")?),
        outcome: format_currency(balance.outcome.parse("outcome")?),
        total: format_currency(balance.total.parse("total")?),
    })
}
