//! The transaction record and the types it is built from.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, transaction::Amount};

/// The ID the data store assigns to a transaction.
pub type TransactionId = i64;

time::serde::format_description!(date_format, Date, "[year]-[month]-[day]");

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received, e.g. a salary.
    Income,
    /// Money spent, e.g. a meal.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in URLs, forms and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The Thai label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "รายรับ",
            TransactionType::Expense => "รายจ่าย",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::Store(format!("unknown transaction type \"{other}\""))),
        }
    }
}

/// An income or expense event recorded by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The account the money went into or came out of, e.g. "กรุงไทย".
    #[serde(default)]
    pub account: String,
    /// The day the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// A label grouping similar transactions, e.g. "ค่าอาหาร".
    pub category: String,
    /// How much money changed hands.
    pub amount: Amount,
    /// A free-text note written by the user.
    #[serde(default)]
    pub note: Option<String>,
    /// A longer description, preferred over the category in short lists.
    #[serde(default)]
    pub description: Option<String>,
    /// When the data store created the record.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl Transaction {
    /// The text to show for the transaction in a one-line list.
    pub fn title(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => &self.category,
        }
    }

    /// The note, if the user wrote one.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.is_empty())
    }
}

/// The data for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The account the money went into or came out of.
    pub account: String,
    /// The day the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// A label grouping similar transactions.
    pub category: String,
    /// How much money changed hands.
    pub amount: Amount,
    /// A free-text note written by the user.
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::{Amount, Transaction, TransactionType};

    #[test]
    fn deserializes_row_from_rest_api() {
        let json = r#"{
            "id": 7,
            "user_id": "1f0c2b3a-0000-4000-8000-000000000000",
            "type": "expense",
            "account": "กสิกร",
            "date": "2024-01-02",
            "category": "ค่าอาหาร",
            "amount": 150.5,
            "note": null,
            "created_at": "2024-01-02T08:30:00.123456+00:00"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.id, 7);
        assert_eq!(transaction.kind, TransactionType::Expense);
        assert_eq!(transaction.date, date!(2024 - 01 - 02));
        assert_eq!(transaction.amount, Amount::from_satang(15_050).unwrap());
        assert_eq!(transaction.note, None);
        assert_eq!(transaction.description, None);
        assert!(transaction.created_at.is_some());
    }

    #[test]
    fn rejects_unknown_type() {
        let json = r#"{"id":1,"type":"transfer","account":"","date":"2024-01-01",
            "category":"x","amount":1}"#;

        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn title_prefers_description_over_category() {
        let mut transaction = Transaction {
            id: 1,
            kind: TransactionType::Income,
            account: "เงินสด".to_owned(),
            date: date!(2024 - 01 - 01),
            category: "เงินเดือน".to_owned(),
            amount: Amount::from_baht(500),
            note: None,
            description: None,
            created_at: None,
        };

        assert_eq!(transaction.title(), "เงินเดือน");

        transaction.description = Some("โบนัส".to_owned());
        assert_eq!(transaction.title(), "โบนัส");

        transaction.description = Some(String::new());
        assert_eq!(transaction.title(), "เงินเดือน");
    }
}
