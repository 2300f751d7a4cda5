//! Domain records as they appear on the wire. Field names follow the JSON
//! documents (camelCase); timestamps are ISO-8601.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub member_id: String,
    pub name: String,
    pub email: String,
    // Stored in the clear, matching the seed data. A documented weakness of
    // the demo dataset, not something to build on.
    pub password: String,
    pub balance: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Member {
    pub fn membership_level(&self) -> MembershipLevel {
        MembershipLevel::for_deposit(self.balance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl MembershipLevel {
    pub fn for_deposit(deposit: f64) -> Self {
        if deposit >= 1_000_000.0 {
            Self::Platinum
        } else if deposit >= 500_000.0 {
            Self::Gold
        } else if deposit >= 100_000.0 {
            Self::Silver
        } else {
            Self::Bronze
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub member_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Deposits display positive, everything else negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            _ => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub member_id: String,
    pub amount: f64,
    pub status: LoanStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Approved,
    Pending,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_id: String,
    pub member_id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub date: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub date: DateTime<Utc>,
}
