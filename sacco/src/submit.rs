//! Simulated transaction and loan submission. Requests are validated, given
//! a synthetic id and a processing delay, and then dropped: nothing is
//! persisted anywhere.

use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;

use crate::{
    error::{Error, Result},
    state::Portal,
};

const TRANSACTION_DELAY: Duration = Duration::from_secs(2);
const LOAN_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub member_id: String,
    pub amount: f64,
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct LoanRequest {
    pub member_id: String,
    pub amount: f64,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Completed,
    Pending,
}

#[derive(Debug, Clone)]
pub struct Receipt {
    pub id: String,
    pub status: SubmissionStatus,
    pub message: String,
}

impl Portal {
    pub async fn submit_transaction(&self, request: TransactionRequest) -> Result<Receipt> {
        validate_submission(&request.member_id, request.amount, &request.kind, "type")?;

        let id = format!("TXN{}", Utc::now().timestamp_millis());
        sleep(TRANSACTION_DELAY).await;

        Ok(Receipt {
            id,
            status: SubmissionStatus::Completed,
            message: "Transaction processed successfully".to_owned(),
        })
    }

    pub async fn submit_loan(&self, request: LoanRequest) -> Result<Receipt> {
        validate_submission(&request.member_id, request.amount, &request.category, "category")?;

        let id = format!("LN{}", Utc::now().timestamp_millis());
        sleep(LOAN_DELAY).await;

        Ok(Receipt {
            id,
            status: SubmissionStatus::Pending,
            message: "Loan application submitted successfully".to_owned(),
        })
    }
}

fn validate_submission(
    member_id: &str,
    amount: f64,
    kind: &str,
    kind_field: &'static str,
) -> Result<()> {
    if member_id.trim().is_empty() {
        return Err(Error::Validation {
            field: "memberId",
            message: "Member ID is required".to_owned(),
        });
    }
    if !(amount > 0.0) {
        return Err(Error::Validation {
            field: "amount",
            message: "Amount must be greater than zero".to_owned(),
        });
    }
    if kind.trim().is_empty() {
        return Err(Error::Validation {
            field: kind_field,
            message: "A category is required".to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::Config, storage::MemoryStorage};

    fn test_portal() -> Portal {
        let config = Config {
            data_url: "http://localhost:0/json".to_owned(),
            exchange_api_url: "http://localhost:0".to_owned(),
            exchange_api_key: String::new(),
            news_api_url: "http://localhost:0".to_owned(),
            news_api_key: String::new(),
        };
        Portal::new(config, Arc::new(MemoryStorage::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_transaction_receipt() {
        let portal = test_portal();
        let receipt = portal
            .submit_transaction(TransactionRequest {
                member_id: "M001".to_owned(),
                amount: 5_000.0,
                kind: "deposit".to_owned(),
            })
            .await
            .unwrap();

        assert!(receipt.id.starts_with("TXN"));
        assert_eq!(receipt.status, SubmissionStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loan_receipt() {
        let portal = test_portal();
        let receipt = portal
            .submit_loan(LoanRequest {
                member_id: "M001".to_owned(),
                amount: 150_000.0,
                category: "school-fees".to_owned(),
            })
            .await
            .unwrap();

        assert!(receipt.id.starts_with("LN"));
        assert_eq!(receipt.status, SubmissionStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_missing_fields() {
        let portal = test_portal();

        let err = portal
            .submit_transaction(TransactionRequest {
                member_id: String::new(),
                amount: 5_000.0,
                kind: "deposit".to_owned(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "memberId", .. }));

        let err = portal
            .submit_loan(LoanRequest {
                member_id: "M001".to_owned(),
                amount: 0.0,
                category: "school-fees".to_owned(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "amount", .. }));
    }
}
