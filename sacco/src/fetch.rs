//! Readers for the reference collections. Each document is an object with
//! one array field named after the collection; transport failures surface as
//! [`Error::Fetch`](crate::error::Error::Fetch), undecodable bodies as
//! [`Error::Parse`](crate::error::Error::Parse). Display callers that prefer
//! an empty widget over an error use the `*_or_empty` forms.

use serde::{de::DeserializeOwned, Deserialize};
use tracing::warn;

use crate::{
    error::Result,
    models::{Branch, Loan, Member, Notification, Transaction},
    state::Portal,
};

#[derive(Deserialize)]
struct MembersDoc {
    members: Vec<Member>,
}

#[derive(Deserialize)]
struct TransactionsDoc {
    transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
struct LoansDoc {
    loans: Vec<Loan>,
}

#[derive(Deserialize)]
struct NotificationsDoc {
    notifications: Vec<Notification>,
}

#[derive(Deserialize)]
struct BranchesDoc {
    branches: Vec<Branch>,
}

impl Portal {
    /// GET `{data_url}/{endpoint}.json` and decode the body.
    pub async fn fetch_document<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{endpoint}.json", self.config.data_url);
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn members(&self) -> Result<Vec<Member>> {
        Ok(self.fetch_document::<MembersDoc>("members").await?.members)
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self
            .fetch_document::<TransactionsDoc>("transactions")
            .await?
            .transactions)
    }

    pub async fn loans(&self) -> Result<Vec<Loan>> {
        Ok(self.fetch_document::<LoansDoc>("loans").await?.loans)
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        Ok(self
            .fetch_document::<NotificationsDoc>("notifications")
            .await?
            .notifications)
    }

    pub async fn branches(&self) -> Result<Vec<Branch>> {
        Ok(self.fetch_document::<BranchesDoc>("branches").await?.branches)
    }

    /// Lookup by id; unreachable or malformed data reads as "no such
    /// member".
    pub async fn member(&self, member_id: &str) -> Option<Member> {
        or_empty("members", self.members().await)
            .into_iter()
            .find(|m| m.member_id == member_id)
    }

    pub async fn members_or_empty(&self) -> Vec<Member> {
        or_empty("members", self.members().await)
    }

    pub async fn transactions_or_empty(&self) -> Vec<Transaction> {
        or_empty("transactions", self.transactions().await)
    }

    pub async fn loans_or_empty(&self) -> Vec<Loan> {
        or_empty("loans", self.loans().await)
    }

    pub async fn notifications_or_empty(&self) -> Vec<Notification> {
        or_empty("notifications", self.notifications().await)
    }

    pub async fn branches_or_empty(&self) -> Vec<Branch> {
        or_empty("branches", self.branches().await)
    }
}

pub(crate) fn or_empty<T>(what: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("{what} unavailable, substituting empty: {e}");
        Vec::new()
    })
}
