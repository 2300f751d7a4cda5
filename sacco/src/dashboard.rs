//! The member dashboard's data pulls: member-scoped reads, the account
//! summary derivation, and the joint five-way snapshot.

use crate::{
    error::{Error, Result},
    models::{Branch, ExchangeRate, Loan, LoanStatus, Member, Notification, Transaction},
    state::Portal,
};

/// Everything the dashboard renders, fetched behind one barrier.
#[derive(Debug)]
pub struct DashboardData {
    pub summary: AccountSummary,
    pub transactions: Vec<Transaction>,
    pub loans: Vec<Loan>,
    pub notifications: Vec<Notification>,
    pub branches: Vec<Branch>,
    pub rates: Vec<ExchangeRate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub total_balance: f64,
    pub savings: f64,
    pub loan_balance: f64,
}

impl AccountSummary {
    /// Savings are the balance net of approved loans, floored at zero;
    /// pending or rejected loans do not count.
    pub fn derive(member: &Member, loans: &[Loan]) -> Self {
        let loan_balance: f64 = loans
            .iter()
            .filter(|l| l.status == LoanStatus::Approved)
            .map(|l| l.amount)
            .sum();

        Self {
            total_balance: member.balance,
            savings: (member.balance - loan_balance).max(0.0),
            loan_balance,
        }
    }
}

impl Portal {
    /// The member's transactions, newest first.
    pub async fn member_transactions(&self, member_id: &str) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .transactions()
            .await?
            .into_iter()
            .filter(|t| t.member_id == member_id)
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    pub async fn member_loans(&self, member_id: &str) -> Result<Vec<Loan>> {
        Ok(self
            .loans()
            .await?
            .into_iter()
            .filter(|l| l.member_id == member_id)
            .collect())
    }

    /// The member's notifications, newest first.
    pub async fn member_notifications(&self, member_id: &str) -> Result<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .notifications()
            .await?
            .into_iter()
            .filter(|n| n.member_id == member_id)
            .collect();
        notifications.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(notifications)
    }

    /// Five concurrent reads joined behind one barrier; a failure in any of
    /// them aborts the whole snapshot rather than rendering partially. The
    /// rate pull carries its own fallback and so cannot abort the join.
    pub async fn dashboard(&self, member: &Member) -> Result<DashboardData> {
        let (transactions, loans, notifications, branches, rates) = tokio::try_join!(
            self.member_transactions(&member.member_id),
            self.member_loans(&member.member_id),
            self.member_notifications(&member.member_id),
            self.branches(),
            async { Ok::<_, Error>(self.exchange_rates().await) },
        )?;

        let summary = AccountSummary::derive(member, &loans);

        Ok(DashboardData {
            summary,
            transactions,
            loans,
            notifications,
            branches,
            rates,
        })
    }

    /// Flips `read` on the in-memory copy and returns it; the reference
    /// store is read-only, so the flag does not survive a refetch.
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<Notification> {
        let notifications = self.notifications().await?;
        let mut notification = notifications
            .into_iter()
            .find(|n| n.notification_id == notification_id)
            .ok_or_else(|| Error::NotificationNotFound {
                notification_id: notification_id.to_owned(),
            })?;

        notification.read = true;
        Ok(notification)
    }
}
