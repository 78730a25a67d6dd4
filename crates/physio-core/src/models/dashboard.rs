use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::transaction::{AiTransaction, TransactionStatus};
use super::user::{ApprovalStatus, UserAccount};

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub patients: u64,
    pub assessments: u64,
    pub users_pending: u64,
    pub users_approved: u64,
    pub users_rejected: u64,
    pub ai_transactions: u64,
    pub ai_failed: u64,
    pub ai_cost_usd: f64,
}

impl DashboardStats {
    pub fn count_users<'a>(&mut self, users: impl IntoIterator<Item = &'a UserAccount>) {
        for user in users {
            match user.approval {
                ApprovalStatus::Pending => self.users_pending += 1,
                ApprovalStatus::Approved => self.users_approved += 1,
                ApprovalStatus::Rejected => self.users_rejected += 1,
            }
        }
    }

    pub fn count_transactions<'a>(&mut self, transactions: impl IntoIterator<Item = &'a AiTransaction>) {
        for txn in transactions {
            self.ai_transactions += 1;
            if txn.status == TransactionStatus::Failed {
                self.ai_failed += 1;
            }
            self.ai_cost_usd += txn.usage.cost_usd;
        }
    }
}
