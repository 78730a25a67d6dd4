use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UserRole {
    Therapist,
    Admin,
}

/// Where a registration sits in the admin approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Application-side record of a registered user. Credentials live in the
/// identity provider; this holds role and approval state.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserAccount {
    /// Identity provider subject (`sub` claim).
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub approval: ApprovalStatus,
    pub active: bool,
    pub created_at: jiff::Timestamp,
    #[serde(default)]
    pub decided_at: Option<jiff::Timestamp>,
    /// Subject of the admin who approved or rejected the registration.
    #[serde(default)]
    pub decided_by: Option<String>,
}

impl UserAccount {
    /// A freshly registered therapist awaiting approval.
    pub fn pending(sub: &str, email: &str, name: &str, now: jiff::Timestamp) -> Self {
        Self {
            sub: sub.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: UserRole::Therapist,
            approval: ApprovalStatus::Pending,
            active: true,
            created_at: now,
            decided_at: None,
            decided_by: None,
        }
    }

    pub fn can_sign_in(&self) -> bool {
        self.active && self.approval == ApprovalStatus::Approved
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn approve(&mut self, admin_sub: &str, now: jiff::Timestamp) {
        self.approval = ApprovalStatus::Approved;
        self.active = true;
        self.decided_at = Some(now);
        self.decided_by = Some(admin_sub.to_string());
    }

    pub fn reject(&mut self, admin_sub: &str, now: jiff::Timestamp) {
        self.approval = ApprovalStatus::Rejected;
        self.active = false;
        self.decided_at = Some(now);
        self.decided_by = Some(admin_sub.to_string());
    }
}
