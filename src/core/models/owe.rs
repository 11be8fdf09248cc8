use super::expense::Category;
use super::user::UserProfile;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One directional debt obligation, always the child of exactly one
/// transaction. The creditor's own share is written `paid = true` at
/// creation; every other owe transitions unpaid -> paid exactly once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Owe {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub group_id: Option<Uuid>,
    pub creditor: Uuid,
    pub debtor: Uuid,
    pub amount: Decimal,
    pub paid: bool,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Owe {
    /// The requester's implicit share of their own split.
    pub fn is_self_share(&self) -> bool {
        self.creditor == self.debtor
    }
}

/// An owe joined with the counterpart's display profile for listings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OweView {
    #[serde(flatten)]
    pub owe: Owe,
    pub counterpart: UserProfile,
}
