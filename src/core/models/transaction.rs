use super::expense::Category;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SplitType {
    Equal,
    Percentage,
    Share,
    /// Synthetic parent of a single friend-to-friend money request.
    Direct,
}

impl std::fmt::Display for SplitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SplitType::Equal => "EQUAL",
            SplitType::Percentage => "PERCENTAGE",
            SplitType::Share => "SHARE",
            SplitType::Direct => "DIRECT",
        };
        write!(f, "{}", s)
    }
}

/// Immutable record of one split event. Never mutated after creation;
/// deletion cascades to its Owe children.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub group_id: Option<Uuid>,
    /// The member who fronted the money; creditor of every child owe.
    pub creditor: Uuid,
    /// All participants, creditor included.
    pub members: Vec<Uuid>,
    pub amount: Decimal,
    pub split_type: SplitType,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
