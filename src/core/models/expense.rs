use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed category set carried through expenses, owes and transactions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Food,
    Studies,
    Outing,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Studies,
        Category::Outing,
        Category::Miscellaneous,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Food => "FOOD",
            Category::Studies => "STUDIES",
            Category::Outing => "OUTING",
            Category::Miscellaneous => "MISCELLANEOUS",
        };
        write!(f, "{}", s)
    }
}

/// One line in a user's personal ledger. Written directly by the user, or
/// as the debtor-side record when an owe is settled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub owner: Uuid,
    pub category: Category,
    pub amount: Decimal,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
