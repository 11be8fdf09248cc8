use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FriendshipStatus {
    Pending,
    Fulfilled,
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FriendshipStatus::Pending => "PENDING",
            FriendshipStatus::Fulfilled => "FULFILLED",
        };
        write!(f, "{}", s)
    }
}

/// Directed edge: created pending by the requester, fulfilled only by the
/// recipient. Deletion is the sole exit from either state; there is no
/// persisted "rejected".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Friendship {
    pub id: Uuid,
    pub requester: Uuid,
    pub recipient: Uuid,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.requester == user_id || self.recipient == user_id
    }

    /// The other end of the edge, from `user_id`'s point of view.
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.requester == user_id {
            self.recipient
        } else {
            self.requester
        }
    }
}
