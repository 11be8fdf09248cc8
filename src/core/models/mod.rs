pub mod expense;
pub mod friendship;
pub mod group;
pub mod owe;
pub mod transaction;
pub mod user;

pub use expense::{Category, Expense};
pub use friendship::{Friendship, FriendshipStatus};
pub use group::Group;
pub use owe::{Owe, OweView};
pub use transaction::{SplitType, Transaction};
pub use user::{User, UserProfile};
