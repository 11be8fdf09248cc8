use crate::core::errors::LedgerError;
use crate::core::models::{Expense, Friendship, Group, Owe, Transaction, User};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Durable-store abstraction. Each method is one atomic unit against the
/// store: `insert_split` lands the transaction and all of its owes
/// together or not at all, and `settle_owe` performs the paid-flag
/// compare-and-set, the expense insert and both balance adjustments as a
/// single transition.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user(&self, user: User) -> Result<User, LedgerError>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, LedgerError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, LedgerError>;
    async fn update_user(&self, user: User) -> Result<User, LedgerError>;
    async fn set_balance(&self, user_id: Uuid, balance: Decimal) -> Result<(), LedgerError>;

    async fn save_friendship(&self, friendship: Friendship) -> Result<(), LedgerError>;
    async fn get_friendship_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, LedgerError>;
    async fn delete_friendship(&self, friendship_id: Uuid) -> Result<(), LedgerError>;
    async fn friendships_of(&self, user_id: Uuid) -> Result<Vec<Friendship>, LedgerError>;

    async fn save_group(&self, group: Group) -> Result<(), LedgerError>;
    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, LedgerError>;
    async fn delete_group(&self, group_id: Uuid) -> Result<(), LedgerError>;
    async fn user_groups(&self, user_id: Uuid) -> Result<Vec<Group>, LedgerError>;

    /// All-or-nothing write of one split event.
    async fn insert_split(
        &self,
        transaction: Transaction,
        owes: Vec<Owe>,
    ) -> Result<(), LedgerError>;
    async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, LedgerError>;
    async fn group_transactions(&self, group_id: Uuid) -> Result<Vec<Transaction>, LedgerError>;
    /// Cascades to all child owes.
    async fn delete_transaction(&self, transaction_id: Uuid) -> Result<(), LedgerError>;

    async fn get_owe(&self, owe_id: Uuid) -> Result<Option<Owe>, LedgerError>;
    async fn owes_of_transaction(&self, transaction_id: Uuid) -> Result<Vec<Owe>, LedgerError>;
    async fn owes_of_debtor(&self, user_id: Uuid) -> Result<Vec<Owe>, LedgerError>;
    async fn owes_of_creditor(&self, user_id: Uuid) -> Result<Vec<Owe>, LedgerError>;
    async fn delete_owe(&self, owe_id: Uuid) -> Result<(), LedgerError>;

    /// Marks the owe paid (failing with `AlreadyPaid` if a concurrent call
    /// won the race), books the payer's expense and moves both cached
    /// balances, all in one transition. Returns the settled owe.
    async fn settle_owe(&self, owe_id: Uuid, expense: Expense) -> Result<Owe, LedgerError>;

    async fn insert_expense(&self, expense: Expense) -> Result<(), LedgerError>;
    async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, LedgerError>;
    async fn delete_expense(&self, expense_id: Uuid) -> Result<(), LedgerError>;
    async fn expenses_of_user(&self, user_id: Uuid) -> Result<Vec<Expense>, LedgerError>;
    async fn delete_all_expenses(&self, user_id: Uuid) -> Result<usize, LedgerError>;
}

pub mod in_memory;
