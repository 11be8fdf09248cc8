use crate::core::errors::LedgerError;
use crate::core::models::{Expense, Friendship, Group, Owe, Transaction, User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct LedgerState {
    users: HashMap<Uuid, User>,
    users_by_email: HashMap<String, Uuid>,
    friendships: HashMap<Uuid, Friendship>,
    groups: HashMap<Uuid, Group>,
    transactions: HashMap<Uuid, Transaction>,
    owes: HashMap<Uuid, Owe>,
    expenses: HashMap<Uuid, Expense>,
}

/// Whole-ledger state behind a single lock, so every trait method is one
/// critical section and multi-row writes land together or not at all.
/// Concurrent `settle_owe` calls on the same owe serialize here; the
/// second caller observes the paid flag and fails with `AlreadyPaid`.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: User) -> Result<User, LedgerError> {
        let mut state = self.state.write().await;
        if state.users_by_email.contains_key(&user.email) {
            return Err(LedgerError::EmailAlreadyRegistered(user.email));
        }
        state.users_by_email.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.users.get(&user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .users_by_email
            .get(email)
            .and_then(|id| state.users.get(id).cloned()))
    }

    async fn update_user(&self, user: User) -> Result<User, LedgerError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user.id) {
            return Err(LedgerError::UserNotFound(user.id));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_balance(&self, user_id: Uuid, balance: Decimal) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(LedgerError::UserNotFound(user_id))?;
        user.balance = balance;
        Ok(())
    }

    async fn save_friendship(&self, friendship: Friendship) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.friendships.insert(friendship.id, friendship);
        Ok(())
    }

    async fn get_friendship_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .friendships
            .values()
            .find(|f| f.involves(a) && f.involves(b))
            .cloned())
    }

    async fn delete_friendship(&self, friendship_id: Uuid) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.friendships.remove(&friendship_id);
        Ok(())
    }

    async fn friendships_of(&self, user_id: Uuid) -> Result<Vec<Friendship>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .friendships
            .values()
            .filter(|f| f.involves(user_id))
            .cloned()
            .collect())
    }

    async fn save_group(&self, group: Group) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.groups.insert(group.id, group);
        Ok(())
    }

    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.groups.get(&group_id).cloned())
    }

    async fn delete_group(&self, group_id: Uuid) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.groups.remove(&group_id);
        Ok(())
    }

    async fn user_groups(&self, user_id: Uuid) -> Result<Vec<Group>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .groups
            .values()
            .filter(|g| g.is_member(user_id))
            .cloned()
            .collect())
    }

    async fn insert_split(
        &self,
        transaction: Transaction,
        owes: Vec<Owe>,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.transactions.insert(transaction.id, transaction);
        for owe in owes {
            state.owes.insert(owe.id, owe);
        }
        Ok(())
    }

    async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.transactions.get(&transaction_id).cloned())
    }

    async fn group_transactions(&self, group_id: Uuid) -> Result<Vec<Transaction>, LedgerError> {
        let state = self.state.read().await;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| t.group_id == Some(group_id))
            .cloned()
            .collect();
        transactions.sort_by_key(|t| t.created_at);
        Ok(transactions)
    }

    async fn delete_transaction(&self, transaction_id: Uuid) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.transactions.remove(&transaction_id);
        state.owes.retain(|_, o| o.transaction_id != transaction_id);
        Ok(())
    }

    async fn get_owe(&self, owe_id: Uuid) -> Result<Option<Owe>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.owes.get(&owe_id).cloned())
    }

    async fn owes_of_transaction(&self, transaction_id: Uuid) -> Result<Vec<Owe>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .owes
            .values()
            .filter(|o| o.transaction_id == transaction_id)
            .cloned()
            .collect())
    }

    async fn owes_of_debtor(&self, user_id: Uuid) -> Result<Vec<Owe>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .owes
            .values()
            .filter(|o| o.debtor == user_id)
            .cloned()
            .collect())
    }

    async fn owes_of_creditor(&self, user_id: Uuid) -> Result<Vec<Owe>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .owes
            .values()
            .filter(|o| o.creditor == user_id)
            .cloned()
            .collect())
    }

    async fn delete_owe(&self, owe_id: Uuid) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.owes.remove(&owe_id);
        Ok(())
    }

    async fn settle_owe(&self, owe_id: Uuid, expense: Expense) -> Result<Owe, LedgerError> {
        let mut state = self.state.write().await;

        let owe = state
            .owes
            .get(&owe_id)
            .ok_or(LedgerError::OweNotFound(owe_id))?;
        if owe.paid {
            return Err(LedgerError::AlreadyPaid(owe_id));
        }
        let creditor = owe.creditor;
        let debtor = owe.debtor;
        let amount = owe.amount;
        if !state.users.contains_key(&creditor) {
            return Err(LedgerError::UserNotFound(creditor));
        }
        if !state.users.contains_key(&debtor) {
            return Err(LedgerError::UserNotFound(debtor));
        }

        // Point of no return: all four effects below commit together.
        let owe = state
            .owes
            .get_mut(&owe_id)
            .ok_or(LedgerError::OweNotFound(owe_id))?;
        owe.paid = true;
        let settled = owe.clone();
        state.expenses.insert(expense.id, expense);
        if let Some(user) = state.users.get_mut(&creditor) {
            user.balance += amount;
        }
        if let Some(user) = state.users.get_mut(&debtor) {
            user.balance -= amount;
        }
        Ok(settled)
    }

    async fn insert_expense(&self, expense: Expense) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.expenses.insert(expense.id, expense);
        Ok(())
    }

    async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.expenses.get(&expense_id).cloned())
    }

    async fn delete_expense(&self, expense_id: Uuid) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        state.expenses.remove(&expense_id);
        Ok(())
    }

    async fn expenses_of_user(&self, user_id: Uuid) -> Result<Vec<Expense>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .expenses
            .values()
            .filter(|e| e.owner == user_id)
            .cloned()
            .collect())
    }

    async fn delete_all_expenses(&self, user_id: Uuid) -> Result<usize, LedgerError> {
        let mut state = self.state.write().await;
        let before = state.expenses.len();
        state.expenses.retain(|_, e| e.owner != user_id);
        Ok(before - state.expenses.len())
    }
}
