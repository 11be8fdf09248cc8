use crate::core::analytics::{
    self, CategoryTotal, DailyTotal, ExpenseComparison,
};
use crate::core::errors::LedgerError;
use crate::core::models::{
    Category, Expense, Friendship, FriendshipStatus, Group, Owe, OweView, SplitType, Transaction,
    User, UserProfile,
};
use crate::core::split::{self, SplitSpec};
use crate::infrastructure::storage::Storage;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

const MAX_TITLE_LEN: usize = 64;
const MAX_DESCRIPTION_LEN: usize = 200;

/// Everything a settled owe produced: the debtor's new expense row and
/// both cached balances after the transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub owe: Owe,
    pub expense: Expense,
    pub creditor_balance: Decimal,
    pub debtor_balance: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// One category's slice of `expenses_by_category`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryExpenses {
    pub category: Category,
    pub total: Decimal,
    pub total_pages: usize,
    pub current_page: usize,
    pub expenses: Vec<Expense>,
}

pub struct LedgerService<S: Storage> {
    storage: S,
}

impl<S: Storage> LedgerService<S> {
    pub fn new(storage: S) -> Self {
        LedgerService { storage }
    }

    fn validate_string_input(
        field: &str,
        value: &str,
        max_length: usize,
    ) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::InvalidInput {
                field: field.to_string(),
                message: format!("{} cannot be empty", field),
            });
        }
        if value.len() > max_length {
            return Err(LedgerError::InvalidInput {
                field: field.to_string(),
                message: format!("{} cannot exceed {} characters", field, max_length),
            });
        }
        Ok(())
    }

    fn validate_description(value: &str) -> Result<(), LedgerError> {
        if value.len() > MAX_DESCRIPTION_LEN {
            return Err(LedgerError::InvalidInput {
                field: "description".to_string(),
                message: format!("description cannot exceed {} characters", MAX_DESCRIPTION_LEN),
            });
        }
        Ok(())
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, LedgerError> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or(LedgerError::UserNotFound(user_id))
    }

    async fn require_group(&self, group_id: Uuid) -> Result<Group, LedgerError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or(LedgerError::GroupNotFound(group_id))
    }

    async fn require_owe(&self, owe_id: Uuid) -> Result<Owe, LedgerError> {
        self.storage
            .get_owe(owe_id)
            .await?
            .ok_or(LedgerError::OweNotFound(owe_id))
    }

    // USER MANAGEMENT

    pub async fn create_user(
        &self,
        name: String,
        email: String,
        avatar_url: Option<String>,
    ) -> Result<User, LedgerError> {
        Self::validate_string_input("name", &name, MAX_TITLE_LEN)?;
        Self::validate_string_input("email", &email, 254)?;
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            avatar_url,
            balance: Decimal::ZERO,
            created_at: Utc::now(),
        };
        let created = self.storage.create_user(user).await?;
        info!(user_id = %created.id, "user created");
        Ok(created)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, LedgerError> {
        self.require_user(user_id).await
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<User, LedgerError> {
        let mut user = self.require_user(user_id).await?;
        if let Some(name) = name {
            Self::validate_string_input("name", &name, MAX_TITLE_LEN)?;
            user.name = name;
        }
        if avatar_url.is_some() {
            user.avatar_url = avatar_url;
        }
        self.storage.update_user(user).await
    }

    // FRIENDSHIP GATE

    pub async fn send_friend_request(
        &self,
        requester: Uuid,
        recipient: Uuid,
    ) -> Result<Friendship, LedgerError> {
        if requester == recipient {
            return Err(LedgerError::SelfTransaction);
        }
        self.require_user(requester).await?;
        self.require_user(recipient).await?;

        if let Some(existing) = self
            .storage
            .get_friendship_between(requester, recipient)
            .await?
        {
            warn!(%requester, %recipient, status = %existing.status, "friendship edge already exists");
            return Err(match existing.status {
                FriendshipStatus::Fulfilled => LedgerError::AlreadyFriends(requester, recipient),
                FriendshipStatus::Pending => {
                    LedgerError::RequestAlreadyPending(requester, recipient)
                }
            });
        }

        let friendship = Friendship {
            id: Uuid::new_v4(),
            requester,
            recipient,
            status: FriendshipStatus::Pending,
            created_at: Utc::now(),
        };
        self.storage.save_friendship(friendship.clone()).await?;
        info!(%requester, %recipient, "friend request sent");
        Ok(friendship)
    }

    /// Only the recipient of the pending edge may fulfill it.
    pub async fn accept_friend_request(
        &self,
        recipient: Uuid,
        requester: Uuid,
    ) -> Result<Friendship, LedgerError> {
        let mut friendship = self
            .storage
            .get_friendship_between(requester, recipient)
            .await?
            .ok_or(LedgerError::FriendshipNotFound(requester, recipient))?;
        if friendship.status == FriendshipStatus::Fulfilled {
            return Err(LedgerError::AlreadyFriends(requester, recipient));
        }
        if friendship.recipient != recipient {
            warn!(%recipient, "user tried to accept a request they sent");
            return Err(LedgerError::NotRequestRecipient(recipient));
        }
        friendship.status = FriendshipStatus::Fulfilled;
        self.storage.save_friendship(friendship.clone()).await?;
        info!(%requester, %recipient, "friend request accepted");
        Ok(friendship)
    }

    /// Either party removes the edge regardless of its state.
    pub async fn remove_friend(&self, user_id: Uuid, other: Uuid) -> Result<(), LedgerError> {
        let friendship = self
            .storage
            .get_friendship_between(user_id, other)
            .await?
            .ok_or(LedgerError::FriendshipNotFound(user_id, other))?;
        self.storage.delete_friendship(friendship.id).await?;
        info!(%user_id, %other, "friendship removed");
        Ok(())
    }

    pub async fn list_friends(&self, user_id: Uuid) -> Result<Vec<UserProfile>, LedgerError> {
        self.require_user(user_id).await?;
        let mut friends = Vec::new();
        for friendship in self.storage.friendships_of(user_id).await? {
            if friendship.status != FriendshipStatus::Fulfilled {
                continue;
            }
            let friend = self.require_user(friendship.counterpart(user_id)).await?;
            friends.push(UserProfile::from(&friend));
        }
        Ok(friends)
    }

    /// Whether a fulfilled friendship edge exists between the two users.
    pub async fn is_friend(&self, a: Uuid, b: Uuid) -> Result<bool, LedgerError> {
        Ok(self
            .storage
            .get_friendship_between(a, b)
            .await?
            .is_some_and(|f| f.status == FriendshipStatus::Fulfilled))
    }

    // GROUP MANAGEMENT

    pub async fn create_group(
        &self,
        admin: Uuid,
        name: String,
        description: String,
        member_ids: Vec<Uuid>,
    ) -> Result<Group, LedgerError> {
        Self::validate_string_input("name", &name, MAX_TITLE_LEN)?;
        Self::validate_description(&description)?;
        self.require_user(admin).await?;

        let mut members = vec![admin];
        for member_id in member_ids {
            self.require_user(member_id).await?;
            if !members.contains(&member_id) {
                members.push(member_id);
            }
        }

        let group = Group {
            id: Uuid::new_v4(),
            name,
            description,
            admin,
            members,
            created_at: Utc::now(),
        };
        self.storage.save_group(group.clone()).await?;
        info!(group_id = %group.id, %admin, "group created");
        Ok(group)
    }

    pub async fn get_group(&self, group_id: Uuid) -> Result<Group, LedgerError> {
        self.require_group(group_id).await
    }

    pub async fn user_groups(&self, user_id: Uuid) -> Result<Vec<Group>, LedgerError> {
        self.require_user(user_id).await?;
        self.storage.user_groups(user_id).await
    }

    pub async fn add_member(
        &self,
        group_id: Uuid,
        acting: Uuid,
        user_id: Uuid,
    ) -> Result<Group, LedgerError> {
        let mut group = self.require_group(group_id).await?;
        if !group.is_admin(acting) {
            warn!(%acting, %group_id, "non-admin tried to add a member");
            return Err(LedgerError::NotGroupAdmin(acting));
        }
        self.require_user(user_id).await?;
        if group.is_member(user_id) {
            return Err(LedgerError::AlreadyGroupMember(user_id));
        }
        group.members.push(user_id);
        self.storage.save_group(group.clone()).await?;
        info!(%group_id, %user_id, "member added");
        Ok(group)
    }

    /// Removing the admin is rejected until the role is reassigned.
    pub async fn remove_member(
        &self,
        group_id: Uuid,
        acting: Uuid,
        target: Uuid,
    ) -> Result<Group, LedgerError> {
        let mut group = self.require_group(group_id).await?;
        if !group.is_admin(acting) {
            return Err(LedgerError::NotGroupAdmin(acting));
        }
        if !group.is_member(target) {
            return Err(LedgerError::NotGroupMember(target));
        }
        if group.is_admin(target) {
            warn!(%group_id, %target, "attempt to remove the group admin");
            return Err(LedgerError::AdminRemoval);
        }
        group.members.retain(|&m| m != target);
        self.storage.save_group(group.clone()).await?;
        info!(%group_id, %target, "member removed");
        Ok(group)
    }

    pub async fn transfer_admin(
        &self,
        group_id: Uuid,
        acting: Uuid,
        new_admin: Uuid,
    ) -> Result<Group, LedgerError> {
        let mut group = self.require_group(group_id).await?;
        if !group.is_admin(acting) {
            return Err(LedgerError::NotGroupAdmin(acting));
        }
        if new_admin == acting {
            return Err(LedgerError::AlreadyAdmin(new_admin));
        }
        if !group.is_member(new_admin) {
            warn!(%group_id, %new_admin, "admin transfer to non-member rejected");
            return Err(LedgerError::NotGroupMember(new_admin));
        }
        group.admin = new_admin;
        self.storage.save_group(group.clone()).await?;
        info!(%group_id, %new_admin, "admin transferred");
        Ok(group)
    }

    /// The admin leaving hands the role to the longest-standing remaining
    /// member; the last member leaving deletes the group.
    pub async fn leave_group(&self, group_id: Uuid, user_id: Uuid) -> Result<(), LedgerError> {
        let mut group = self.require_group(group_id).await?;
        if !group.is_member(user_id) {
            return Err(LedgerError::NotGroupMember(user_id));
        }
        group.members.retain(|&m| m != user_id);
        if group.members.is_empty() {
            self.storage.delete_group(group_id).await?;
            info!(%group_id, "last member left, group deleted");
            return Ok(());
        }
        if group.is_admin(user_id) {
            group.admin = group.members[0];
            info!(%group_id, new_admin = %group.admin, "admin left, role auto-transferred");
        }
        self.storage.save_group(group).await?;
        info!(%group_id, %user_id, "member left group");
        Ok(())
    }

    pub async fn group_transactions(
        &self,
        group_id: Uuid,
        acting: Uuid,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let group = self.require_group(group_id).await?;
        if !group.is_member(acting) {
            return Err(LedgerError::NotGroupMember(acting));
        }
        self.storage.group_transactions(group_id).await
    }

    // SETTLEMENT

    /// Converts one expense into per-member owes under the given policy.
    /// The transaction and every owe land atomically; the requester's own
    /// share is written pre-paid.
    pub async fn create_split(
        &self,
        group_id: Uuid,
        requester: Uuid,
        amount: Decimal,
        spec: SplitSpec,
        category: Category,
        title: String,
        description: String,
    ) -> Result<(Transaction, Vec<Owe>), LedgerError> {
        Self::validate_string_input("title", &title, MAX_TITLE_LEN)?;
        Self::validate_description(&description)?;

        let group = self.require_group(group_id).await?;
        if !group.is_member(requester) {
            warn!(%requester, %group_id, "split requested by non-member");
            return Err(LedgerError::NotGroupMember(requester));
        }
        for member_id in spec.member_ids() {
            if !group.is_member(member_id) {
                warn!(%member_id, %group_id, "split target is not a group member");
                return Err(LedgerError::NotGroupMember(member_id));
            }
        }

        let allocation = split::compute_shares(amount, &spec, requester)?;
        debug!(%requester, %amount, requester_share = %allocation.requester_share, "shares computed");

        let now = Utc::now();
        let transaction_id = Uuid::new_v4();
        let mut members = vec![requester];
        members.extend(spec.member_ids());

        let transaction = Transaction {
            id: transaction_id,
            group_id: Some(group_id),
            creditor: requester,
            members,
            amount,
            split_type: spec.split_type(),
            category,
            title: title.clone(),
            description: description.clone(),
            created_at: now,
        };

        let mut owes = Vec::with_capacity(allocation.member_shares.len() + 1);
        // The requester pays themselves instantly; their share only keeps
        // the child-sum invariant readable off the ledger.
        owes.push(Owe {
            id: Uuid::new_v4(),
            transaction_id,
            group_id: Some(group_id),
            creditor: requester,
            debtor: requester,
            amount: allocation.requester_share,
            paid: true,
            category,
            title: title.clone(),
            description: description.clone(),
            created_at: now,
        });
        for (member_id, share) in &allocation.member_shares {
            owes.push(Owe {
                id: Uuid::new_v4(),
                transaction_id,
                group_id: Some(group_id),
                creditor: requester,
                debtor: *member_id,
                amount: *share,
                paid: false,
                category,
                title: title.clone(),
                description: description.clone(),
                created_at: now,
            });
        }

        self.storage
            .insert_split(transaction.clone(), owes.clone())
            .await?;
        info!(%transaction_id, %group_id, %requester, owes = owes.len(), "split created");
        Ok((transaction, owes))
    }

    /// Friend-to-friend money request. Synthesizes a one-off DIRECT
    /// transaction as the parent of the single owe.
    pub async fn create_direct_request(
        &self,
        creditor: Uuid,
        debtor: Uuid,
        amount: Decimal,
        category: Category,
        title: String,
        description: String,
    ) -> Result<Owe, LedgerError> {
        if creditor == debtor {
            return Err(LedgerError::SelfTransaction);
        }
        Self::validate_string_input("title", &title, MAX_TITLE_LEN)?;
        Self::validate_description(&description)?;
        split::validate_amount(amount)?;
        self.require_user(creditor).await?;
        self.require_user(debtor).await?;
        if !self.is_friend(creditor, debtor).await? {
            warn!(%creditor, %debtor, "direct request without fulfilled friendship");
            return Err(LedgerError::NotFriends(creditor, debtor));
        }

        let now = Utc::now();
        let transaction_id = Uuid::new_v4();
        let transaction = Transaction {
            id: transaction_id,
            group_id: None,
            creditor,
            members: vec![creditor, debtor],
            amount,
            split_type: SplitType::Direct,
            category,
            title: title.clone(),
            description: description.clone(),
            created_at: now,
        };
        let owe = Owe {
            id: Uuid::new_v4(),
            transaction_id,
            group_id: None,
            creditor,
            debtor,
            amount,
            paid: false,
            category,
            title,
            description,
            created_at: now,
        };
        self.storage
            .insert_split(transaction, vec![owe.clone()])
            .await?;
        info!(owe_id = %owe.id, %creditor, %debtor, "direct money request created");
        Ok(owe)
    }

    /// The single unpaid -> paid transition. Atomically marks the owe
    /// paid, books the payer's expense and moves both cached balances; a
    /// lost race surfaces as `AlreadyPaid`, never a silent double apply.
    pub async fn pay_owe(
        &self,
        owe_id: Uuid,
        payer: Uuid,
    ) -> Result<SettlementOutcome, LedgerError> {
        let owe = self.require_owe(owe_id).await?;
        if owe.debtor != payer {
            warn!(%payer, %owe_id, "payment attempt by non-debtor");
            return Err(LedgerError::NotDebtor(payer, owe_id));
        }
        if owe.creditor == payer {
            return Err(LedgerError::SelfTransaction);
        }
        if owe.paid {
            return Err(LedgerError::AlreadyPaid(owe_id));
        }
        let creditor = self.require_user(owe.creditor).await?;

        let expense = Expense {
            id: Uuid::new_v4(),
            owner: payer,
            category: owe.category,
            amount: owe.amount,
            title: owe.title.clone(),
            description: format!("Paid {} to {} for owed money", owe.amount, creditor.name),
            created_at: Utc::now(),
        };
        let settled = self.storage.settle_owe(owe_id, expense.clone()).await?;

        let creditor_balance = self.require_user(settled.creditor).await?.balance;
        let debtor_balance = self.require_user(settled.debtor).await?.balance;
        info!(%owe_id, %payer, amount = %settled.amount, "owe settled");
        Ok(SettlementOutcome {
            owe: settled,
            expense,
            creditor_balance,
            debtor_balance,
        })
    }

    /// Creditor-only, unpaid-only. Completed payments are immutable; the
    /// synthetic parent of a direct request goes with its only child.
    pub async fn delete_owe(&self, owe_id: Uuid, requester: Uuid) -> Result<(), LedgerError> {
        let owe = self.require_owe(owe_id).await?;
        if owe.creditor != requester {
            return Err(LedgerError::NotCreditor(requester));
        }
        if owe.paid {
            return Err(LedgerError::PaidOweImmutable(owe_id));
        }
        let parent = self
            .storage
            .get_transaction(owe.transaction_id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(owe.transaction_id))?;
        if parent.split_type == SplitType::Direct {
            self.storage.delete_transaction(parent.id).await?;
            info!(%owe_id, transaction_id = %parent.id, "direct owe and synthetic parent deleted");
        } else {
            self.storage.delete_owe(owe_id).await?;
            info!(%owe_id, "owe deleted");
        }
        Ok(())
    }

    /// Creditor-only. Rejected once any debtor has settled; no balance was
    /// applied for unpaid children, so none is reversed.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        requester: Uuid,
    ) -> Result<(), LedgerError> {
        let transaction = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
        if transaction.creditor != requester {
            return Err(LedgerError::NotCreditor(requester));
        }
        let owes = self.storage.owes_of_transaction(transaction_id).await?;
        if owes.iter().any(|o| o.paid && !o.is_self_share()) {
            warn!(%transaction_id, "delete rejected, transaction has settled owes");
            return Err(LedgerError::TransactionHasPaidOwes(transaction_id));
        }
        self.storage.delete_transaction(transaction_id).await?;
        info!(%transaction_id, owes = owes.len(), "transaction deleted with cascade");
        Ok(())
    }

    /// Unpaid debts of `user_id`, creditor profile joined.
    pub async fn owes_of_user(&self, user_id: Uuid) -> Result<Vec<OweView>, LedgerError> {
        self.require_user(user_id).await?;
        let mut views = Vec::new();
        for owe in self.storage.owes_of_debtor(user_id).await? {
            if owe.paid || owe.is_self_share() {
                continue;
            }
            let creditor = self.require_user(owe.creditor).await?;
            views.push(OweView {
                counterpart: UserProfile::from(&creditor),
                owe,
            });
        }
        views.sort_by_key(|v| v.owe.created_at);
        Ok(views)
    }

    /// Unpaid credits owed to `user_id`, debtor profile joined.
    pub async fn amount_owed_to_user(&self, user_id: Uuid) -> Result<Vec<OweView>, LedgerError> {
        self.require_user(user_id).await?;
        let mut views = Vec::new();
        for owe in self.storage.owes_of_creditor(user_id).await? {
            if owe.paid || owe.is_self_share() {
                continue;
            }
            let debtor = self.require_user(owe.debtor).await?;
            views.push(OweView {
                counterpart: UserProfile::from(&debtor),
                owe,
            });
        }
        views.sort_by_key(|v| v.owe.created_at);
        Ok(views)
    }

    pub async fn get_owe(&self, owe_id: Uuid) -> Result<Owe, LedgerError> {
        self.require_owe(owe_id).await
    }

    /// Reconciliation: the cached balance is advisory, the owe ledger is
    /// ground truth. Recomputes from settled owes and overwrites the cache.
    pub async fn rebuild_balance(&self, user_id: Uuid) -> Result<Decimal, LedgerError> {
        self.require_user(user_id).await?;
        let mut balance = Decimal::ZERO;
        for owe in self.storage.owes_of_creditor(user_id).await? {
            if owe.paid && !owe.is_self_share() {
                balance += owe.amount;
            }
        }
        for owe in self.storage.owes_of_debtor(user_id).await? {
            if owe.paid && !owe.is_self_share() {
                balance -= owe.amount;
            }
        }
        self.storage.set_balance(user_id, balance).await?;
        info!(%user_id, %balance, "balance rebuilt from owe ledger");
        Ok(balance)
    }

    // PERSONAL EXPENSES

    pub async fn add_expense(
        &self,
        owner: Uuid,
        category: Category,
        amount: Decimal,
        title: String,
        description: String,
    ) -> Result<Expense, LedgerError> {
        Self::validate_string_input("title", &title, MAX_TITLE_LEN)?;
        Self::validate_description(&description)?;
        split::validate_amount(amount)?;
        self.require_user(owner).await?;
        let expense = Expense {
            id: Uuid::new_v4(),
            owner,
            category,
            amount,
            title,
            description,
            created_at: Utc::now(),
        };
        self.storage.insert_expense(expense.clone()).await?;
        info!(expense_id = %expense.id, %owner, "expense recorded");
        Ok(expense)
    }

    pub async fn delete_expense(
        &self,
        expense_id: Uuid,
        requester: Uuid,
    ) -> Result<(), LedgerError> {
        let expense = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or(LedgerError::ExpenseNotFound(expense_id))?;
        if expense.owner != requester {
            return Err(LedgerError::NotExpenseOwner(requester));
        }
        self.storage.delete_expense(expense_id).await
    }

    pub async fn expenses_of_user(
        &self,
        user_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<ExpensePage, LedgerError> {
        self.require_user(user_id).await?;
        let limit = limit.max(1);
        let page = page.max(1);
        let mut expenses = self.storage.expenses_of_user(user_id).await?;
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total_count = expenses.len();
        let total_pages = total_count.div_ceil(limit);
        let expenses = expenses
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();
        Ok(ExpensePage {
            expenses,
            total_count,
            total_pages,
            current_page: page,
        })
    }

    pub async fn remove_all_expenses(&self, user_id: Uuid) -> Result<usize, LedgerError> {
        self.require_user(user_id).await?;
        let removed = self.storage.delete_all_expenses(user_id).await?;
        info!(%user_id, removed, "all expenses removed");
        Ok(removed)
    }

    // ANALYTICS

    /// Week/month totals and deltas over the user's own expense rows.
    pub async fn expense_comparison(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ExpenseComparison, LedgerError> {
        self.require_user(user_id).await?;
        let expenses = self.storage.expenses_of_user(user_id).await?;
        Ok(analytics::comparison(&expenses, now))
    }

    pub async fn expenses_by_category(
        &self,
        user_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<Vec<CategoryExpenses>, LedgerError> {
        self.require_user(user_id).await?;
        let limit = limit.max(1);
        let page = page.max(1);
        let mut all = self.storage.expenses_of_user(user_id).await?;
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Category::ALL
            .iter()
            .map(|&category| {
                let of_category: Vec<&Expense> =
                    all.iter().filter(|e| e.category == category).collect();
                let total = of_category.iter().map(|e| e.amount).sum();
                let total_pages = of_category.len().div_ceil(limit);
                let expenses = of_category
                    .into_iter()
                    .skip((page - 1) * limit)
                    .take(limit)
                    .cloned()
                    .collect();
                CategoryExpenses {
                    category,
                    total,
                    total_pages,
                    current_page: page,
                    expenses,
                }
            })
            .collect())
    }

    pub async fn category_breakdown(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<CategoryTotal>, LedgerError> {
        self.require_user(user_id).await?;
        let expenses = self.storage.expenses_of_user(user_id).await?;
        Ok(analytics::category_breakdown(&expenses, now))
    }

    pub async fn daily_trend(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<DailyTotal>, LedgerError> {
        self.require_user(user_id).await?;
        let expenses = self.storage.expenses_of_user(user_id).await?;
        Ok(analytics::daily_trend(&expenses, now))
    }
}
