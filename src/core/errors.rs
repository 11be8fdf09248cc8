use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Serialize, PartialEq, Eq)]
pub enum LedgerError {
    // --- validation: client mistakes, never retried ---
    /// Amount is non-positive, non-finite for the currency, or carries
    /// more than two decimal places
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Percentages must sum to strictly less than 100
    #[error("percentage_exceeds_limit")]
    PercentageExceedsLimit,

    /// Absolute shares must not exceed the total amount
    #[error("shares_exceed_total")]
    SharesExceedTotal,

    /// A split needs at least one participant besides the requester
    #[error("A split requires at least one other participant")]
    NoParticipants,

    /// Same member listed twice in the split inputs
    #[error("Duplicate member {0} in split")]
    DuplicateSplitMember(Uuid),

    /// The requester is an implicit participant and must not be listed
    #[error("Requester {0} must not appear in the member inputs")]
    RequesterInSplit(Uuid),

    /// A per-member percentage outside (0, 100]
    #[error("Invalid percentage for member {0}")]
    InvalidPercentage(Uuid),

    /// A per-member share that is non-positive, finer than cents, or
    /// rounds to zero under the split policy
    #[error("Invalid share for member {0}")]
    InvalidShare(Uuid),

    /// Generic field-level input error
    #[error("Invalid input for `{field}`: {message}")]
    InvalidInput { field: String, message: String },

    // --- authorization: acting user lacks standing, never retried ---
    #[error("User {0} is not a group member")]
    NotGroupMember(Uuid),

    #[error("User {0} is not the group admin")]
    NotGroupAdmin(Uuid),

    /// Only the debtor of an owe may pay it
    #[error("User {0} is not the debtor of owe {1}")]
    NotDebtor(Uuid, Uuid),

    /// Only the creditor may delete an owe or transaction
    #[error("User {0} is not the creditor")]
    NotCreditor(Uuid),

    /// Only the owner of an expense row may delete it
    #[error("User {0} does not own this expense")]
    NotExpenseOwner(Uuid),

    /// No fulfilled friendship between the two users
    #[error("Users {0} and {1} are not friends")]
    NotFriends(Uuid, Uuid),

    /// Money cannot be requested from or paid to oneself
    #[error("Cannot transact with yourself")]
    SelfTransaction,

    /// Only the recipient of a friend request may accept it
    #[error("User {0} cannot accept this friend request")]
    NotRequestRecipient(Uuid),

    // --- not found ---
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Group {0} not found")]
    GroupNotFound(Uuid),

    #[error("Transaction {0} not found")]
    TransactionNotFound(Uuid),

    #[error("Owe {0} not found")]
    OweNotFound(Uuid),

    #[error("Expense {0} not found")]
    ExpenseNotFound(Uuid),

    #[error("No friendship between users {0} and {1}")]
    FriendshipNotFound(Uuid, Uuid),

    // --- conflict: caller may re-fetch state and decide ---
    /// Re-paying never silently succeeds twice
    #[error("Owe {0} has already been paid")]
    AlreadyPaid(Uuid),

    #[error("Users {0} and {1} are already friends")]
    AlreadyFriends(Uuid, Uuid),

    #[error("A friend request between {0} and {1} is already pending")]
    RequestAlreadyPending(Uuid, Uuid),

    #[error("User {0} is already a group member")]
    AlreadyGroupMember(Uuid),

    /// Completed payments are an immutable audit trail
    #[error("Owe {0} is paid and cannot be deleted")]
    PaidOweImmutable(Uuid),

    /// A transaction with settled children cannot be deleted
    #[error("Transaction {0} has paid owes and cannot be deleted")]
    TransactionHasPaidOwes(Uuid),

    #[error("User {0} is already the group admin")]
    AlreadyAdmin(Uuid),

    /// The admin must hand over the role before being removed
    #[error("Group admin must be reassigned before removal")]
    AdminRemoval,

    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),

    // --- transient: safe to retry the whole operation ---
    #[error("Transient storage failure: {0}")]
    Transient(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl LedgerError {
    /// Only transient failures may be retried, and always as a whole
    /// operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Transient(_))
    }
}
