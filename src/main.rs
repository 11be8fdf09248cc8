use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendshare::config::CONFIG;
use spendshare::core::analytics::{CategoryTotal, DailyTotal, ExpenseComparison};
use spendshare::core::models::{
    Category, Expense, Friendship, Group, Owe, OweView, SplitType, Transaction, User, UserProfile,
};
use spendshare::core::service::{
    CategoryExpenses, ExpensePage, LedgerService, SettlementOutcome,
};
use spendshare::core::split::SplitSpec;
use spendshare::{InMemoryStorage, LedgerError};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

type Service = Arc<LedgerService<InMemoryStorage>>;

// Request structs for JSON payloads
#[derive(Deserialize)]
struct CreateUserRequest {
    name: String,
    email: String,
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct UpdateProfileRequest {
    name: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct FriendRequestPayload {
    requester_id: Uuid,
    recipient_id: Uuid,
}

#[derive(Deserialize)]
struct CreateGroupRequest {
    name: String,
    description: String,
    admin_id: Uuid,
    member_ids: Vec<Uuid>,
}

#[derive(Deserialize)]
struct MemberRequest {
    user_id: Uuid,
    acting_id: Uuid,
}

#[derive(Deserialize)]
struct TransferAdminRequest {
    new_admin_id: Uuid,
    acting_id: Uuid,
}

#[derive(Deserialize)]
struct LeaveGroupRequest {
    user_id: Uuid,
}

#[derive(Deserialize)]
struct CreateSplitRequest {
    group_id: Uuid,
    requester_id: Uuid,
    amount: Decimal,
    split_type: SplitType,
    /// For EQUAL splits.
    members: Option<Vec<Uuid>>,
    /// For PERCENTAGE (percent per member) and SHARE (amount per member).
    member_shares: Option<HashMap<Uuid, Decimal>>,
    category: Category,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct DirectRequestPayload {
    creditor_id: Uuid,
    debtor_id: Uuid,
    amount: Decimal,
    category: Category,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct PayOweRequest {
    payer_id: Uuid,
}

#[derive(Deserialize)]
struct RequesterParams {
    requester_id: Uuid,
}

#[derive(Deserialize)]
struct AddExpenseRequest {
    owner_id: Uuid,
    category: Category,
    amount: Decimal,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct PageParams {
    page: Option<usize>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SplitResponse {
    transaction: Transaction,
    owes: Vec<Owe>,
}

#[derive(Serialize)]
struct BalanceResponse {
    user_id: Uuid,
    balance: Decimal,
}

#[derive(Serialize)]
struct RemovedResponse {
    removed: usize,
}

// Error response struct
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// Newtype wrapper for LedgerError to implement IntoResponse
struct ApiError(LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use LedgerError::*;
        let status = match &self.0 {
            InvalidAmount(_) | PercentageExceedsLimit | SharesExceedTotal | NoParticipants
            | DuplicateSplitMember(_) | RequesterInSplit(_) | InvalidPercentage(_)
            | InvalidShare(_) | InvalidInput { .. } => StatusCode::BAD_REQUEST,
            NotGroupMember(_) | NotGroupAdmin(_) | NotDebtor(_, _) | NotCreditor(_)
            | NotExpenseOwner(_) | NotFriends(_, _) | SelfTransaction
            | NotRequestRecipient(_) => StatusCode::FORBIDDEN,
            UserNotFound(_) | GroupNotFound(_) | TransactionNotFound(_) | OweNotFound(_)
            | ExpenseNotFound(_) | FriendshipNotFound(_, _) => StatusCode::NOT_FOUND,
            AlreadyPaid(_) | AlreadyFriends(_, _) | RequestAlreadyPending(_, _)
            | AlreadyGroupMember(_) | PaidOweImmutable(_) | TransactionHasPaidOwes(_)
            | AlreadyAdmin(_) | AdminRemoval | EmailAlreadyRegistered(_) => StatusCode::CONFLICT,
            Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

async fn create_user(
    State(service): State<Service>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = service
        .create_user(req.name, req.email, req.avatar_url)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(service.get_user(user_id).await?))
}

async fn update_profile(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let user = service
        .update_profile(user_id, req.name, req.avatar_url)
        .await?;
    Ok(Json(user))
}

async fn send_friend_request(
    State(service): State<Service>,
    Json(req): Json<FriendRequestPayload>,
) -> Result<(StatusCode, Json<Friendship>), ApiError> {
    let friendship = service
        .send_friend_request(req.requester_id, req.recipient_id)
        .await?;
    Ok((StatusCode::CREATED, Json(friendship)))
}

async fn accept_friend_request(
    State(service): State<Service>,
    Json(req): Json<FriendRequestPayload>,
) -> Result<Json<Friendship>, ApiError> {
    let friendship = service
        .accept_friend_request(req.recipient_id, req.requester_id)
        .await?;
    Ok(Json(friendship))
}

async fn remove_friend(
    State(service): State<Service>,
    Json(req): Json<FriendRequestPayload>,
) -> Result<StatusCode, ApiError> {
    service
        .remove_friend(req.requester_id, req.recipient_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn list_friends(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    Ok(Json(service.list_friends(user_id).await?))
}

async fn create_group(
    State(service): State<Service>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service
        .create_group(req.admin_id, req.name, req.description, req.member_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn get_group(
    State(service): State<Service>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(service.get_group(group_id).await?))
}

async fn user_groups(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(service.user_groups(user_id).await?))
}

async fn add_member(
    State(service): State<Service>,
    Path(group_id): Path<Uuid>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .add_member(group_id, req.acting_id, req.user_id)
        .await?;
    Ok(Json(group))
}

async fn remove_member(
    State(service): State<Service>,
    Path(group_id): Path<Uuid>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .remove_member(group_id, req.acting_id, req.user_id)
        .await?;
    Ok(Json(group))
}

async fn transfer_admin(
    State(service): State<Service>,
    Path(group_id): Path<Uuid>,
    Json(req): Json<TransferAdminRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .transfer_admin(group_id, req.acting_id, req.new_admin_id)
        .await?;
    Ok(Json(group))
}

async fn leave_group(
    State(service): State<Service>,
    Path(group_id): Path<Uuid>,
    Json(req): Json<LeaveGroupRequest>,
) -> Result<StatusCode, ApiError> {
    service.leave_group(group_id, req.user_id).await?;
    Ok(StatusCode::OK)
}

async fn group_transactions(
    State(service): State<Service>,
    Path(group_id): Path<Uuid>,
    Query(params): Query<RequesterParams>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = service
        .group_transactions(group_id, params.requester_id)
        .await?;
    Ok(Json(transactions))
}

async fn create_split(
    State(service): State<Service>,
    Json(req): Json<CreateSplitRequest>,
) -> Result<(StatusCode, Json<SplitResponse>), ApiError> {
    let shares = |map: Option<HashMap<Uuid, Decimal>>| {
        map.unwrap_or_default().into_iter().collect::<Vec<_>>()
    };
    let spec = match req.split_type {
        SplitType::Equal => SplitSpec::Equal {
            members: req.members.unwrap_or_default(),
        },
        SplitType::Percentage => SplitSpec::Percentage {
            shares: shares(req.member_shares),
        },
        SplitType::Share => SplitSpec::Share {
            shares: shares(req.member_shares),
        },
        SplitType::Direct => {
            return Err(ApiError(LedgerError::InvalidInput {
                field: "split_type".to_string(),
                message: "DIRECT transactions are created via /owes/direct".to_string(),
            }));
        }
    };
    let (transaction, owes) = service
        .create_split(
            req.group_id,
            req.requester_id,
            req.amount,
            spec,
            req.category,
            req.title,
            req.description,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SplitResponse { transaction, owes }),
    ))
}

async fn create_direct_request(
    State(service): State<Service>,
    Json(req): Json<DirectRequestPayload>,
) -> Result<(StatusCode, Json<Owe>), ApiError> {
    let owe = service
        .create_direct_request(
            req.creditor_id,
            req.debtor_id,
            req.amount,
            req.category,
            req.title,
            req.description,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(owe)))
}

async fn pay_owe(
    State(service): State<Service>,
    Path(owe_id): Path<Uuid>,
    Json(req): Json<PayOweRequest>,
) -> Result<Json<SettlementOutcome>, ApiError> {
    Ok(Json(service.pay_owe(owe_id, req.payer_id).await?))
}

async fn delete_owe(
    State(service): State<Service>,
    Path(owe_id): Path<Uuid>,
    Query(params): Query<RequesterParams>,
) -> Result<StatusCode, ApiError> {
    service.delete_owe(owe_id, params.requester_id).await?;
    Ok(StatusCode::OK)
}

async fn delete_transaction(
    State(service): State<Service>,
    Path(transaction_id): Path<Uuid>,
    Query(params): Query<RequesterParams>,
) -> Result<StatusCode, ApiError> {
    service
        .delete_transaction(transaction_id, params.requester_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn owes_of_user(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<OweView>>, ApiError> {
    Ok(Json(service.owes_of_user(user_id).await?))
}

async fn amount_owed_to_user(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<OweView>>, ApiError> {
    Ok(Json(service.amount_owed_to_user(user_id).await?))
}

async fn rebuild_balance(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = service.rebuild_balance(user_id).await?;
    Ok(Json(BalanceResponse { user_id, balance }))
}

async fn add_expense(
    State(service): State<Service>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = service
        .add_expense(
            req.owner_id,
            req.category,
            req.amount,
            req.title,
            req.description,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn delete_expense(
    State(service): State<Service>,
    Path(expense_id): Path<Uuid>,
    Query(params): Query<RequesterParams>,
) -> Result<StatusCode, ApiError> {
    service
        .delete_expense(expense_id, params.requester_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn expenses_of_user(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<ExpensePage>, ApiError> {
    let page = service
        .expenses_of_user(
            user_id,
            params.page.unwrap_or(1),
            params.limit.unwrap_or(10),
        )
        .await?;
    Ok(Json(page))
}

async fn remove_all_expenses(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let removed = service.remove_all_expenses(user_id).await?;
    Ok(Json(RemovedResponse { removed }))
}

async fn expense_comparison(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ExpenseComparison>, ApiError> {
    Ok(Json(service.expense_comparison(user_id, Utc::now()).await?))
}

async fn expenses_by_category(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<CategoryExpenses>>, ApiError> {
    let categories = service
        .expenses_by_category(
            user_id,
            params.page.unwrap_or(1),
            params.limit.unwrap_or(10),
        )
        .await?;
    Ok(Json(categories))
}

async fn category_breakdown(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<CategoryTotal>>, ApiError> {
    Ok(Json(service.category_breakdown(user_id, Utc::now()).await?))
}

async fn daily_trend(
    State(service): State<Service>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<DailyTotal>>, ApiError> {
    Ok(Json(service.daily_trend(user_id, Utc::now()).await?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_filter.as_str())
        .init();

    let storage = InMemoryStorage::new();
    let service = Arc::new(LedgerService::new(storage));

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/users", post(create_user))
        .route("/users/{user_id}", get(get_user).patch(update_profile))
        .route("/friendships/request", post(send_friend_request))
        .route("/friendships/accept", post(accept_friend_request))
        .route("/friendships/remove", post(remove_friend))
        .route("/users/{user_id}/friends", get(list_friends))
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group))
        .route("/groups/{group_id}/members", post(add_member))
        .route("/groups/{group_id}/members/remove", post(remove_member))
        .route("/groups/{group_id}/admin", post(transfer_admin))
        .route("/groups/{group_id}/leave", post(leave_group))
        .route("/groups/{group_id}/transactions", get(group_transactions))
        .route("/users/{user_id}/groups", get(user_groups))
        .route("/splits", post(create_split))
        .route("/owes/direct", post(create_direct_request))
        .route("/owes/{owe_id}/pay", post(pay_owe))
        .route("/owes/{owe_id}", delete(delete_owe))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
        .route("/users/{user_id}/owes", get(owes_of_user))
        .route("/users/{user_id}/owed", get(amount_owed_to_user))
        .route("/users/{user_id}/balance/rebuild", post(rebuild_balance))
        .route("/expenses", post(add_expense))
        .route("/expenses/{expense_id}", delete(delete_expense))
        .route(
            "/users/{user_id}/expenses",
            get(expenses_of_user).delete(remove_all_expenses),
        )
        .route(
            "/users/{user_id}/analytics/comparison",
            get(expense_comparison),
        )
        .route(
            "/users/{user_id}/analytics/categories",
            get(expenses_by_category),
        )
        .route(
            "/users/{user_id}/analytics/breakdown",
            get(category_breakdown),
        )
        .route("/users/{user_id}/analytics/daily", get(daily_trend))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            CONFIG.request_timeout_secs,
        )))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PATCH,
                    http::Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service);

    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
