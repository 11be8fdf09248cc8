mod analytics_tests;
mod expense_tests;
mod friendship_tests;

use crate::core::models::{Category, Expense, User};
use crate::core::service::LedgerService;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn create_test_service() -> (LedgerService<InMemoryStorage>, InMemoryStorage) {
    let storage = InMemoryStorage::new();
    let service = LedgerService::new(storage.clone());
    (service, storage)
}

pub async fn test_user(service: &LedgerService<InMemoryStorage>, name: &str) -> User {
    service
        .create_user(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            None,
        )
        .await
        .unwrap()
}

pub async fn befriend(service: &LedgerService<InMemoryStorage>, a: Uuid, b: Uuid) {
    service.send_friend_request(a, b).await.unwrap();
    service.accept_friend_request(b, a).await.unwrap();
}

pub fn expense_on(
    owner: Uuid,
    category: Category,
    amount: Decimal,
    year: i32,
    month: u32,
    day: u32,
) -> Expense {
    Expense {
        id: Uuid::new_v4(),
        owner,
        category,
        amount,
        title: "expense".to_string(),
        description: String::new(),
        created_at: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
    }
}
