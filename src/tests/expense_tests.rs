use crate::core::errors::LedgerError;
use crate::core::models::Category;
use crate::infrastructure::storage::Storage;
use crate::tests::{create_test_service, expense_on, test_user};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn expense_pages_are_newest_first() {
    let (service, storage) = create_test_service();
    let alice = test_user(&service, "Alice").await;

    // 25 expenses, one per day of March, oldest first.
    for day in 1..=25 {
        storage
            .insert_expense(expense_on(alice.id, Category::Food, dec!(1.00), 2025, 3, day))
            .await
            .unwrap();
    }

    let page = service.expenses_of_user(alice.id, 1, 10).await.unwrap();
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.expenses.len(), 10);
    assert_eq!(page.expenses[0].created_at.format("%d").to_string(), "25");
    assert_eq!(page.expenses[9].created_at.format("%d").to_string(), "16");

    let last = service.expenses_of_user(alice.id, 3, 10).await.unwrap();
    assert_eq!(last.expenses.len(), 5);
    assert_eq!(last.expenses[4].created_at.format("%d").to_string(), "01");

    // Walking past the end yields an empty page, not an error.
    let beyond = service.expenses_of_user(alice.id, 4, 10).await.unwrap();
    assert!(beyond.expenses.is_empty());
    assert_eq!(beyond.total_count, 25);
}

#[tokio::test]
async fn add_expense_validates_its_inputs() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;

    let result = service
        .add_expense(
            alice.id,
            Category::Food,
            dec!(10.00),
            "  ".to_string(),
            String::new(),
        )
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidInput { .. })));

    let result = service
        .add_expense(
            alice.id,
            Category::Food,
            dec!(-3.00),
            "Lunch".to_string(),
            String::new(),
        )
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));

    let expense = service
        .add_expense(
            alice.id,
            Category::Food,
            dec!(12.50),
            "Lunch".to_string(),
            "canteen".to_string(),
        )
        .await
        .unwrap();
    assert_eq!(expense.amount, dec!(12.50));
    assert_eq!(expense.owner, alice.id);
}

#[tokio::test]
async fn only_the_owner_may_delete_an_expense() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let bob = test_user(&service, "Bob").await;

    let expense = service
        .add_expense(
            alice.id,
            Category::Outing,
            dec!(8.00),
            "Cinema".to_string(),
            String::new(),
        )
        .await
        .unwrap();

    let result = service.delete_expense(expense.id, bob.id).await;
    assert!(matches!(result, Err(LedgerError::NotExpenseOwner(id)) if id == bob.id));

    service.delete_expense(expense.id, alice.id).await.unwrap();
    let result = service.delete_expense(expense.id, alice.id).await;
    assert!(matches!(result, Err(LedgerError::ExpenseNotFound(_))));

    let result = service.delete_expense(Uuid::new_v4(), alice.id).await;
    assert!(matches!(result, Err(LedgerError::ExpenseNotFound(_))));
}

#[tokio::test]
async fn remove_all_reports_the_count_and_spares_other_users() {
    let (service, storage) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let bob = test_user(&service, "Bob").await;

    for day in 1..=3 {
        storage
            .insert_expense(expense_on(alice.id, Category::Food, dec!(5.00), 2025, 3, day))
            .await
            .unwrap();
    }
    storage
        .insert_expense(expense_on(bob.id, Category::Food, dec!(5.00), 2025, 3, 1))
        .await
        .unwrap();

    let removed = service.remove_all_expenses(alice.id).await.unwrap();
    assert_eq!(removed, 3);
    assert_eq!(
        service
            .expenses_of_user(alice.id, 1, 10)
            .await
            .unwrap()
            .total_count,
        0
    );
    assert_eq!(
        service
            .expenses_of_user(bob.id, 1, 10)
            .await
            .unwrap()
            .total_count,
        1
    );

    // Idempotent on an empty ledger.
    assert_eq!(service.remove_all_expenses(alice.id).await.unwrap(), 0);
}

#[tokio::test]
async fn category_listing_totals_and_pages_each_category_separately() {
    let (service, storage) = create_test_service();
    let alice = test_user(&service, "Alice").await;

    for day in 1..=3 {
        storage
            .insert_expense(expense_on(alice.id, Category::Food, dec!(10.00), 2025, 3, day))
            .await
            .unwrap();
    }
    storage
        .insert_expense(expense_on(alice.id, Category::Studies, dec!(99.99), 2025, 3, 5))
        .await
        .unwrap();

    let listing = service.expenses_by_category(alice.id, 1, 2).await.unwrap();
    assert_eq!(listing.len(), Category::ALL.len());

    let food = listing
        .iter()
        .find(|c| c.category == Category::Food)
        .unwrap();
    assert_eq!(food.total, dec!(30.00));
    assert_eq!(food.total_pages, 2);
    assert_eq!(food.expenses.len(), 2);

    let studies = listing
        .iter()
        .find(|c| c.category == Category::Studies)
        .unwrap();
    assert_eq!(studies.total, dec!(99.99));
    assert_eq!(studies.expenses.len(), 1);

    let outing = listing
        .iter()
        .find(|c| c.category == Category::Outing)
        .unwrap();
    assert!(outing.expenses.is_empty());
    assert_eq!(outing.total_pages, 0);
}
