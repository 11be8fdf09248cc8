use crate::core::analytics::{
    current_month, current_week, past_month, past_week, percentage_delta, trailing_28_days,
};
use crate::core::models::Category;
use crate::infrastructure::storage::Storage;
use crate::tests::{create_test_service, expense_on, test_user};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Wednesday 2025-03-19; its week runs Sunday Mar 16 through Saturday Mar 22.
fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 19, 12, 0, 0).unwrap()
}

#[test]
fn week_windows_start_on_sunday() {
    let week = current_week(fixed_now());
    assert_eq!(week.start, Utc.with_ymd_and_hms(2025, 3, 16, 0, 0, 0).unwrap());
    assert_eq!(
        week.end,
        Utc.with_ymd_and_hms(2025, 3, 22, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(999)
    );

    let previous = past_week(fixed_now());
    assert_eq!(
        previous.start,
        Utc.with_ymd_and_hms(2025, 3, 9, 0, 0, 0).unwrap()
    );

    // A Sunday is the first day of its own week.
    let sunday = Utc.with_ymd_and_hms(2025, 3, 16, 8, 0, 0).unwrap();
    assert_eq!(current_week(sunday).start, week.start);
}

#[test]
fn month_windows_cover_whole_calendar_months() {
    let month = current_month(fixed_now());
    assert_eq!(month.start, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    assert!(month.contains(Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap()));
    assert!(!month.contains(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()));

    // February 2025 has 28 days.
    let previous = past_month(fixed_now());
    assert_eq!(
        previous.start,
        Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
    );
    assert!(previous.contains(Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap()));
    assert!(!previous.contains(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
}

#[test]
fn trailing_window_spans_twenty_eight_days_inclusive() {
    let window = trailing_28_days(fixed_now());
    assert_eq!(
        window.start,
        Utc.with_ymd_and_hms(2025, 2, 20, 0, 0, 0).unwrap()
    );
    assert!(window.contains(Utc.with_ymd_and_hms(2025, 2, 20, 0, 0, 0).unwrap()));
    assert!(!window.contains(Utc.with_ymd_and_hms(2025, 2, 19, 23, 59, 59).unwrap()));
}

#[test]
fn percentage_delta_formats_with_explicit_sign() {
    assert_eq!(percentage_delta(dec!(150), dec!(100)), "+50.00%");
    assert_eq!(percentage_delta(dec!(50), dec!(100)), "-50.00%");
    assert_eq!(percentage_delta(dec!(100), dec!(100)), "+0.00%");
    // Zero previous period always reads +100%, even when current is zero.
    assert_eq!(percentage_delta(dec!(50), Decimal::ZERO), "+100%");
    assert_eq!(percentage_delta(Decimal::ZERO, Decimal::ZERO), "+100%");
}

#[tokio::test]
async fn comparison_totals_each_window_independently() {
    let (service, storage) = create_test_service();
    let alice = test_user(&service, "Alice").await;

    for expense in [
        expense_on(alice.id, Category::Food, dec!(10.00), 2025, 3, 17),
        expense_on(alice.id, Category::Outing, dec!(20.00), 2025, 3, 10),
        expense_on(alice.id, Category::Food, dec!(5.00), 2025, 3, 3),
        expense_on(alice.id, Category::Studies, dec!(40.00), 2025, 2, 14),
        expense_on(alice.id, Category::Miscellaneous, dec!(7.50), 2024, 12, 25),
    ] {
        storage.insert_expense(expense).await.unwrap();
    }

    let comparison = service
        .expense_comparison(alice.id, fixed_now())
        .await
        .unwrap();

    assert_eq!(comparison.week_total, dec!(10.00));
    assert_eq!(comparison.past_week_total, dec!(20.00));
    assert_eq!(comparison.month_total, dec!(35.00));
    assert_eq!(comparison.past_month_total, dec!(40.00));
    assert_eq!(comparison.overall_total, dec!(82.50));
    assert_eq!(comparison.week_delta, "-50.00%");
    assert_eq!(comparison.month_delta, "-12.50%");
}

#[tokio::test]
async fn comparison_on_an_empty_ledger_reads_plus_one_hundred() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;

    let comparison = service
        .expense_comparison(alice.id, fixed_now())
        .await
        .unwrap();
    assert_eq!(comparison.overall_total, Decimal::ZERO);
    assert_eq!(comparison.week_delta, "+100%");
    assert_eq!(comparison.month_delta, "+100%");
}

#[tokio::test]
async fn category_breakdown_reports_every_category_over_the_trailing_window() {
    let (service, storage) = create_test_service();
    let alice = test_user(&service, "Alice").await;

    for expense in [
        expense_on(alice.id, Category::Food, dec!(10.00), 2025, 3, 17),
        expense_on(alice.id, Category::Food, dec!(5.00), 2025, 3, 3),
        expense_on(alice.id, Category::Outing, dec!(20.00), 2025, 3, 10),
        // Outside the trailing 28 days, must not count.
        expense_on(alice.id, Category::Studies, dec!(40.00), 2025, 2, 14),
    ] {
        storage.insert_expense(expense).await.unwrap();
    }

    let breakdown = service
        .category_breakdown(alice.id, fixed_now())
        .await
        .unwrap();

    assert_eq!(breakdown.len(), Category::ALL.len());
    let total_of = |category: Category| {
        breakdown
            .iter()
            .find(|t| t.category == category)
            .unwrap()
            .total
    };
    assert_eq!(total_of(Category::Food), dec!(15.00));
    assert_eq!(total_of(Category::Outing), dec!(20.00));
    assert_eq!(total_of(Category::Studies), Decimal::ZERO);
    assert_eq!(total_of(Category::Miscellaneous), Decimal::ZERO);
}

#[tokio::test]
async fn daily_trend_sums_per_day_ascending_and_skips_empty_days() {
    let (service, storage) = create_test_service();
    let alice = test_user(&service, "Alice").await;

    for expense in [
        expense_on(alice.id, Category::Food, dec!(4.00), 2025, 3, 17),
        expense_on(alice.id, Category::Outing, dec!(6.00), 2025, 3, 17),
        expense_on(alice.id, Category::Food, dec!(20.00), 2025, 3, 10),
        expense_on(alice.id, Category::Food, dec!(5.00), 2025, 3, 3),
        expense_on(alice.id, Category::Studies, dec!(40.00), 2025, 1, 1),
    ] {
        storage.insert_expense(expense).await.unwrap();
    }

    let trend = service.daily_trend(alice.id, fixed_now()).await.unwrap();

    assert_eq!(trend.len(), 3);
    assert_eq!((trend[0].month, trend[0].day), (3, 3));
    assert_eq!(trend[0].total, dec!(5.00));
    assert_eq!((trend[1].month, trend[1].day), (3, 10));
    assert_eq!(trend[1].total, dec!(20.00));
    assert_eq!((trend[2].month, trend[2].day), (3, 17));
    assert_eq!(trend[2].total, dec!(10.00));
}
