use crate::core::models::{Category, Expense};
use chrono::{DateTime, Datelike, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An inclusive time window with day-boundary endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

/// Week of `now`, starting Sunday (day-of-week index 0).
pub fn current_week(now: DateTime<Utc>) -> Window {
    let start_date = now.date_naive() - Duration::days(now.weekday().num_days_from_sunday() as i64);
    Window {
        start: start_date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        end: (start_date + Duration::days(6))
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
            .and_utc(),
    }
}

/// The seven days immediately preceding the current week's start.
pub fn past_week(now: DateTime<Utc>) -> Window {
    let week = current_week(now);
    Window {
        start: week.start - Duration::days(7),
        end: week.end - Duration::days(7),
    }
}

/// Calendar month of `now`.
pub fn current_month(now: DateTime<Utc>) -> Window {
    let first = now.date_naive().with_day(1).unwrap();
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap();
    Window {
        start: first.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        end: last.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc(),
    }
}

/// The calendar month immediately preceding the one holding `now`.
pub fn past_month(now: DateTime<Utc>) -> Window {
    let first = now.date_naive().with_day(1).unwrap();
    let prev_first = first.checked_sub_months(Months::new(1)).unwrap();
    let prev_last = first.pred_opt().unwrap();
    Window {
        start: prev_first.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        end: prev_last
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
            .and_utc(),
    }
}

/// Trailing 28-day charting window ending at `now`.
pub fn trailing_28_days(now: DateTime<Utc>) -> Window {
    Window {
        start: (now.date_naive() - Duration::days(27))
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc(),
        end: now,
    }
}

/// Percentage change between two period totals, rendered with an explicit
/// leading sign and two decimals. A zero previous period always reads
/// "+100%", even when the current period is also zero.
pub fn percentage_delta(current: Decimal, previous: Decimal) -> String {
    if previous.is_zero() {
        return "+100%".to_string();
    }
    let pct = (current - previous) / previous * Decimal::ONE_HUNDRED;
    let sign = if pct.is_sign_negative() { "" } else { "+" };
    format!("{}{:.2}%", sign, pct)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpenseComparison {
    pub week_total: Decimal,
    pub past_week_total: Decimal,
    pub month_total: Decimal,
    pub past_month_total: Decimal,
    pub overall_total: Decimal,
    pub week_delta: String,
    pub month_delta: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyTotal {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub total: Decimal,
}

fn sum_within(expenses: &[Expense], window: Window) -> Decimal {
    expenses
        .iter()
        .filter(|e| window.contains(e.created_at))
        .map(|e| e.amount)
        .sum()
}

/// Time-windowed totals and deltas over one user's expense rows.
pub fn comparison(expenses: &[Expense], now: DateTime<Utc>) -> ExpenseComparison {
    let week_total = sum_within(expenses, current_week(now));
    let past_week_total = sum_within(expenses, past_week(now));
    let month_total = sum_within(expenses, current_month(now));
    let past_month_total = sum_within(expenses, past_month(now));
    let overall_total = expenses.iter().map(|e| e.amount).sum();

    ExpenseComparison {
        week_delta: percentage_delta(week_total, past_week_total),
        month_delta: percentage_delta(month_total, past_month_total),
        week_total,
        past_week_total,
        month_total,
        past_month_total,
        overall_total,
    }
}

/// Per-category sums over the trailing 28 days, in the fixed category
/// order. Categories without spending report zero.
pub fn category_breakdown(expenses: &[Expense], now: DateTime<Utc>) -> Vec<CategoryTotal> {
    let window = trailing_28_days(now);
    let mut totals: HashMap<Category, Decimal> = HashMap::new();
    for expense in expenses.iter().filter(|e| window.contains(e.created_at)) {
        *totals.entry(expense.category).or_insert(Decimal::ZERO) += expense.amount;
    }
    Category::ALL
        .iter()
        .map(|&category| CategoryTotal {
            category,
            total: totals.get(&category).copied().unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Per-day sums over the trailing 28 days, ascending by date. Days without
/// spending are omitted.
pub fn daily_trend(expenses: &[Expense], now: DateTime<Utc>) -> Vec<DailyTotal> {
    let window = trailing_28_days(now);
    let mut totals: HashMap<(i32, u32, u32), Decimal> = HashMap::new();
    for expense in expenses.iter().filter(|e| window.contains(e.created_at)) {
        let date = expense.created_at.date_naive();
        *totals
            .entry((date.year(), date.month(), date.day()))
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    let mut days: Vec<DailyTotal> = totals
        .into_iter()
        .map(|((year, month, day), total)| DailyTotal {
            year,
            month,
            day,
            total,
        })
        .collect();
    days.sort_by_key(|d| (d.year, d.month, d.day));
    days
}
