//! Summary service - derived dashboard queries
//!
//! Read-only computations over the in-memory transaction list: totals,
//! spending ratio, top expense categories, recent activity and the
//! month-over-month expense trend. Nothing here is persisted and nothing
//! touches the network.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Transaction, TransactionKind};
use crate::services::transactions::TransactionService;

/// Reporting window, relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Today's calendar date
    Day,
    /// The trailing seven days
    Week,
    /// The current calendar month
    Month,
    /// The current calendar year
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(Error::validation(format!("Unknown period: {}", other))),
        }
    }
}

/// One expense category with its share of total spend
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
    /// Share of total expense, 0-100
    pub percentage: Decimal,
}

/// The dashboard numbers in one shot
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    /// expense / income; zero when there is no income
    pub spending_ratio: Decimal,
    pub top_categories: Vec<CategoryTotal>,
    pub recent: Vec<Transaction>,
    /// Signed percent change of expense vs the previous calendar month;
    /// None when the previous month has no expenses
    pub month_over_month: Option<Decimal>,
}

/// How many categories the dashboard shows
const TOP_CATEGORY_LIMIT: usize = 3;

/// How many recent transactions the dashboard shows
const RECENT_LIMIT: usize = 4;

/// Summary service over the transaction store's current list
pub struct SummaryService {
    transactions: Arc<TransactionService>,
}

impl SummaryService {
    pub fn new(transactions: Arc<TransactionService>) -> Self {
        Self { transactions }
    }

    /// Full dashboard overview, optionally narrowed to a period
    pub fn overview(&self, period: Option<Period>) -> Overview {
        let now = Utc::now();
        let list = self.transactions.transactions();
        let list = match period {
            Some(period) => filter_period(&list, period, now),
            None => list,
        };
        overview_at(&list, now)
    }
}

/// Compute the overview for a fixed "now" (separated for testability)
pub fn overview_at(transactions: &[Transaction], now: DateTime<Utc>) -> Overview {
    let total_income = sum_kind(transactions, TransactionKind::Income);
    let total_expense = sum_kind(transactions, TransactionKind::Expense);

    Overview {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        spending_ratio: spending_ratio(total_income, total_expense),
        top_categories: top_expense_categories(transactions, TOP_CATEGORY_LIMIT),
        recent: recent(transactions, RECENT_LIMIT),
        month_over_month: month_over_month(transactions, now),
    }
}

/// Keep only transactions whose user-assigned date falls in the period
pub fn filter_period(
    transactions: &[Transaction],
    period: Period,
    now: DateTime<Utc>,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| match period {
            Period::Day => t.date.date_naive() == now.date_naive(),
            Period::Week => t.date > now - Duration::days(7) && t.date <= now,
            Period::Month => t.date.year() == now.year() && t.date.month() == now.month(),
            Period::Year => t.date.year() == now.year(),
        })
        .cloned()
        .collect()
}

/// expense / income, zero when income is zero
pub fn spending_ratio(total_income: Decimal, total_expense: Decimal) -> Decimal {
    if total_income > Decimal::ZERO {
        (total_expense / total_income).round_dp(4)
    } else {
        Decimal::ZERO
    }
}

/// Top expense categories by summed amount, with share of total spend
pub fn top_expense_categories(transactions: &[Transaction], limit: usize) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions.iter().filter(|t| t.kind == TransactionKind::Expense) {
        *by_category.entry(t.category.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }

    let total_spent: Decimal = by_category.values().copied().sum();

    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            percentage: if total_spent > Decimal::ZERO {
                (amount / total_spent * Decimal::ONE_HUNDRED).round_dp(1)
            } else {
                Decimal::ZERO
            },
            amount,
        })
        .collect();

    totals.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
    totals.truncate(limit);
    totals
}

/// Most recent transactions by user-assigned date, newest first
pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

/// Percent change of expense in the current calendar month vs the previous
///
/// None when the previous month has no expenses (no meaningful baseline).
pub fn month_over_month(transactions: &[Transaction], now: DateTime<Utc>) -> Option<Decimal> {
    let (this_year, this_month) = (now.year(), now.month());
    let (prev_year, prev_month) = if this_month == 1 {
        (this_year - 1, 12)
    } else {
        (this_year, this_month - 1)
    };

    let month_expense = |year: i32, month: u32| -> Decimal {
        transactions
            .iter()
            .filter(|t| {
                t.kind == TransactionKind::Expense
                    && t.date.year() == year
                    && t.date.month() == month
            })
            .map(|t| t.amount)
            .sum()
    };

    let current = month_expense(this_year, this_month);
    let previous = month_expense(prev_year, prev_month);

    if previous > Decimal::ZERO {
        Some(((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(1))
    } else {
        None
    }
}

fn sum_kind(transactions: &[Transaction], kind: TransactionKind) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}
