use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::Totals;
use crate::models::{ExpenseEntry, IncomeEntry, PaymentStatus, ReportPeriod};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusTotal {
    pub status: PaymentStatus,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DeductibleSplit {
    pub deductible: f64,
    pub non_deductible: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
    pub profit: f64,
}

/// Group by category, largest total first (ties by name)
fn by_category<'a, T: 'a>(
    items: impl Iterator<Item = &'a T>,
    category: impl Fn(&T) -> &str,
    amount: impl Fn(&T) -> f64,
) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for item in items {
        let slot = groups.entry(category(item)).or_default();
        slot.0 += amount(item);
        slot.1 += 1;
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();

    totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    totals
}

pub fn income_by_category(income: &[IncomeEntry]) -> Vec<CategoryTotal> {
    by_category(income.iter(), |e| e.category.as_str(), |e| e.amount)
}

pub fn expenses_by_category(expenses: &[ExpenseEntry]) -> Vec<CategoryTotal> {
    by_category(expenses.iter(), |e| e.category.as_str(), |e| e.amount)
}

/// Income per payment status. Every status is listed, even at zero.
pub fn income_by_status(income: &[IncomeEntry]) -> Vec<StatusTotal> {
    PaymentStatus::ALL
        .iter()
        .map(|status| {
            let matching = income.iter().filter(|e| e.payment_status == *status);
            let (total, count) = matching.fold((0.0, 0), |(t, c), e| (t + e.amount, c + 1));
            StatusTotal {
                status: *status,
                total,
                count,
            }
        })
        .collect()
}

/// Expenses without a tax flag count as non-deductible
pub fn tax_deductible_split(expenses: &[ExpenseEntry]) -> DeductibleSplit {
    expenses
        .iter()
        .fold(DeductibleSplit::default(), |mut split, e| {
            if e.is_tax_deductible == Some(true) {
                split.deductible += e.amount;
            } else {
                split.non_deductible += e.amount;
            }
            split
        })
}

/// Income, expenses and profit for each month the period touches
pub fn monthly_trend(
    period: &ReportPeriod,
    income: &[IncomeEntry],
    expenses: &[ExpenseEntry],
) -> Vec<MonthlyPoint> {
    period
        .months()
        .into_iter()
        .map(|(year, month)| {
            let in_month = |date: chrono::NaiveDate| date.year() == year && date.month() == month;
            let income: f64 = income
                .iter()
                .filter(|e| in_month(e.date))
                .map(|e| e.amount)
                .sum();
            let expenses: f64 = expenses
                .iter()
                .filter(|e| in_month(e.date))
                .map(|e| e.amount)
                .sum();
            MonthlyPoint {
                year,
                month,
                income,
                expenses,
                profit: income - expenses,
            }
        })
        .collect()
}

/// Net profit as a percentage of income; 0 when there is no income
pub fn profit_margin(totals: &Totals) -> f64 {
    if totals.total_income > 0.0 {
        totals.net_profit / totals.total_income * 100.0
    } else {
        0.0
    }
}
