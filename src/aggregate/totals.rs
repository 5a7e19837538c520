use serde::{Deserialize, Serialize};

use crate::models::{ExpenseEntry, IncomeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
}

impl Totals {
    pub fn has_profit(&self) -> bool {
        self.net_profit > 0.0
    }

    /// Equal at cent precision. Used to check server-side totals against our own.
    pub fn agrees_with(&self, other: &Totals) -> bool {
        let same = |a: f64, b: f64| (a - b).abs() < 0.005;
        same(self.total_income, other.total_income)
            && same(self.total_expenses, other.total_expenses)
            && same(self.net_profit, other.net_profit)
    }
}

/// Sum amounts at face value. Mixed currencies are not converted.
pub fn compute_totals(income: &[IncomeEntry], expenses: &[ExpenseEntry]) -> Totals {
    let total_income: f64 = income.iter().map(|e| e.amount).sum();
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();

    Totals {
        total_income,
        total_expenses,
        net_profit: total_income - total_expenses,
    }
}
