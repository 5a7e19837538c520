//! Totals and profit-sharing math
//!
//! Everything here is a pure function of its inputs; results are recomputed
//! for every report and never cached.

pub mod breakdown;
mod shares;
mod totals;

pub use shares::{compute_member_shares, validate_shares, MemberShare, ProfitShares, ShareCheck};
pub use totals::{compute_totals, Totals};

use serde::Serialize;

use crate::models::{Collaboration, ExpenseEntry, IncomeEntry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationShares {
    pub collaboration_id: String,
    pub name: String,
    pub shares: ProfitShares,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub totals: Totals,
    /// Same order as the collaborations passed in
    pub collaborations: Vec<CollaborationShares>,
}

pub fn aggregate(
    income: &[IncomeEntry],
    expenses: &[ExpenseEntry],
    collaborations: &[Collaboration],
) -> AggregationResult {
    let totals = compute_totals(income, expenses);

    let collaborations = collaborations
        .iter()
        .map(|c| CollaborationShares {
            collaboration_id: c.id.clone(),
            name: c.name.clone(),
            shares: compute_member_shares(totals.net_profit, &c.members),
        })
        .collect();

    AggregationResult {
        totals,
        collaborations,
    }
}
