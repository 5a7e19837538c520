use serde::Serialize;

use crate::error::ValidationError;
use crate::models::Member;

/// Slack for float sums like 33.33 + 33.33 + 33.34
const SHARE_EPSILON: f64 = 1e-9;

/// One member's cut of the net profit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberShare {
    pub member_id: String,
    pub name: String,
    pub share_percentage: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ProfitShares {
    /// One entry per member, in membership order
    Distributed(Vec<MemberShare>),
    /// Net profit was zero or negative; nothing is distributed
    NoProfit,
}

impl ProfitShares {
    pub fn is_distributed(&self) -> bool {
        matches!(self, ProfitShares::Distributed(_))
    }

    pub fn total(&self) -> f64 {
        match self {
            ProfitShares::Distributed(shares) => shares.iter().map(|s| s.amount).sum(),
            ProfitShares::NoProfit => 0.0,
        }
    }
}

pub fn compute_member_shares(net_profit: f64, members: &[Member]) -> ProfitShares {
    if net_profit <= 0.0 {
        return ProfitShares::NoProfit;
    }

    let shares = members
        .iter()
        .map(|member| MemberShare {
            member_id: member.user.id().to_string(),
            name: member.display_name(),
            share_percentage: member.share_percentage,
            amount: net_profit * member.share_percentage / 100.0,
        })
        .collect();

    ProfitShares::Distributed(shares)
}

/// Outcome of an accepted share configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShareCheck {
    Complete,
    /// Allowed, but the UI should warn that shares do not add up to 100%
    UnderAllocated { remaining: f64 },
}

impl ShareCheck {
    pub fn warning(&self) -> Option<String> {
        match self {
            ShareCheck::Complete => None,
            ShareCheck::UnderAllocated { remaining } => Some(format!(
                "Total share is {}% (should equal 100%)",
                crate::report::format_percentage(100.0 - remaining)
            )),
        }
    }
}

/// Check the combined share of `members` plus an optional member about to be added.
/// Only a total above 100% is rejected.
pub fn validate_shares(
    members: &[Member],
    incoming: Option<f64>,
) -> Result<ShareCheck, ValidationError> {
    for share in members
        .iter()
        .map(|m| m.share_percentage)
        .chain(incoming)
    {
        if !share.is_finite() || !(0.0..=100.0).contains(&share) {
            return Err(ValidationError::ShareOutOfRange(share));
        }
    }

    let total: f64 = members
        .iter()
        .map(|m| m.share_percentage)
        .chain(incoming)
        .sum();

    if total > 100.0 + SHARE_EPSILON {
        return Err(ValidationError::ShareLimitExceeded { total });
    }

    if (100.0 - total).abs() <= SHARE_EPSILON {
        Ok(ShareCheck::Complete)
    } else {
        Ok(ShareCheck::UnderAllocated {
            remaining: 100.0 - total,
        })
    }
}
