use crate::core::errors::LedgerError;
use crate::core::models::SplitType;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;
use uuid::Uuid;

/// Largest amount a single split may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// How a total is divided among the selected members. The requester is an
/// implicit participant of every policy and never appears in the inputs;
/// their share is whatever remains after the members are served.
#[derive(Clone, Debug)]
pub enum SplitSpec {
    Equal { members: Vec<Uuid> },
    /// Percent of the total per member, each in (0, 100].
    Percentage { shares: Vec<(Uuid, Decimal)> },
    /// Absolute currency amount per member.
    Share { shares: Vec<(Uuid, Decimal)> },
}

impl SplitSpec {
    pub fn split_type(&self) -> SplitType {
        match self {
            SplitSpec::Equal { .. } => SplitType::Equal,
            SplitSpec::Percentage { .. } => SplitType::Percentage,
            SplitSpec::Share { .. } => SplitType::Share,
        }
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        match self {
            SplitSpec::Equal { members } => members.clone(),
            SplitSpec::Percentage { shares } | SplitSpec::Share { shares } => {
                shares.iter().map(|(id, _)| *id).collect()
            }
        }
    }
}

/// The validated outcome of a split: one amount per selected member plus
/// the requester's own (pre-paid) share. Sums to the total exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareAllocation {
    pub requester_share: Decimal,
    pub member_shares: Vec<(Uuid, Decimal)>,
}

impl ShareAllocation {
    pub fn total(&self) -> Decimal {
        self.requester_share + self.member_shares.iter().map(|(_, s)| *s).sum::<Decimal>()
    }
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rejects amounts that are non-positive, over the cap, or finer than cents.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(
            "amount must be greater than 0".to_string(),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmount(
            "amount cannot exceed 1,000,000".to_string(),
        ));
    }
    if amount.round_dp(2) != amount {
        return Err(LedgerError::InvalidAmount(
            "amount cannot have more than 2 decimal places".to_string(),
        ));
    }
    Ok(())
}

fn validate_members(member_ids: &[Uuid], requester: Uuid) -> Result<(), LedgerError> {
    if member_ids.is_empty() {
        return Err(LedgerError::NoParticipants);
    }
    let mut seen = HashSet::new();
    for &id in member_ids {
        if id == requester {
            return Err(LedgerError::RequesterInSplit(id));
        }
        if !seen.insert(id) {
            return Err(LedgerError::DuplicateSplitMember(id));
        }
    }
    Ok(())
}

/// Pure split calculator. Divides `total` among the selected members under
/// the given policy; the requester absorbs any rounding residue so that
/// the allocation always sums back to `total` exactly.
pub fn compute_shares(
    total: Decimal,
    spec: &SplitSpec,
    requester: Uuid,
) -> Result<ShareAllocation, LedgerError> {
    validate_amount(total)?;
    validate_members(&spec.member_ids(), requester)?;

    let member_shares: Vec<(Uuid, Decimal)> = match spec {
        SplitSpec::Equal { members } => {
            let head_count = Decimal::from(members.len() + 1);
            let per_head = round_cents(total / head_count);
            members.iter().map(|&id| (id, per_head)).collect()
        }
        SplitSpec::Percentage { shares } => {
            for &(id, pct) in shares {
                if pct <= Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                    return Err(LedgerError::InvalidPercentage(id));
                }
            }
            let pct_sum: Decimal = shares.iter().map(|(_, p)| *p).sum();
            if pct_sum >= Decimal::ONE_HUNDRED {
                return Err(LedgerError::PercentageExceedsLimit);
            }
            shares
                .iter()
                .map(|&(id, pct)| (id, round_cents(total * pct / Decimal::ONE_HUNDRED)))
                .collect()
        }
        SplitSpec::Share { shares } => {
            for &(id, share) in shares {
                if share <= Decimal::ZERO || share.round_dp(2) != share {
                    return Err(LedgerError::InvalidShare(id));
                }
            }
            let share_sum: Decimal = shares.iter().map(|(_, s)| *s).sum();
            if share_sum > total {
                return Err(LedgerError::SharesExceedTotal);
            }
            shares.clone()
        }
    };

    // Every debtor owes a positive amount; a share that rounds to zero
    // means the total is too small for this member count or percentage.
    if let Some(&(id, _)) = member_shares.iter().find(|(_, s)| s.is_zero()) {
        return Err(LedgerError::InvalidShare(id));
    }

    let allocated: Decimal = member_shares.iter().map(|(_, s)| *s).sum();
    let requester_share = total - allocated;
    if requester_share < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(
            "amount too small to split among this many members".to_string(),
        ));
    }

    Ok(ShareAllocation {
        requester_share,
        member_shares,
    })
}
