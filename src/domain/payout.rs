//! Payout preview: distributing an amount across a split's shares
//!
//! Amounts are integer cents. Each share is rounded down and the rounding
//! remainder goes to the largest share, so the lines always sum to the amount.

use crate::domain::entities::{Allocation, MemberId};
use crate::domain::error::ValidationError;
use crate::domain::percentage::Percentage;
use crate::domain::validation::validate_allocation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payee {
    Creator,
    Member(MemberId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutLine {
    pub payee: Payee,
    pub percentage: Percentage,
    pub amount_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub amount_cents: u64,
    /// Creator first, then members in display order
    pub lines: Vec<PayoutLine>,
}

impl Payout {
    pub fn creator_share(&self) -> u64 {
        self.lines
            .iter()
            .find(|l| l.payee == Payee::Creator)
            .map(|l| l.amount_cents)
            .unwrap_or(0)
    }

    pub fn member_share(&self, id: &MemberId) -> Option<u64> {
        self.lines
            .iter()
            .find(|l| matches!(&l.payee, Payee::Member(m) if m == id))
            .map(|l| l.amount_cents)
    }

    pub fn distributed(&self) -> u64 {
        self.lines.iter().map(|l| l.amount_cents).sum()
    }
}

/// Distribute `amount_cents` over a fully allocated split.
pub fn distribute(
    amount_cents: u64,
    allocation: &impl Allocation,
) -> Result<Payout, ValidationError> {
    validate_allocation(allocation)?;

    let share = |pct: Percentage| -> u64 {
        // amount * 100 fits in u128 and the quotient never exceeds amount
        (u128::from(amount_cents) * u128::from(pct.value()) / 100) as u64
    };

    let mut lines = Vec::with_capacity(allocation.members().len() + 1);
    lines.push(PayoutLine {
        payee: Payee::Creator,
        percentage: allocation.creator_percentage(),
        amount_cents: share(allocation.creator_percentage()),
    });
    lines.extend(allocation.members().iter().map(|m| PayoutLine {
        payee: Payee::Member(m.id.clone()),
        percentage: m.percentage,
        amount_cents: share(m.percentage),
    }));

    // Remainder goes to the largest share; the earliest line wins ties.
    let floored: u64 = lines.iter().map(|l| l.amount_cents).sum();
    let largest = lines
        .iter()
        .enumerate()
        .rev()
        .max_by_key(|(_, l)| l.percentage)
        .map(|(index, _)| index);
    if let Some(index) = largest {
        lines[index].amount_cents += amount_cents - floored;
    }

    Ok(Payout {
        amount_cents,
        lines,
    })
}

/// Render cents as `1234.56`.
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
