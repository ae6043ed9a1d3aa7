//! Folding financial state patches into the tracked state.
//!
//! Merging is shallow: each field present in the patch replaces the previous
//! value, absent fields are left alone. Debt maps are replaced wholesale, the
//! model is expected to send the complete map whenever it sends one.

use shared::{FinancialState, FinancialStatePatch};

/// Apply a non-reset patch on top of the previous state.
///
/// Callers handle `patch.reset` themselves by calling [`reset`] instead; the
/// reset flag is ignored here.
pub fn merge(previous: Option<FinancialState>, patch: &FinancialStatePatch) -> Option<FinancialState> {
    let mut state = previous.unwrap_or_default();

    if let Some(cash) = patch.cash {
        state.cash = Some(cash);
    }
    if let Some(bank) = patch.bank {
        state.bank = Some(bank);
    }
    if let Some(debts_to_user) = &patch.debts_to_user {
        state.debts_to_user = Some(debts_to_user.clone());
    }
    if let Some(user_debts) = &patch.user_debts {
        state.user_debts = Some(user_debts.clone());
    }

    Some(state)
}

/// The "no state" value that replaces everything on a reset.
pub fn reset() -> Option<FinancialState> {
    None
}
