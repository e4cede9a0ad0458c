//! Monthly dues rollover

use crate::models::{BillingMonth, Due, DueStatus};

/// Unpaid dues that bring `dues` up to `current`
///
/// Starts from the month after the last recorded due and stops at `current`
/// inclusive. An empty history yields just `current`; a history that already
/// reaches `current` (or runs ahead of it) yields nothing.
pub fn missing_dues(dues: &[Due], current: BillingMonth) -> Vec<Due> {
    let Some(last) = dues.last() else {
        return vec![Due::unpaid(current)];
    };

    let mut missing = Vec::new();
    let mut cursor = last.date;
    while cursor < current {
        cursor = cursor.next();
        missing.push(Due::unpaid(cursor));
    }
    missing
}

/// Mark the first due of `month` as paid, returning whether one matched
pub fn mark_paid(dues: &mut [Due], month: BillingMonth) -> bool {
    match dues.iter_mut().find(|due| due.date == month) {
        Some(due) => {
            due.status = DueStatus::Paid;
            true
        }
        None => false,
    }
}
