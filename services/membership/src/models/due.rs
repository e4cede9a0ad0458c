//! Monthly dues and the billing month they belong to

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed monthly fee charged to every member
pub const MONTHLY_DUE_AMOUNT: i64 = 500;

/// A calendar month in `YYYY-MM` form
///
/// Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// Build a billing month, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar month right after this one
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error returned when a string is not a `YYYY-MM` month
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid billing month '{0}', expected YYYY-MM")]
pub struct ParseBillingMonthError(String);

impl FromStr for BillingMonth {
    type Err = ParseBillingMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseBillingMonthError(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        BillingMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for BillingMonth {
    type Error = ParseBillingMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BillingMonth> for String {
    fn from(month: BillingMonth) -> Self {
        month.to_string()
    }
}

/// Payment state of a due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueStatus {
    Unpaid,
    Paid,
}

impl DueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DueStatus::Unpaid => "unpaid",
            DueStatus::Paid => "paid",
        }
    }
}

impl FromStr for DueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(DueStatus::Unpaid),
            "paid" => Ok(DueStatus::Paid),
            other => Err(format!("unknown due status '{}'", other)),
        }
    }
}

/// One monthly payment obligation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    pub date: BillingMonth,
    pub amount: i64,
    pub status: DueStatus,
}

impl Due {
    /// A new unpaid due of the fixed monthly amount
    pub fn unpaid(date: BillingMonth) -> Self {
        Self {
            date,
            amount: MONTHLY_DUE_AMOUNT,
            status: DueStatus::Unpaid,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == DueStatus::Paid
    }
}

/// An unpaid due as shown to the member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutstandingDue {
    pub date: BillingMonth,
    pub amount: i64,
}

impl From<&Due> for OutstandingDue {
    fn from(due: &Due) -> Self {
        Self {
            date: due.date,
            amount: due.amount,
        }
    }
}
