use std::fmt;

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{error::LoanError, member::Member};

/// Lending state as shown to library users
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CheckoutStatus {
    #[default]
    Available,
    CheckedOut,
}

impl fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("Available"),
            Self::CheckedOut => f.write_str("Checked Out"),
        }
    }
}

/// Anything the library can lend
pub trait Loanable {
    /// Title shown in the catalog
    fn title(&self) -> String;

    /// Catalog identifier (ISBN for books)
    fn identifier(&self) -> String;

    fn checkout_status(&self) -> CheckoutStatus;

    /// Number of the member holding the item
    fn borrower(&self) -> Option<&str>;

    /// Date the item is due back
    fn due_date(&self) -> Option<NaiveDate>;

    /// Whether the item can be borrowed right now
    fn is_available(&self) -> bool;

    /// Lend the item to `borrower` for `loan_days` days.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::Unavailable` if the item cannot be lent.
    fn borrow_item(&mut self, borrower: &Member, loan_days: u64) -> Result<(), LoanError>;

    /// Take the item back.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::NotCheckedOut` if the item is not on loan.
    fn return_item(&mut self) -> Result<(), LoanError>;
}

/// Items that can carry free-form notes. Items without note support keep
/// the default, which drops the note.
pub trait Annotate {
    /// Attach `note`, returning whether it was kept
    fn add_note(&mut self, _note: &str) -> bool {
        false
    }
}

/// Date `loan_days` days from today
#[must_use]
pub fn due_date_from_today(loan_days: u64) -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_add_days(Days::new(loan_days)).unwrap_or(NaiveDate::MAX)
}
