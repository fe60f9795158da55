use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::LoanError,
    loanable::{Annotate, CheckoutStatus, Loanable, due_date_from_today},
    member::Member,
};

/// Lending state of a book
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BookStatus {
    /// Book is on the shelf
    #[default]
    Available,
    /// Book is lent to a member until the due date
    Borrowed {
        /// Number of the member holding the book
        borrower: String,
        /// Date the book is due back
        due_date: NaiveDate,
    },
}

impl BookStatus {
    /// Get a human-readable description of the current state
    #[must_use]
    pub fn get_description(&self) -> String {
        match self {
            Self::Available => "Book is available for checkout".to_string(),
            Self::Borrowed { borrower, due_date } => {
                format!("Book is checked out by {borrower} until {due_date}")
            }
        }
    }
}

/// A book in the library's collection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    /// Title
    title: String,
    /// ISBN, unique within a library
    isbn: String,
    /// Lending state
    status: BookStatus,
    /// Notes attached to the book, oldest first
    notes: Vec<String>,
}

impl Book {
    #[must_use]
    pub fn new(title: &str, isbn: &str) -> Self {
        Self {
            title: title.to_string(),
            isbn: isbn.to_string(),
            status: BookStatus::Available,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    #[must_use]
    pub fn status(&self) -> &BookStatus {
        &self.status
    }

    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Whether `member_number` currently holds the book
    #[must_use]
    pub fn is_borrowed_by(&self, member_number: &str) -> bool {
        matches!(&self.status, BookStatus::Borrowed { borrower, .. } if borrower == member_number)
    }

    /// Put the book back on the shelf whatever its current state
    pub fn force_available(&mut self) {
        self.status = BookStatus::Available;
    }
}

impl Loanable for Book {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn identifier(&self) -> String {
        self.isbn.clone()
    }

    fn checkout_status(&self) -> CheckoutStatus {
        match self.status {
            BookStatus::Available => CheckoutStatus::Available,
            BookStatus::Borrowed { .. } => CheckoutStatus::CheckedOut,
        }
    }

    fn borrower(&self) -> Option<&str> {
        match &self.status {
            BookStatus::Available => None,
            BookStatus::Borrowed { borrower, .. } => Some(borrower.as_str()),
        }
    }

    fn due_date(&self) -> Option<NaiveDate> {
        match self.status {
            BookStatus::Available => None,
            BookStatus::Borrowed { due_date, .. } => Some(due_date),
        }
    }

    fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    fn borrow_item(&mut self, borrower: &Member, loan_days: u64) -> Result<(), LoanError> {
        if !self.is_available() {
            return Err(LoanError::Unavailable(self.title.clone()));
        }

        self.status = BookStatus::Borrowed {
            borrower: borrower.number().to_string(),
            due_date: due_date_from_today(loan_days),
        };
        Ok(())
    }

    fn return_item(&mut self) -> Result<(), LoanError> {
        if self.is_available() {
            return Err(LoanError::NotCheckedOut(self.title.clone()));
        }

        self.status = BookStatus::Available;
        Ok(())
    }
}

impl Annotate for Book {
    fn add_note(&mut self, note: &str) -> bool {
        self.notes.push(note.to_string());
        true
    }
}
