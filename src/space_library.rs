use std::collections::HashMap;

use crate::{
    adapter::SpaceshipAdapter,
    book::Book,
    catalog::{Catalog, Library},
    error::LoanError,
    loanable::{Annotate, Loanable},
    member::{LoanedItem, PilotMember},
    policy::MissionPolicy,
    spaceship::Spaceship,
};

/// A library that lends books and a fleet of spaceships
#[derive(Debug, Clone)]
pub struct SpaceLibrary {
    /// Base catalog
    library: Library,
    /// Lending rules
    policy: MissionPolicy,
    /// Fleet, by ship name
    fleet: HashMap<String, SpaceshipAdapter>,
    /// Collection, by ISBN
    books: HashMap<String, Book>,
    /// Registered members, by number
    members: HashMap<String, PilotMember>,
}

impl SpaceLibrary {
    /// Create an empty library with the default policy
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_policy(name, MissionPolicy::default())
    }

    #[must_use]
    pub fn with_policy(name: &str, policy: MissionPolicy) -> Self {
        Self {
            library: Library::new(name, 0),
            policy,
            fleet: HashMap::new(),
            books: HashMap::new(),
            members: HashMap::new(),
        }
    }

    #[must_use]
    pub fn policy(&self) -> &MissionPolicy {
        &self.policy
    }

    /// Add a ship to the fleet, replacing any ship with the same name
    pub fn add_ship(&mut self, spaceship: Spaceship) {
        tracing::debug!(ship = spaceship.name(), "spaceship added to fleet");
        self.fleet.insert(spaceship.name().to_string(), SpaceshipAdapter::new(spaceship));
    }

    #[must_use]
    pub fn ship(&self, name: &str) -> Option<&SpaceshipAdapter> {
        self.fleet.get(name)
    }

    pub fn ship_mut(&mut self, name: &str) -> Option<&mut SpaceshipAdapter> {
        self.fleet.get_mut(name)
    }

    /// Ships that can be borrowed right now, sorted by name
    #[must_use]
    pub fn list_available(&self) -> Vec<&SpaceshipAdapter> {
        let mut available: Vec<&SpaceshipAdapter> =
            self.fleet.values().filter(|ship| ship.is_available()).collect();
        available.sort_by(|a, b| a.spaceship().name().cmp(b.spaceship().name()));
        available
    }

    #[must_use]
    pub fn fleet_size(&self) -> usize {
        self.fleet.len()
    }

    /// Register a member, replacing any member with the same number
    pub fn add_member(&mut self, member: PilotMember) {
        self.members.insert(member.number().to_string(), member);
    }

    #[must_use]
    pub fn member(&self, number: &str) -> Option<&PilotMember> {
        self.members.get(number)
    }

    pub fn member_mut(&mut self, number: &str) -> Option<&mut PilotMember> {
        self.members.get_mut(number)
    }

    /// Lend a ship to a member.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::UnknownItem` or `LoanError::UnknownMember` for
    /// unknown names, `LoanError::Unavailable` if the ship cannot be lent.
    pub fn borrow_ship(&mut self, name: &str, member_number: &str) -> Result<(), LoanError> {
        let member = self
            .members
            .get_mut(member_number)
            .ok_or_else(|| LoanError::UnknownMember(member_number.to_string()))?;
        let ship = self.fleet.get_mut(name).ok_or_else(|| LoanError::UnknownItem(name.to_string()))?;

        ship.borrow_item(member.member(), self.policy.ship_loan_days)?;
        member.member_mut().add_loan(LoanedItem::Ship(name.to_string()));
        tracing::info!(ship = name, member = member_number, "spaceship lent");
        Ok(())
    }

    /// Take a ship back from the member holding it and fill its tank.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::UnknownItem` or `LoanError::UnknownMember` for
    /// unknown names, `LoanError::NotHeldBy` if the member does not hold it.
    pub fn return_ship(&mut self, name: &str, member_number: &str) -> Result<(), LoanError> {
        let ship = self.fleet.get_mut(name).ok_or_else(|| LoanError::UnknownItem(name.to_string()))?;
        if ship.borrower() != Some(member_number) {
            return Err(LoanError::NotHeldBy {
                item: name.to_string(),
                member: member_number.to_string(),
            });
        }
        let member = self
            .members
            .get_mut(member_number)
            .ok_or_else(|| LoanError::UnknownMember(member_number.to_string()))?;

        ship.return_item()?;
        member.member_mut().remove_loan(&LoanedItem::Ship(name.to_string()));
        ship.spaceship_mut().set_fuel_level(self.policy.full_tank);
        tracing::info!(ship = name, member = member_number, "spaceship returned and refueled");
        Ok(())
    }

    /// Add a book to the collection, returning whether it was new. A book
    /// whose ISBN is already held is left out.
    pub fn add_book(&mut self, book: Book) -> bool {
        if self.books.contains_key(book.isbn()) {
            tracing::warn!(isbn = book.isbn(), "book already in the collection");
            return false;
        }
        self.books.insert(book.isbn().to_string(), book);
        self.library.receive_books(1);
        true
    }

    #[must_use]
    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// First book with exactly this title
    #[must_use]
    pub fn find_book_by_title(&self, title: &str) -> Option<&Book> {
        self.books.values().find(|book| book.title() == title)
    }

    /// Lend a book to a member.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::UnknownItem` or `LoanError::UnknownMember` for
    /// unknown identities, `LoanError::Unavailable` if the book is on loan.
    pub fn borrow_book(&mut self, isbn: &str, member_number: &str) -> Result<(), LoanError> {
        let member = self
            .members
            .get_mut(member_number)
            .ok_or_else(|| LoanError::UnknownMember(member_number.to_string()))?;
        let book = self.books.get_mut(isbn).ok_or_else(|| LoanError::UnknownItem(isbn.to_string()))?;

        book.borrow_item(member.member(), self.policy.book_loan_days)?;
        member.member_mut().add_loan(LoanedItem::Book(isbn.to_string()));
        Ok(())
    }

    /// Take a book back from the member holding it.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::UnknownItem` for an unknown ISBN,
    /// `LoanError::NotHeldBy` if the member does not hold it.
    pub fn return_book(&mut self, isbn: &str, member_number: &str) -> Result<(), LoanError> {
        let book = self.books.get_mut(isbn).ok_or_else(|| LoanError::UnknownItem(isbn.to_string()))?;
        if !book.is_borrowed_by(member_number) {
            return Err(LoanError::NotHeldBy {
                item: isbn.to_string(),
                member: member_number.to_string(),
            });
        }

        book.return_item()?;
        if let Some(member) = self.members.get_mut(member_number) {
            member.member_mut().remove_loan(&LoanedItem::Book(isbn.to_string()));
        }
        Ok(())
    }

    /// Put a book back on the shelf whatever its state, dropping it from
    /// whichever member held it.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::UnknownItem` for an unknown ISBN.
    pub fn force_book_available(&mut self, isbn: &str) -> Result<(), LoanError> {
        let book = self.books.get_mut(isbn).ok_or_else(|| LoanError::UnknownItem(isbn.to_string()))?;
        let item = LoanedItem::Book(isbn.to_string());
        if let Some(holder) = book.borrower().and_then(|number| self.members.get_mut(number)) {
            holder.member_mut().remove_loan(&item);
        }
        book.force_available();
        Ok(())
    }

    /// Attach a note to a book, returning whether it was kept
    pub fn annotate_book(&mut self, isbn: &str, note: &str) -> bool {
        self.books.get_mut(isbn).is_some_and(|book| book.add_note(note))
    }
}

impl Catalog for SpaceLibrary {
    fn name(&self) -> &str {
        self.library.name()
    }

    fn book_count(&self) -> usize {
        self.library.book_count()
    }

    fn description(&self) -> String {
        format!(
            "{} This library also runs a fleet of {} spaceships.",
            self.library.description(),
            self.fleet.len()
        )
    }
}
