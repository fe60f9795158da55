/// Read access to a lending catalog
pub trait Catalog {
    /// Library name
    fn name(&self) -> &str;

    /// Number of books held
    fn book_count(&self) -> usize;

    /// Human-readable description
    fn description(&self) -> String {
        format!("The library {} holds {} books.", self.name(), self.book_count())
    }
}

/// A plain library that only counts its books
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    /// Library name
    name: String,
    /// Number of books held
    book_count: usize,
}

impl Library {
    #[must_use]
    pub fn new(name: &str, book_count: usize) -> Self {
        Self { name: name.to_string(), book_count }
    }

    /// Record the arrival of `count` books
    pub fn receive_books(&mut self, count: usize) {
        self.book_count = self.book_count.saturating_add(count);
    }
}

impl Catalog for Library {
    fn name(&self) -> &str {
        &self.name
    }

    fn book_count(&self) -> usize {
        self.book_count
    }
}
