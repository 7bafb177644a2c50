//! Search filter over title and author.

use crate::book::BookRecord;

/// True if `title` or `author` contains `term`, ignoring case.
///
/// `term` must already be lowercased.
fn matches_lowered(book: &BookRecord, term: &str) -> bool {
    book.title.to_lowercase().contains(term) || book.author.to_lowercase().contains(term)
}

/// True if `book` is kept by the search `term`. An empty term keeps everything.
pub fn matches_term(book: &BookRecord, term: &str) -> bool {
    term.is_empty() || matches_lowered(book, &term.to_lowercase())
}

/// Keep the books whose title or author contains `term` (case-insensitive
/// substring). An empty term returns the collection unchanged. Relative order
/// is preserved.
pub fn filter_books(books: &[BookRecord], term: &str) -> Vec<BookRecord> {
    if term.is_empty() {
        return books.to_vec();
    }

    let term = term.to_lowercase();
    books
        .iter()
        .filter(|book| matches_lowered(book, &term))
        .cloned()
        .collect()
}
