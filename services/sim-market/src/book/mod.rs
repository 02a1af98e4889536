//! Quote book infrastructure
//!
//! Contains the ordered book side and the quote book that owns both sides.

pub mod quote_book;
pub mod side;

pub use quote_book::{QuoteBook, TopOfBook};
pub use side::OrderedBookSide;
