//! qadb-text
//!
//! Tantivy-based tokenisation and the TF-IDF vectorizer built on top of it.
pub mod tantivy_utils;
pub mod vectorizer;

pub use tantivy_utils::Analyzer;
pub use vectorizer::{TfidfVectorizer, Vocabulary};
