//! qadb-answer
//!
//! Ties corpus, vectorizer and index together: [`QaEngine`] resolves a query
//! to the answer of its nearest known question, [`SharedEngine`] lets a
//! service swap in a rebuilt engine without disturbing readers.
pub mod engine;
pub mod shared;

pub use engine::QaEngine;
pub use shared::SharedEngine;
