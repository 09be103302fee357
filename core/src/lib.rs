pub mod fetch;
pub mod index;
pub mod persist;
pub mod tokenizer;

pub use index::{DocId, InvertedIndex, Posting};
pub use persist::PageRecord;
