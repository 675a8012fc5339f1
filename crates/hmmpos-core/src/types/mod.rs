pub mod sentence;
pub mod vocab;

pub use sentence::{TaggedSentence, TaggedWord};
pub use vocab::Vocabulary;
