pub mod labels;
pub mod tokenizer;

pub use labels::{PENN_TAG_LABELS, TagLabels};
pub use tokenizer::{Token, Tokenizer};
