pub mod tokenize;

pub use tokenize::TermTokenizer;
