//! Secure extraction of validated uploads into a scratch area.

mod extractor;

pub use extractor::SecureExtractor;
