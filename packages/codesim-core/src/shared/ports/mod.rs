//! Ports to external collaborators

pub mod printer;
pub mod quarantine;
pub mod tokenizer;

pub use printer::TokenPrinter;
pub use quarantine::{QuarantineDestination, QuarantineOutcome};
pub use tokenizer::{TokenizationError, Tokenizer};
