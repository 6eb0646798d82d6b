//! Submission infrastructure (quarantine, printing)

pub mod quarantine;
pub mod token_printer;

pub use quarantine::DirectoryQuarantine;
pub use token_printer::LineAnnotatedPrinter;
