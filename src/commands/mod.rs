//! CLI command implementations.

pub mod quote;
pub mod run;

pub use quote::QuoteCommand;
pub use run::RunCommand;
