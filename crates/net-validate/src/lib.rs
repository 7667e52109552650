//! ifcfg network validation
//!
//! Syntax checks applied before anything reaches an ifcfg file

pub mod address;
pub mod syntax;

pub use address::validate_ip;
pub use syntax::SyntaxValidator;
