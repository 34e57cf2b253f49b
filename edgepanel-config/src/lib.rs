//! Loads the backend's yaml configuration.
//!
//! String values may reference other sources using `${...}` expressions:
//!
//! - `${env:NAME}` or `${env:NAME:default}` reads an environment variable
//! - `${arg:NAME}` reads a `--arg NAME=value` command line argument
//! - `${dir}` is the directory of the config file
//!
//! Expressions can be nested, `\` escapes the next character.

mod ctx;
pub mod diagnostic;
pub mod loader;
mod processor;

pub use diagnostic::ConfigParseError;
pub use loader::ConfigLoader;
