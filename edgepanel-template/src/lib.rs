//! Renders dashboard variables into EdgeQL query text.
//!
//! Values are escaped for the single-quoted string literal syntax of EdgeQL.
//! Single-valued variables are substituted unquoted, the query author supplies
//! the quotes. Multi-valued variables render as a comma separated list of
//! quoted literals which the query wraps in a set or array constructor.
//!
//! Placeholder discovery is delegated to a [`TemplateEngine`] supplied by the
//! caller. The escaping functions work without one.

mod engine;
mod expr;
mod interpolate;
mod literal;
mod model;

pub use engine::*;
pub use expr::*;
pub use interpolate::*;
pub use literal::*;
pub use model::*;
