mod health;
pub use health::*;
mod query;
pub use query::*;
mod stream;
pub use stream::*;
