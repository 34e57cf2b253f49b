//! Executes panel queries against EdgeDB and converts the results into
//! data frames.

mod cleanup;
pub use cleanup::*;
mod conf;
pub use conf::*;
mod datasource;
pub use datasource::*;
mod executor;
pub use executor::*;
mod frame;
pub use frame::*;
mod http;
pub use http::*;
mod memory;
pub use memory::*;
mod stream;
pub use stream::*;
