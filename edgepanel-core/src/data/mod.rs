mod frame;

pub use frame::*;

pub use chrono;
