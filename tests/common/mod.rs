pub mod fixtures;
pub mod runners;

pub use fixtures::*;
pub use runners::*;
