pub mod conf;
mod group;
mod query;
mod snapshot;

pub use query::*;
pub use snapshot::*;
