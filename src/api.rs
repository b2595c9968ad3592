//! Provider records read from the REST API.

pub mod activity;
pub mod athlete;

pub use activity::*;
pub use athlete::*;
