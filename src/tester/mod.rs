mod cases;
mod client;
mod fixtures;
mod runner;
mod store;
mod types;

pub use cases::{
    execute, CaseContext, EXPECTED_CATEGORIES, EXPECTED_PACKAGES, MEMBERSHIP_REQUIRED,
};
pub use client::*;
pub use fixtures::*;
pub use runner::*;
pub use store::*;
pub use types::*;
