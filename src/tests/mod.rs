mod config_tests;
mod support;

pub use support::{test_config, InMemoryStore};
