pub mod apply;
pub mod plan;
pub mod preset;
pub mod profile;
pub mod utils;

#[cfg(test)]
#[path = "../commands_test.rs"]
mod commands_test;
