pub mod cmd;
pub mod common;
pub mod runner;
pub mod utils;
