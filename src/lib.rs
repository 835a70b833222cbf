pub mod command;
pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod miner;
pub mod output;
pub mod util;
