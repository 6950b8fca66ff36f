//! A personal ledger of deposits and payments kept in a plain text file.
//!
//! Each line of the ledger file holds one transaction as
//! `yyyy-MM-dd HH:mm:ss|description|vendor|amount`. The [`Ledger`] reads and writes that file and
//! answers queries over it. The [`commands`] module implements the `ledger` command line tool on
//! top of it.

pub mod args;
pub mod commands;
mod config;
pub mod display;
mod error;
pub mod model;
pub mod store;
mod utils;

pub use config::Config;
pub use error::{Error, FormatError, IoAction, IoError, Result};
pub use store::{Ledger, Search};
