//! Prebuilt nets for common queueing scenarios.  Each builder returns a
//! `Net` with its metrics and warm-up counters already designated.

pub mod bank;

pub use self::bank::{BankParameters, LoanDesk};
