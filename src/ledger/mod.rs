//! Entry materialization and balance validation primitives.

pub mod lines;

pub use lines::{create_entry_lines, validate_entry_balance, BALANCE_EPSILON};
