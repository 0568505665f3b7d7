//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{
    balance_tolerance, is_valid_currency_code, round_minor, round_rate, within_tolerance,
};
