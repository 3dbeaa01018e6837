#![doc = include_str!("../README.md")]

mod backoff;
mod error;
mod mac;
mod store;
mod types;

pub use crate::backoff::*;
pub use crate::error::*;
pub use crate::mac::*;
pub use crate::store::*;
pub use crate::types::*;
