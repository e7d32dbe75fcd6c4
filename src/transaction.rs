//! Transaction module split into types and codec

pub mod codec;
pub mod types;

pub use codec::*;
pub use types::*;
