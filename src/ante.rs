// Thin re-export module: the generic decorator pipeline lives in `chain`, the
// lockup decorator built on it lives in `decorator`.

pub mod chain;
pub mod decorator;

pub use chain::*;
pub use decorator::*;
