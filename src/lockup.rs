// Thin re-export module: lockup state is split into params, the keeper that
// reads and writes them, and genesis import/export.

pub mod genesis;
pub mod keeper;
pub mod params;

pub use genesis::*;
pub use keeper::*;
pub use params::*;
