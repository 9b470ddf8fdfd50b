// Path Planning module

pub mod lattice;
pub mod search;
pub mod smoother;

pub use lattice::*;
pub use search::*;
pub use smoother::*;
