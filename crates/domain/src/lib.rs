pub mod errors;
pub mod input;
pub mod todo;

pub use errors::*;
pub use input::*;
pub use todo::*;
