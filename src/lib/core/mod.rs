pub mod error;
pub mod todo;
pub mod todo_list;

pub use error::*;
pub use todo::*;
pub use todo_list::*;
