mod types;
mod expr;
mod item;
mod module;

pub use types::*;
pub use expr::*;
pub use item::*;
pub use module::*;
