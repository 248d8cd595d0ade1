//! Three-address code listings for constant declarations.
//!
//! [`lower_program`] keeps every operation, spilling intermediate results
//! to temporaries. [`fold_table`] lists the evaluated values instead.

mod lower;
mod quad;

pub use lower::{fold_table, lower_module, lower_program, TacBuilder};
pub use quad::{Operand, Quad, TacProgram};
