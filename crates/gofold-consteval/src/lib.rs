//! Constant folding for Go package-level `const` declarations.
//!
//! Values are kept exact: integers as arbitrary-precision integers and
//! floats as rationals. Untyped constants take a type only when they meet a
//! typed operand or a typed declaration. [`Evaluator`] resolves a whole
//! [`gofold_hir::Program`] into a [`ConstTable`] plus diagnostics.

mod convert;
mod error;
mod eval;
pub mod format;
mod ops;
mod options;
mod render;
mod table;
mod value;

pub use convert::{convert_explicit, convert_implicit, int_range, represent};
pub use error::{ConstError, ConstErrorKind};
pub use eval::{Evaluation, Evaluator};
pub use format::FormatOptions;
pub use ops::{binary, unary};
pub use options::{EvalOptions, Mode, Redeclaration};
pub use render::{render_json, render_text, rows, ConstRow};
pub use table::{ConstEntry, ConstTable};
pub use value::{ConstType, ConstValue, Constant, UntypedKind};
