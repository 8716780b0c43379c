//! JSON output: the flattened model, the copier filling it and the writer.

pub mod copy;
pub mod json;
pub mod model;

pub use copy::{copy_func_params, copy_funcs, copy_package, copy_types, copy_values};
pub use json::{render_packages, write_packages};
pub use model::{Func, FuncParam, Note, Package, Type, Value};
