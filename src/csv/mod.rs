//! Field-level parsing and quoting primitives

mod cursor;
mod quote;

pub(crate) use cursor::LineCursor;
pub(crate) use quote::quote_value;
