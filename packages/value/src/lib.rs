//! Nested values and dotted-path access.
//!
//! This crate is the data layer the rest of nestkit builds on:
//! - `Value`: a dynamically typed tree of scalars, arrays, ordered maps,
//!   collections and shared objects
//! - `Key`: integer-or-name keys of ordered maps
//! - `Path`: dotted paths with `*`, `{first}` and `{last}` segments
//! - `Collection`: the ordered key→value container
//! - `data_get` / `data_set` / `data_forget`: path access over any value
//!
//! # Example
//!
//! ```rust
//! use nestkit_value::{data_get, data_set, Value};
//!
//! let mut config = Value::map();
//! data_set(&mut config, "db.connections.main.host", Value::from("localhost")).unwrap();
//!
//! assert_eq!(
//!     data_get(&config, "db.connections.*.host", Value::Null),
//!     Value::from(vec!["localhost"])
//! );
//! ```

mod access;
mod collection;
mod compare;
mod convert;
mod error;
mod escape;
mod key;
mod number;
mod object;
mod path;
mod value;

pub use access::{
    data_fill, data_forget, data_get, data_get_or_else, data_has, data_set, data_set_with,
};
pub use collection::Collection;
pub use error::Error;
pub use escape::{Escape, HtmlEscape};
pub use key::Key;
pub use number::Number;
pub use object::{Object, ObjectRef, Record};
pub use path::{IntoPath, Path, Segment};
pub use value::Value;
