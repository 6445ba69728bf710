//! nestkit: nested data access and collection pipelines.
//!
//! The crates underneath are layered:
//! - `nestkit-value`: the value tree, [`Collection`] and the dotted-path
//!   accessors ([`data_get`], [`data_set`], [`data_forget`], ...)
//! - `nestkit-enumerable`: the [`Enumerable`] pipeline, where-clauses,
//!   aggregates and higher-order proxies
//! - `nestkit-config-store`: the settings [`Repository`]
//!
//! Most code only needs the prelude.
//!
//! # Example
//!
//! ```rust
//! use nestkit::prelude::*;
//!
//! let team = collect(serde_json::json!([
//!     {"name": "Ada", "role": "admin", "commits": 120},
//!     {"name": "Tim", "role": "guest", "commits": 3},
//!     {"name": "Grace", "role": "admin", "commits": 75},
//! ]));
//!
//! let admins = team.where_strict("role", Value::from("admin"));
//! assert_eq!(admins.sum_by("commits").unwrap(), Value::from(195));
//! assert_eq!(data_get(&Value::Collection(admins), "*.name", Value::Null).as_array().map(Vec::len), Some(2));
//! ```

pub use nestkit_config_store::{Error as ConfigError, Repository};
pub use nestkit_enumerable::{
    is_proxy, proxy_names, register_proxy, Aggregate, Criterion, Enumerable, HigherOrder,
    HigherOrderProxy, Operator, Predicate, ProxyOperation, Retriever, Where,
};
pub use nestkit_value::{
    data_fill, data_forget, data_get, data_get_or_else, data_has, data_set, data_set_with, path,
    Collection, Error, Escape, HtmlEscape, IntoPath, Key, Number, Object, ObjectRef, Path, Record,
    Segment, Value,
};

/// Build a collection from anything convertible to a [`Value`]: arrays
/// and maps become the items, a collection is taken as is, null is empty
/// and any other value becomes a single item.
pub fn collect(items: impl Into<Value>) -> Collection {
    Collection::from(items.into())
}

/// Hand `value` to `f` for a side effect, then return it.
///
/// ```rust
/// use nestkit::{tap, Collection, Value};
///
/// let c = tap(Collection::new(), |c| {
///     c.push(Value::from(1));
/// });
/// assert_eq!(c.len(), 1);
/// ```
pub fn tap<T, F>(mut value: T, f: F) -> T
where
    F: FnOnce(&mut T),
{
    f(&mut value);
    value
}

pub mod prelude {
    pub use crate::{collect, tap};
    pub use nestkit_enumerable::{Aggregate, Enumerable, HigherOrder, Operator, Predicate, Where};
    pub use nestkit_value::{
        data_fill, data_forget, data_get, data_has, data_set, path, Collection, Key, Record, Value,
    };
}
