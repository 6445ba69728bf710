//! Enumerable operations for nestkit
//!
//! This crate layers the collection pipeline on top of `nestkit-value`:
//! - `Enumerable`: filter, map, reduce, group, sort, paginate and friends
//! - `Where`: operator-based filters over dotted paths
//! - `Aggregate`: `sum`, `avg`, `min`, `max`
//! - `Predicate` / `Operator`: the comparison rules behind the where-clauses
//! - `HigherOrder`: replay an operation with a per-element method call or
//!   property read
//!
//! Every operation is provided on the traits, so any type exposing its
//! ordered items through [`Enumerable`] gets the whole set.
//!
//! # Example
//!
//! ```rust
//! use nestkit_enumerable::{Aggregate, Enumerable, Where};
//! use nestkit_value::{Collection, Value};
//!
//! let orders = Collection::from(Value::from(serde_json::json!([
//!     {"id": 1, "total": 40, "status": "paid"},
//!     {"id": 2, "total": 15, "status": "open"},
//!     {"id": 3, "total": 25, "status": "paid"},
//! ])));
//!
//! let paid = orders.where_strict("status", Value::from("paid"));
//! assert_eq!(paid.sum_by("total").unwrap(), Value::from(65));
//! assert_eq!(paid.sort_by("total").first(|_, _| true).unwrap().property("id"), Value::from(3));
//! ```

mod aggregate;
mod enumerable;
mod predicate;
mod proxy;
mod where_clauses;

pub use aggregate::Aggregate;
pub use enumerable::Enumerable;
pub use predicate::{Criterion, Operator, Predicate, Retriever};
pub use proxy::{
    is_proxy, proxy_names, register_proxy, HigherOrder, HigherOrderProxy, ProxyOperation,
};
pub use where_clauses::Where;
