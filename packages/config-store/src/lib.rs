//! Settings repository for nestkit
//!
//! A [`Repository`] holds one configuration tree and addresses it with
//! dotted keys (`"database.connections.mysql.host"`), the same paths the
//! `data_*` accessors in `nestkit-value` understand. Trees come from code,
//! a JSON string, one JSON file, or a directory of JSON files.
//!
//! # Example
//!
//! ```rust
//! use nestkit_config_store::Repository;
//! use nestkit_value::Value;
//!
//! let mut config = Repository::from_json_str(r#"{"app": {"name": "demo"}}"#).unwrap();
//! config.set("app.debug", Value::Bool(true)).unwrap();
//!
//! assert_eq!(config.get("app.name", Value::Null), Value::from("demo"));
//! assert!(config.has("app.debug"));
//! assert_eq!(config.get("app.locale", Value::from("en")), Value::from("en"));
//! ```

mod error;
mod repository;

pub use error::Error;
pub use repository::Repository;
