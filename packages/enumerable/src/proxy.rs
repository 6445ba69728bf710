//! Higher-order proxies: one enumerable operation replayed with a
//! per-element method call or property read.
//!
//! `collection.proxy("map")?.call("name_upper", &[])` is
//! `collection.map(|item, _| item.call("name_upper", &[]))`. Only names on
//! the process-wide allow-list can be proxied; the list starts with the
//! built-in operations and grows through [`register_proxy`]. Entries are
//! never removed.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use lazy_static::lazy_static;
use nestkit_value::{Collection, Error, Key, Value};

use crate::predicate::Retriever;
use crate::{Aggregate, Enumerable};

/// An operation that can be proxied: runs over the collection with the
/// replayed per-element callback.
pub type ProxyOperation = Arc<
    dyn Fn(&Collection, &mut dyn FnMut(&Value, &Key) -> Value) -> Result<Value, Error>
        + Send
        + Sync,
>;

lazy_static! {
    static ref PROXIES: RwLock<IndexMap<String, ProxyOperation>> =
        RwLock::new(builtin_proxies());
}

fn operation<F>(f: F) -> ProxyOperation
where
    F: Fn(&Collection, &mut dyn FnMut(&Value, &Key) -> Value) -> Result<Value, Error>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn builtin_proxies() -> IndexMap<String, ProxyOperation> {
    let average = operation(|c, f| c.avg_by(Retriever::callback(|v, k| f(v, k))));
    let contains = operation(|c, f| Ok(Value::Bool(c.contains(|v, k| f(v, k).is_truthy()))));

    let mut proxies: IndexMap<String, ProxyOperation> = IndexMap::new();
    proxies.insert("average".to_string(), average.clone());
    proxies.insert("avg".to_string(), average);
    proxies.insert("contains".to_string(), contains.clone());
    proxies.insert(
        "doesnt_contain".to_string(),
        operation(|c, f| Ok(Value::Bool(c.doesnt_contain(|v, k| f(v, k).is_truthy())))),
    );
    proxies.insert(
        "each".to_string(),
        operation(|c, f| {
            c.each(|v, k| match f(v, k) {
                Value::Bool(false) => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            });
            Ok(Value::Collection(c.clone()))
        }),
    );
    proxies.insert(
        "every".to_string(),
        operation(|c, f| Ok(Value::Bool(c.every(|v, k| f(v, k).is_truthy())))),
    );
    proxies.insert(
        "filter".to_string(),
        operation(|c, f| Ok(Value::Collection(c.filter(|v, k| f(v, k).is_truthy())))),
    );
    proxies.insert(
        "first".to_string(),
        operation(|c, f| Ok(c.first(|v, k| f(v, k).is_truthy()).unwrap_or_default())),
    );
    proxies.insert(
        "flat_map".to_string(),
        operation(|c, f| Ok(Value::Collection(c.flat_map(|v, k| f(v, k))))),
    );
    proxies.insert(
        "group_by".to_string(),
        operation(|c, f| Ok(Value::Collection(c.group_by(Retriever::callback(|v, k| f(v, k)))?))),
    );
    proxies.insert(
        "key_by".to_string(),
        operation(|c, f| Ok(Value::Collection(c.key_by(Retriever::callback(|v, k| f(v, k)))?))),
    );
    proxies.insert(
        "map".to_string(),
        operation(|c, f| Ok(Value::Collection(c.map(|v, k| f(v, k))))),
    );
    proxies.insert(
        "max".to_string(),
        operation(|c, f| Ok(c.max_by(Retriever::callback(|v, k| f(v, k))))),
    );
    proxies.insert(
        "min".to_string(),
        operation(|c, f| Ok(c.min_by(Retriever::callback(|v, k| f(v, k))))),
    );
    proxies.insert(
        "partition".to_string(),
        operation(|c, f| {
            let (passed, failed) = c.partition(|v, k| f(v, k).is_truthy());
            Ok(Value::Array(vec![
                Value::Collection(passed),
                Value::Collection(failed),
            ]))
        }),
    );
    proxies.insert(
        "reject".to_string(),
        operation(|c, f| Ok(Value::Collection(c.reject(|v, k| f(v, k).is_truthy())))),
    );
    proxies.insert(
        "skip_until".to_string(),
        operation(|c, f| Ok(Value::Collection(c.skip_until(|v, k| f(v, k).is_truthy())))),
    );
    proxies.insert(
        "skip_while".to_string(),
        operation(|c, f| Ok(Value::Collection(c.skip_while(|v, k| f(v, k).is_truthy())))),
    );
    proxies.insert("some".to_string(), contains);
    proxies.insert(
        "sort_by".to_string(),
        operation(|c, f| Ok(Value::Collection(c.sort_by(Retriever::callback(|v, k| f(v, k)))))),
    );
    proxies.insert(
        "sort_by_desc".to_string(),
        operation(|c, f| {
            Ok(Value::Collection(
                c.sort_by_desc(Retriever::callback(|v, k| f(v, k))),
            ))
        }),
    );
    proxies.insert(
        "sum".to_string(),
        operation(|c, f| c.sum_by(Retriever::callback(|v, k| f(v, k)))),
    );
    proxies.insert(
        "take_until".to_string(),
        operation(|c, f| Ok(Value::Collection(c.take_until(|v, k| f(v, k).is_truthy())))),
    );
    proxies.insert(
        "take_while".to_string(),
        operation(|c, f| Ok(Value::Collection(c.take_while(|v, k| f(v, k).is_truthy())))),
    );
    proxies.insert(
        "unique".to_string(),
        operation(|c, f| Ok(Value::Collection(c.unique_by(Retriever::callback(|v, k| f(v, k)))))),
    );
    proxies
}

/// Add an operation to the process-wide allow-list.
///
/// Returns `false`, leaving the existing entry in place, when `name` is
/// already registered.
///
/// # Example
///
/// ```rust
/// use nestkit_enumerable::{register_proxy, HigherOrder};
/// use nestkit_value::{Collection, Record, Value};
///
/// register_proxy("count_where", |c, f| {
///     Ok(Value::from(c.iter().filter(|&(k, v)| f(v, k).is_truthy()).count()))
/// });
///
/// let users: Collection = vec![
///     Record::new("User").with_field("admin", true).into_value(),
///     Record::new("User").with_field("admin", false).into_value(),
/// ]
/// .into();
/// assert_eq!(users.proxy("count_where").unwrap().get("admin").unwrap(), Value::from(1));
/// ```
pub fn register_proxy<F>(name: impl Into<String>, op: F) -> bool
where
    F: Fn(&Collection, &mut dyn FnMut(&Value, &Key) -> Value) -> Result<Value, Error>
        + Send
        + Sync
        + 'static,
{
    let name = name.into();
    let mut proxies = PROXIES.write().unwrap_or_else(PoisonError::into_inner);
    if proxies.contains_key(&name) {
        log::debug!("Proxy {} is already registered", name);
        return false;
    }
    log::debug!("Registering proxy {}", name);
    proxies.insert(name, operation(op));
    true
}

/// Whether `name` is on the allow-list.
pub fn is_proxy(name: &str) -> bool {
    PROXIES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(name)
}

/// The allow-list, built-in operations first, then registrations in order.
pub fn proxy_names() -> Vec<String> {
    PROXIES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}

fn lookup(name: &str) -> Result<ProxyOperation, Error> {
    PROXIES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
        .ok_or_else(|| Error::unknown_operation(name))
}

/// Dynamic access to proxied operations.
pub trait HigherOrder {
    /// A proxy for the allow-listed operation `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperation`] when `name` is not on the
    /// allow-list.
    fn proxy(&self, name: &str) -> Result<HigherOrderProxy<'_>, Error>;
}

impl HigherOrder for Collection {
    fn proxy(&self, name: &str) -> Result<HigherOrderProxy<'_>, Error> {
        Ok(HigherOrderProxy {
            collection: self,
            name: name.to_string(),
            operation: lookup(name)?,
        })
    }
}

/// A pending operation bound to one collection.
pub struct HigherOrderProxy<'c> {
    collection: &'c Collection,
    name: String,
    operation: ProxyOperation,
}

impl HigherOrderProxy<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the operation, calling `method` with `args` on every element.
    ///
    /// # Errors
    ///
    /// The first element failure is returned, as is any failure of the
    /// operation itself.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, Error> {
        self.replay(|item| item.call(method, args))
    }

    /// Run the operation, reading `property` from every element.
    pub fn get(&self, property: &str) -> Result<Value, Error> {
        self.replay(|item| Ok(item.property(property)))
    }

    /// Run the operation with the elements themselves.
    pub fn value(&self) -> Result<Value, Error> {
        self.replay(|item| Ok(item.clone()))
    }

    fn replay<F>(&self, mut element: F) -> Result<Value, Error>
    where
        F: FnMut(&Value) -> Result<Value, Error>,
    {
        let mut failure: Option<Error> = None;
        let result = (self.operation)(self.collection, &mut |item: &Value, _: &Key| -> Value {
            if failure.is_some() {
                return Value::Null;
            }
            element(item).unwrap_or_else(|e| {
                failure = Some(e);
                Value::Null
            })
        });
        match failure {
            Some(e) => Err(e),
            None => result,
        }
    }
}

impl fmt::Debug for HigherOrderProxy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HigherOrderProxy")
            .field("name", &self.name)
            .field("collection", self.collection)
            .finish()
    }
}
