//! Objects: values with named fields, methods and optional capabilities.
//!
//! [`Object`] is the capability interface path access and collection
//! operations talk to. Every capability beyond the class name has a default
//! that reports "not supported", so an implementation opts in to exactly
//! what it offers. [`Record`] is the stock implementation.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;

use crate::{Error, Key, Value};

/// A field-bearing object.
///
/// Objects are shared by reference: [`ObjectRef`] clones the handle, not
/// the object, so setters take `&self` and implementations use interior
/// mutability.
pub trait Object: fmt::Debug + Send + Sync {
    /// Class name, used by `where_instance_of` and error messages.
    fn class_name(&self) -> &str;

    /// Read a field. `None` when the field is unset.
    fn field(&self, name: &str) -> Option<Value>;

    /// Write a field.
    fn set_field(&self, name: &str, _value: Value) -> Result<(), Error> {
        Err(Error::type_mismatch(format!(
            "cannot write field {} on object of class {}",
            name,
            self.class_name()
        )))
    }

    /// Remove a field.
    fn unset_field(&self, name: &str) -> Result<(), Error> {
        Err(Error::type_mismatch(format!(
            "cannot unset field {} on object of class {}",
            name,
            self.class_name()
        )))
    }

    /// All fields in declaration order.
    fn fields(&self) -> Vec<(String, Value)> {
        Vec::new()
    }

    /// Invoke a method.
    fn call(&self, method: &str, _args: &[Value]) -> Result<Value, Error> {
        Err(Error::UnknownMethod {
            class: self.class_name().to_string(),
            method: method.to_string(),
        })
    }

    /// Whether the object supports keyed (array-style) access.
    fn is_keyed(&self) -> bool {
        false
    }

    fn offset_get(&self, _key: &Key) -> Option<Value> {
        None
    }

    fn offset_set(&self, key: &Key, _value: Value) -> Result<(), Error> {
        Err(Error::type_mismatch(format!(
            "object of class {} does not accept key {}",
            self.class_name(),
            key
        )))
    }

    fn offset_unset(&self, key: &Key) -> Result<(), Error> {
        Err(Error::type_mismatch(format!(
            "object of class {} does not accept key {}",
            self.class_name(),
            key
        )))
    }

    /// Entries when the object is traversable.
    fn entries(&self) -> Option<Vec<(Key, Value)>> {
        None
    }

    /// Text form when the object is stringable.
    fn to_display(&self) -> Option<String> {
        None
    }

    /// Custom JSON form.
    fn to_json(&self) -> Option<serde_json::Value> {
        None
    }

    /// Plain-array form.
    fn to_array(&self) -> Option<Value> {
        None
    }
}

/// A shared handle to an [`Object`]. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Object>);

impl ObjectRef {
    pub fn new(object: impl Object + 'static) -> Self {
        ObjectRef(Arc::new(object))
    }

    pub fn from_arc(object: Arc<dyn Object>) -> Self {
        ObjectRef(object)
    }

    /// Whether both handles point at the same object.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl std::ops::Deref for ObjectRef {
    type Target = dyn Object;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Method = Arc<dyn Fn(&Record, &[Value]) -> Result<Value, Error> + Send + Sync>;
type DisplayFn = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// A plain object: a class name, ordered fields and registered methods.
///
/// # Example
///
/// ```rust
/// use nestkit_value::{Record, Value};
///
/// let user = Record::new("User")
///     .with_field("name", "Taylor")
///     .with_method("greet", |this, args| {
///         let name = this.get("name").unwrap_or_default();
///         let greeting = args.first().and_then(Value::as_str).unwrap_or("Hello");
///         Ok(Value::from(format!("{}, {}", greeting, name.as_str().unwrap_or(""))))
///     })
///     .into_value();
///
/// assert_eq!(
///     user.call("greet", &[Value::from("Hi")]).unwrap(),
///     Value::from("Hi, Taylor")
/// );
/// ```
pub struct Record {
    class: String,
    fields: RwLock<IndexMap<String, Value>>,
    methods: IndexMap<String, Method>,
    display: Option<DisplayFn>,
}

impl Record {
    pub fn new(class: impl Into<String>) -> Self {
        Record {
            class: class.into(),
            fields: RwLock::new(IndexMap::new()),
            methods: IndexMap::new(),
            display: None,
        }
    }

    #[must_use]
    pub fn with_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Record, &[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Make the record stringable.
    #[must_use]
    pub fn with_display<F>(mut self, display: F) -> Self
    where
        F: Fn(&Record) -> String + Send + Sync + 'static,
    {
        self.display = Some(Arc::new(display));
        self
    }

    /// Read a field, including fields set to null.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn set(&self, name: &str, value: Value) {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }

    pub fn into_ref(self) -> ObjectRef {
        ObjectRef::new(self)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.into_ref())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Record")
            .field("class", &self.class)
            .field("fields", &*fields)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Object for Record {
    fn class_name(&self) -> &str {
        &self.class
    }

    /// Fields holding null read as unset.
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).filter(|v| !v.is_null())
    }

    fn set_field(&self, name: &str, value: Value) -> Result<(), Error> {
        self.set(name, value);
        Ok(())
    }

    fn unset_field(&self, name: &str) -> Result<(), Error> {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(name);
        Ok(())
    }

    fn fields(&self) -> Vec<(String, Value)> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value, Error> {
        match self.methods.get(method) {
            Some(f) => f(self, args),
            None => Err(Error::UnknownMethod {
                class: self.class.clone(),
                method: method.to_string(),
            }),
        }
    }

    fn to_display(&self) -> Option<String> {
        self.display.as_ref().map(|display| display(self))
    }
}
