use std::{fs, io, path};

use indexmap::IndexMap;
use nestkit_value::{
    data_fill, data_forget, data_get, data_get_or_else, data_has, data_set, Collection, IntoPath,
    Key, Value,
};

use crate::Error;

/// A configuration tree addressed by dotted keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    items: Value,
}

impl Default for Repository {
    fn default() -> Self {
        Repository::new()
    }
}

impl Repository {
    pub fn new() -> Self {
        Repository { items: Value::map() }
    }

    pub fn with_items(items: impl Into<Value>) -> Self {
        Repository {
            items: items.into(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let parsed: serde_json::Value =
            serde_json::from_str(json).map_err(nestkit_value::Error::from)?;
        Ok(Repository::with_items(parsed))
    }

    /// Load one JSON document as the whole tree.
    pub fn load_file(file: impl AsRef<path::Path>) -> Result<Self, Error> {
        Ok(Repository {
            items: read_json(file.as_ref())?,
        })
    }

    /// Load every `*.json` file directly inside `dir`, each under a
    /// top-level key named after the file stem. Files are read in name
    /// order; other entries are ignored.
    pub fn load_dir(dir: impl AsRef<path::Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let attr = fs::metadata(dir).map_err(|error| Error::io(dir, error))?;
        if !attr.is_dir() {
            return Err(Error::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let mut items = IndexMap::new();
        for entry in walkdir::WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|error| Error::io(dir, io::Error::from(error)))?;
            let file = entry.path();
            if !entry.file_type().is_file()
                || file.extension().and_then(|ext| ext.to_str()) != Some("json")
            {
                continue;
            }
            let Some(stem) = file.file_stem().and_then(|stem| stem.to_str()) else {
                log::debug!("Skipping {}, file name is not UTF-8", file.display());
                continue;
            };
            items.insert(Key::parse(stem), read_json(file)?);
        }
        Ok(Repository {
            items: Value::Map(items),
        })
    }

    /// Write the tree as pretty-printed JSON.
    pub fn save(&self, file: impl AsRef<path::Path>) -> Result<(), Error> {
        let file = file.as_ref();
        log::debug!("Writing {}...", file.display());
        let json =
            serde_json::to_string_pretty(&self.items).map_err(|error| Error::json(file, error))?;
        fs::write(file, json).map_err(|error| Error::io(file, error))
    }

    pub fn has<P: IntoPath>(&self, key: P) -> bool {
        data_has(&self.items, key)
    }

    pub fn get<P: IntoPath>(&self, key: P, default: impl Into<Value>) -> Value {
        data_get(&self.items, key, default.into())
    }

    pub fn get_or_else<P, F>(&self, key: P, default: F) -> Value
    where
        P: IntoPath,
        F: FnOnce() -> Value,
    {
        data_get_or_else(&self.items, key, default)
    }

    /// Look up several keys at once, each with its own default.
    pub fn get_many<I, K>(&self, keys: I) -> IndexMap<String, Value>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        keys.into_iter()
            .map(|(key, default)| {
                let key = key.into();
                let value = data_get(&self.items, key.as_str(), default);
                (key, value)
            })
            .collect()
    }

    pub fn set<P: IntoPath>(&mut self, key: P, value: impl Into<Value>) -> Result<(), Error> {
        Ok(data_set(&mut self.items, key, value.into())?)
    }

    pub fn set_many<I, P>(&mut self, items: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (P, Value)>,
        P: IntoPath,
    {
        for (key, value) in items {
            data_set(&mut self.items, key, value)?;
        }
        Ok(())
    }

    /// Set `key` only where nothing is set yet.
    pub fn fill<P: IntoPath>(&mut self, key: P, value: impl Into<Value>) -> Result<(), Error> {
        Ok(data_fill(&mut self.items, key, value.into())?)
    }

    pub fn forget<P: IntoPath>(&mut self, key: P) -> Result<(), Error> {
        Ok(data_forget(&mut self.items, key)?)
    }

    /// Append to the list at `key`, creating it when unset.
    pub fn push(&mut self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        let mut list = self.list_at(key)?;
        list.push(value.into());
        self.set(key, list.into_value())
    }

    /// Insert at the front of the list at `key`, creating it when unset.
    /// Integer keys are renumbered; named keys stay as they are.
    pub fn prepend(&mut self, key: &str, value: impl Into<Value>) -> Result<(), Error> {
        let mut list = Collection::new();
        list.push(value.into());
        for (k, v) in self.list_at(key)? {
            match k {
                Key::Index(_) => list.push(v),
                named => list.add(named, v),
            };
        }
        self.set(key, list.into_value())
    }

    pub fn all(&self) -> &Value {
        &self.items
    }

    pub fn into_value(self) -> Value {
        self.items
    }

    fn list_at(&self, key: &str) -> Result<Collection, Error> {
        match data_get(&self.items, key, Value::Null) {
            list @ (Value::Null | Value::Array(_) | Value::Map(_) | Value::Collection(_)) => {
                Ok(Collection::from(list))
            }
            other => Err(nestkit_value::Error::type_mismatch(format!(
                "configuration value {} is a {}, not a list",
                key,
                other.type_name()
            ))
            .into()),
        }
    }
}

fn read_json(file: &path::Path) -> Result<Value, Error> {
    log::debug!("Reading {}...", file.display());
    let reader = io::BufReader::new(fs::File::open(file).map_err(|error| Error::io(file, error))?);
    let parsed: serde_json::Value =
        serde_json::from_reader(reader).map_err(|error| Error::json(file, error))?;
    Ok(parsed.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Repository {
        Repository::from_json_str(
            r#"{
                "app": {"name": "demo", "debug": false},
                "database": {"connections": {"mysql": {"host": "db", "port": 3306}}},
                "queues": ["mail"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn get_and_has() {
        let c = config();
        assert_eq!(c.get("database.connections.mysql.port", Value::Null), Value::from(3306));
        assert!(c.has("app.debug"));
        assert!(!c.has("app.missing"));
        assert_eq!(c.get("app.missing", "fallback"), Value::from("fallback"));
        assert_eq!(c.get_or_else("app.name", || unreachable!()), Value::from("demo"));
    }

    #[test]
    fn get_many_applies_defaults_per_key() {
        let c = config();
        let found = c.get_many([
            ("app.name", Value::Null),
            ("app.timezone", Value::from("UTC")),
        ]);
        assert_eq!(found.get("app.name"), Some(&Value::from("demo")));
        assert_eq!(found.get("app.timezone"), Some(&Value::from("UTC")));
    }

    #[test]
    fn set_fill_and_forget() {
        let mut c = config();
        c.set("app.debug", true).unwrap();
        c.fill("app.debug", false).unwrap();
        c.fill("app.locale", "en").unwrap();
        assert_eq!(c.get("app.debug", Value::Null), Value::Bool(true));
        assert_eq!(c.get("app.locale", Value::Null), Value::from("en"));

        c.forget("database.connections.mysql").unwrap();
        assert!(!c.has("database.connections.mysql"));
        assert!(c.has("database.connections"));
    }

    #[test]
    fn set_many_writes_each_key() {
        let mut c = Repository::new();
        c.set_many([("a.b", Value::from(1)), ("a.c", Value::from(2))])
            .unwrap();
        assert_eq!(c.get("a", Value::Null).as_map().map(|m| m.len()), Some(2));
    }

    #[test]
    fn push_and_prepend() {
        let mut c = config();
        c.push("queues", "sms").unwrap();
        c.prepend("queues", "urgent").unwrap();
        c.push("listeners", "audit").unwrap();
        assert_eq!(
            c.get("queues", Value::Null),
            Value::Array(vec![Value::from("urgent"), Value::from("mail"), Value::from("sms")])
        );
        assert_eq!(c.get("listeners", Value::Null), Value::Array(vec![Value::from("audit")]));
    }

    #[test]
    fn push_onto_scalar_fails() {
        let mut c = config();
        let err = c.push("app.name", "x").unwrap_err();
        assert!(matches!(err, Error::Value(nestkit_value::Error::TypeMismatch { .. })));
    }

    #[test]
    fn null_key_is_rejected_for_writes() {
        let mut c = config();
        assert!(c.forget(None::<&str>).is_err());
        assert_eq!(c.get(None::<&str>, Value::Null), c.all().clone());
    }

    #[test]
    fn invalid_json_string() {
        let err = Repository::from_json_str("{").unwrap_err();
        assert!(matches!(err, Error::Value(nestkit_value::Error::Json(_))));
    }
}
