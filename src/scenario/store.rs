//! Scenario persistence
//!
//! The engine never owns storage. A [`KeyValueStore`] is injected at
//! construction and the whole collection is stored as one JSON document
//! under a caller-supplied, user-scoped key.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{SubsecRound, Utc};
use log::{debug, warn};

use crate::error::{Result, TaxError};
use crate::individual::Regime;
use crate::types::{FieldMap, TaxType};
use super::Scenario;

/// Raw key-value persistence collaborator
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Load the value under `key` and let `f` decide what replaces it.
    ///
    /// `f` returns the new value (`None` removes the key) along with a result
    /// handed back to the caller. Implementations shared between threads must
    /// hold a lock across the whole read-modify-write; the default does not.
    fn update<T, F>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce(Option<String>) -> Result<(Option<String>, T)>,
    {
        let (next, out) = f(self.get(key)?)?;
        match next {
            Some(value) => self.set(key, &value)?,
            None => self.remove(key)?,
        }
        Ok(out)
    }
}

/// In-process store, atomic per call
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic in another holder cannot leave the map half-written
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }

    fn update<T, F>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce(Option<String>) -> Result<(Option<String>, T)>,
    {
        let mut entries = self.entries();
        let (next, out) = f(entries.get(key).cloned())?;
        match next {
            Some(value) => {
                entries.insert(key.to_string(), value);
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(out)
    }
}

/// File name for `key`: ASCII letters, digits, `-` and `_` are kept, every
/// other byte becomes `%XX`, so distinct keys never share a file
fn file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name.push_str(".json");
    name
}

/// One JSON file per key inside a directory
///
/// Updates are serialized within this process only.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(file_name(key))
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.guard();
        self.read(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.guard();
        self.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.guard();
        self.delete(key)
    }

    fn update<T, F>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce(Option<String>) -> Result<(Option<String>, T)>,
    {
        let _guard = self.guard();
        let (next, out) = f(self.read(key)?)?;
        match next {
            Some(value) => self.write(key, &value)?,
            None => self.delete(key)?,
        }
        Ok(out)
    }
}

/// Parse a stored collection; anything unreadable counts as empty
fn parse_collection(raw: Option<&str>) -> (Vec<Scenario>, bool) {
    let Some(raw) = raw else {
        return (Vec::new(), false);
    };
    match serde_json::from_str(raw) {
        Ok(scenarios) => (scenarios, false),
        Err(e) => {
            warn!("discarding corrupt scenario collection: {}", e);
            (Vec::new(), true)
        }
    }
}

/// Millisecond timestamp id, bumped past any id already in use
fn next_id(existing: &[Scenario], now_millis: i64) -> String {
    let mut candidate = now_millis;
    loop {
        let id = candidate.to_string();
        if existing.iter().all(|s| s.id != id) {
            return id;
        }
        candidate += 1;
    }
}

/// Scenario collection for one user, backed by a key-value store
#[derive(Debug)]
pub struct ScenarioStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ScenarioStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Snapshot `inputs`/`outputs` under `name` and append it to the collection
    pub fn save(
        &self,
        name: &str,
        tax_type: TaxType,
        regime: Regime,
        inputs: &FieldMap,
        outputs: &FieldMap,
    ) -> Result<Scenario> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaxError::EmptyScenarioName);
        }

        let scenario = self.store.update(&self.key, |raw| {
            let (mut scenarios, _) = parse_collection(raw.as_deref());
            // Stored timestamps keep milliseconds only
            let created_at = Utc::now().trunc_subsecs(3);
            let scenario = Scenario {
                id: next_id(&scenarios, created_at.timestamp_millis()),
                name: name.to_string(),
                tax_type,
                regime,
                inputs: inputs.clone(),
                outputs: outputs.clone(),
                created_at,
            };
            scenarios.push(scenario.clone());
            Ok((Some(serde_json::to_string(&scenarios)?), scenario))
        })?;

        debug!("saved scenario {} ({:?}) under {}", scenario.id, scenario.name, self.key);
        Ok(scenario)
    }

    /// All stored scenarios in save order. A corrupt collection is cleared and reads as empty.
    pub fn list(&self) -> Result<Vec<Scenario>> {
        let raw = self.store.get(&self.key)?;
        let (scenarios, corrupt) = parse_collection(raw.as_deref());
        if !corrupt {
            return Ok(scenarios);
        }

        // Clear under the lock, and only if the value is still corrupt
        self.store.update(&self.key, |raw| {
            let (scenarios, corrupt) = parse_collection(raw.as_deref());
            let next = if corrupt { None } else { raw };
            Ok((next, scenarios))
        })
    }

    /// Remove the scenario with `id`, returning what remains
    pub fn delete(&self, id: &str) -> Result<Vec<Scenario>> {
        self.store.update(&self.key, |raw| {
            let (mut scenarios, _) = parse_collection(raw.as_deref());
            scenarios.retain(|s| s.id != id);
            Ok((Some(serde_json::to_string(&scenarios)?), scenarios))
        })
    }

    /// Stored scenarios whose id is in `ids`, in stored order
    pub fn compare<T: AsRef<str>>(&self, ids: &[T]) -> Result<Vec<Scenario>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|s| ids.iter().any(|id| id.as_ref() == s.id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    const KEY: &str = "tax_scenarios_ada";

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn store() -> ScenarioStore<MemoryStore> {
        ScenarioStore::new(MemoryStore::new(), KEY)
    }

    #[test]
    fn test_save_and_list() {
        let scenarios = store();
        let inputs = fields(json!({"annualTurnover": 30_000_000}));
        let outputs = fields(json!({"citPayable": 5_000_000}));

        let saved = scenarios
            .save("  Base case ", TaxType::Cit, Regime::Current, &inputs, &outputs)
            .unwrap();
        assert_eq!(saved.name(), "Base case");
        assert_eq!(saved.inputs(), &inputs);

        let listed = scenarios.list().unwrap();
        assert_eq!(listed, vec![saved]);
    }

    #[test]
    fn test_returned_snapshot_matches_stored_copy() {
        let scenarios = store();
        let saved = scenarios
            .save("Precise", TaxType::Vat, Regime::Current, &FieldMap::new(), &FieldMap::new())
            .unwrap();

        assert_eq!(saved.created_at().timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(saved.id(), saved.created_at().timestamp_millis().to_string());
        for _ in 0..3 {
            assert_eq!(scenarios.list().unwrap()[0], saved);
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        let scenarios = store();
        let err = scenarios
            .save("   ", TaxType::Vat, Regime::Current, &FieldMap::new(), &FieldMap::new())
            .unwrap_err();
        assert!(matches!(err, TaxError::EmptyScenarioName));
        assert!(err.is_validation());
        assert!(scenarios.list().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_is_deep_copy() {
        let scenarios = store();
        let mut inputs = fields(json!({"vendors": [{"name": "Acme", "amount": 100}]}));
        scenarios
            .save("Snapshot", TaxType::Wht, Regime::Current, &inputs, &FieldMap::new())
            .unwrap();

        inputs.insert("vendors".into(), json!([]));

        let stored = &scenarios.list().unwrap()[0];
        assert_eq!(stored.inputs()["vendors"][0]["name"], json!("Acme"));
    }

    #[test]
    fn test_ids_unique_for_rapid_saves() {
        let scenarios = store();
        for i in 0..20 {
            scenarios
                .save(&format!("s{i}"), TaxType::Vat, Regime::Current, &FieldMap::new(), &FieldMap::new())
                .unwrap();
        }
        let mut ids: Vec<String> = scenarios.list().unwrap().iter().map(|s| s.id().to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_delete_and_compare() {
        let scenarios = store();
        let empty = FieldMap::new();
        let a = scenarios.save("A", TaxType::Vat, Regime::Current, &empty, &empty).unwrap();
        let b = scenarios.save("B", TaxType::Vat, Regime::Current, &empty, &empty).unwrap();
        let c = scenarios.save("C", TaxType::Vat, Regime::Current, &empty, &empty).unwrap();

        // Requested order does not matter; stored order wins; unknown ids are skipped
        let picked = scenarios.compare(&[c.id(), "missing", a.id()]).unwrap();
        let names: Vec<&str> = picked.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["A", "C"]);

        let remaining = scenarios.delete(b.id()).unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!(scenarios.list().unwrap().len(), 2);

        // Deleting an unknown id is a no-op
        assert_eq!(scenarios.delete("nope").unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_collection_reads_as_empty() {
        let scenarios = store();
        scenarios.backend().set(KEY, "{not json").unwrap();

        assert!(scenarios.list().unwrap().is_empty());
        assert_eq!(scenarios.backend().get(KEY).unwrap(), None);

        scenarios.backend().set(KEY, "[{\"id\": 5}]").unwrap();
        let saved = scenarios
            .save("Fresh", TaxType::Cit, Regime::Legacy, &FieldMap::new(), &FieldMap::new())
            .unwrap();
        assert_eq!(scenarios.list().unwrap(), vec![saved]);
    }

    #[test]
    fn test_concurrent_saves_are_not_lost() {
        let scenarios = Arc::new(store());
        std::thread::scope(|scope| {
            for t in 0..4 {
                let scenarios = Arc::clone(&scenarios);
                scope.spawn(move || {
                    for i in 0..10 {
                        scenarios
                            .save(&format!("t{t}-{i}"), TaxType::Vat, Regime::Current, &FieldMap::new(), &FieldMap::new())
                            .unwrap();
                    }
                });
            }
        });
        assert_eq!(scenarios.list().unwrap().len(), 40);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let scenarios = ScenarioStore::new(FileStore::new(dir.path()), "tax_scenarios_ada@example");
        let inputs = fields(json!({"monthlySales": 1_000_000}));

        let saved = scenarios
            .save("On disk", TaxType::Vat, Regime::Current, &inputs, &FieldMap::new())
            .unwrap();

        let reopened = ScenarioStore::new(FileStore::new(dir.path()), "tax_scenarios_ada@example");
        assert_eq!(reopened.list().unwrap(), vec![saved.clone()]);
        assert_eq!(reopened.list().unwrap()[0].created_at().timestamp_millis(), saved.created_at().timestamp_millis());

        reopened.delete(saved.id()).unwrap();
        assert!(scenarios.list().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("absent").unwrap(), None);
        store.remove("absent").unwrap();
    }

    #[test]
    fn test_file_names_are_distinct_per_key() {
        assert_eq!(file_name("tax_scenarios_ada"), "tax_scenarios_ada.json");
        assert_eq!(file_name("tax_scenarios_ada@example"), "tax_scenarios_ada%40example.json");
        assert_ne!(file_name("ada@example"), file_name("ada_example"));
        assert_ne!(file_name("a%40b"), file_name("a@b"));
        assert_eq!(file_name("../up"), "%2E%2E%2Fup.json");
    }

    #[test]
    fn test_file_store_keeps_users_apart() {
        let dir = tempfile::tempdir().unwrap();
        let ada = ScenarioStore::new(FileStore::new(dir.path()), "tax_scenarios_ada@example");
        let other = ScenarioStore::new(FileStore::new(dir.path()), "tax_scenarios_ada_example");

        ada.save("Private", TaxType::Cit, Regime::Current, &FieldMap::new(), &FieldMap::new())
            .unwrap();
        assert!(other.list().unwrap().is_empty());

        other
            .save("Theirs", TaxType::Vat, Regime::Current, &FieldMap::new(), &FieldMap::new())
            .unwrap();
        let names: Vec<String> = ada.list().unwrap().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["Private"]);
    }

    /// Swaps in `pending` right after the first read, like a writer racing `list`
    struct RacingStore {
        inner: MemoryStore,
        pending: Mutex<Option<String>>,
    }

    impl KeyValueStore for RacingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            let value = self.inner.get(key)?;
            if let Some(next) = self.pending.lock().unwrap().take() {
                self.inner.set(key, &next)?;
            }
            Ok(value)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }

        fn update<T, F>(&self, key: &str, f: F) -> Result<T>
        where
            F: FnOnce(Option<String>) -> Result<(Option<String>, T)>,
        {
            self.inner.update(key, f)
        }
    }

    #[test]
    fn test_clearing_corruption_keeps_a_racing_save() {
        let writer = store();
        writer
            .save("Concurrent", TaxType::Vat, Regime::Current, &FieldMap::new(), &FieldMap::new())
            .unwrap();
        let valid = writer.backend().get(KEY).unwrap().unwrap();

        let racing = RacingStore {
            inner: MemoryStore::new(),
            pending: Mutex::new(Some(valid.clone())),
        };
        racing.inner.set(KEY, "{not json").unwrap();
        let scenarios = ScenarioStore::new(racing, KEY);

        let listed = scenarios.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name(), "Concurrent");
        assert_eq!(scenarios.backend().get(KEY).unwrap(), Some(valid));
    }
}
