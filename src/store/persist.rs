use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use actix_web::web::Data;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{error, info, warn};

use super::{Store, TenantState};

/// Bumped on any change to the persisted shape; `migrate` grows an arm per
/// old version.
pub const SCHEMA_VERSION: u32 = 1;

/// Associative collection that round-trips as an explicitly tagged form:
/// `{"type": "map", "entries": [[key, value], ...]}`. Keeps the unordered
/// keyed collection distinct from ordered sequences in the blob.
#[derive(Debug, Clone, Default)]
pub struct TaggedMap<V>(pub HashMap<String, V>);

#[derive(Serialize)]
struct TaggedMapSer<'a, V> {
    #[serde(rename = "type")]
    kind: &'a str,
    entries: Vec<(&'a String, &'a V)>,
}

#[derive(Deserialize)]
struct TaggedMapDe<V> {
    #[serde(rename = "type")]
    kind: String,
    entries: Vec<(String, V)>,
}

impl<V: Serialize> Serialize for TaggedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&String, &V)> = self.0.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        TaggedMapSer { kind: "map", entries }.serialize(serializer)
    }
}

impl<'de, V: DeserializeOwned> Deserialize<'de> for TaggedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TaggedMapDe::<V>::deserialize(deserializer)?;
        if repr.kind != "map" {
            return Err(serde::de::Error::custom(format!(
                "expected tagged map, got type {:?}",
                repr.kind
            )));
        }
        Ok(TaggedMap(repr.entries.into_iter().collect()))
    }
}

#[derive(Serialize, Deserialize)]
struct Blob {
    version: u32,
    tenants: TaggedMap<TenantState>,
}

fn migrate(blob: Blob) -> Option<HashMap<String, TenantState>> {
    match blob.version {
        SCHEMA_VERSION => Some(blob.tenants.0),
        v => {
            error!(version = v, "Unsupported store schema version");
            None
        }
    }
}

/// Load the persisted store. A missing blob is a fresh start; a corrupt or
/// unreadable blob is logged and the process continues with an empty store,
/// leaving the file on disk untouched.
pub fn load(path: &str) -> HashMap<String, TenantState> {
    let path = Path::new(path);
    if !path.exists() {
        info!(path = %path.display(), "No persisted store found, starting empty");
        return HashMap::new();
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!(error = %e, path = %path.display(), "Failed to read persisted store");
            return HashMap::new();
        }
    };

    match serde_json::from_str::<Blob>(&raw) {
        Ok(blob) => migrate(blob).unwrap_or_default(),
        Err(e) => {
            error!(
                error = %e,
                path = %path.display(),
                "Persisted store is corrupt; continuing with an empty store (blob kept on disk)"
            );
            HashMap::new()
        }
    }
}

/// Write the full snapshot to disk. Goes through a temp file then rename so a
/// crash mid-write never truncates the previous blob.
pub fn save(path: &str, tenants: &HashMap<String, TenantState>) -> Result<()> {
    let blob = Blob {
        version: SCHEMA_VERSION,
        tenants: TaggedMap(tenants.clone()),
    };
    let raw = serde_json::to_string(&blob).context("serializing store")?;

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}

/// Debounced flush: mutations only mark the store dirty; this task coalesces
/// them into at most one write per interval. A bursty payroll run touching
/// hundreds of employees costs one write, not hundreds.
pub async fn run_flush_loop(store: Data<Store>, path: String, interval_ms: u64) {
    loop {
        actix_web::rt::time::sleep(Duration::from_millis(interval_ms)).await;
        if store.take_dirty() {
            if let Err(e) = save(&path, &store.export()) {
                warn!(error = %e, "Store flush failed, will retry next interval");
                store.mark_dirty();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{employee, tenant};
    use uuid::Uuid;

    fn temp_path() -> String {
        std::env::temp_dir()
            .join(format!("hrmpay-test-{}.json", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    fn populated() -> HashMap<String, TenantState> {
        let mut map = HashMap::new();
        let mut a = TenantState::new(tenant("a"));
        a.employees.push(employee("e1", 6000.0));
        a.employees.push(employee("e2", 4000.0));
        map.insert("a".to_string(), a);
        map.insert("b".to_string(), TenantState::new(tenant("b")));
        map
    }

    #[test]
    fn round_trip_preserves_logical_content() {
        let path = temp_path();
        let before = populated();
        save(&path, &before).unwrap();
        let after = load(&path);

        assert_eq!(after.len(), before.len());
        // Associative partition survives keyed.
        assert!(after.contains_key("a") && after.contains_key("b"));
        // Ordered sequence retains order.
        let ids: Vec<&str> = after["a"].employees.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn blob_tags_the_associative_collection() {
        let path = temp_path();
        save(&path, &populated()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["tenants"]["type"], "map");
        assert!(value["tenants"]["entries"].is_array());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn corrupt_blob_loads_empty_and_is_kept() {
        let path = temp_path();
        std::fs::write(&path, "{ not json").unwrap();
        let loaded = load(&path);
        assert!(loaded.is_empty());
        // The corrupt file is not deleted.
        assert!(Path::new(&path).exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_blob_loads_empty() {
        let path = temp_path();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn unknown_schema_version_loads_empty() {
        let path = temp_path();
        std::fs::write(
            &path,
            r#"{"version": 99, "tenants": {"type": "map", "entries": []}}"#,
        )
        .unwrap();
        assert!(load(&path).is_empty());
        std::fs::remove_file(&path).ok();
    }
}
