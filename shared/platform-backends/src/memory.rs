//! In-process backends for local development and tests

use async_trait::async_trait;
use dashmap::DashMap;
use platform_core::{Backend, Broker, EventStream, Record, Registry, Result, Store};

/// Store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Backend for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Record>> {
        Ok(self
            .records
            .get(key)
            .map(|entry| Record::new(key, entry.value().clone())))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<Record>> {
        let mut records: Vec<Record> = self
            .records
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| Record::new(entry.key().clone(), entry.value().clone()))
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(records)
    }

    async fn write(&self, record: Record) -> Result<()> {
        self.records.insert(record.key, record.value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryBroker;

impl Backend for MemoryBroker {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

impl Broker for MemoryBroker {
    fn addresses(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
pub struct MemoryRegistry;

impl Backend for MemoryRegistry {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

impl Registry for MemoryRegistry {
    fn addresses(&self) -> Vec<String> {
        Vec::new()
    }

    fn tls_enabled(&self) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct MemoryStream;

impl Backend for MemoryStream {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

impl EventStream for MemoryStream {
    fn address(&self) -> String {
        "memory".to_string()
    }

    fn tls_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_crud() {
        let store = MemoryStore::new();
        store.write(Record::new("users/2", b"b".to_vec())).await.unwrap();
        store.write(Record::new("users/1", b"a".to_vec())).await.unwrap();
        store.write(Record::new("teams/1", b"t".to_vec())).await.unwrap();

        let read = store.read("users/1").await.unwrap().unwrap();
        assert_eq!(read.value, b"a".to_vec());

        let users = store.list("users/").await.unwrap();
        let keys: Vec<_> = users.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["users/1", "users/2"]);

        store.delete("users/1").await.unwrap();
        assert!(store.read("users/1").await.unwrap().is_none());
        assert_eq!(store.len(), 2);
    }
}
