//! Event store persisted through the shared store

use async_trait::async_trait;
use platform_core::{Backend, Event, EventStore, PlatformError, Record, Result, Store};
use std::fmt;
use std::sync::Arc;

const PREFIX: &str = "events/";

/// Event history kept in the same store instance as everything else
pub struct StoreEvents {
    store: Arc<dyn Store>,
}

impl StoreEvents {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn key(event: &Event) -> String {
        // zero-padded micros keep keys ordered by time within a topic
        format!(
            "{}{}/{:020}/{}",
            PREFIX,
            event.topic,
            event.timestamp.timestamp_micros(),
            event.id
        )
    }
}

impl fmt::Debug for StoreEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreEvents")
            .field("store", &self.store.backend())
            .finish()
    }
}

impl Backend for StoreEvents {
    fn backend(&self) -> &'static str {
        "store"
    }
}

#[async_trait]
impl EventStore for StoreEvents {
    fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    async fn write(&self, event: &Event) -> Result<()> {
        self.store
            .write(Record::new(Self::key(event), serde_json::to_vec(event)?))
            .await
    }

    async fn read(&self, topic: &str) -> Result<Vec<Event>> {
        let records = self.store.list(&format!("{}{}/", PREFIX, topic)).await?;

        let mut events = Vec::with_capacity(records.len());
        for record in &records {
            let event: Event = serde_json::from_slice(&record.value).map_err(PlatformError::from)?;
            // the prefix also matches nested topics such as `deploy/canary`
            if event.topic == topic {
                events.push(event);
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::Duration;

    #[tokio::test]
    async fn test_events_ordered_per_topic() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let events = StoreEvents::new(store.clone());

        let mut first = Event::new("deployments", b"v1".to_vec());
        let second = Event::new("deployments", b"v2".to_vec());
        first.timestamp = second.timestamp - Duration::seconds(5);
        let other = Event::new("builds", b"b1".to_vec());

        events.write(&second).await.unwrap();
        events.write(&first).await.unwrap();
        events.write(&other).await.unwrap();

        let read = events.read("deployments").await.unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].payload, b"v1".to_vec());
        assert_eq!(read[1].payload, b"v2".to_vec());

        assert!(Arc::ptr_eq(&events.store(), &store));
    }

    #[tokio::test]
    async fn test_nested_topics_kept_apart() {
        let events = StoreEvents::new(Arc::new(MemoryStore::new()));

        events.write(&Event::new("deploy", b"all".to_vec())).await.unwrap();
        events
            .write(&Event::new("deploy/canary", b"canary".to_vec()))
            .await
            .unwrap();

        let topics: Vec<_> = events
            .read("deploy")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.topic)
            .collect();
        assert_eq!(topics, vec!["deploy".to_string()]);

        let nested = events.read("deploy/canary").await.unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].payload, b"canary".to_vec());
    }
}
