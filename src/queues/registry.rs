use crate::error::{ServiceError, ServiceResult};
use crate::queues::queue::{Queue, QueueMap, QueueSummary};
use crate::storage::DocumentStore;
use chrono::Utc;
use uuid::Uuid;

/// Owns the authoritative queue document. Loaded from disk once at startup;
/// every mutation is persisted back through the store before it returns.
///
/// The registry itself is not synchronized. Callers wrap it in
/// `Arc<Mutex<QueueRegistry>>` so that reads and writes of the document go
/// through the same lock.
pub struct QueueRegistry {
    store: DocumentStore<QueueMap>,
    queues: QueueMap,
}

impl QueueRegistry {
    pub fn open(store: DocumentStore<QueueMap>) -> ServiceResult<Self> {
        let queues = store.load()?;

        // First boot: make the document exist on disk before any request.
        if !store.path().exists() {
            store.save(&queues)?;
        }

        Ok(QueueRegistry { store, queues })
    }

    /// Creates an empty queue under a fresh collision-checked 8-hex-char id.
    pub fn create_queue(&mut self) -> ServiceResult<String> {
        let queue_id = loop {
            let candidate = short_hex(8);
            if !self.queues.contains_key(&candidate) {
                break candidate;
            }
        };

        self.queues.insert(queue_id.clone(), Queue::new(Utc::now()));
        self.store.save(&self.queues)?;

        log::info!("created queue {queue_id}");
        Ok(queue_id)
    }

    /// Appends a user to the queue. A missing or empty name gets a synthesized
    /// `User_<6 hex>` one. Returns the final name and its 1-based position.
    pub fn join_queue(
        &mut self,
        queue_id: &str,
        name: Option<String>,
    ) -> ServiceResult<(String, usize)> {
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("User_{}", short_hex(6)));

        let queue = self
            .queues
            .get_mut(queue_id)
            .ok_or(ServiceError::NotFound)?;

        let position = queue.push_user(name.clone());
        self.store.save(&self.queues)?;

        log::debug!("{name} joined queue {queue_id} at position {position}");
        Ok((name, position))
    }

    /// Admin variant of join: the name is required.
    pub fn add_user(&mut self, queue_id: &str, name: &str) -> ServiceResult<()> {
        if name.is_empty() {
            return Err(ServiceError::Validation("missing_name"));
        }

        let queue = self
            .queues
            .get_mut(queue_id)
            .ok_or(ServiceError::NotFound)?;

        queue.push_user(name.to_string());
        self.store.save(&self.queues)?;

        Ok(())
    }

    /// Pops the earliest arrival. `None` on an empty queue, without touching
    /// the document.
    pub fn serve_next(&mut self, queue_id: &str) -> ServiceResult<Option<String>> {
        let queue = self
            .queues
            .get_mut(queue_id)
            .ok_or(ServiceError::NotFound)?;

        match queue.pop_front() {
            Some(user) => {
                self.store.save(&self.queues)?;
                log::debug!("served {user} from queue {queue_id}");
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub fn clear_queue(&mut self, queue_id: &str) -> ServiceResult<()> {
        let queue = self
            .queues
            .get_mut(queue_id)
            .ok_or(ServiceError::NotFound)?;

        queue.users.clear();
        self.store.save(&self.queues)?;

        Ok(())
    }

    pub fn delete_queue(&mut self, queue_id: &str) -> ServiceResult<()> {
        self.queues
            .remove(queue_id)
            .ok_or(ServiceError::NotFound)?;
        self.store.save(&self.queues)?;

        log::info!("deleted queue {queue_id}");
        Ok(())
    }

    pub fn queue_users(&self, queue_id: &str) -> ServiceResult<Vec<String>> {
        self.queues
            .get(queue_id)
            .map(|queue| queue.users.clone())
            .ok_or(ServiceError::NotFound)
    }

    /// Summaries of all live queues, oldest first.
    pub fn list_queues(&self) -> Vec<QueueSummary> {
        let mut summaries: Vec<QueueSummary> = self
            .queues
            .iter()
            .map(|(id, queue)| QueueSummary::of(id, queue))
            .collect();

        summaries.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    pub fn contains(&self, queue_id: &str) -> bool {
        self.queues.contains_key(queue_id)
    }

    pub fn active_count(&self) -> usize {
        self.queues.len()
    }

    pub fn total_waiting(&self) -> usize {
        self.queues.values().map(Queue::waiting).sum()
    }
}

fn short_hex(len: usize) -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(len);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn open_registry(dir: &Path) -> QueueRegistry {
        QueueRegistry::open(DocumentStore::open(dir.join("queues.json"))).unwrap()
    }

    #[test]
    fn test_create_queue_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());

        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let id = registry.create_queue().unwrap();
            assert_eq!(id.len(), 8);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_serve_next_is_fifo() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let id = registry.create_queue().unwrap();

        for name in ["Alice", "Bob", "Carol"] {
            registry.join_queue(&id, Some(name.to_string())).unwrap();
        }

        assert_eq!(registry.serve_next(&id).unwrap(), Some(String::from("Alice")));
        assert_eq!(registry.serve_next(&id).unwrap(), Some(String::from("Bob")));
        assert_eq!(registry.serve_next(&id).unwrap(), Some(String::from("Carol")));
        assert_eq!(registry.serve_next(&id).unwrap(), None);
    }

    #[test]
    fn test_join_without_name_synthesizes_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let id = registry.create_queue().unwrap();

        let (name, position) = registry.join_queue(&id, None).unwrap();

        assert_eq!(position, 1);
        let suffix = name.strip_prefix("User_").expect("default name prefix");
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));

        // An explicit empty name behaves like a missing one.
        let (name, position) = registry.join_queue(&id, Some(String::new())).unwrap();
        assert!(name.starts_with("User_"));
        assert_eq!(position, 2);
    }

    #[test]
    fn test_join_position_is_new_length() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let id = registry.create_queue().unwrap();

        let (_, first) = registry.join_queue(&id, Some(String::from("Alice"))).unwrap();
        let (_, second) = registry.join_queue(&id, Some(String::from("Bob"))).unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(registry.queue_users(&id).unwrap(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_add_user_requires_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let id = registry.create_queue().unwrap();

        let result = registry.add_user(&id, "");
        assert!(matches!(result, Err(ServiceError::Validation("missing_name"))));

        registry.add_user(&id, "Dana").unwrap();
        assert_eq!(registry.queue_users(&id).unwrap(), vec!["Dana"]);
    }

    #[test]
    fn test_clear_queue_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let id = registry.create_queue().unwrap();
        registry.join_queue(&id, Some(String::from("Alice"))).unwrap();

        registry.clear_queue(&id).unwrap();
        assert!(registry.queue_users(&id).unwrap().is_empty());

        registry.clear_queue(&id).unwrap();
        assert!(registry.queue_users(&id).unwrap().is_empty());
    }

    #[test]
    fn test_deleted_queue_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());
        let id = registry.create_queue().unwrap();

        registry.delete_queue(&id).unwrap();

        assert!(matches!(registry.queue_users(&id), Err(ServiceError::NotFound)));
        assert!(matches!(registry.serve_next(&id), Err(ServiceError::NotFound)));
        assert!(matches!(registry.delete_queue(&id), Err(ServiceError::NotFound)));
    }

    #[test]
    fn test_operations_on_unknown_queue_fail_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());

        assert!(matches!(
            registry.join_queue("deadbeef", None),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            registry.add_user("deadbeef", "Alice"),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            registry.clear_queue("deadbeef"),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let id = {
            let mut registry = open_registry(dir.path());
            let id = registry.create_queue().unwrap();
            registry.join_queue(&id, Some(String::from("Alice"))).unwrap();
            registry.join_queue(&id, Some(String::from("Bob"))).unwrap();
            id
        };

        let mut registry = open_registry(dir.path());
        assert_eq!(registry.queue_users(&id).unwrap(), vec!["Alice", "Bob"]);
        assert_eq!(registry.serve_next(&id).unwrap(), Some(String::from("Alice")));
    }

    #[test]
    fn test_totals_across_queues() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = open_registry(dir.path());

        let first = registry.create_queue().unwrap();
        let second = registry.create_queue().unwrap();
        registry.join_queue(&first, Some(String::from("Alice"))).unwrap();
        registry.join_queue(&first, Some(String::from("Bob"))).unwrap();
        registry.join_queue(&second, Some(String::from("Carol"))).unwrap();

        assert_eq!(registry.active_count(), 2);
        assert_eq!(registry.total_waiting(), 3);

        let summaries = registry.list_queues();
        assert_eq!(summaries.len(), 2);
        let by_id: std::collections::HashMap<_, _> = summaries
            .iter()
            .map(|s| (s.id.clone(), s.waiting))
            .collect();
        assert_eq!(by_id[&first], 2);
        assert_eq!(by_id[&second], 1);
    }
}
