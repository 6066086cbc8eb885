use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::todo::{NewTodo, Todo};

/// In-process [`Store`]. Nothing survives a restart.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    rows: BTreeMap<i64, NewTodo>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner { rows: BTreeMap::new(), next_id: 1 }) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self { Self::new() }
}

fn to_todo(id: i64, row: &NewTodo) -> Todo {
    Todo {
        id: Some(id),
        title: Some(row.title.clone()),
        completed: Some(row.completed),
        order: Some(row.order),
        url: String::new(),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Todo>, StoreError> {
        let inner = self.inner.read().await;
        let mut todos: Vec<Todo> = inner.rows.iter().map(|(id, row)| to_todo(*id, row)).collect();
        // BTreeMap iteration is already id-ascending, so a stable sort on
        // `order` leaves ties in id order.
        todos.sort_by_key(|t| t.order);
        Ok(todos)
    }

    async fn get(&self, id: i64) -> Result<Todo, StoreError> {
        let inner = self.inner.read().await;
        inner.rows.get(&id).map(|row| to_todo(id, row)).ok_or(StoreError::NotFound)
    }

    async fn save(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let saved = to_todo(id, &todo);
        inner.rows.insert(id, todo);
        Ok(saved)
    }

    async fn update(&self, id: i64, patch: Todo) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write().await;
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(completed) = patch.completed {
            row.completed = completed;
        }
        if let Some(order) = patch.order {
            row.order = order;
        }
        Ok(to_todo(id, row))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.inner.write().await.rows.clear();
        Ok(())
    }

    async fn destroy(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.rows.clear();
        inner.next_id = 1;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use tokio::task::JoinSet;

    use super::*;

    fn new(title: &str, order: i64) -> NewTodo {
        NewTodo { title: title.to_owned(), completed: false, order }
    }

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.save(new("a", 0)).await.unwrap();
        let b = store.save(new("b", 0)).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_saves_get_distinct_ids() {
        let store = Arc::new(MemoryStore::new());
        let mut tasks = JoinSet::new();
        for i in 0..200 {
            let store = Arc::clone(&store);
            tasks.spawn(async move { store.save(new("x", i)).await.unwrap().id.unwrap() });
        }

        let mut ids = HashSet::new();
        while let Some(id) = tasks.join_next().await {
            assert!(ids.insert(id.unwrap()), "duplicate id");
        }
        assert_eq!(ids.len(), 200);
        assert_eq!(store.get_all().await.unwrap().len(), 200);
    }

    #[tokio::test]
    async fn get_all_sorts_by_order_then_id() {
        let store = MemoryStore::new();
        store.save(new("three", 3)).await.unwrap();
        store.save(new("one", 1)).await.unwrap();
        store.save(new("two-a", 2)).await.unwrap();
        store.save(new("two-b", 2)).await.unwrap();

        let titles: Vec<String> = store.get_all().await.unwrap()
            .into_iter()
            .filter_map(|t| t.title)
            .collect();
        assert_eq!(titles, ["one", "two-a", "two-b", "three"]);
    }

    #[tokio::test]
    async fn get_all_on_empty_store_is_empty() {
        assert!(MemoryStore::new().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_unset_fields() {
        let store = MemoryStore::new();
        let saved = store
            .save(NewTodo { title: "a".to_owned(), completed: true, order: 5 })
            .await
            .unwrap();
        let id = saved.id.unwrap();

        let patch = Todo { title: Some("x".to_owned()), ..Todo::default() };
        let updated = store.update(id, patch).await.unwrap();
        assert_eq!(updated.title.as_deref(), Some("x"));
        assert_eq!(updated.completed, Some(true));
        assert_eq!(updated.order, Some(5));
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.get(9).await, Err(StoreError::NotFound)));
        assert!(matches!(store.update(9, Todo::default()).await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete(9).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn delete_all_keeps_the_id_sequence() {
        let store = MemoryStore::new();
        store.save(new("a", 0)).await.unwrap();
        store.delete_all().await.unwrap();
        store.delete_all().await.unwrap();
        assert_eq!(store.save(new("b", 0)).await.unwrap().id, Some(2));
    }

    #[tokio::test]
    async fn destroy_resets_the_id_sequence() {
        let store = MemoryStore::new();
        store.save(new("a", 0)).await.unwrap();
        store.destroy().await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
        assert_eq!(store.save(new("b", 0)).await.unwrap().id, Some(1));
    }
}
