//! In-memory `TodoStore` used by the service binary and tests.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::model::Todo;
use crate::store::{StoreError, TodoStore};

#[derive(Debug)]
struct Inner {
    todos: BTreeMap<i64, Todo>,
    next_id: i64,
}

/// In-process `TodoStore` backed by an ordered map.
///
/// Ids start at 1 and are handed out from a counter that never rewinds, so a
/// deleted id is never reissued. All mutations happen under one write lock,
/// which makes bulk delete all-or-nothing.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                todos: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of todos currently held.
    pub async fn len(&self) -> usize {
        self.inner.read().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, id: i64) -> Option<Todo> {
        self.inner.read().await.todos.get(&id).cloned()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create(&self, subject: &str, description: &str) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend("todo id space exhausted".to_string()))?;

        let now = Utc::now();
        let todo = Todo {
            id,
            subject: subject.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn read_page(&self, prev_id: i64, size: usize) -> Result<Vec<Todo>, StoreError> {
        let inner = self.inner.read().await;
        let page = inner
            .todos
            .range((Bound::Excluded(prev_id), Bound::Unbounded))
            .take(size)
            .map(|(_, todo)| todo.clone())
            .collect();
        Ok(page)
    }

    async fn update(
        &self,
        id: i64,
        subject: &str,
        description: &str,
    ) -> Result<Option<Todo>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(todo) = inner.todos.get_mut(&id) else {
            return Ok(None);
        };
        todo.subject = subject.to_string();
        todo.description = description.to_string();
        // never move backwards, even if the wall clock does
        todo.updated_at = Utc::now().max(todo.updated_at);
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, ids: &[i64]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !inner.todos.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::NotFound { ids: missing });
        }
        for id in ids {
            inner.todos.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(n: usize) -> MemoryStore {
        let store = MemoryStore::new();
        for i in 0..n {
            store.create(&format!("todo {i}"), "").await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.create("a", "").await.unwrap();
        let b = store.create("b", "desc").await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(b.description, "desc");
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = seeded(2).await;
        store.delete(&[2]).await.unwrap();
        let next = store.create("c", "").await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn read_page_starts_after_cursor() {
        let store = seeded(7).await;
        let page = store.read_page(2, 3).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn read_page_past_end_is_empty() {
        let store = seeded(3).await;
        assert!(store.read_page(3, 5).await.unwrap().is_empty());
        assert!(store.read_page(100, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_page_with_negative_cursor_starts_at_beginning() {
        let store = seeded(2).await;
        let page = store.read_page(-10, 5).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, 1);
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let store = seeded(1).await;
        assert_eq!(store.update(9, "x", "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_advances_updated_at() {
        let store = seeded(1).await;
        let before = store.get(1).await.unwrap();
        let after = store.update(1, "new", "d").await.unwrap().unwrap();
        assert_eq!(after.subject, "new");
        assert_eq!(after.description, "d");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_given_ids() {
        let store = seeded(3).await;
        store.delete(&[1, 2]).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.get(3).await.is_some());
    }

    #[tokio::test]
    async fn delete_with_missing_id_removes_nothing() {
        let store = seeded(2).await;
        let err = store.delete(&[1, 5]).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound { ids: vec![5] });
        assert_eq!(store.len().await, 2);
    }
}
