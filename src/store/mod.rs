//! In-process document store.
//!
//! Each collection keeps its documents keyed by id behind an async lock and
//! exposes the owner-scoped lookups the handlers need. Nothing here knows
//! about HTTP or the program generator.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    client::Client, program::Program, progress::Progress, session::Session, user::User,
};

pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// The user a document belongs to. Users own themselves.
    fn owner(&self) -> Uuid;

    /// Records a modification time.
    fn touch(&mut self, now: DateTime<Utc>);
}

pub struct Collection<T> {
    docs: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            docs: Arc::clone(&self.docs),
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Document> Collection<T> {
    pub async fn insert(&self, doc: T) -> T {
        self.docs.write().await.insert(doc.id(), doc.clone());
        doc
    }

    /// Inserts `doc` unless an existing document matches `conflicts`.
    /// The check and the insert happen under one write lock.
    pub async fn insert_unless(&self, doc: T, conflicts: impl Fn(&T) -> bool) -> Option<T> {
        let mut docs = self.docs.write().await;
        if docs.values().any(|existing| conflicts(existing)) {
            return None;
        }
        docs.insert(doc.id(), doc.clone());
        Some(doc)
    }

    pub async fn get(&self, id: Uuid) -> Option<T> {
        self.docs.read().await.get(&id).cloned()
    }

    pub async fn find_owned(&self, id: Uuid, owner: Uuid) -> Option<T> {
        self.docs
            .read()
            .await
            .get(&id)
            .filter(|doc| doc.owner() == owner)
            .cloned()
    }

    pub async fn find_one(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.docs
            .read()
            .await
            .values()
            .find(|doc| predicate(doc))
            .cloned()
    }

    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.docs
            .read()
            .await
            .values()
            .filter(|doc| predicate(doc))
            .cloned()
            .collect()
    }

    /// Applies `mutate` to a copy of the owned document and commits it only
    /// when the closure succeeds. `Ok(None)` means no such owned document.
    pub async fn update_owned<E>(
        &self,
        id: Uuid,
        owner: Uuid,
        mutate: impl FnOnce(&mut T) -> Result<(), E>,
    ) -> Result<Option<T>, E> {
        let mut docs = self.docs.write().await;
        let Some(current) = docs.get(&id).filter(|doc| doc.owner() == owner) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        mutate(&mut updated)?;
        updated.touch(Utc::now());
        docs.insert(id, updated.clone());
        Ok(Some(updated))
    }

    pub async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Option<T> {
        let mut docs = self.docs.write().await;
        if docs.get(&id).is_some_and(|doc| doc.owner() == owner) {
            docs.remove(&id)
        } else {
            None
        }
    }
}

#[derive(Clone, Default)]
pub struct Store {
    pub users: Collection<User>,
    pub clients: Collection<Client>,
    pub programs: Collection<Program>,
    pub sessions: Collection<Session>,
    pub progress: Collection<Progress>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
