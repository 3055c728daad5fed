//! In-process user repository.
//!
//! Mirrors the PostgreSQL semantics: ids come from a counter that never
//! rewinds, listings are in id order, search is case-insensitive substring
//! matching on name or email.

use crate::{effective_term, UserRepository};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use roster_core::{NewUser, PageRequest, RosterError, RosterResult, User, UserChanges, UserId};
use std::collections::BTreeMap;

#[derive(Default)]
struct Table {
    rows: BTreeMap<UserId, User>,
    last_id: i64,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// A complete record store held in memory.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<'a>(users: impl Iterator<Item = &'a User>, page: PageRequest) -> Vec<User> {
    users
        .skip(page.skip_usize())
        .take(page.limit_usize())
        .cloned()
        .collect()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        Ok(self.table.lock().rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>> {
        Ok(self
            .table
            .lock()
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self, page: PageRequest) -> RosterResult<Vec<User>> {
        Ok(window(self.table.lock().rows.values(), page))
    }

    async fn search(&self, term: Option<&str>, page: PageRequest) -> RosterResult<Vec<User>> {
        let Some(term) = effective_term(term) else {
            return self.find_all(page).await;
        };
        let needle = term.to_lowercase();

        let table = self.table.lock();
        let matches = table.rows.values().filter(|u| {
            u.name.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
        });
        Ok(window(matches, page))
    }

    async fn count(&self) -> RosterResult<u64> {
        Ok(self.table.lock().rows.len() as u64)
    }

    async fn create(&self, user: &NewUser) -> RosterResult<User> {
        let mut table = self.table.lock();
        if table.email_taken(&user.email, None) {
            return Err(RosterError::duplicate_key("Email already registered"));
        }

        table.last_id += 1;
        let now = Utc::now();
        let stored = User {
            id: UserId(table.last_id),
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> RosterResult<Option<User>> {
        let mut table = self.table.lock();
        if let Some(email) = &changes.email {
            if table.email_taken(email, Some(id)) {
                return Err(RosterError::duplicate_key("Email already registered"));
            }
        }

        Ok(table.rows.get_mut(&id).map(|user| {
            user.apply(changes, Utc::now());
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> RosterResult<bool> {
        Ok(self.table.lock().rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str, age: i32) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }

    async fn seeded(names: &[&str]) -> InMemoryUserRepository {
        let repo = InMemoryUserRepository::new();
        for name in names {
            let email = format!("{}@example.com", name.to_lowercase());
            repo.create(&new_user(name, &email, 30)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_create_then_find_by_id() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(&new_user("Alice", "alice@example.com", 30)).await.unwrap();

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.created_at, found.updated_at);
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_by_id(UserId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_without_write() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_user("A", "a@x.com", 1)).await.unwrap();

        let err = repo.create(&new_user("B", "a@x.com", 2)).await.unwrap_err();
        assert!(matches!(err, RosterError::DuplicateKey(_)));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_uniqueness_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_user("A", "a@x.com", 1)).await.unwrap();
        assert!(repo.create(&new_user("A", "A@x.com", 1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_ids_never_reused() {
        let repo = seeded(&["A", "B"]).await;
        assert!(repo.delete(UserId(2)).await.unwrap());

        let next = repo.create(&new_user("C", "c@x.com", 1)).await.unwrap();
        assert_eq!(next.id, UserId(3));
    }

    #[tokio::test]
    async fn test_find_all_pagination() {
        let repo = seeded(&["A", "B", "C", "D", "E"]).await;

        let first = repo.find_all(PageRequest::new(0, 2)).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id, UserId(1));

        let tail = repo.find_all(PageRequest::new(4, 2)).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].name, "E");

        assert!(repo.find_all(PageRequest::new(10, 2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_name_or_email_case_insensitively() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_user("Alice", "alice@example.com", 30)).await.unwrap();
        repo.create(&new_user("Bob", "bob@example.com", 40)).await.unwrap();
        repo.create(&new_user("Carol", "ALI.c@example.com", 50)).await.unwrap();

        let hits = repo.search(Some("ali"), PageRequest::default()).await.unwrap();
        let names: Vec<_> = hits.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
    }

    #[tokio::test]
    async fn test_empty_search_equals_list() {
        let repo = seeded(&["Alice", "Bob"]).await;
        let page = PageRequest::default();

        let listed = repo.find_all(page).await.unwrap();
        assert_eq!(repo.search(Some(""), page).await.unwrap(), listed);
        assert_eq!(repo.search(None, page).await.unwrap(), listed);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = InMemoryUserRepository::new();
        let before = repo.create(&new_user("A", "a@x.com", 30)).await.unwrap();

        let after = repo
            .update(
                before.id,
                &UserChanges {
                    age: Some(31),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(after.age, 31);
        assert_eq!(after.name, "A");
        assert_eq!(after.email, "a@x.com");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(UserId(5), &UserChanges::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_to_taken_email() {
        let repo = seeded(&["A", "B"]).await;
        let err = repo
            .update(
                UserId(2),
                &UserChanges {
                    email: Some("a@example.com".to_string()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_false() {
        let repo = seeded(&["A"]).await;
        assert!(repo.delete(UserId(1)).await.unwrap());
        assert!(repo.find_by_id(UserId(1)).await.unwrap().is_none());
        assert!(!repo.delete(UserId(1)).await.unwrap());
    }
}
