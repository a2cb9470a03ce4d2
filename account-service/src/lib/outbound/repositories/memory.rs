use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserStore;

/// In-memory `UserStore` used by the integration tests.
///
/// Simulates the relational store's unique constraints on email and dni; the
/// mutex gives the same exactly-one-winner semantics for concurrent creates.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    next_id: i64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let inner = self.inner.lock().expect("user store lock poisoned");
        Ok(inner.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        let mut inner = self.inner.lock().expect("user store lock poisoned");

        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Err(UserError::EmailAlreadyExists(
                new_user.email.as_str().to_string(),
            ));
        }
        if inner.users.iter().any(|u| u.dni == new_user.profile.dni) {
            return Err(UserError::DniAlreadyExists(
                new_user.profile.dni.as_str().to_string(),
            ));
        }

        inner.next_id += 1;
        let user = User {
            id: UserId(inner.next_id),
            email: new_user.email,
            role: new_user.role,
            dni: new_user.profile.dni,
            name: new_user.profile.name,
            lastname_main: new_user.profile.lastname_main,
            lastname_secondary: new_user.profile.lastname_secondary,
            address: new_user.profile.address,
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let mut inner = self.inner.lock().expect("user store lock poisoned");

        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::Dni;
    use crate::domain::user::models::Profile;
    use crate::domain::user::models::Role;

    fn new_user(email: &str, dni: &str) -> NewUser {
        NewUser {
            email: EmailAddress::new(email).unwrap(),
            role: Role::Customer,
            profile: Profile {
                dni: Dni::new(dni).unwrap(),
                name: "Ana".to_string(),
                lastname_main: "Quispe".to_string(),
                lastname_secondary: "Mamani".to_string(),
                address: "Av. Arequipa 123, Lima".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryUserStore::new();

        let first = store.create(new_user("a@example.com", "1")).await.unwrap();
        let second = store.create(new_user("b@example.com", "2")).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@example.com", "1")).await.unwrap();

        let result = store.create(new_user("a@example.com", "2")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_dni() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@example.com", "1")).await.unwrap();

        let result = store.create(new_user("b@example.com", "1")).await;
        assert!(matches!(result.unwrap_err(), UserError::DniAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_find_and_delete() {
        let store = InMemoryUserStore::new();
        let user = store.create(new_user("a@example.com", "1")).await.unwrap();

        let email = EmailAddress::new("a@example.com").unwrap();
        assert!(store.find_by_email(&email).await.unwrap().is_some());

        store.delete(user.id).await.unwrap();
        assert!(store.find_by_email(&email).await.unwrap().is_none());
        assert!(matches!(
            store.delete(user.id).await.unwrap_err(),
            UserError::NotFound(_)
        ));
    }
}
