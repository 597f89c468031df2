use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{BusinessError, DomainError},
        user::{NewUser, User},
    },
    infrastructure::{Session, Tx, UserGateway},
};

/// In-memory gateway for tests and local development.
///
/// Not transactional: writes are visible immediately, and the [`Session`]
/// implementation hands out inert unit-of-work tokens whose commit and
/// rollback always succeed. Duplicate emails fail the same way the Postgres
/// unique index does, with an opaque storage error.
pub struct InMemoryUserGateway {
    users: RwLock<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserGateway {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Session for InMemoryUserGateway {
    async fn begin(&self) -> Result<Tx, DomainError> {
        Ok(Tx::new(()))
    }

    async fn commit(&self, _tx: Tx) -> Result<(), DomainError> {
        Ok(())
    }

    async fn rollback(&self, _tx: Tx) -> Result<(), DomainError> {
        Ok(())
    }
}

#[async_trait]
impl UserGateway for InMemoryUserGateway {
    async fn find_by_email(
        &self,
        _tx: Option<&mut Tx>,
        email: &str,
    ) -> Result<User, DomainError> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned()
            .ok_or_else(|| BusinessError::UserNotFound.into())
    }

    async fn find_all(&self, _tx: Option<&mut Tx>) -> Result<Vec<User>, DomainError> {
        Ok(self.users.read().await.clone())
    }

    async fn create(&self, _tx: Option<&mut Tx>, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.iter().any(|existing| existing.email == user.email) {
            return Err(DomainError::internal(
                "insert user",
                anyhow::anyhow!("unique constraint violation on users.email"),
            ));
        }

        let created = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: user.name,
            email: user.email,
        };
        users.push(created.clone());

        Ok(created)
    }
}
