use std::any::Any;

use async_trait::async_trait;

use crate::domain::{
    errors::DomainError,
    user::{NewUser, User},
};

pub mod in_memory_user_gateway;
pub mod postgres_user_gateway;

/// Opaque handle for one open unit of work against storage.
///
/// The boundary layer obtains one from [`Session::begin`] and threads it
/// through every gateway call that must share the transaction. Backends
/// downcast to their own transaction type; handing the handle to a gateway
/// from a different backend is an error, never a silent no-op.
pub struct Tx(Box<dyn Any + Send>);

impl Tx {
    pub fn new<T: Any + Send>(inner: T) -> Self {
        Self(Box::new(inner))
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.downcast_mut()
    }

    pub fn into_inner<T: Any>(self) -> Option<T> {
        self.0.downcast::<T>().ok().map(|inner| *inner)
    }
}

/// Transaction lifecycle contract. The boundary opens one unit of work per
/// mutating request and closes it exactly once, by commit or rollback.
#[async_trait]
pub trait Session: Send + Sync {
    async fn begin(&self) -> Result<Tx, DomainError>;
    async fn commit(&self, tx: Tx) -> Result<(), DomainError>;
    async fn rollback(&self, tx: Tx) -> Result<(), DomainError>;
}

/// Persistence contract required by the use-case layer.
///
/// Calls that receive `Some(tx)` run inside that unit of work; calls that
/// receive `None` run directly against the backing store.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Looks up the single user with the given email.
    ///
    /// Fails with [`BusinessError::UserNotFound`] when no row matches; email
    /// is unique in storage, so at most one match is possible.
    ///
    /// [`BusinessError::UserNotFound`]: crate::domain::errors::BusinessError::UserNotFound
    async fn find_by_email(
        &self,
        tx: Option<&mut Tx>,
        email: &str,
    ) -> Result<User, DomainError>;

    /// Returns all users in storage order.
    async fn find_all(&self, tx: Option<&mut Tx>) -> Result<Vec<User>, DomainError>;

    /// Persists a new user and returns it with its assigned id.
    async fn create(&self, tx: Option<&mut Tx>, user: NewUser) -> Result<User, DomainError>;
}
