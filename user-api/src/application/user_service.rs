use std::sync::Arc;

use crate::{
    application::dto::{CreateUserRequest, SearchUsersQuery, SearchUsersResponse, UserResponse},
    domain::{
        errors::{BusinessError, DomainError},
        user::NewUser,
    },
    infrastructure::{Tx, UserGateway},
};

#[derive(Clone)]
pub struct UserService {
    gateway: Arc<dyn UserGateway>,
}

impl UserService {
    pub fn new(gateway: Arc<dyn UserGateway>) -> Self {
        Self { gateway }
    }

    /// Creates a new user after checking that the email is not taken.
    ///
    /// The uniqueness check and the insert run inside the caller's unit of
    /// work. The check-then-create sequence is not atomic across requests;
    /// concurrent creations racing on the same email are rejected by the
    /// storage unique index, which surfaces as an internal error rather than
    /// [`BusinessError::UserAlreadyExists`].
    pub async fn create_user(
        &self,
        tx: &mut Tx,
        request: CreateUserRequest,
    ) -> Result<UserResponse, DomainError> {
        if request.name.is_empty() {
            return Err(BusinessError::EmptyName.into());
        }
        if request.email.is_empty() {
            return Err(BusinessError::EmptyEmail.into());
        }

        match self
            .gateway
            .find_by_email(Some(&mut *tx), &request.email)
            .await
        {
            // The email is free; this is the expected path for a new user.
            Err(DomainError::Business(BusinessError::UserNotFound)) => {}
            Err(err) => return Err(DomainError::internal("find by email", err)),
            Ok(_) => return Err(BusinessError::UserAlreadyExists.into()),
        }

        let created = self
            .gateway
            .create(
                Some(&mut *tx),
                NewUser {
                    name: request.name,
                    email: request.email,
                },
            )
            .await
            .map_err(|err| DomainError::internal("create user", err))?;

        Ok(UserResponse::from(created))
    }

    /// Searches users, all of them or by exact email.
    ///
    /// A filter that matches nothing yields an empty list, not an error, so
    /// callers never branch on whether a filter was applied.
    pub async fn search_users(
        &self,
        query: SearchUsersQuery,
    ) -> Result<SearchUsersResponse, DomainError> {
        match query.email.as_deref() {
            None | Some("") => self.find_all().await,
            Some(email) => self.find_by_email(email).await,
        }
    }

    async fn find_all(&self) -> Result<SearchUsersResponse, DomainError> {
        let users = self
            .gateway
            .find_all(None)
            .await
            .map_err(|err| DomainError::internal("find all", err))?;

        Ok(SearchUsersResponse::from_users(users))
    }

    async fn find_by_email(&self, email: &str) -> Result<SearchUsersResponse, DomainError> {
        match self.gateway.find_by_email(None, email).await {
            Ok(user) => Ok(SearchUsersResponse::from_users(vec![user])),
            Err(DomainError::Business(BusinessError::UserNotFound)) => {
                Ok(SearchUsersResponse::from_users(Vec::new()))
            }
            Err(err) => Err(DomainError::internal("find by email", err)),
        }
    }
}
