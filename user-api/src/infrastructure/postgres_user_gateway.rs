use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    domain::{
        errors::{BusinessError, DomainError},
        user::{NewUser, User},
    },
    infrastructure::{Session, Tx, UserGateway},
};

type PgTx = Transaction<'static, Postgres>;

#[derive(Clone)]
pub struct PostgresUserGateway {
    pool: PgPool,
}

impl PostgresUserGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Session for PostgresUserGateway {
    async fn begin(&self) -> Result<Tx, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|err| DomainError::internal("begin transaction", err))?;
        Ok(Tx::new(tx))
    }

    async fn commit(&self, tx: Tx) -> Result<(), DomainError> {
        let tx = tx.into_inner::<PgTx>().ok_or_else(foreign_handle)?;
        tx.commit()
            .await
            .map_err(|err| DomainError::internal("commit transaction", err))
    }

    async fn rollback(&self, tx: Tx) -> Result<(), DomainError> {
        let tx = tx.into_inner::<PgTx>().ok_or_else(foreign_handle)?;
        tx.rollback()
            .await
            .map_err(|err| DomainError::internal("rollback transaction", err))
    }
}

#[async_trait]
impl UserGateway for PostgresUserGateway {
    async fn find_by_email(
        &self,
        tx: Option<&mut Tx>,
        email: &str,
    ) -> Result<User, DomainError> {
        let query =
            sqlx::query("SELECT id, name, email FROM users WHERE email = $1").bind(email);

        let maybe_row = match tx {
            Some(tx) => query.fetch_optional(pg_conn(tx)?).await,
            None => query.fetch_optional(&self.pool).await,
        }
        .map_err(|err| DomainError::internal("select user by email", err))?;

        match maybe_row {
            Some(row) => Ok(row_to_user(&row)),
            None => Err(BusinessError::UserNotFound.into()),
        }
    }

    async fn find_all(&self, tx: Option<&mut Tx>) -> Result<Vec<User>, DomainError> {
        let query = sqlx::query("SELECT id, name, email FROM users");

        let rows = match tx {
            Some(tx) => query.fetch_all(pg_conn(tx)?).await,
            None => query.fetch_all(&self.pool).await,
        }
        .map_err(|err| DomainError::internal("select users", err))?;

        Ok(rows.iter().map(row_to_user).collect())
    }

    async fn create(&self, tx: Option<&mut Tx>, user: NewUser) -> Result<User, DomainError> {
        let query =
            sqlx::query("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email")
                .bind(user.name)
                .bind(user.email);

        // A unique-index violation lands here as an opaque storage failure,
        // same as any other insert error.
        let row = match tx {
            Some(tx) => query.fetch_one(pg_conn(tx)?).await,
            None => query.fetch_one(&self.pool).await,
        }
        .map_err(|err| DomainError::internal("insert user", err))?;

        Ok(row_to_user(&row))
    }
}

fn pg_conn<'a>(tx: &'a mut Tx) -> Result<&'a mut sqlx::PgConnection, DomainError> {
    tx.downcast_mut::<PgTx>()
        .map(|tx| &mut **tx)
        .ok_or_else(foreign_handle)
}

fn foreign_handle() -> DomainError {
    DomainError::internal(
        "session",
        anyhow::anyhow!("transaction handle does not belong to the Postgres backend"),
    )
}

fn row_to_user(row: &PgRow) -> User {
    User {
        id: row.get::<i64, _>("id"),
        name: row.get::<String, _>("name"),
        email: row.get::<String, _>("email"),
    }
}
