use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Dni;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserStore;

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

fn row_to_user(row: &PgRow) -> Result<User, UserError> {
    Ok(User {
        id: UserId(row.try_get("id").map_err(db_error)?),
        email: EmailAddress::new(row.try_get::<String, _>("email").map_err(db_error)?)?,
        role: Role::from_str(&row.try_get::<String, _>("role").map_err(db_error)?)?,
        dni: Dni::new(row.try_get::<String, _>("dni").map_err(db_error)?)?,
        name: row.try_get("name").map_err(db_error)?,
        lastname_main: row.try_get("lastname_main").map_err(db_error)?,
        lastname_secondary: row.try_get("lastname_secondary").map_err(db_error)?,
        address: row.try_get("address").map_err(db_error)?,
        created_at: row.try_get("created_at").map_err(db_error)?,
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, role, dni, name, lastname_main, lastname_secondary, address, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        // id and created_at are store-assigned; the unique constraints on
        // email and dni are the single arbiter for duplicate races.
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, role, dni, name, lastname_main, lastname_secondary, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at
            "#,
        )
        .bind(new_user.email.as_str())
        .bind(new_user.role.as_str())
        .bind(new_user.profile.dni.as_str())
        .bind(&new_user.profile.name)
        .bind(&new_user.profile.lastname_main)
        .bind(&new_user.profile.lastname_secondary)
        .bind(&new_user.profile.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_email_key") {
                        return UserError::EmailAlreadyExists(
                            new_user.email.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("users_dni_key") {
                        return UserError::DniAlreadyExists(
                            new_user.profile.dni.as_str().to_string(),
                        );
                    }
                }
            }
            db_error(e)
        })?;

        Ok(User {
            id: UserId(row.try_get("id").map_err(db_error)?),
            email: new_user.email,
            role: new_user.role,
            dni: new_user.profile.dni,
            name: new_user.profile.name,
            lastname_main: new_user.profile.lastname_main,
            lastname_secondary: new_user.profile.lastname_secondary,
            address: new_user.profile.address,
            created_at: row.try_get("created_at").map_err(db_error)?,
        })
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() != 1 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
