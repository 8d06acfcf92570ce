//! Database helpers for identities and reset tokens.

use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use crate::api::{
    email,
    error::{ApiError, is_unique_violation},
};

/// Persisted identity row, including credential material.
#[derive(Debug)]
pub(crate) struct Identity {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) role: String,
    pub(crate) password_reset_token: Option<String>,
    pub(crate) created_at: String,
}

// The salt column stays server-side only; verification reads the PHC hash.
const IDENTITY_COLUMNS: &str = r#"id, email, password_hash, role, password_reset_token,
       to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at"#;

fn identity_from_row(row: &sqlx::postgres::PgRow) -> Identity {
    Identity {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        password_reset_token: row.get("password_reset_token"),
        created_at: row.get("created_at"),
    }
}

pub(crate) async fn find_identity_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Identity>, ApiError> {
    let query = format!("SELECT {IDENTITY_COLUMNS} FROM users WHERE email = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.as_ref().map(identity_from_row))
}

pub(crate) async fn find_identity_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Identity>, ApiError> {
    let query = format!("SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.as_ref().map(identity_from_row))
}

fn role_for_count(count: i64) -> &'static str {
    if count == 0 { "admin" } else { "user" }
}

/// Insert a new identity.
///
/// The first registrant becomes an admin. The transaction takes a
/// `SHARE ROW EXCLUSIVE` lock on `users` before counting, so two
/// concurrent first registrations with different emails cannot both read
/// an empty table and both commit as admin. Duplicate emails surface as
/// `ApiError::Conflict`.
pub(crate) async fn insert_identity(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    salt: &str,
) -> Result<Identity, ApiError> {
    let mut tx = pool.begin().await?;

    // Self-exclusive table lock: serializes concurrent registrations for
    // the count below while still allowing plain reads.
    let lock_query = "LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "LOCK",
        db.statement = lock_query
    );
    sqlx::query(lock_query)
        .execute(&mut *tx)
        .instrument(span)
        .await?;

    let count_query = "SELECT COUNT(*) AS count FROM users";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = count_query
    );
    let count: i64 = sqlx::query(count_query)
        .fetch_one(&mut *tx)
        .instrument(span)
        .await?
        .get("count");

    let role = role_for_count(count);

    let insert_query = format!(
        r"INSERT INTO users (email, password_hash, salt, role)
          VALUES ($1, $2, $3, $4)
          RETURNING {IDENTITY_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = %insert_query
    );
    let row = sqlx::query(&insert_query)
        .bind(email)
        .bind(password_hash)
        .bind(salt)
        .bind(role)
        .fetch_one(&mut *tx)
        .instrument(span)
        .await;

    let row = match row {
        Ok(row) => row,
        Err(err) => {
            let _ = tx.rollback().await;
            if is_unique_violation(&err) {
                return Err(ApiError::Conflict("Email is already registered"));
            }
            return Err(err.into());
        }
    };

    tx.commit().await?;

    Ok(identity_from_row(&row))
}

/// Store a reset token and enqueue the notification email atomically.
pub(crate) async fn store_reset_token(
    pool: &PgPool,
    user_id: Uuid,
    to_email: &str,
    reset_token: &str,
) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    let query = "UPDATE users SET password_reset_token = $2 WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(reset_token)
        .execute(&mut *tx)
        .instrument(span)
        .await?;

    email::enqueue_email(
        &mut tx,
        to_email,
        "password_reset",
        &serde_json::json!({ "password_reset_token": reset_token }),
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Replace credential material and clear the single-use reset token.
pub(crate) async fn apply_password_reset(
    pool: &PgPool,
    user_id: Uuid,
    password_hash: &str,
    salt: &str,
) -> Result<(), ApiError> {
    let query = r"
        UPDATE users
        SET password_hash = $2,
            salt = $3,
            password_reset_token = NULL
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(password_hash)
        .bind(salt)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_empty_table_yields_admin() {
        assert_eq!(role_for_count(0), "admin");
        assert_eq!(role_for_count(1), "user");
        assert_eq!(role_for_count(2), "user");
        assert_eq!(role_for_count(i64::MAX), "user");
    }
}
