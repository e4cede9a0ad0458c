//! PostgreSQL-backed member store

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};
use tracing::info;

use super::{StoreError, StoreResult, UserStore};
use crate::models::{BillingMonth, Due, DueStatus, User};

/// Member store over the `members` and `dues` tables
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new member store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        info!("Running member schema migrations");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        Ok(())
    }

    async fn load_dues(&self, username: &str) -> StoreResult<Vec<Due>> {
        let rows = sqlx::query(
            r#"
            SELECT billing_month, amount, status
            FROM dues
            WHERE username = $1
            ORDER BY id
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(due_from_row).collect()
    }
}

fn due_from_row(row: &PgRow) -> StoreResult<Due> {
    let month: String = row.try_get("billing_month")?;
    let status: String = row.try_get("status")?;

    Ok(Due {
        date: month
            .parse::<BillingMonth>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        amount: row.try_get("amount")?,
        status: status.parse::<DueStatus>().map_err(StoreError::Corrupt)?,
    })
}

async fn insert_due(conn: &mut PgConnection, username: &str, due: &Due) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO dues (username, billing_month, amount, status)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username, billing_month) DO NOTHING
        "#,
    )
    .bind(username)
    .bind(due.date.to_string())
    .bind(due.amount)
    .bind(due.status.as_str())
    .execute(conn)
    .await?;

    Ok(())
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT username, name, age, password_hash, time_slot, enrolled, enrolled_date
            FROM members
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let dues_list = self.load_dues(username).await?;
        Ok(Some(User {
            username: row.try_get("username")?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            password_hash: row.try_get("password_hash")?,
            time_slot: row.try_get("time_slot")?,
            enrolled: row.try_get("enrolled")?,
            enrolled_date: row.try_get("enrolled_date")?,
            dues_list,
        }))
    }

    async fn insert(&self, user: &User) -> StoreResult<bool> {
        info!("Creating new member: {}", user.username);

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO members
                (username, name, age, password_hash, time_slot, enrolled, enrolled_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(&user.username)
        .bind(&user.name)
        .bind(user.age)
        .bind(&user.password_hash)
        .bind(&user.time_slot)
        .bind(user.enrolled)
        .bind(&user.enrolled_date)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for due in &user.dues_list {
            insert_due(&mut tx, &user.username, due).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn append_dues(&self, username: &str, dues: &[Due]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for due in dues {
            insert_due(&mut tx, username, due).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn enroll(
        &self,
        username: &str,
        enrolled_date: &str,
        time_slot: &str,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE members
            SET enrolled = TRUE, enrolled_date = $2, time_slot = $3
            WHERE username = $1
            "#,
        )
        .bind(username)
        .bind(enrolled_date)
        .bind(time_slot)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_time_slot(&self, username: &str, time_slot: &str) -> StoreResult<()> {
        sqlx::query("UPDATE members SET time_slot = $2 WHERE username = $1")
            .bind(username)
            .bind(time_slot)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_due_paid(&self, username: &str, month: BillingMonth) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE dues
            SET status = $3
            WHERE id = (
                SELECT id FROM dues
                WHERE username = $1 AND billing_month = $2
                ORDER BY id
                LIMIT 1
            )
            "#,
        )
        .bind(username)
        .bind(month.to_string())
        .bind(DueStatus::Paid.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::database::{DatabaseConfig, init_pool};

    async fn store() -> PgUserStore {
        let config = DatabaseConfig::from_env().expect("database config");
        let pool = init_pool(&config).await.expect("database pool");
        let store = PgUserStore::new(pool);
        store.migrate().await.expect("migrations");
        sqlx::query("DELETE FROM members WHERE username LIKE 'pgtest_%'")
            .execute(&store.pool)
            .await
            .expect("cleanup");
        store
    }

    // Needs PostgreSQL at DATABASE_URL.
    #[tokio::test]
    #[ignore]
    async fn test_member_round_trip_with_field_updates() {
        let store = store().await;
        let jan: BillingMonth = "2025-01".parse().unwrap();
        let user = User::new(
            "pgtest_alice".into(),
            "Alice".into(),
            30,
            "hash".into(),
            Due::unpaid(jan),
        );

        assert!(store.insert(&user).await.unwrap());
        assert!(!store.insert(&user).await.unwrap());

        store
            .append_dues("pgtest_alice", &[Due::unpaid(jan), Due::unpaid(jan.next())])
            .await
            .unwrap();
        store
            .enroll("pgtest_alice", "2025-01-05", "6-7AM")
            .await
            .unwrap();
        assert!(store.mark_due_paid("pgtest_alice", jan).await.unwrap());
        assert!(
            !store
                .mark_due_paid("pgtest_alice", "2030-01".parse().unwrap())
                .await
                .unwrap()
        );

        let stored = store.find("pgtest_alice").await.unwrap().unwrap();
        assert!(stored.enrolled);
        assert_eq!(stored.time_slot, "6-7AM");
        assert_eq!(stored.dues_list.len(), 2);
        assert_eq!(stored.dues_list[0].status, DueStatus::Paid);
        assert_eq!(stored.dues_list[1].status, DueStatus::Unpaid);
    }
}
