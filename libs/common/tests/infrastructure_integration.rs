//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database and Redis cache used by the
//! membership service are reachable. They need both services running locally
//! and are ignored by default: `cargo test -p common -- --ignored`.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use sqlx::Row;

#[tokio::test]
#[ignore]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let test_key = "integration_test_token_owner";
    redis_pool.set(test_key, "integration_test_token", Some(10)).await?;
    assert_eq!(
        redis_pool.get(test_key).await?,
        Some("integration_test_token".to_string()),
        "Redis SET/GET test failed"
    );

    redis_pool.delete(test_key).await?;
    assert_eq!(redis_pool.get(test_key).await?, None, "Redis delete operation failed");

    Ok(())
}
