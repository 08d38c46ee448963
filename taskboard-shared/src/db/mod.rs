/// Database layer
///
/// Connection pooling and schema migrations for the Taskboard PostgreSQL
/// database. Row mapping lives in `repository::postgres`.
///
/// - `pool`: pool creation, liveness query, statistics, shutdown
/// - `migrations`: embedded migration runner and development helpers
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::from_url(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
