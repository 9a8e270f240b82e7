use sqlx::PgPool;

const SCHEMA: &str = include_str!("../schema.sql");

/// Creates the `pessoas` table if it does not exist yet. Runs once at start-up.
#[tracing::instrument(skip(pool))]
pub async fn provision_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::info!("database schema provisioned");
    Ok(())
}
