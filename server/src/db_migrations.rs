use std::path::Path;

const WORKSPACE_MIGRATIONS_DIR: &str = "server/migrations";
const CRATE_MIGRATIONS_DIR: &str = "./migrations";

// Started from the workspace root in production, from the crate dir under `cargo test`.
fn migrations_path() -> &'static Path {
    [WORKSPACE_MIGRATIONS_DIR, CRATE_MIGRATIONS_DIR]
        .into_iter()
        .map(Path::new)
        .find(|path| path.exists())
        .unwrap_or(Path::new(CRATE_MIGRATIONS_DIR))
}

pub async fn run(pool: &sqlx::PgPool) -> Result<(), sqlx_core::migrate::MigrateError> {
    let path = migrations_path();
    tracing::debug!(path = %path.display(), "running user profile migrations");
    let migrator = sqlx_core::migrate::Migrator::new(path).await?;
    migrator.run(pool).await
}
