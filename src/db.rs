use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sea_orm::sea_query::{Alias, Query};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};
use tokio::fs;

const MIGRATIONS_DIR: &str = "migrations";
const MIGRATIONS_TABLE: &str = "schema_migrations";

/// Create a SeaORM connection pool.
pub async fn create_orm_conn(database_url: &str, max_connections: u32) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.max_connections(max_connections);
    let conn = Database::connect(options)
        .await
        .context("failed to connect to database")?;
    Ok(conn)
}

/// Applies the SQL files in `migrations/` in filename order, once each.
///
/// Applied file names are recorded in `schema_migrations`; each file runs in its
/// own transaction together with that bookkeeping row.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    conn.execute(Statement::from_string(
        backend,
        format!("CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (version VARCHAR(255) PRIMARY KEY)"),
    ))
    .await?;

    let applied = applied_versions(conn).await?;
    for file in migration_files().await? {
        let Some(version) = file.file_name().and_then(|name| name.to_str()).map(str::to_owned)
        else {
            continue;
        };
        if applied.contains(&version) {
            continue;
        }

        tracing::info!(%version, "applying migration");
        let sql = fs::read_to_string(&file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;

        let txn = conn.begin().await?;
        // Prepared statements cannot contain multiple commands.
        for stmt in sql.split(';').map(str::trim).filter(|stmt| !stmt.is_empty()) {
            txn.execute(Statement::from_string(backend, format!("{stmt};")))
                .await
                .with_context(|| format!("migration {version} failed"))?;
        }

        let record = Query::insert()
            .into_table(Alias::new(MIGRATIONS_TABLE))
            .columns([Alias::new("version")])
            .values([version.clone().into()])?
            .to_owned();
        txn.execute(backend.build(&record)).await?;
        txn.commit().await?;
    }

    Ok(())
}

async fn migration_files() -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(MIGRATIONS_DIR)
        .await
        .context("migrations directory not found")?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn applied_versions(conn: &DatabaseConnection) -> Result<HashSet<String>> {
    let select = Query::select()
        .column(Alias::new("version"))
        .from(Alias::new(MIGRATIONS_TABLE))
        .to_owned();
    let rows = conn
        .query_all(conn.get_database_backend().build(&select))
        .await?;

    let mut versions = HashSet::with_capacity(rows.len());
    for row in rows {
        versions.insert(row.try_get::<String>("", "version")?);
    }
    Ok(versions)
}
