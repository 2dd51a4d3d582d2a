//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, GeneRepository, MotifRepository, RepositoryError, RepositoryResult,
    UserRepository,
};
use crate::models::{BindingSiteRow, EntrezId, Gene, GeneBindingSite, Motif, MotifGeneRow, User};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Migration failed: {}", e),
                    ErrorContext::new("run_migrations"),
                )
            })?;
        }

        Ok(Self { pool, config })
    }

    /// Run a blocking database operation on the blocking pool, retrying
    /// retryable failures with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// `LIKE` pattern matching values that start with `prefix`.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn into_genes(rows: Vec<GeneRow>) -> RepositoryResult<Vec<Gene>> {
    rows.into_iter().map(GeneRow::into_gene).collect()
}

// ==================== Gene Repository ====================

#[async_trait]
impl GeneRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn count_genes(&self) -> RepositoryResult<i64> {
        self.with_conn(|conn| {
            genes::table
                .count()
                .get_result(conn)
                .map_err(|e| map_diesel_error(e).with_operation("count_genes"))
        })
        .await
    }

    async fn find_genes_by_entrez_id(&self, entrez_id: EntrezId) -> RepositoryResult<Vec<Gene>> {
        let id = entrez_id.value();
        let rows = self
            .with_conn(move |conn| {
                genes::table
                    .filter(genes::entrez_id.eq(id))
                    .order(genes::id)
                    .select(GeneRow::as_select())
                    .load(conn)
                    .map_err(|e| map_diesel_error(e).with_operation("find_genes_by_entrez_id"))
            })
            .await?;
        into_genes(rows)
    }

    async fn find_genes_by_synonym(&self, synonym: &str) -> RepositoryResult<Vec<Gene>> {
        let synonym = synonym.to_string();
        let rows = self
            .with_conn(move |conn| {
                genes::table
                    .filter(
                        genes::id.eq_any(
                            gene_synonyms::table
                                .filter(gene_synonyms::name.eq(synonym))
                                .select(gene_synonyms::gene_id),
                        ),
                    )
                    .order(genes::id)
                    .select(GeneRow::as_select())
                    .load(conn)
                    .map_err(|e| map_diesel_error(e).with_operation("find_genes_by_synonym"))
            })
            .await?;
        into_genes(rows)
    }

    async fn find_gene_by_name(&self, name: &str) -> RepositoryResult<Option<Gene>> {
        let name = name.to_string();
        let row = self
            .with_conn(move |conn| {
                genes::table
                    .filter(genes::name.eq(name))
                    .order(genes::id)
                    .select(GeneRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(|e| map_diesel_error(e).with_operation("find_gene_by_name"))
            })
            .await?;
        row.map(GeneRow::into_gene).transpose()
    }

    async fn fetch_synonyms(&self, entrez_id: EntrezId) -> RepositoryResult<Vec<String>> {
        let id = entrez_id.value();
        self.with_conn(move |conn| {
            gene_synonyms::table
                .inner_join(genes::table)
                .filter(genes::entrez_id.eq(id))
                .order(gene_synonyms::id)
                .select(gene_synonyms::name)
                .load(conn)
                .map_err(|e| map_diesel_error(e).with_operation("fetch_synonyms"))
        })
        .await
    }

    async fn fetch_gene_binding_sites(
        &self,
        entrez_id: EntrezId,
    ) -> RepositoryResult<Vec<GeneBindingSite>> {
        let id = entrez_id.value();
        let rows: Vec<GeneBindingSiteTuple> = self
            .with_conn(move |conn| {
                tfbs::table
                    .inner_join(genes::table)
                    .inner_join(motifs::table)
                    .filter(genes::entrez_id.eq(id))
                    .order(tfbs::id)
                    .select((
                        motifs::name,
                        tfbs::orientation,
                        tfbs::start,
                        tfbs::stop,
                        tfbs::p_value,
                        tfbs::match_sequence,
                    ))
                    .load(conn)
                    .map_err(|e| map_diesel_error(e).with_operation("fetch_gene_binding_sites"))
            })
            .await?;
        rows.into_iter().map(gene_binding_site).collect()
    }

    async fn complete_entrez_ids(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        let pattern = prefix_pattern(prefix);
        let rows: Vec<NameRow> = self
            .with_conn(move |conn| {
                sql_query(
                    "SELECT name FROM genes \
                     WHERE CAST(entrez_id AS TEXT) LIKE $1 \
                     ORDER BY id",
                )
                .bind::<Text, _>(pattern)
                .load(conn)
                .map_err(|e| map_diesel_error(e).with_operation("complete_entrez_ids"))
            })
            .await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    async fn complete_synonyms(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        let pattern = prefix_pattern(prefix);
        self.with_conn(move |conn| {
            gene_synonyms::table
                .filter(gene_synonyms::name.ilike(pattern))
                .order(gene_synonyms::id)
                .select(gene_synonyms::name)
                .load(conn)
                .map_err(|e| map_diesel_error(e).with_operation("complete_synonyms"))
        })
        .await
    }
}

// ==================== Motif Repository ====================

#[async_trait]
impl MotifRepository for PostgresRepository {
    async fn count_motifs(&self) -> RepositoryResult<i64> {
        self.with_conn(|conn| {
            motifs::table
                .count()
                .get_result(conn)
                .map_err(|e| map_diesel_error(e).with_operation("count_motifs"))
        })
        .await
    }

    async fn count_binding_sites(&self) -> RepositoryResult<i64> {
        self.with_conn(|conn| {
            tfbs::table
                .count()
                .get_result(conn)
                .map_err(|e| map_diesel_error(e).with_operation("count_binding_sites"))
        })
        .await
    }

    async fn find_motif_by_name(&self, name: &str) -> RepositoryResult<Option<Motif>> {
        let name = name.to_string();
        let row = self
            .with_conn(move |conn| {
                motifs::table
                    .filter(motifs::name.eq(name))
                    .order(motifs::id)
                    .select(MotifRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(|e| map_diesel_error(e).with_operation("find_motif_by_name"))
            })
            .await?;
        Ok(row.map(Motif::from))
    }

    async fn fetch_binding_site_rows(
        &self,
        motif_name: &str,
    ) -> RepositoryResult<Vec<BindingSiteRow>> {
        let motif_name = motif_name.to_string();
        let rows: Vec<BindingSiteAggRow> = self
            .with_conn(move |conn| {
                sql_query(
                    "SELECT g.name AS gene_name, g.chromosome, g.orientation, g.tss, \
                            g.start_promoter, g.stop_promoter, t.start, t.stop, \
                            COUNT(t.motif_id) AS num_sites \
                     FROM tfbs t \
                     JOIN genes g ON g.id = t.gene_id \
                     JOIN motifs m ON m.id = t.motif_id \
                     WHERE m.name = $1 \
                     GROUP BY g.name, g.chromosome, g.orientation, g.tss, \
                              g.start_promoter, g.stop_promoter, t.start, t.stop \
                     ORDER BY MIN(t.id)",
                )
                .bind::<Text, _>(motif_name)
                .load(conn)
                .map_err(|e| map_diesel_error(e).with_operation("fetch_binding_site_rows"))
            })
            .await?;
        rows.into_iter().map(BindingSiteAggRow::into_row).collect()
    }

    async fn fetch_motif_genes(&self, motif_name: &str) -> RepositoryResult<Vec<MotifGeneRow>> {
        let motif_name = motif_name.to_string();
        let rows: Vec<MotifGeneAggRow> = self
            .with_conn(move |conn| {
                sql_query(
                    "SELECT g.entrez_id, g.name AS gene_name, g.chromosome, g.orientation, \
                            g.tss, g.start_promoter, g.stop_promoter, \
                            COUNT(t.motif_id) AS num_sites \
                     FROM tfbs t \
                     JOIN genes g ON g.id = t.gene_id \
                     JOIN motifs m ON m.id = t.motif_id \
                     WHERE m.name = $1 \
                     GROUP BY g.id, g.entrez_id, g.name, g.chromosome, g.orientation, \
                              g.tss, g.start_promoter, g.stop_promoter \
                     ORDER BY MIN(t.id)",
                )
                .bind::<Text, _>(motif_name)
                .load(conn)
                .map_err(|e| map_diesel_error(e).with_operation("fetch_motif_genes"))
            })
            .await?;
        rows.into_iter().map(MotifGeneAggRow::into_row).collect()
    }

    async fn complete_motif_names(&self, prefix: &str) -> RepositoryResult<Vec<String>> {
        let pattern = prefix_pattern(prefix);
        let rows: Vec<NameRow> = self
            .with_conn(move |conn| {
                sql_query(
                    "SELECT DISTINCT m.name AS name \
                     FROM motifs m \
                     JOIN tfbs t ON t.motif_id = m.id \
                     WHERE m.name ILIKE $1 \
                     ORDER BY m.name",
                )
                .bind::<Text, _>(pattern)
                .load(conn)
                .map_err(|e| map_diesel_error(e).with_operation("complete_motif_names"))
            })
            .await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }
}

// ==================== User Repository ====================

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn find_user(&self, username: &str) -> RepositoryResult<Option<User>> {
        let username = username.to_string();
        let row = self
            .with_conn(move |conn| {
                users::table
                    .filter(users::username.eq(username))
                    .select(UserRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(|e| map_diesel_error(e).with_operation("find_user"))
            })
            .await?;
        Ok(row.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("SOX"), "SOX%");
        assert_eq!(prefix_pattern("a_b%c"), "a\\_b\\%c%");
        assert_eq!(prefix_pattern(""), "%");
    }

    #[test]
    fn test_config_with_url_uses_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/tfbs");
        assert_eq!(config.database_url, "postgres://localhost/tfbs");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.max_retries, 3);
    }
}
