use anyhow::anyhow;
use async_trait::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

use crate::models::search_history::SearchHistoryEntry;
use crate::models::space::Coordinate;
use crate::repositories::HistoryRepository;

pub const RETRY_LIMIT: usize = 5;

pub struct PostgresHistoryRepo {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresHistoryRepo {
    pub fn new(postgres_connection: Pool<PostgresConnectionManager<NoTls>>) -> Self {
        Self {
            postgres_connection,
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("Failed to retrieve postgres connection due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        return Err(anyhow!("Failed to retrieve a valid connection from postgres pool, BAILING"));
    }
}

#[async_trait]
impl HistoryRepository for PostgresHistoryRepo {
    async fn upsert_search(&self, entry: &SearchHistoryEntry) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        let timestamp = entry.timestamp.format(&Rfc3339)?;
        let mut stmt = String::from("INSERT INTO search_history (name, lat, lng, timestamp) VALUES ");
        let params = format!(
            "('{}', {}, {}, '{}')",
            entry.name.replace('\'', "''"),
            entry.coordinate.lat,
            entry.coordinate.lng,
            timestamp,
        );
        stmt.push_str(&params);
        stmt.push_str(" ON CONFLICT (name) DO UPDATE SET lat = EXCLUDED.lat, lng = EXCLUDED.lng, timestamp = EXCLUDED.timestamp;");

        conn.execute(stmt.as_str(), &[]).await?;

        Ok(())
    }

    async fn load_history(&self) -> anyhow::Result<Vec<SearchHistoryEntry>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = "SELECT * FROM search_history ORDER BY timestamp DESC;";

        let mut history: Vec<SearchHistoryEntry> = Vec::new();
        let rows = conn.query(stmt, &[]).await?;
        for row in rows {
            match parse_row_into_history_entry(row) {
                Ok(entry) => history.push(entry),
                Err(e) => {
                    warn!("Skipping unreadable search history row due to: {}", e);
                }
            }
        }

        Ok(history)
    }
}

fn parse_row_into_history_entry(row: Row) -> anyhow::Result<SearchHistoryEntry> {
    let time_str = row.get::<&str, &str>("timestamp");
    let timestamp = OffsetDateTime::parse(time_str, &Rfc3339)?;
    Ok(SearchHistoryEntry {
        name: row.get("name"),
        coordinate: Coordinate {
            lat: row.get::<&str, f64>("lat"),
            lng: row.get::<&str, f64>("lng"),
        },
        timestamp,
    })
}
