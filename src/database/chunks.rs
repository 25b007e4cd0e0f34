use std::collections::HashMap;

use pgvector::Vector;
use sqlx::types::Json;

use super::Database;
use crate::models::Collection;
use crate::models::Document;
use crate::models::ScoredDocument;
use crate::models::StoredChunk;
use crate::Result;

impl Database {
    /// Look up a registered collection
    pub async fn get_collection(&self, name: &str) -> Result<Option<Collection>> {
        if !self.is_schema_initialized().await? {
            return Ok(None);
        }

        let collection = sqlx::query_as::<_, Collection>(
            "SELECT name, dimension, created_at FROM collections WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(collection)
    }

    /// Register a collection; an existing row is left untouched
    pub async fn create_collection(&self, name: &str, dimension: usize) -> Result<Collection> {
        sqlx::query(
            r"
            INSERT INTO collections (name, dimension)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(name)
        .bind(dimension as i32)
        .execute(&self.pool)
        .await?;

        let collection = sqlx::query_as::<_, Collection>(
            "SELECT name, dimension, created_at FROM collections WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(collection)
    }

    /// List all collections with their chunk counts
    pub async fn list_collections(&self) -> Result<Vec<(Collection, i64)>> {
        #[derive(sqlx::FromRow)]
        struct Row {
            name: String,
            dimension: i32,
            created_at: chrono::DateTime<chrono::Utc>,
            chunk_count: i64,
        }

        let rows = sqlx::query_as::<_, Row>(
            r"
            SELECT c.name, c.dimension, c.created_at, COUNT(d.id) AS chunk_count
            FROM collections c
            LEFT JOIN document_chunks d ON d.collection = c.name
            GROUP BY c.name, c.dimension, c.created_at
            ORDER BY c.name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    Collection {
                        name: r.name,
                        dimension: r.dimension,
                        created_at: r.created_at,
                    },
                    r.chunk_count,
                )
            })
            .collect())
    }

    /// Remove a collection and, through the foreign key, all of its chunks
    pub async fn delete_collection(&self, name: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM collections WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Insert chunks in one transaction; rows whose id already exists are skipped
    ///
    /// Returns the number of rows actually inserted.
    pub async fn insert_chunks(&self, chunks: &[StoredChunk]) -> Result<u64> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for chunk in chunks {
            let result = sqlx::query(
                r"
                INSERT INTO document_chunks (id, collection, content, metadata, embedding)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO NOTHING
                ",
            )
            .bind(&chunk.id)
            .bind(&chunk.collection)
            .bind(&chunk.content)
            .bind(Json(&chunk.metadata))
            .bind(Vector::from(chunk.embedding.clone()))
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;

        tracing::debug!(
            "Inserted {} of {} chunks ({} already present)",
            inserted,
            chunks.len(),
            chunks.len() as u64 - inserted
        );

        Ok(inserted)
    }

    /// Nearest chunks by cosine distance, closest first
    pub async fn search_chunks(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: i64,
    ) -> Result<Vec<ScoredDocument>> {
        #[derive(sqlx::FromRow)]
        struct RawResult {
            content: String,
            metadata: Json<HashMap<String, String>>,
            embedding: Vector,
            similarity: f64,
        }

        let raw_results = sqlx::query_as::<_, RawResult>(
            r"
            SELECT
                content,
                metadata,
                embedding,
                1 - (embedding <=> $1) AS similarity
            FROM document_chunks
            WHERE collection = $2
            ORDER BY embedding <=> $1
            LIMIT $3
            ",
        )
        .bind(Vector::from(query_embedding.to_vec()))
        .bind(collection)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(raw_results
            .into_iter()
            .map(|r| ScoredDocument {
                document: Document {
                    page_content: r.content,
                    metadata: r.metadata.0,
                },
                similarity: r.similarity as f32,
                embedding: r.embedding.to_vec(),
            })
            .collect())
    }

    /// Number of chunks stored in a collection
    pub async fn count_chunks(&self, collection: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM document_chunks WHERE collection = $1",
        )
        .bind(collection)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
