use super::Database;
use crate::DocBotError;
use crate::Result;

const REQUIRED_TABLES: [&str; 2] = ["collections", "document_chunks"];

impl Database {
    /// Returns true if both vector store tables exist
    pub async fn is_schema_initialized(&self) -> Result<bool> {
        for table_name in REQUIRED_TABLES {
            let exists = sqlx::query_scalar::<_, bool>(
                r"
                SELECT EXISTS (
                    SELECT FROM information_schema.tables
                    WHERE table_schema = 'public'
                    AND table_name = $1
                )
                ",
            )
            .bind(table_name)
            .fetch_one(&self.pool)
            .await?;

            if !exists {
                tracing::debug!("Missing required table: {}", table_name);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Create the pgvector extension, tables and indexes
    ///
    /// The embedding column is fixed to `dimension` when the table is first created.
    pub async fn init_schema(
        &self,
        dimension: usize,
        enable_vector_index: bool,
        index_lists: usize,
    ) -> Result<()> {
        if dimension == 0 {
            return Err(DocBotError::InvalidInput(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }

        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                dimension INTEGER NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // DDL cannot take bind parameters; dimension is a validated integer
        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS document_chunks (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL REFERENCES collections(name) ON DELETE CASCADE,
                content TEXT NOT NULL,
                metadata JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                embedding VECTOR({dimension}) NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            "
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_document_chunks_collection ON document_chunks(collection)",
        )
        .execute(&self.pool)
        .await?;

        if enable_vector_index {
            let lists = index_lists.max(1);
            sqlx::query(&format!(
                r"
                CREATE INDEX IF NOT EXISTS idx_document_chunks_embedding
                ON document_chunks USING ivfflat (embedding vector_cosine_ops)
                WITH (lists = {lists})
                "
            ))
            .execute(&self.pool)
            .await?;
            tracing::debug!("ivfflat cosine index ensured (lists = {})", lists);
        }

        tracing::info!("Vector store schema initialized (dimension {})", dimension);
        Ok(())
    }

    /// Drop every vector store table
    pub async fn drop_schema(&self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS document_chunks")
            .execute(&self.pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS collections")
            .execute(&self.pool)
            .await?;

        tracing::warn!("Vector store tables dropped");
        Ok(())
    }
}
