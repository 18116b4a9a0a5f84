//! LanceDB-backed `ChunkStore`.
//!
//! Chunks live in one table: scalar columns for id/content/source/
//! document_type, the metadata map as a JSON string column, and a
//! fixed-size-list vector column. The category filter becomes an SQL
//! predicate; keyword candidates come from `LIKE` predicates over the
//! content column and are re-ranked by the sparse retriever.

use anyhow::{anyhow, Result};
use arrow_array::{
    FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use std::path::Path;
use std::sync::Arc;
use uniqa_core::traits::{ChunkStore, MetaFilter, QueryResponse};
use uniqa_core::types::{Chunk, Meta};

pub struct LanceStore {
    db: Connection,
    table_name: String,
    dim: i32,
}

impl LanceStore {
    pub async fn new(db_path: &Path, table_name: &str, dim: usize) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        Ok(Self {
            db,
            table_name: table_name.to_string(),
            dim: i32::try_from(dim)?,
        })
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("document_type", DataType::Utf8, false),
            Field::new("metadata", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    self.dim,
                ),
                true,
            ),
        ]))
    }

    fn chunks_to_record_batch(
        &self,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<RecordBatch> {
        let schema = self.schema();
        let mut ids = Vec::new();
        let mut contents = Vec::new();
        let mut sources = Vec::new();
        let mut document_types = Vec::new();
        let mut metadatas = Vec::new();
        let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            ids.push(chunk.id.clone());
            contents.push(chunk.content.clone());
            sources.push(chunk.source.clone());
            document_types.push(chunk.document_type.as_str().to_string());
            metadatas.push(serde_json::to_string(&chunk.metadata)?);
            vectors.push(Some(embedding.iter().map(|&x| Some(x)).collect()));
        }
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(StringArray::from(contents)),
                Arc::new(StringArray::from(sources)),
                Arc::new(StringArray::from(document_types)),
                Arc::new(StringArray::from(metadatas)),
                Arc::new(FixedSizeListArray::from_iter_primitive::<
                    arrow_array::types::Float32Type,
                    _,
                    _,
                >(vectors.into_iter(), self.dim)),
            ],
        )?;
        Ok(batch)
    }

    fn filter_predicate(filter: Option<&MetaFilter>) -> Option<String> {
        filter.map(|f| format!("{} = '{}'", f.field, f.value.replace('\'', "''")))
    }

    fn rows_from_batch(batch: &RecordBatch, response: &mut QueryResponse) -> Result<()> {
        let ids = string_column(batch, "id")?;
        let contents = string_column(batch, "content")?;
        let metadatas = string_column(batch, "metadata")?;
        let distances = batch
            .column_by_name("_distance")
            .and_then(|c| c.as_any().downcast_ref::<Float32Array>().cloned());
        for i in 0..batch.num_rows() {
            response.ids.push(ids.value(i).to_string());
            response.documents.push(contents.value(i).to_string());
            let meta: Meta = serde_json::from_str(metadatas.value(i)).unwrap_or_default();
            response.metadatas.push(meta);
            if let Some(d) = &distances {
                response.distances.push(d.value(i));
            }
        }
        Ok(())
    }
}

fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("missing column {name}"))?;
    col.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| anyhow!("column {name} is not utf8"))
}

#[async_trait]
impl ChunkStore for LanceStore {
    async fn add_chunks(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        if chunks.len() != embeddings.len() {
            anyhow::bail!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            );
        }
        let batch = self.chunks_to_record_batch(chunks, embeddings)?;
        let schema = batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
        if self
            .db
            .table_names()
            .execute()
            .await?
            .contains(&self.table_name)
        {
            let table = self.db.open_table(&self.table_name).execute().await?;
            // Re-ingested chunks carry the same deterministic id; drop the
            // old rows before appending so ids stay unique.
            let ids: Vec<String> = chunks
                .iter()
                .map(|c| format!("'{}'", c.id.replace('\'', "''")))
                .collect();
            table
                .delete(&format!("id IN ({})", ids.join(", ")))
                .await?;
            table.add(reader).execute().await?;
        } else {
            self.db
                .create_table(&self.table_name, reader)
                .execute()
                .await?;
        }
        tracing::debug!(count = chunks.len(), table = %self.table_name, "stored chunks");
        Ok(())
    }

    async fn query_by_vector(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetaFilter>,
    ) -> Result<QueryResponse> {
        let table = self.db.open_table(&self.table_name).execute().await?;
        // Cosine distance keeps the dense retriever's 1 - d conversion valid.
        let mut query = table
            .vector_search(vector.to_vec())?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(top_k);
        if let Some(predicate) = Self::filter_predicate(filter) {
            query = query.only_if(predicate);
        }
        let mut stream = query.execute().await?;
        let mut response = QueryResponse::default();
        while let Some(batch) = stream.try_next().await? {
            Self::rows_from_batch(&batch, &mut response)?;
        }
        // Lance returns rows ordered by increasing _distance; if the column
        // was absent, fall back to return order.
        while response.distances.len() < response.ids.len() {
            response.distances.push(0.5);
        }
        Ok(response)
    }

    async fn query_by_text(
        &self,
        text: &str,
        top_k: usize,
        filter: Option<&MetaFilter>,
    ) -> Result<QueryResponse> {
        let terms: Vec<String> = text
            .split_whitespace()
            .filter(|t| t.len() > 2)
            .map(|t| t.replace('\'', "''"))
            .collect();
        if terms.is_empty() {
            return Ok(QueryResponse::default());
        }
        // LIKE is case-sensitive; match the term as typed and lowercased.
        let mut like_clauses = Vec::new();
        for term in &terms {
            like_clauses.push(format!("content LIKE '%{term}%'"));
            let lowered = term.to_lowercase();
            if lowered != *term {
                like_clauses.push(format!("content LIKE '%{lowered}%'"));
            }
        }
        let mut predicate = format!("({})", like_clauses.join(" OR "));
        if let Some(extra) = Self::filter_predicate(filter) {
            predicate = format!("{predicate} AND {extra}");
        }
        let table = self.db.open_table(&self.table_name).execute().await?;
        let mut stream = table
            .query()
            .only_if(predicate)
            .limit(top_k)
            .execute()
            .await?;
        let mut response = QueryResponse::default();
        while let Some(batch) = stream.try_next().await? {
            Self::rows_from_batch(&batch, &mut response)?;
        }
        // Store-native text relevance: candidates in return order, with a
        // monotone position-based distance. The sparse retriever re-scores.
        let n = response.ids.len().max(1);
        response.distances = (0..response.ids.len())
            .map(|i| i as f32 / n as f32)
            .collect();
        Ok(response)
    }
}
