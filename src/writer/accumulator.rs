use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::schema::check_batch_schema;

use super::error::TableError;

/// Buffers batches of one locked schema until a data file is due.
#[derive(Debug)]
pub struct BatchAccumulator {
    flush_threshold_rows: usize,
    schema: Option<SchemaRef>,
    batches: Vec<RecordBatch>,
    buffered_rows: usize,
}

impl BatchAccumulator {
    /// Create an accumulator that asks for a flush at `flush_threshold_rows`.
    ///
    /// A threshold of 0 is treated as 1: every non-empty batch is due.
    pub fn new(flush_threshold_rows: usize) -> Self {
        Self {
            flush_threshold_rows: flush_threshold_rows.max(1),
            schema: None,
            batches: Vec::new(),
            buffered_rows: 0,
        }
    }

    /// The locked schema, once the first batch was accepted
    pub fn schema(&self) -> Option<&SchemaRef> {
        self.schema.as_ref()
    }

    /// Fix the schema every later batch must match.
    pub fn lock_schema(&mut self, schema: SchemaRef) {
        self.schema = Some(schema);
    }

    /// Check a batch against the locked schema without buffering it.
    pub fn check(&self, batch: &RecordBatch) -> Result<(), TableError> {
        match &self.schema {
            Some(locked) => check_batch_schema(locked, &batch.schema()),
            None => Ok(()),
        }
    }

    /// Buffer a batch. Returns true when the buffer reached the flush threshold.
    ///
    /// Zero-row batches are dropped. The batch must already have passed
    /// [`BatchAccumulator::check`].
    pub fn push(&mut self, batch: RecordBatch) -> bool {
        if batch.num_rows() > 0 {
            self.buffered_rows += batch.num_rows();
            self.batches.push(batch);
        }
        self.is_due()
    }

    /// True when the buffered rows reached the threshold
    pub fn is_due(&self) -> bool {
        self.buffered_rows >= self.flush_threshold_rows
    }

    /// Buffered batches, in arrival order
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Rows currently buffered
    pub fn buffered_rows(&self) -> usize {
        self.buffered_rows
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Drop the buffered batches after they were written out.
    pub fn clear(&mut self) {
        self.batches.clear();
        self.buffered_rows = 0;
    }
}
