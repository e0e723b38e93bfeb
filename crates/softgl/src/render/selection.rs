//! Name stack and selection hit buffer
//!
//! In selection mode every primitive that reaches the rasterizer records a
//! hit instead of writing pixels. A hit record is laid out as
//! `[name_count, min_depth, max_depth, names...]` with depths scaled to the
//! full `u32` range. Consecutive hits with no name-stack change in between
//! merge into one record. When a record no longer fits in the buffer the
//! overflow flag is raised and nothing more is written.

use crate::core::limits::MAX_NAME_STACK_DEPTH;
use crate::error::{GlError, GlResult, StackKind};

/// A decoded selection record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionHit {
    /// Smallest window depth of the hit primitives, scaled to `u32`
    pub min_depth: u32,
    /// Largest window depth of the hit primitives, scaled to `u32`
    pub max_depth: u32,
    /// Name stack contents, bottom first
    pub names: Vec<u32>,
}

/// Scale a `[0, 1]` window depth to the selection record range
pub fn scale_depth(z: f32) -> u32 {
    (f64::from(z.clamp(0.0, 1.0)) * f64::from(u32::MAX)) as u32
}

/// Selection state owned by a context
#[derive(Debug, Default)]
pub struct Selection {
    buffer: Vec<u32>,
    capacity: usize,
    names: Vec<u32>,
    hits: usize,
    overflow: bool,
    open_record: Option<usize>,
}

impl Selection {
    /// Empty selection state with a zero-sized buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the hit buffer to `words` entries and discard its contents
    pub fn set_buffer(&mut self, words: usize) {
        self.capacity = words;
        self.buffer = Vec::with_capacity(words);
        self.reset();
    }

    /// Buffer capacity in words
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start a selection pass: empty buffer, name stack and counters
    pub fn begin(&mut self) {
        self.reset();
        self.names.clear();
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.hits = 0;
        self.overflow = false;
        self.open_record = None;
    }

    /// Finish a selection pass; hit count, negated on overflow
    pub fn end(&mut self) -> i64 {
        let hits = i64::try_from(self.hits).unwrap_or(i64::MAX);
        self.open_record = None;
        if self.overflow {
            -hits
        } else {
            hits
        }
    }

    /// Whether a record was dropped for lack of space
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    /// Number of records written
    pub fn hit_count(&self) -> usize {
        self.hits
    }

    /// Current name stack, bottom first
    pub fn names(&self) -> &[u32] {
        &self.names
    }

    /// Empty the name stack
    pub fn init_names(&mut self) {
        self.names.clear();
        self.open_record = None;
    }

    /// Push a name
    pub fn push_name(&mut self, name: u32) -> GlResult<()> {
        if self.names.len() >= MAX_NAME_STACK_DEPTH {
            return Err(GlError::StackOverflow(StackKind::Name));
        }
        self.names.push(name);
        self.open_record = None;
        Ok(())
    }

    /// Pop a name
    pub fn pop_name(&mut self) -> GlResult<()> {
        if self.names.pop().is_none() {
            return Err(GlError::StackUnderflow(StackKind::Name));
        }
        self.open_record = None;
        Ok(())
    }

    /// Replace the top name
    pub fn load_name(&mut self, name: u32) -> GlResult<()> {
        let Some(top) = self.names.last_mut() else {
            return Err(GlError::InvalidOperation("load_name on an empty name stack"));
        };
        *top = name;
        self.open_record = None;
        Ok(())
    }

    /// Record a hit spanning window depths `z_min..=z_max`
    pub fn record(&mut self, z_min: f32, z_max: f32) {
        let (lo, hi) = (scale_depth(z_min.min(z_max)), scale_depth(z_min.max(z_max)));

        if let Some(start) = self.open_record {
            self.buffer[start + 1] = self.buffer[start + 1].min(lo);
            self.buffer[start + 2] = self.buffer[start + 2].max(hi);
            return;
        }
        if self.overflow {
            return;
        }

        let needed = 3 + self.names.len();
        if self.buffer.len() + needed > self.capacity {
            log::debug!("Selection buffer full after {} hits", self.hits);
            self.overflow = true;
            return;
        }

        let start = self.buffer.len();
        // The name stack is bounded well below u32::MAX.
        self.buffer.push(self.names.len() as u32);
        self.buffer.push(lo);
        self.buffer.push(hi);
        self.buffer.extend_from_slice(&self.names);
        self.hits += 1;
        self.open_record = Some(start);
    }

    /// Raw buffer words written so far
    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    /// Decode the buffer into records
    pub fn hits(&self) -> Vec<SelectionHit> {
        let mut out = Vec::with_capacity(self.hits);
        let mut i = 0;
        while i + 3 <= self.buffer.len() {
            let count = self.buffer[i] as usize;
            let end = (i + 3 + count).min(self.buffer.len());
            out.push(SelectionHit {
                min_depth: self.buffer[i + 1],
                max_depth: self.buffer[i + 2],
                names: self.buffer[i + 3..end].to_vec(),
            });
            i = end;
        }
        out
    }
}
