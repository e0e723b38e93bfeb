//! Specular lookup cache
//!
//! Raising `n·h` to the material shininess for every vertex and light is the
//! most expensive part of lighting. Instead each distinct quantized shininess
//! gets a table of `pow(cos, shininess)` sampled over `[0, 1]`, and lighting
//! indexes into it.
//!
//! The pool is bounded. When it is full, the entry with the oldest use stamp is
//! recomputed for the new shininess. The cache belongs to one context and is
//! not shared: contexts rendering on separate threads each carry their own.

use crate::core::limits::{SPECULAR_BUFFER_RESOLUTION, SPECULAR_BUFFER_SIZE};

/// Map a shininess exponent in `[0, 128]` to its cache bucket
pub fn shininess_index(shininess: f32) -> usize {
    let scaled = shininess.clamp(0.0, 128.0) / 128.0 * SPECULAR_BUFFER_RESOLUTION as f32;
    scaled as usize
}

/// Precomputed `pow(cos, shininess)` samples
#[derive(Debug, Clone)]
pub struct SpecularTable {
    shininess_index: usize,
    last_used: u64,
    samples: Box<[f32; SPECULAR_BUFFER_SIZE + 1]>,
}

impl SpecularTable {
    fn compute(shininess_index: usize, shininess: f32, stamp: u64) -> Self {
        let mut table = Self {
            shininess_index,
            last_used: stamp,
            samples: Box::new([0.0; SPECULAR_BUFFER_SIZE + 1]),
        };
        table.fill(shininess);
        table
    }

    fn fill(&mut self, shininess: f32) {
        let step = 1.0 / SPECULAR_BUFFER_SIZE as f32;
        for (i, sample) in self.samples.iter_mut().enumerate() {
            *sample = (i as f32 * step).powf(shininess);
        }
    }

    /// Bucket this table was computed for
    pub fn shininess_index(&self) -> usize {
        self.shininess_index
    }

    /// Look up `pow(cos, shininess)`; `cos` is clamped to `[0, 1]`
    #[inline]
    pub fn lookup(&self, cos: f32) -> f32 {
        let idx = (cos.clamp(0.0, 1.0) * SPECULAR_BUFFER_SIZE as f32) as usize;
        self.samples[idx.min(SPECULAR_BUFFER_SIZE)]
    }
}

/// Usage counters, for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecularStats {
    /// Lookups served from an existing table
    pub hits: u64,
    /// Lookups that computed a table
    pub misses: u64,
    /// Misses that overwrote an existing table
    pub evictions: u64,
}

/// Bounded pool of specular tables with least-recently-used replacement
#[derive(Debug)]
pub struct SpecularCache {
    tables: Vec<SpecularTable>,
    capacity: usize,
    use_counter: u64,
    stats: SpecularStats,
}

impl SpecularCache {
    /// Empty cache holding at most `capacity` tables
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            tables: Vec::with_capacity(capacity),
            capacity,
            use_counter: 0,
            stats: SpecularStats::default(),
        }
    }

    /// Maximum number of tables kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tables currently held
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when no table has been computed yet
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Hit/miss/eviction counters
    pub fn stats(&self) -> SpecularStats {
        self.stats
    }

    /// Whether a table for `shininess_index` is resident
    pub fn contains(&self, shininess_index: usize) -> bool {
        self.tables.iter().any(|t| t.shininess_index == shininess_index)
    }

    /// Table for `shininess_index`, computing it from `shininess` on a miss
    pub fn get(&mut self, shininess_index: usize, shininess: f32) -> &SpecularTable {
        let stamp = self.use_counter;
        self.use_counter += 1;

        if let Some(pos) = self
            .tables
            .iter()
            .position(|t| t.shininess_index == shininess_index)
        {
            self.stats.hits += 1;
            let table = &mut self.tables[pos];
            table.last_used = stamp;
            return table;
        }

        self.stats.misses += 1;
        if self.tables.len() < self.capacity {
            log::trace!("Specular table {shininess_index} computed (pool {}/{})", self.tables.len() + 1, self.capacity);
            self.tables
                .push(SpecularTable::compute(shininess_index, shininess, stamp));
            let last = self.tables.len() - 1;
            return &self.tables[last];
        }

        let oldest = self
            .tables
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.last_used)
            .map_or(0, |(i, _)| i);
        self.stats.evictions += 1;
        let table = &mut self.tables[oldest];
        log::trace!(
            "Specular table {} evicted for {}",
            table.shininess_index,
            shininess_index
        );
        table.shininess_index = shininess_index;
        table.last_used = stamp;
        table.fill(shininess);
        table
    }

    /// Release every table
    pub fn clear(&mut self) {
        self.tables.clear();
    }
}
