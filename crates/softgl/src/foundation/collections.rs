//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Arena key for a texture object owned by the texture manager
    pub struct TextureKey;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;

/// Doubly-linked membership list threaded through a fixed-size array.
///
/// Slots are identified by their array index. Linking and unlinking are O(1)
/// and traversal visits only linked slots, most recently linked first.
#[derive(Debug, Clone)]
pub struct IndexLinks {
    links: Vec<Link>,
    head: Option<usize>,
    len: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    linked: bool,
    prev: Option<usize>,
    next: Option<usize>,
}

impl IndexLinks {
    /// Create a list over `capacity` slots, all unlinked
    pub fn new(capacity: usize) -> Self {
        Self {
            links: vec![Link::default(); capacity],
            head: None,
            len: 0,
        }
    }

    /// Number of slots in the backing array
    pub fn capacity(&self) -> usize {
        self.links.len()
    }

    /// Number of linked slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no slot is linked
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `index` is currently linked
    pub fn contains(&self, index: usize) -> bool {
        self.links.get(index).is_some_and(|l| l.linked)
    }

    /// Link `index` at the front. Returns false if already linked or out of range.
    pub fn link(&mut self, index: usize) -> bool {
        if index >= self.links.len() || self.links[index].linked {
            return false;
        }
        let old_head = self.head;
        self.links[index] = Link {
            linked: true,
            prev: None,
            next: old_head,
        };
        if let Some(h) = old_head {
            self.links[h].prev = Some(index);
        }
        self.head = Some(index);
        self.len += 1;
        true
    }

    /// Unlink `index`. Returns false if it was not linked.
    pub fn unlink(&mut self, index: usize) -> bool {
        if !self.contains(index) {
            return false;
        }
        let Link { prev, next, .. } = self.links[index];
        match prev {
            Some(p) => self.links[p].next = next,
            None => self.head = next,
        }
        if let Some(n) = next {
            self.links[n].prev = prev;
        }
        self.links[index] = Link::default();
        self.len -= 1;
        true
    }

    /// Unlink everything
    pub fn clear(&mut self) {
        self.links.iter_mut().for_each(|l| *l = Link::default());
        self.head = None;
        self.len = 0;
    }

    /// Iterate linked indices in traversal order
    pub fn iter(&self) -> IndexLinksIter<'_> {
        IndexLinksIter {
            links: self,
            cursor: self.head,
        }
    }
}

/// Iterator over linked indices
pub struct IndexLinksIter<'a> {
    links: &'a IndexLinks,
    cursor: Option<usize>,
}

impl Iterator for IndexLinksIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor?;
        self.cursor = self.links.links[current].next;
        Some(current)
    }
}
