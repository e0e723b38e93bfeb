//! Display-list storage
//!
//! A list is a chain of fixed-capacity parameter buffers. Each buffer counts
//! the slots its records use; the last slot of every buffer is kept for the
//! link to the next one, so a record that would spill into it starts a new
//! buffer instead. Lists are immutable once compiled and are shared through
//! `Rc` so a list can be replayed while the table is being edited.

use std::rc::Rc;

use super::op::Op;
use crate::error::{GlError, GlResult};

/// How `new_list` treats the calls that follow it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Record only
    Compile,
    /// Record and execute
    CompileAndExecute,
}

/// One fixed-capacity segment of a display list
///
/// Storage is sized once from the slot capacity and never grows; a record
/// that does not fit is handed back so the caller can chain a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBuffer {
    ops: Vec<Op>,
    used: usize,
    capacity: usize,
}

impl ParamBuffer {
    /// Empty buffer holding up to `capacity` parameter slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
            used: 0,
            capacity,
        }
    }

    /// Append `op` if its slots fit, otherwise return it unchanged
    ///
    /// An empty buffer accepts any record so oversized records still land.
    pub fn try_push(&mut self, op: Op) -> Result<(), Op> {
        let count = op.param_count();
        if self.used > 0 && self.used + count > self.capacity {
            return Err(op);
        }
        self.used += count;
        self.ops.push(op);
        Ok(())
    }

    /// Records in this buffer
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Slots consumed by the records
    pub fn used(&self) -> usize {
        self.used
    }

    /// Slots this buffer can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A compiled list of operations
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    buffers: Vec<ParamBuffer>,
    slots: usize,
}

impl DisplayList {
    /// Empty list whose buffers hold `slots` parameter slots each
    pub fn new(slots: usize) -> Self {
        let slots = slots.max(2);
        Self {
            // Keep one slot of every buffer for the chain link.
            buffers: vec![ParamBuffer::with_capacity(slots - 1)],
            slots,
        }
    }

    /// Append a record, chaining a new buffer when the current one is full
    pub fn push(&mut self, op: Op) {
        let op = match self.buffers.last_mut() {
            Some(buffer) => match buffer.try_push(op) {
                Ok(()) => return,
                Err(op) => op,
            },
            None => op,
        };
        let mut buffer = ParamBuffer::with_capacity(self.slots - 1);
        let pushed = buffer.try_push(op).is_ok();
        debug_assert!(pushed, "an empty buffer takes any record");
        self.buffers.push(buffer);
    }

    /// Records in replay order
    pub fn ops(&self) -> impl Iterator<Item = &Op> + '_ {
        self.buffers.iter().flat_map(|b| b.ops.iter())
    }

    /// The buffer chain
    pub fn buffers(&self) -> &[ParamBuffer] {
        &self.buffers
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.buffers.iter().map(|b| b.ops.len()).sum()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A list under construction
#[derive(Debug)]
pub struct ListRecorder {
    /// Name the list is stored under at `end_list`
    pub name: u32,
    /// Whether recorded calls also execute
    pub mode: ListMode,
    /// Records so far
    pub list: DisplayList,
}

/// Table of list names
#[derive(Debug)]
pub struct ListTable {
    lists: Vec<Option<Rc<DisplayList>>>,
}

impl ListTable {
    /// Table accepting names `1..max_lists`
    pub fn new(max_lists: usize) -> Self {
        Self {
            lists: vec![None; max_lists],
        }
    }

    /// Number of names, including the reserved name 0
    pub fn capacity(&self) -> usize {
        self.lists.len()
    }

    /// Validate a list name
    pub fn check_name(&self, name: u32) -> GlResult<usize> {
        let index = name as usize;
        if name == 0 || index >= self.lists.len() {
            return Err(GlError::InvalidValue(format!("display list name {name}")));
        }
        Ok(index)
    }

    /// The list stored under `name`
    pub fn get(&self, name: u32) -> Option<Rc<DisplayList>> {
        self.lists.get(name as usize).and_then(Clone::clone)
    }

    /// Store a compiled list, replacing any previous one
    pub fn define(&mut self, name: u32, list: DisplayList) -> GlResult<()> {
        let index = self.check_name(name)?;
        self.lists[index] = Some(Rc::new(list));
        Ok(())
    }

    /// Whether `name` holds a list
    pub fn is_list(&self, name: u32) -> bool {
        self.lists.get(name as usize).is_some_and(Option::is_some)
    }

    /// Delete `range` names starting at `first`; unused names are skipped
    pub fn delete(&mut self, first: u32, range: u32) {
        let start = (first as usize).max(1);
        let end = (first as usize)
            .saturating_add(range as usize)
            .min(self.lists.len());
        for slot in self.lists.iter_mut().take(end).skip(start) {
            *slot = None;
        }
    }

    /// First name of `range` consecutive unused names, reserving them with
    /// empty lists; `None` if no such run exists
    pub fn gen_lists(&mut self, range: u32, slots: usize) -> Option<u32> {
        let range = range as usize;
        if range == 0 {
            return None;
        }
        let mut run = 0;
        for index in 1..self.lists.len() {
            if self.lists[index].is_some() {
                run = 0;
                continue;
            }
            run += 1;
            if run == range {
                let first = index + 1 - range;
                for slot in &mut self.lists[first..=index] {
                    *slot = Some(Rc::new(DisplayList::new(slots)));
                }
                return u32::try_from(first).ok();
            }
        }
        None
    }

    /// Drop every list
    pub fn clear(&mut self) {
        self.lists.iter_mut().for_each(|l| *l = None);
    }
}
