//! Ownership chain — a doubly linked sequence stored in an arena.
//!
//! Nodes live in a `Vec` of slots and link to each other by [`NodeId`]
//! instead of by pointer. Removal is O(1) (unlink the neighbours, free the
//! slot) and freed slots are reused by later appends. Every `NodeId` carries
//! the generation of the slot it was issued for, so an id that outlived its
//! node resolves to `None` rather than to whatever moved into the slot.
//!
//! The chain is never empty: it is created with its first element and
//! refuses to remove the last remaining one. It knows nothing about text.

use std::collections::TryReserveError;
use std::iter::FusedIterator;

/// Handle to a node in a [`Chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// A non-empty doubly linked sequence that owns its elements.
#[derive(Debug, Clone)]
pub struct Chain<T> {
    slots: Vec<Slot<T>>,
    vacant: Vec<usize>,
    head: NodeId,
    tail: NodeId,
    len: usize,
}

impl<T> Chain<T> {
    /// A chain holding just `first`.
    #[must_use]
    pub fn new(first: T) -> Self {
        let id = NodeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node {
                    value: first,
                    prev: None,
                    next: None,
                }),
            }],
            vacant: Vec::new(),
            head: id,
            tail: id,
            len: 1,
        }
    }

    // -- Structure ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn head(&self) -> NodeId {
        self.head
    }

    #[inline]
    #[must_use]
    pub const fn tail(&self) -> NodeId {
        self.tail
    }

    /// Number of nodes. Always at least 1.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.prev
    }

    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next
    }

    // -- Element access -----------------------------------------------------

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|n| &mut n.value)
    }

    // -- Mutation -----------------------------------------------------------

    /// Make sure the next `additional` appends cannot fail to allocate.
    ///
    /// # Errors
    ///
    /// Returns the allocator error; the chain is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let needed = additional.saturating_sub(self.vacant.len());
        self.slots.try_reserve(needed)
    }

    /// Append `value` at the tail reachable from `after` and return its id.
    ///
    /// Walks forward from `after` to the end of the chain, so passing the
    /// known tail costs nothing. A stale `after` starts the walk at the tail.
    ///
    /// # Errors
    ///
    /// Returns the allocator error if a new slot is needed and cannot be
    /// allocated; the chain is unchanged.
    pub fn append(&mut self, after: NodeId, value: T) -> Result<NodeId, TryReserveError> {
        let mut last = if self.contains(after) { after } else { self.tail };
        while let Some(next) = self.next(last) {
            last = next;
        }

        let node = Node {
            value,
            prev: Some(last),
            next: None,
        };
        let id = if let Some(index) = self.vacant.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.try_reserve(1)?;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        };

        if let Some(n) = self.node_mut(last) {
            n.next = Some(id);
        }
        self.tail = id;
        self.len += 1;
        Ok(id)
    }

    /// Unlink `id` and hand back its value.
    ///
    /// Returns `None` (and changes nothing) when `id` is stale or names the
    /// only remaining node: the chain never becomes empty.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if self.len == 1 || !self.contains(id) {
            return None;
        }

        let slot = &mut self.slots[id.index];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(id.index);

        match node.prev {
            Some(prev) => {
                if let Some(p) = self.node_mut(prev) {
                    p.next = node.next;
                }
            }
            None => self.head = node.next.unwrap_or(self.head),
        }
        match node.next {
            Some(next) => {
                if let Some(n) = self.node_mut(next) {
                    n.prev = node.prev;
                }
            }
            None => self.tail = node.prev.unwrap_or(self.tail),
        }

        self.len -= 1;
        Some(node.value)
    }

    // -- Iteration ----------------------------------------------------------

    /// Head-to-tail iterator.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            cursor: Some(self.head),
        }
    }

    /// Iterator walking backward from `start` (inclusive) to the head.
    #[must_use]
    pub fn iter_back_from(&self, start: NodeId) -> IterBack<'_, T> {
        IterBack {
            chain: self,
            cursor: self.contains(start).then_some(start),
        }
    }

    // -- Internals ----------------------------------------------------------

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        let slot = self.slots.get(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }
}

/// Consumes the chain, yielding values head to tail. Dropping a chain frees
/// every node it still owns.
impl<T> IntoIterator for Chain<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            cursor: Some(self.head),
            chain: self,
        }
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Borrowing head-to-tail iterator. See [`Chain::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    chain: &'a Chain<T>,
    cursor: Option<NodeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.chain.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// Borrowing tail-to-head iterator. See [`Chain::iter_back_from`].
#[derive(Debug)]
pub struct IterBack<'a, T> {
    chain: &'a Chain<T>,
    cursor: Option<NodeId>,
}

impl<'a, T> Iterator for IterBack<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.chain.node(self.cursor?)?;
        self.cursor = node.prev;
        Some(&node.value)
    }
}

impl<T> FusedIterator for IterBack<'_, T> {}

/// Owning head-to-tail iterator.
#[derive(Debug)]
pub struct IntoIter<T> {
    chain: Chain<T>,
    cursor: Option<NodeId>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let id = self.cursor?;
        let slot = self.chain.slots.get_mut(id.index)?;
        let node = slot.node.take()?;
        self.cursor = node.next;
        Some(node.value)
    }
}

impl<T> FusedIterator for IntoIter<T> {}
