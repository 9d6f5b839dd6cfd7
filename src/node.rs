//! Storage for the nodes of a [`SkipList`][crate::SkipList].
//!
//! Rather than having nodes own each other through pointers, every node lives
//! in a slot of an [`Arena`] and refers to its successors by slot index. The
//! arena is the sole owner of the nodes, so unlinking a node never leaves a
//! dangling reference behind: a node is only dropped once it is explicitly
//! freed, and by that point nothing links to it any more.

use std::{cmp::Ordering, iter};

/// Index of the header node.  The header occupies the first slot for the
/// lifetime of the arena.
pub(crate) const HEAD: usize = 0;

/// The key held in a node.
///
/// The header node does not hold a real key but must still compare as less
/// than every key in the list, which is captured by the [`NodeKey::Head`]
/// variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeKey<K> {
    /// The header sentinel, lower than any key.
    Head,
    /// A real key.
    Key(K),
}

impl<K> NodeKey<K> {
    /// Returns the real key, or `None` for the header.
    #[inline]
    pub(crate) fn as_key(&self) -> Option<&K> {
        match self {
            NodeKey::Head => None,
            NodeKey::Key(k) => Some(k),
        }
    }

    /// Consumes the node key, returning the real key if any.
    #[inline]
    pub(crate) fn into_key(self) -> Option<K> {
        match self {
            NodeKey::Head => None,
            NodeKey::Key(k) => Some(k),
        }
    }
}

impl<K> NodeKey<K>
where
    K: Ord,
{
    /// Compares this node's key against a real key.
    #[inline]
    pub(crate) fn cmp_key(&self, key: &K) -> Ordering {
        match self {
            NodeKey::Head => Ordering::Less,
            NodeKey::Key(k) => k.cmp(key),
        }
    }
}

impl<K> PartialOrd for NodeKey<K>
where
    K: Ord,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for NodeKey<K>
where
    K: Ord,
{
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (NodeKey::Head, NodeKey::Head) => Ordering::Equal,
            (NodeKey::Head, NodeKey::Key(_)) => Ordering::Less,
            (NodeKey::Key(_), NodeKey::Head) => Ordering::Greater,
            (NodeKey::Key(a), NodeKey::Key(b)) => a.cmp(b),
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Node
// ////////////////////////////////////////////////////////////////////////////

/// A node of the skiplist.
///
/// A node of level `n` has `n + 1` forward links, one for each level it
/// participates in. The links are allocated once, when the node is created,
/// and never resized.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    /// The key; only the header holds [`NodeKey::Head`].
    pub(crate) key: NodeKey<K>,
    /// Slot index of the next node at each level, or `None` at the end of the
    /// chain. This slice *must* be of length `self.level() + 1`.
    pub(crate) forward: Box<[Option<usize>]>,
}

impl<K> Node<K> {
    /// Create a new header node spanning levels `0..=max_level`.
    #[inline]
    pub(crate) fn head(max_level: usize) -> Self {
        Node {
            key: NodeKey::Head,
            forward: iter::repeat_n(None, max_level + 1).collect(),
        }
    }

    /// Create a new node with the given key, spanning levels `0..=level`.
    /// All links default to `None`.
    #[inline]
    pub(crate) fn new(key: K, level: usize) -> Self {
        Node {
            key: NodeKey::Key(key),
            forward: iter::repeat_n(None, level + 1).collect(),
        }
    }

    /// How high the node reaches.
    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.forward.len() - 1
    }

    /// Returns `true` if the node is the header.
    #[cfg(test)]
    pub(crate) fn is_head(&self) -> bool {
        matches!(self.key, NodeKey::Head)
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Arena
// ////////////////////////////////////////////////////////////////////////////

/// Slot storage for nodes.
///
/// Vacated slots are remembered in a free list and handed out again by
/// [`Arena::alloc`], so a list which sees as many deletions as insertions does
/// not grow without bound.
#[derive(Clone)]
pub(crate) struct Arena<K> {
    /// Node storage. `None` marks a vacant slot.
    slots: Vec<Option<Node<K>>>,
    /// Indices of vacant slots.
    free: Vec<usize>,
}

impl<K> Arena<K> {
    /// Create an arena holding only a header node spanning `0..=max_level`.
    pub(crate) fn new(max_level: usize) -> Self {
        Arena {
            slots: vec![Some(Node::head(max_level))],
            free: Vec::new(),
        }
    }

    /// Drops every node except the header, whose links are reset.
    pub(crate) fn clear(&mut self) {
        let max_level = self.head().level();
        self.slots.clear();
        self.slots.push(Some(Node::head(max_level)));
        self.free.clear();
    }

    /// The header node.
    #[inline]
    pub(crate) fn head(&self) -> &Node<K> {
        self.get(HEAD)
    }

    /// The node in the given slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant. A link to a vacant slot means the list's
    /// structure is corrupt.
    #[inline]
    #[expect(
        clippy::expect_used,
        reason = "A link to a vacant slot is an invariant violation"
    )]
    pub(crate) fn get(&self, index: usize) -> &Node<K> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .expect("link to a vacant arena slot")
    }

    /// The node in the given slot, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant.
    #[inline]
    #[expect(
        clippy::expect_used,
        reason = "A link to a vacant slot is an invariant violation"
    )]
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Node<K> {
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .expect("link to a vacant arena slot")
    }

    /// Stores a node, returning its slot index.
    pub(crate) fn alloc(&mut self, node: Node<K>) -> usize {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(node);
            index
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    /// Vacates a slot, returning the node it held.
    ///
    /// The caller must have unlinked the node from every level beforehand.
    ///
    /// # Panics
    ///
    /// Panics if the slot is the header or already vacant.
    #[expect(
        clippy::expect_used,
        reason = "Freeing a vacant slot is an invariant violation"
    )]
    pub(crate) fn free(&mut self, index: usize) -> Node<K> {
        assert_ne!(index, HEAD, "the header is never freed");
        let node = self
            .slots
            .get_mut(index)
            .and_then(Option::take)
            .expect("freeing a vacant arena slot");
        self.free.push(index);
        node
    }

    /// Number of occupied slots, excluding the header.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len() - 1
    }

    /// Total number of slots, occupied or not, including the header.
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Follows the level-`level` link out of the node in slot `index`.
    #[inline]
    pub(crate) fn next(&self, index: usize, level: usize) -> Option<usize> {
        self.get(index).forward[level]
    }

    /// Takes the nodes out of the arena in level-0 order, starting after the
    /// header. The arena is left holding only a reset header.
    pub(crate) fn drain_ordered(&mut self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.live());
        let mut link = self.next(HEAD, 0);
        while let Some(index) = link {
            let node = self.slots[index].take();
            link = node.as_ref().and_then(|n| n.forward[0]);
            if let Some(key) = node.and_then(|n| n.key.into_key()) {
                keys.push(key);
            }
        }
        self.clear();
        keys
    }
}
