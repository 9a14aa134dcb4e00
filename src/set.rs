//! The radix tree set and its traversal loops.
//!
//! `insert` and `contains` share one traversal primitive: locate the sibling
//! whose fragment starts with the cursor byte, then measure the longest
//! common prefix between that fragment and the remaining key suffix. The two
//! operations differ only in how they react when the match falls short.

use crate::node::Node;

/// Length of the longest common prefix of two byte slices.
#[inline]
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// A set of distinct byte strings backed by a compressed radix tree.
///
/// Each tree edge carries a multi-byte fragment, so chains of single-child
/// vertices never exist; a key's storage cost is the part of it not already
/// shared with other keys. Both operations are iterative descents bounded by
/// the key length.
///
/// The empty key is a regular member: it is represented by the root node's
/// own leaf flag.
pub struct RadixSet {
    pub(crate) root: Node,
    pub(crate) len: usize,
}

impl RadixSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            root: Node::new_root(),
            len: 0,
        }
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `key`, returning `true` iff it was not already present.
    ///
    /// A duplicate insertion returns `false` and leaves the tree untouched.
    pub fn insert(&mut self, key: &[u8]) -> bool {
        let mut node = &mut self.root;
        let mut rest = key;

        loop {
            // Suffix consumed: the current node already spells the key.
            // Either it is a stored key (duplicate) or a branch point that
            // the key now completes.
            if rest.is_empty() {
                if node.is_leaf {
                    return false;
                }
                node.is_leaf = true;
                self.len += 1;
                return true;
            }

            let pos = match node.child_index(rest[0]) {
                // No child shares the leading byte: the whole remaining
                // suffix becomes a new leaf at the sorted position.
                Err(pos) => {
                    node.children.insert(pos, Node::new_leaf(rest.to_vec()));
                    self.len += 1;
                    return true;
                }
                Ok(pos) => pos,
            };

            let child = &mut *node.children[pos];
            let matched = common_prefix_len(rest, &child.fragment);

            if matched < child.fragment.len() {
                child.split(matched);
                // The key ends exactly at the split point: the truncated
                // node becomes its leaf.
                if matched == rest.len() {
                    child.is_leaf = true;
                    self.len += 1;
                    return true;
                }
            }

            rest = &rest[matched..];
            node = child;
        }
    }

    /// Whether `key` is a member of the set.
    pub fn contains(&self, key: &[u8]) -> bool {
        let mut node = &self.root;
        let mut rest = key;

        loop {
            if rest.is_empty() {
                return node.is_leaf;
            }

            let pos = match node.child_index(rest[0]) {
                Ok(pos) => pos,
                Err(_) => return false,
            };

            let child = &*node.children[pos];
            let matched = common_prefix_len(rest, &child.fragment);

            // The child's path diverges from the query, or the query ends
            // inside the child's fragment. Either way, not a member.
            if matched < child.fragment.len() {
                return false;
            }

            rest = &rest[matched..];
            node = child;
        }
    }

    /// Memory accounting for the tree.
    pub fn stats(&self) -> RadixStats {
        let mut stats = RadixStats::default();
        let mut stack: Vec<&Node> = vec![&self.root];

        while let Some(node) = stack.pop() {
            stats.node_count += 1;
            if node.is_leaf {
                stats.leaf_count += 1;
            }
            stats.fragment_bytes += node.fragment.capacity();
            stats.node_bytes += std::mem::size_of::<Node>();
            if node.children.spilled() {
                stats.node_bytes +=
                    node.children.capacity() * std::mem::size_of::<Box<Node>>();
            }
            for child in &node.children {
                stack.push(child);
            }
        }

        stats.total_bytes = stats.fragment_bytes + stats.node_bytes;
        stats.bytes_per_key = if self.len > 0 {
            stats.total_bytes as f64 / self.len as f64
        } else {
            0.0
        };
        stats
    }
}

impl Default for RadixSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Memory statistics for a [`RadixSet`].
#[derive(Debug, Clone, Default)]
pub struct RadixStats {
    /// Number of tree nodes, root included.
    pub node_count: usize,
    /// Number of nodes whose path spells a stored key.
    pub leaf_count: usize,
    /// Bytes held by fragment buffers.
    pub fragment_bytes: usize,
    /// Bytes held by node structures and spilled child tables.
    pub node_bytes: usize,
    /// Total bytes used by the tree.
    pub total_bytes: usize,
    /// Total bytes divided by key count.
    pub bytes_per_key: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_within_a_fragment() {
        let mut set = RadixSet::new();
        assert!(set.insert(b"apple"));
        assert!(set.insert(b"apply"));

        assert!(set.contains(b"apple"));
        assert!(set.contains(b"apply"));
        assert!(!set.contains(b"appl"));
        assert!(!set.contains(b"app"));
        assert!(!set.contains(b"applesauce"));
    }

    #[test]
    fn shared_prefix_branch() {
        let mut set = RadixSet::new();
        assert!(set.insert(b"cat"));
        assert!(set.insert(b"car"));

        assert!(set.contains(b"cat"));
        assert!(set.contains(b"car"));
        assert!(!set.contains(b"ca"));
        assert!(!set.contains(b"c"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn three_way_branch() {
        let mut set = RadixSet::new();
        assert!(set.insert(b"test"));
        assert!(set.insert(b"team"));
        assert!(set.insert(b"toast"));

        assert!(set.contains(b"test"));
        assert!(set.contains(b"team"));
        assert!(set.contains(b"toast"));
        assert!(!set.contains(b"te"));
        assert!(!set.contains(b"to"));
        assert!(!set.contains(b"tea"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut set = RadixSet::new();
        assert!(set.insert(b"dup"));
        assert!(!set.insert(b"dup"));

        assert_eq!(set.len(), 1);
        assert!(set.contains(b"dup"));
    }

    #[test]
    fn branch_point_promoted_to_leaf() {
        let mut set = RadixSet::new();
        assert!(set.insert(b"test"));
        assert!(set.insert(b"team"));
        assert!(!set.contains(b"te"));

        // "te" already exists as a branch node; inserting it only flips the
        // leaf flag.
        assert!(set.insert(b"te"));
        assert!(set.contains(b"te"));
        assert_eq!(set.len(), 3);
        assert!(!set.insert(b"te"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn key_completing_a_split_becomes_a_leaf() {
        let mut set = RadixSet::new();
        assert!(set.insert(b"apple"));

        // Splits "apple" at "appl"; the truncated node is the new key.
        assert!(set.insert(b"appl"));
        assert!(set.contains(b"appl"));
        assert!(set.contains(b"apple"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_key_lives_at_the_root() {
        let mut set = RadixSet::new();
        assert!(!set.contains(b""));

        assert!(set.insert(b""));
        assert!(set.contains(b""));
        assert!(!set.insert(b""));
        assert_eq!(set.len(), 1);

        assert!(set.insert(b"a"));
        assert!(set.contains(b""));
        assert!(set.contains(b"a"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn member_extension_and_stranger_are_absent() {
        let mut set = RadixSet::new();
        assert!(set.insert(b"roma"));
        assert!(set.insert(b"romulus"));

        assert!(!set.contains(b"rom"));
        assert!(!set.contains(b"roman"));
        assert!(!set.contains(b"rubens"));
        assert!(!set.contains(b""));
    }

    #[test]
    fn siblings_stay_sorted_by_leading_byte() {
        let mut set = RadixSet::new();
        for key in [
            b"mango".as_slice(),
            b"cherry",
            b"xigua",
            b"apple",
            b"zucchini",
            b"banana",
        ] {
            assert!(set.insert(key));
        }

        let leads: Vec<u8> = set.root.children.iter().map(|c| c.fragment[0]).collect();
        let mut sorted = leads.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(leads, sorted);
    }

    #[test]
    fn bulk_membership() {
        let mut set = RadixSet::new();
        for i in 0..1000 {
            let key = format!("key{:04}", i);
            assert!(set.insert(key.as_bytes()));
        }
        assert_eq!(set.len(), 1000);

        for i in 0..1000 {
            let key = format!("key{:04}", i);
            assert!(set.contains(key.as_bytes()));
        }
        assert!(!set.contains(b"key"));
        assert!(!set.contains(b"key10000"));
        assert!(!set.contains(b"unrelated"));
    }

    #[test]
    fn stats_track_keys_and_nodes() {
        let mut set = RadixSet::new();
        assert_eq!(set.stats().bytes_per_key, 0.0);

        set.insert(b"test");
        set.insert(b"team");
        set.insert(b"toast");

        let stats = set.stats();
        assert_eq!(stats.leaf_count, set.len());
        // Root plus the "t" and "te" branch points on top of the leaves.
        assert!(stats.node_count > stats.leaf_count);
        assert_eq!(stats.total_bytes, stats.fragment_bytes + stats.node_bytes);
        assert!(stats.bytes_per_key > 0.0);
    }
}
