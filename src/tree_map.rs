//! # Tree Map
//!
//! An ordered map backed by an unbalanced binary search tree.
//!
//! Every node owns its two children; there are no parent links. Operations walk down from the
//! root holding a cursor on the link they may rewrite (`&mut Option<Box<Node>>`), which is all
//! deletion needs to splice a node out. Walks are iterative, and so are `Drop` and `clear`, so a
//! tree that degenerated into a list (sorted input) does not exhaust the stack.
//!
//! The tree never rebalances. [`TreeMap::height`] and [`TreeMap::unbalanced_count`] report how
//! skewed it has become.

use std::{cmp::Ordering, fmt};

use compare::{Compare, Natural};

use crate::{Entry, Map};

/// An owned, possibly empty, subtree
type Link<K, V> = Option<Box<Node<K, V>>>;

/// A tree node
#[derive(Debug)]
struct Node<K, V> {
    /// The mapping stored at this node
    entry: Entry<K, V>,
    /// Keys ordered before `entry.key`
    left: Link<K, V>,
    /// Keys ordered after `entry.key`
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates a leaf
    const fn leaf(key: K, value: V) -> Self {
        Self {
            entry: Entry::new(key, value),
            left: None,
            right: None,
        }
    }
}

/// An ordered map based on a binary search tree.
///
/// Keys are ordered by a comparator fixed at construction; [`TreeMap::new`] uses the keys' own
/// [`Ord`]. Iteration and the exported `keys`/`values`/`entries` are in ascending order under
/// that comparator.
///
/// The behavior of this map is unspecified if the comparator is not a total order, or if a key's
/// ordering relative to another key changes while both are in the map.
pub struct TreeMap<K, V, C = Natural<K>> {
    /// The root of the tree
    root: Link<K, V>,
    /// Number of nodes
    len: usize,
    /// The ordering of keys
    cmp: C,
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Creates an empty map ordered by the natural order of its keys
    ///
    /// ```
    /// use trimap::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }
}

impl<K: Ord, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`
    ///
    /// ```
    /// use compare::{Compare, natural};
    /// use trimap::TreeMap;
    ///
    /// let mut map = TreeMap::with_comparator(natural().rev());
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    ///
    /// let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [3, 2, 1]);
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        Self {
            root: None,
            len: 0,
            cmp,
        }
    }

    /// The comparator ordering this map
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Number of entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        let mut pending: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.len = 0;
    }

    /// Iterates over the entries in ascending key order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.descend_left(self.root.as_deref());
        iter
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty
    #[must_use]
    pub fn height(&self) -> usize {
        self.shape().0
    }

    /// Number of nodes whose left and right subtree heights differ by more than one
    #[must_use]
    pub fn unbalanced_count(&self) -> usize {
        self.shape().1
    }

    /// Height of the tree and number of unbalanced nodes, in one post-order walk.
    ///
    /// Each node is visited twice: once to schedule its children, once (`expanded`) to combine
    /// the two heights they left on `heights`.
    fn shape(&self) -> (usize, usize) {
        let mut heights: Vec<usize> = Vec::new();
        let mut unbalanced: usize = 0;
        let mut stack = vec![(self.root.as_deref(), false)];

        while let Some((link, expanded)) = stack.pop() {
            let Some(node) = link else {
                heights.push(0);
                continue;
            };
            if expanded {
                let right = heights.pop().unwrap_or(0);
                let left = heights.pop().unwrap_or(0);
                if left.abs_diff(right) > 1 {
                    unbalanced = unbalanced.saturating_add(1);
                }
                heights.push(left.max(right).saturating_add(1));
            } else {
                stack.push((Some(node), true));
                stack.push((node.right.as_deref(), false));
                stack.push((node.left.as_deref(), false));
            }
        }

        (heights.pop().unwrap_or(0), unbalanced)
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Compare<K>,
{
    /// Maps `key` to `value`, returning the replaced value.
    ///
    /// A new key becomes a leaf where the search for it ended; an existing key keeps its node
    /// and only the value changes.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut link = &mut self.root;
        while let Some(node) = link {
            match self.cmp.compare(&key, node.entry.key()) {
                Ordering::Less => link = &mut node.left,
                Ordering::Greater => link = &mut node.right,
                Ordering::Equal => return Some(node.entry.set_value(value)),
            }
        }
        *link = Some(Box::new(Node::leaf(key, value)));
        self.len = self.len.saturating_add(1);
        None
    }

    /// Returns the value mapped to `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut link = self.root.as_deref();
        while let Some(node) = link {
            link = match self.cmp.compare(key, node.entry.key()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node.entry.value()),
            };
        }
        None
    }

    /// Returns a mutable reference to the value mapped to `key`
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut link = self.root.as_deref_mut();
        while let Some(node) = link {
            link = match self.cmp.compare(key, node.entry.key()) {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => return Some(node.entry.value_mut()),
            };
        }
        None
    }

    /// Returns true if `key` is mapped
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning the value it was mapped to.
    ///
    /// A leaf is simply detached and a node with one child is replaced by that child. A node
    /// with two children is replaced by its in-order successor: the leftmost node of its right
    /// subtree is first unlinked from where it sits (it has no left child, so that is a splice),
    /// then adopts both of the removed node's subtrees.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut link = &mut self.root;
        loop {
            let ordering = self.cmp.compare(key, link.as_deref()?.entry.key());
            match ordering {
                Ordering::Less => link = &mut link.as_mut()?.left,
                Ordering::Greater => link = &mut link.as_mut()?.right,
                Ordering::Equal => break,
            }
        }

        let removed = link.take()?;
        let Node { entry, left, right } = *removed;
        *link = match (left, right) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                let mut right = Some(right);
                let mut successor = detach_min(&mut right)?;
                tracing::trace!("replacing removed node by its in-order successor");
                successor.left = Some(left);
                successor.right = right;
                Some(successor)
            }
        };
        self.len = self.len.saturating_sub(1);

        let (_, value) = entry.into_pair();
        Some(value)
    }
}

/// Unlinks the leftmost node of a non-empty subtree, splicing its right child into its place
fn detach_min<K, V>(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
    let mut link = link;
    while link.as_ref()?.left.is_some() {
        link = &mut link.as_mut()?.left;
    }
    let mut min = link.take()?;
    *link = min.right.take();
    Some(min)
}

impl<K, V, C> Drop for TreeMap<K, V, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C>
where
    C: Compare<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Draws the tree rotated a quarter turn: the right subtree above its parent, the left subtree
/// below, one tab of indentation per level.
impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for TreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root.is_none() {
            return f.write_str("(empty tree)");
        }

        let mut stack = Vec::new();
        let mut current = self.root.as_deref().map(|node| (node, 0_usize));
        loop {
            while let Some((node, depth)) = current {
                stack.push((node, depth));
                current = node.right
                    .as_deref()
                    .map(|right| (right, depth.saturating_add(1)));
            }
            let Some((node, depth)) = stack.pop() else {
                return Ok(());
            };
            writeln!(f, "{}{}", "\t".repeat(depth), node.entry)?;
            current = node.left
                .as_deref()
                .map(|left| (left, depth.saturating_add(1)));
        }
    }
}

impl<K, V, C> Map<K, V> for TreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Compare<K>,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        Self::contains_key(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Self::remove(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn entries(&self) -> Vec<Entry<K, V>> {
        self.iter()
            .map(|(k, v)| Entry::new(k.clone(), v.clone()))
            .collect()
    }

    fn max_probe_depth(&self) -> usize {
        self.height()
    }
}

/// In-order iterator over a [`TreeMap`]
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    /// Nodes whose left subtree has been yielded but which have not been yielded themselves
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Pushes `link` and its chain of left descendants
    fn descend_left(&mut self, mut link: Option<&'a Node<K, V>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        Some((node.entry.key(), node.entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keys that build a perfect tree of height 3
    const BALANCED: [i32; 7] = [4, 2, 6, 1, 3, 5, 7];

    fn balanced() -> TreeMap<i32, String> {
        BALANCED.iter().map(|&k| (k, k.to_string())).collect()
    }

    fn keys<C: Compare<i32>>(map: &TreeMap<i32, String, C>) -> Vec<i32> {
        map.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_insert_and_get() {
        let map = balanced();
        assert_eq!(map.len(), 7);
        assert_eq!(keys(&map), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(map.height(), 3);
        assert_eq!(map.unbalanced_count(), 0);
        assert_eq!(map.get(&5).map(String::as_str), Some("5"));
        assert_eq!(map.get(&8), None);
    }

    #[test]
    fn test_update_keeps_size() {
        let mut map = balanced();
        assert_eq!(map.insert(3, "three".to_string()), Some("3".to_string()));
        assert_eq!(map.len(), 7);
        assert_eq!(map.get(&3).map(String::as_str), Some("three"));
    }

    #[test]
    fn test_remove_every_shape() {
        let mut map = balanced();
        let order = [7, 2, 3, 4, 1, 5, 6];
        for (removed, key) in order.iter().enumerate() {
            assert_eq!(map.remove(key), Some(key.to_string()));
            assert_eq!(map.len(), 6 - removed);
            assert!(!map.contains_key(key));
            let remaining = keys(&map);
            assert!(remaining.windows(2).all(|pair| pair[0] < pair[1]));
        }
        assert!(map.is_empty());
        assert!(Map::values(&map).is_empty());
        assert_eq!(map.height(), 0);
    }

    #[test]
    fn test_remove_successor_is_direct_right_child() {
        let mut map: TreeMap<i32, String> =
            [2, 1, 3, 4].iter().map(|&k| (k, k.to_string())).collect();
        assert_eq!(map.remove(&2), Some("2".to_string()));
        assert_eq!(keys(&map), vec![1, 3, 4]);
        assert_eq!(map.to_string(), "\t<4 -> 4>\n<3 -> 3>\n\t<1 -> 1>\n");
    }

    #[test]
    fn test_remove_successor_deep_in_right_subtree() {
        let mut map: TreeMap<i32, String> = [10, 5, 20, 15, 25, 12, 17, 13]
            .iter()
            .map(|&k| (k, k.to_string()))
            .collect();
        assert_eq!(map.remove(&10), Some("10".to_string()));
        assert_eq!(keys(&map), vec![5, 12, 13, 15, 17, 20, 25]);
        // 12 moved to the root, 13 took its old place under 15
        assert_eq!(
            map.to_string(),
            "\t\t<25 -> 25>\n\t<20 -> 20>\n\t\t\t<17 -> 17>\n\t\t<15 -> 15>\n\t\t\t<13 -> 13>\n\
             <12 -> 12>\n\t<5 -> 5>\n"
        );
        assert_eq!(map.height(), 4);
    }

    #[test]
    fn test_remove_missing_key() {
        let mut map = balanced();
        assert_eq!(map.remove(&42), None);
        assert_eq!(map.len(), 7);

        let mut empty: TreeMap<i32, String> = TreeMap::new();
        assert_eq!(empty.remove(&1), None);
        assert_eq!(empty.get(&1), None);
    }

    #[test]
    fn test_display_rotated() {
        let expected = "\t\t<7 -> 7>\n\t<6 -> 6>\n\t\t<5 -> 5>\n<4 -> 4>\n\
                        \t\t<3 -> 3>\n\t<2 -> 2>\n\t\t<1 -> 1>\n";
        assert_eq!(balanced().to_string(), expected);
        assert_eq!(TreeMap::<i32, String>::new().to_string(), "(empty tree)");
    }

    #[test]
    fn test_sorted_input_degenerates() {
        let map: TreeMap<i32, String> = (1..=6).map(|k| (k, k.to_string())).collect();
        assert_eq!(map.height(), 6);
        assert_eq!(map.max_probe_depth(), 6);
        assert_eq!(map.unbalanced_count(), 4);
    }

    #[test]
    fn test_deep_tree_drops_without_overflow() {
        let mut map = TreeMap::new();
        for i in 0..20_000_u32 {
            map.insert(i, ());
        }
        assert_eq!(map.len(), 20_000);
        assert_eq!(map.get(&19_999), Some(&()));
        assert_eq!(map.height(), 20_000);
        drop(map);
    }

    #[test]
    fn test_custom_comparator() {
        let mut map = TreeMap::with_comparator(|a: &String, b: &String| {
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        });
        for word in ["ccc", "a", "bb", "aa"] {
            map.insert(word.to_string(), word.len());
        }
        let ordered: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(ordered, vec!["a", "aa", "bb", "ccc"]);
        assert_eq!(Map::keys(&map).len(), 4);
    }

    #[test]
    fn test_get_mut_and_clear() {
        let mut map = balanced();
        if let Some(value) = map.get_mut(&1) {
            value.push('!');
        }
        assert_eq!(map.get(&1).map(String::as_str), Some("1!"));

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
        map.insert(1, "again".to_string());
        assert_eq!(map.len(), 1);
    }
}
