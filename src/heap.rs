/*
Binary min-heap with an order mapping from element identity to heap slot.

The mapping makes `locate` O(1), so Dijkstra relaxation can find a node in the
heap and decrease its key in O(log n) instead of rescanning the array.
Ordering, identity and in-place updates are supplied by a `HeapStrategy`.
*/

use crate::error::{PathError, PathResult, Violation};

/// Ordering, identity and update rules for the elements of an [`IndexedMinHeap`].
pub trait HeapStrategy<E> {
    /// Value handed to [`HeapStrategy::apply_update`] by `decrease_key`.
    type Update;

    /// Strict "sorts before" relation. Must be a total order over the elements in the heap.
    fn less(&self, a: &E, b: &E) -> bool;

    /// Stable integer key of an element, unique within one heap.
    ///
    /// The order mapping is a vector sized by the largest identity, so keys
    /// should be dense and small, such as graph node indices.
    fn identity(&self, element: &E) -> usize;

    /// Apply `update` to `element` in place.
    fn apply_update(&self, element: &mut E, update: Self::Update);
}

#[derive(Debug)]
pub struct IndexedMinHeap<E, S> {
    nodes: Vec<E>,
    // identity -> current slot in `nodes`, `None` once popped.
    order_mapping: Vec<Option<usize>>,
    strategy: S,
}

impl<E, S: HeapStrategy<E>> IndexedMinHeap<E, S> {
    /// Take ownership of `elements` and heapify them in O(n).
    ///
    /// Fails with [`Violation::DuplicateIdentity`] if two elements share an
    /// identity, and with [`Violation::IdentityOutOfRange`] for `usize::MAX`.
    pub fn new(elements: Vec<E>, strategy: S) -> PathResult<Self> {
        let mut slots = 0;
        for element in &elements {
            let id = strategy.identity(element);
            let needed = id.checked_add(1).ok_or(Violation::IdentityOutOfRange(id))?;
            slots = slots.max(needed);
        }
        let mut order_mapping = vec![None; slots];
        for (position, element) in elements.iter().enumerate() {
            let id = strategy.identity(element);
            if order_mapping[id].is_some() {
                return Err(Violation::DuplicateIdentity(id).into());
            }
            order_mapping[id] = Some(position);
        }

        let mut heap = Self {
            nodes: elements,
            order_mapping,
            strategy,
        };
        heap.heapify();
        Ok(heap)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The heap array in its current order.
    pub fn as_slice(&self) -> &[E] {
        &self.nodes
    }

    pub fn get(&self, position: usize) -> Option<&E> {
        self.nodes.get(position)
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Current heap slot of the element with `identity`, or `None` if it was
    /// popped or never inserted.
    #[inline]
    pub fn locate(&self, identity: usize) -> Option<usize> {
        self.order_mapping.get(identity).copied().flatten()
    }

    /// Restore the heap property over the whole array with bottom-up sift-down.
    pub fn heapify(&mut self) {
        for i in (0..self.nodes.len() / 2).rev() {
            self.sift_down(i);
        }
    }

    pub fn peek_min(&self) -> PathResult<&E> {
        self.nodes.first().ok_or(PathError::EmptyHeap)
    }

    /// Remove and return the minimum element. Its identity is marked absent.
    pub fn pop_min(&mut self) -> PathResult<E> {
        let min = match self.nodes.len() {
            0 => return Err(PathError::EmptyHeap),
            1 => self.nodes.pop().ok_or(PathError::EmptyHeap)?,
            _ => {
                // Last element moves into the root slot.
                let min = self.nodes.swap_remove(0);
                self.place(0);
                self.sift_down(0);
                min
            }
        };
        let id = self.strategy.identity(&min);
        self.order_mapping[id] = None;
        Ok(min)
    }

    /// Apply `update` to the element at `position` and sift it towards the root.
    ///
    /// The caller must only pass updates that do not move the element later in
    /// the ordering. This is not checked: an increasing update leaves the heap
    /// property broken below `position`.
    pub fn decrease_key(&mut self, position: usize, update: S::Update) -> PathResult<()> {
        let len = self.nodes.len();
        let element = self
            .nodes
            .get_mut(position)
            .ok_or(Violation::PositionOutOfRange { position, len })?;
        self.strategy.apply_update(element, update);
        self.sift_up(position);
        Ok(())
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.strategy.less(&self.nodes[i], &self.nodes[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < len && self.strategy.less(&self.nodes[left], &self.nodes[smallest]) {
                smallest = left;
            }
            if right < len && self.strategy.less(&self.nodes[right], &self.nodes[smallest]) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.nodes.swap(a, b);
        self.place(a);
        self.place(b);
    }

    // Record that the element now sitting in `position` lives there.
    #[inline]
    fn place(&mut self, position: usize) {
        let id = self.strategy.identity(&self.nodes[position]);
        self.order_mapping[id] = Some(position);
    }
}
