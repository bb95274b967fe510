//! Adjacency-list graph over a fixed, densely numbered set of nodes.
//!
//! Node indices are assigned once, in the order the payloads are handed to
//! [`Graph::new`], and never change. Edges are appended and never removed or
//! deduplicated: connecting the same pair twice keeps both edges and the
//! search simply never improves past the lighter one.

use crate::error::{PathError, PathResult, Violation};

/// A graph node: caller-supplied payload plus its adjacency-list slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    data: T,
    index: usize,
}

impl<T> Node<T> {
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// A directed edge to `target` with a finite, non-negative `weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: usize,
    pub weight: f64,
}

/// Anything that can name a node of a graph: a raw index or a node reference.
pub trait NodeRef {
    fn node_index(&self) -> usize;
}

impl NodeRef for usize {
    fn node_index(&self) -> usize {
        *self
    }
}

impl<T> NodeRef for &Node<T> {
    fn node_index(&self) -> usize {
        self.index
    }
}

impl<T> NodeRef for Node<T> {
    fn node_index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
pub struct Graph<T> {
    adj_list: Vec<(Node<T>, Vec<Edge>)>,
}

impl<T> Graph<T> {
    /// Build a graph with no edges, numbering the payloads `0..n` in order.
    pub fn new(payloads: Vec<T>) -> Self {
        let adj_list = payloads
            .into_iter()
            .enumerate()
            .map(|(index, data)| (Node { data, index }, Vec::new()))
            .collect();
        Self { adj_list }
    }

    pub fn node_count(&self) -> usize {
        self.adj_list.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adj_list.iter().map(|(_, edges)| edges.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adj_list.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&Node<T>> {
        self.adj_list.get(index).map(|(node, _)| node)
    }

    /// All nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> + '_ {
        self.adj_list.iter().map(|(node, _)| node)
    }

    /// Resolve a node reference to an index of this graph.
    pub fn resolve(&self, node: impl NodeRef) -> PathResult<usize> {
        let index = node.node_index();
        if index < self.adj_list.len() {
            Ok(index)
        } else {
            Err(PathError::InvalidNodeReference(index))
        }
    }

    /// Append a directed edge `a -> b`.
    ///
    /// Negative, NaN and infinite weights are rejected before anything is
    /// modified. An infinite edge would be indistinguishable from no edge.
    pub fn connect_directed(&mut self, a: impl NodeRef, b: impl NodeRef, weight: f64) -> PathResult<()> {
        let from = self.resolve(a)?;
        let to = self.resolve(b)?;
        check_weight(from, to, weight)?;
        self.adj_list[from].1.push(Edge { target: to, weight });
        Ok(())
    }

    /// Append edges `a -> b` and `b -> a` with the same weight. Either both are
    /// added or neither is.
    pub fn connect(&mut self, a: impl NodeRef, b: impl NodeRef, weight: f64) -> PathResult<()> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        check_weight(a, b, weight)?;
        self.adj_list[a].1.push(Edge { target: b, weight });
        self.adj_list[b].1.push(Edge { target: a, weight });
        Ok(())
    }

    /// [`Graph::connect_directed`] with weight 1.
    pub fn connect_directed_unit(&mut self, a: impl NodeRef, b: impl NodeRef) -> PathResult<()> {
        self.connect_directed(a, b, 1.0)
    }

    /// [`Graph::connect`] with weight 1.
    pub fn connect_unit(&mut self, a: impl NodeRef, b: impl NodeRef) -> PathResult<()> {
        self.connect(a, b, 1.0)
    }

    /// Outgoing edges of `node`.
    #[inline]
    pub fn neighbors(&self, node: impl NodeRef) -> PathResult<&[Edge]> {
        let index = self.resolve(node)?;
        Ok(&self.adj_list[index].1)
    }
}

fn check_weight(from: usize, to: usize, weight: f64) -> PathResult<()> {
    // Infinite weights are rejected too: the search treats +inf as unreachable.
    if !weight.is_finite() || weight < 0.0 {
        return Err(Violation::InvalidWeight { from, to, weight }.into());
    }
    Ok(())
}
