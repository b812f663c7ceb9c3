//! The basis tree of the network simplex and its node potentials.
//!
//! The tree is stored as an arena of per-node records indexed by node id. Every node
//! except the root knows its parent, the edge to its parent (`pred`) and whether that
//! edge points towards the parent (`up`). Children are kept in a doubly linked sibling
//! list so that a whole subtree can be cut and re-hung in time proportional to the
//! length of the re-rooted path, and visited in time proportional to its size.
//!
//! Potentials satisfy `potential[u] - potential[v] == cost(u, v)` for every tree edge
//! `(u, v)`.

use alloc::vec;
use alloc::vec::Vec;

use crate::amount::Amount;
use crate::error::Error;

const NIL: usize = usize::MAX;

#[derive(Clone, Debug)]
pub(super) struct SpanningTree<F> {
    parent: Vec<usize>,
    pred: Vec<usize>,
    up: Vec<bool>,
    depth: Vec<usize>,
    first_child: Vec<usize>,
    next_sibling: Vec<usize>,
    prev_sibling: Vec<usize>,
    potentials: Vec<F>,
}

impl<F> SpanningTree<F>
where
    F: Amount,
{
    /// A forest of `num_nodes` isolated nodes, to be joined by [`Self::attach`].
    pub(super) fn new(num_nodes: usize) -> Self {
        Self {
            parent: vec![NIL; num_nodes],
            pred: vec![NIL; num_nodes],
            up: vec![false; num_nodes],
            depth: vec![0; num_nodes],
            first_child: vec![NIL; num_nodes],
            next_sibling: vec![NIL; num_nodes],
            prev_sibling: vec![NIL; num_nodes],
            potentials: vec![F::zero(); num_nodes],
        }
    }

    #[cfg(test)]
    pub(super) fn parent(&self, u: usize) -> usize {
        self.parent[u]
    }

    /// The tree edge connecting `u` to its parent.
    pub(super) fn pred(&self, u: usize) -> usize {
        self.pred[u]
    }

    /// Whether `pred(u)` is oriented from `u` to its parent.
    pub(super) fn is_up(&self, u: usize) -> bool {
        self.up[u]
    }

    #[cfg(test)]
    pub(super) fn depth(&self, u: usize) -> usize {
        self.depth[u]
    }

    #[cfg(test)]
    pub(super) fn potential(&self, u: usize) -> F {
        self.potentials[u]
    }

    pub(super) fn potentials(&self) -> &[F] {
        &self.potentials
    }

    /// Hang `child` below `parent` via `edge`. `child` must currently be detached.
    pub(super) fn attach(&mut self, child: usize, parent: usize, edge: usize, up: bool) {
        debug_assert_eq!(self.parent[child], NIL);

        self.parent[child] = parent;
        self.pred[child] = edge;
        self.up[child] = up;

        let first = self.first_child[parent];
        self.prev_sibling[child] = NIL;
        self.next_sibling[child] = first;
        if first != NIL {
            self.prev_sibling[first] = child;
        }
        self.first_child[parent] = child;
    }

    /// Cut `child` (with its subtree) from its parent.
    fn detach(&mut self, child: usize) {
        let parent = self.parent[child];
        let prev = self.prev_sibling[child];
        let next = self.next_sibling[child];

        if prev == NIL {
            self.first_child[parent] = next;
        } else {
            self.next_sibling[prev] = next;
        }
        if next != NIL {
            self.prev_sibling[next] = prev;
        }

        self.parent[child] = NIL;
        self.pred[child] = NIL;
        self.prev_sibling[child] = NIL;
        self.next_sibling[child] = NIL;
    }

    /// The nearest common ancestor of `u` and `v`, in `O(depth)`.
    pub(super) fn join(&self, mut u: usize, mut v: usize) -> usize {
        while self.depth[u] > self.depth[v] {
            u = self.parent[u];
        }
        while self.depth[v] > self.depth[u] {
            v = self.parent[v];
        }
        while u != v {
            u = self.parent[u];
            v = self.parent[v];
        }
        u
    }

    /// The nodes from `u` up to, but excluding, its ancestor `ancestor`.
    ///
    /// The tree edges of that path are the `pred` edges of the yielded nodes.
    pub(super) fn path(&self, u: usize, ancestor: usize) -> Path<'_, F> {
        Path {
            tree: self,
            current: u,
            ancestor,
        }
    }

    /// Swap the tree edge above `v_out` for the edge `e_in` between `u_in` and `v_in`.
    ///
    /// `u_in` must lie in the subtree of `v_out` and `v_in` outside of it. The path
    /// `u_in .. v_out` is reversed, so that the cut subtree is re-rooted at `u_in` and
    /// hung below `v_in`. `up_in` tells whether `e_in` points from `u_in` to `v_in`.
    /// Depths and potentials of the moved subtree are recomputed afterwards.
    pub(super) fn exchange(
        &mut self,
        u_in: usize,
        v_in: usize,
        v_out: usize,
        e_in: usize,
        up_in: bool,
        costs: &[F],
    ) -> Result<(), Error> {
        let mut stem = Vec::new();
        let mut u = u_in;
        loop {
            stem.push((u, self.pred[u], self.up[u]));
            if u == v_out {
                break;
            }
            u = self.parent[u];
        }

        for &(u, _, _) in &stem {
            self.detach(u);
        }

        // every stem node becomes the parent of its former parent
        let (mut parent, mut edge, mut up) = (v_in, e_in, up_in);
        for (u, old_pred, old_up) in stem {
            self.attach(u, parent, edge, up);
            parent = u;
            edge = old_pred;
            up = !old_up;
        }

        self.propagate(u_in, costs)
    }

    /// Recompute depth and potential of every node in the subtree of `u`, assuming
    /// the values of `u`'s parent are correct.
    pub(super) fn propagate(&mut self, u: usize, costs: &[F]) -> Result<(), Error> {
        let mut stack = vec![u];
        while let Some(v) = stack.pop() {
            self.relabel(v, costs)?;

            let mut child = self.first_child[v];
            while child != NIL {
                stack.push(child);
                child = self.next_sibling[child];
            }
        }
        Ok(())
    }

    fn relabel(&mut self, v: usize, costs: &[F]) -> Result<(), Error> {
        let parent = self.parent[v];
        if parent == NIL {
            self.depth[v] = 0;
            self.potentials[v] = F::zero();
            return Ok(());
        }

        let cost = costs[self.pred[v]];
        let potential = if self.up[v] {
            self.potentials[parent].checked_add(&cost)
        } else {
            self.potentials[parent].checked_sub(&cost)
        };

        self.depth[v] = self.depth[parent] + 1;
        self.potentials[v] = potential.ok_or(Error::NumericOverflow)?;
        Ok(())
    }

    /// Preorder listing of the subtree of `u`.
    #[cfg(test)]
    pub(super) fn subtree(&self, u: usize) -> Vec<usize> {
        let mut nodes = Vec::new();
        let mut stack = vec![u];
        while let Some(v) = stack.pop() {
            nodes.push(v);
            let mut child = self.first_child[v];
            while child != NIL {
                stack.push(child);
                child = self.next_sibling[child];
            }
        }
        nodes
    }
}

pub(super) struct Path<'a, F> {
    tree: &'a SpanningTree<F>,
    current: usize,
    ancestor: usize,
}

impl<F> Iterator for Path<'_, F> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.current == self.ancestor || self.current == NIL {
            None
        } else {
            let u = self.current;
            self.current = self.tree.parent[u];
            Some(u)
        }
    }
}
