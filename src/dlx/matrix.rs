#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The sparse incidence matrix ("dancing links") behind the exact cover search.
//!
//! Every requirement becomes a column and every action a row. A `1` in the matrix is a node
//! that lives in two circular doubly-linked lists at once: the ring of nodes in
//! its row and the ring of nodes in its column. Columns for mandatory requirements are
//! additionally threaded onto a ring anchored at the root, which is what the search walks
//! when it looks for the next column to branch on. Optional columns are left off that
//! ring, so they are never chosen for branching and never have to be covered.
//!
//! All nodes live in one arena and link to each other by index. A freshly created node
//! links to itself, which is the arena equivalent of the self-pointing sentinel in the
//! textbook presentation.
//!
//! Removal only ever touches the neighbours' links, and restoration replays removals in
//! exactly the opposite order, so `select_row` followed by `deselect_row` leaves the
//! matrix as it was.

use std::iter;

/// Index of a node in the matrix arena.
pub type NodeId = usize;

/// The root sentinel. Its horizontal ring holds the live mandatory column headers.
pub const ROOT: NodeId = 0;

/// Row index used by header nodes, which belong to no row.
const HEADER_ROW: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    left: NodeId,
    right: NodeId,
    up: NodeId,
    down: NodeId,
    column: usize,
    row: usize,
}

impl Node {
    const fn detached(id: NodeId, column: usize, row: usize) -> Self {
        Self {
            left: id,
            right: id,
            up: id,
            down: id,
            column,
            row,
        }
    }
}

/// Toroidal doubly-linked sparse matrix.
///
/// Node `0` is the root, nodes `1..=columns` are the column headers (column `c` is headed
/// by node `c + 1`), and every node after that is a `1` of some row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    nodes: Vec<Node>,
    sizes: Vec<usize>,
    rows: Vec<Option<NodeId>>,
    mandatory: usize,
}

impl Matrix {
    /// Builds the matrix.
    ///
    /// Columns `0..mandatory` are mandatory and are linked onto the root ring in order;
    /// columns `mandatory..columns` are optional. Each item of `rows` lists the columns
    /// that row has a node in. Column indices must be in range and must not repeat within
    /// a row; [`crate::dlx::ExactCover`] validates this before it gets here.
    #[must_use]
    pub fn new<I, C>(columns: usize, mandatory: usize, rows: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[usize]>,
    {
        debug_assert!(mandatory <= columns);

        let mut matrix = Self {
            nodes: Vec::with_capacity(columns + 1),
            sizes: vec![0; columns],
            rows: Vec::new(),
            mandatory,
        };

        matrix.nodes.push(Node::detached(ROOT, HEADER_ROW, HEADER_ROW));

        for column in 0..columns {
            let header = matrix.nodes.len();
            matrix.nodes.push(Node::detached(header, column, HEADER_ROW));
            if column < mandatory {
                matrix.insert_left_of(ROOT, header);
            }
        }

        for (row, row_columns) in rows.into_iter().enumerate() {
            let mut first = None;
            for &column in row_columns.as_ref() {
                debug_assert!(column < columns, "column {column} out of range");

                let node = matrix.nodes.len();
                matrix.nodes.push(Node::detached(node, column, row));
                matrix.insert_above(column + 1, node);
                matrix.sizes[column] += 1;

                match first {
                    Some(head) => matrix.insert_left_of(head, node),
                    None => first = Some(node),
                }
            }
            matrix.rows.push(first);
        }

        matrix
    }

    /// Total number of columns, mandatory and optional.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.sizes.len()
    }

    /// Number of mandatory columns.
    #[must_use]
    pub const fn mandatory_count(&self) -> usize {
        self.mandatory
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of `1`s in the matrix.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.sizes.len() - 1
    }

    /// Live node count of a column.
    #[must_use]
    pub fn column_size(&self, column: usize) -> usize {
        self.sizes[column]
    }

    /// The column a node belongs to.
    #[must_use]
    pub fn column_of(&self, node: NodeId) -> usize {
        self.nodes[node].column
    }

    /// The row a node belongs to.
    #[must_use]
    pub fn row_of(&self, node: NodeId) -> usize {
        self.nodes[node].row
    }

    /// First node of a row, or `None` for a row without nodes.
    #[must_use]
    pub fn row_head(&self, row: usize) -> Option<NodeId> {
        self.rows.get(row).copied().flatten()
    }

    /// Whether every mandatory column has been covered.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.nodes[ROOT].right == ROOT
    }

    /// Mandatory columns still on the root ring, in ring order.
    pub fn live_columns(&self) -> impl Iterator<Item = usize> + '_ {
        iter::successors(Some(self.nodes[ROOT].right), |&n| Some(self.nodes[n].right))
            .take_while(|&n| n != ROOT)
            .map(|n| self.nodes[n].column)
    }

    /// Nodes currently linked into a column, top to bottom.
    pub fn column_nodes(&self, column: usize) -> impl Iterator<Item = NodeId> + '_ {
        let header = column + 1;
        iter::successors(Some(self.nodes[header].down), |&n| Some(self.nodes[n].down))
            .take_while(move |&n| n != header)
    }

    /// Nodes of the row ring containing `node`, starting with `node` itself.
    pub fn row_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::once(node).chain(
            iter::successors(Some(self.nodes[node].right), |&n| Some(self.nodes[n].right))
                .take_while(move |&n| n != node),
        )
    }

    /// Picks the live mandatory column with the smallest key.
    ///
    /// `key` receives the column index and its live node count. Ties go to the column
    /// met first on the root ring. Returns `None` once the ring is empty, meaning every
    /// mandatory requirement is covered.
    pub fn best_column<K, F>(&self, mut key: F) -> Option<usize>
    where
        K: Ord,
        F: FnMut(usize, usize) -> K,
    {
        let mut best: Option<(usize, K)> = None;
        for column in self.live_columns() {
            let value = key(column, self.sizes[column]);
            if best.as_ref().is_none_or(|(_, current)| value < *current) {
                best = Some((column, value));
            }
        }
        best.map(|(column, _)| column)
    }

    /// Adds the row containing `node` to the partial solution.
    ///
    /// Walking the row from `node`, each node is unlinked from its column and then that
    /// column is covered, which takes every other row sharing a column with this one out
    /// of the matrix.
    pub fn select_row(&mut self, node: NodeId) {
        let mut current = node;
        loop {
            self.detach(current);
            self.cover(self.nodes[current].column);
            current = self.nodes[current].right;
            if current == node {
                break;
            }
        }
    }

    /// Undoes [`Self::select_row`] for the same `node`.
    ///
    /// Must be called in LIFO order with respect to other selections: the row is walked
    /// right to left, uncovering each column before relinking the node.
    pub fn deselect_row(&mut self, node: NodeId) {
        let mut current = self.nodes[node].left;
        loop {
            self.uncover(self.nodes[current].column);
            self.reattach(current);
            if current == node {
                break;
            }
            current = self.nodes[current].left;
        }
    }

    /// Checks the structural invariants: every column size matches the number of nodes
    /// linked into the column, and all links are mutually consistent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let sizes_match = (0..self.column_count())
            .all(|column| self.column_nodes(column).count() == self.sizes[column]);

        let links_match = (0..self.column_count()).all(|column| {
            let header = column + 1;
            iter::once(header)
                .chain(self.column_nodes(column))
                .all(|n| {
                    let node = &self.nodes[n];
                    self.nodes[node.down].up == n && self.nodes[node.up].down == n
                })
        });

        let ring_matches = iter::once(ROOT)
            .chain(self.live_columns().map(|column| column + 1))
            .all(|n| {
                let node = &self.nodes[n];
                self.nodes[node.right].left == n && self.nodes[node.left].right == n
            });

        sizes_match && links_match && ring_matches
    }

    fn cover(&mut self, column: usize) {
        let header = column + 1;
        self.unlink_horizontal(header);

        let mut row = self.nodes[header].down;
        while row != header {
            let mut node = self.nodes[row].right;
            while node != row {
                self.detach(node);
                node = self.nodes[node].right;
            }
            row = self.nodes[row].down;
        }
    }

    fn uncover(&mut self, column: usize) {
        let header = column + 1;

        let mut row = self.nodes[header].up;
        while row != header {
            let mut node = self.nodes[row].left;
            while node != row {
                self.reattach(node);
                node = self.nodes[node].left;
            }
            row = self.nodes[row].up;
        }

        self.relink_horizontal(header);
    }

    /// Unlinks a node from its column and shrinks the column.
    fn detach(&mut self, node: NodeId) {
        let Node { up, down, column, .. } = self.nodes[node];
        self.nodes[up].down = down;
        self.nodes[down].up = up;
        self.sizes[column] -= 1;
    }

    /// Relinks a node detached by [`Self::detach`]. Its own links still point at the
    /// neighbours it had when it was removed.
    fn reattach(&mut self, node: NodeId) {
        let Node { up, down, column, .. } = self.nodes[node];
        self.nodes[up].down = node;
        self.nodes[down].up = node;
        self.sizes[column] += 1;
    }

    fn unlink_horizontal(&mut self, node: NodeId) {
        let Node { left, right, .. } = self.nodes[node];
        self.nodes[left].right = right;
        self.nodes[right].left = left;
    }

    fn relink_horizontal(&mut self, node: NodeId) {
        let Node { left, right, .. } = self.nodes[node];
        self.nodes[left].right = node;
        self.nodes[right].left = node;
    }

    fn insert_left_of(&mut self, anchor: NodeId, node: NodeId) {
        let previous = self.nodes[anchor].left;
        self.nodes[node].left = previous;
        self.nodes[node].right = anchor;
        self.nodes[previous].right = node;
        self.nodes[anchor].left = node;
    }

    fn insert_above(&mut self, anchor: NodeId, node: NodeId) {
        let previous = self.nodes[anchor].up;
        self.nodes[node].up = previous;
        self.nodes[node].down = anchor;
        self.nodes[previous].down = node;
        self.nodes[anchor].up = node;
    }
}
