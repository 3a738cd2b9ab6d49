use crate::bipartite::{bipartition, Bipartition, Side};
use crate::csr::CsrStorage;
use crate::graph::Graph;
use crate::set::IntSet;
use crate::solution::{Label, MatchingSolution, UnsignedInt, Weight};
use anyhow::{anyhow as anyhow_error, ensure, Result};
use tracing::{debug, trace, warn};

// unreachable by the slack of any graph that fits in memory
const INFINITE_SLACK: Label = Label::MAX;

/// Solver for weighted bipartite matching.
///
/// Kuhn-Munkres (Hungarian) method: an alternating tree is grown from every free X vertex over
/// tight edges, labels are lowered on S and raised on T when the tree stalls, and the matching is
/// augmented once a free Y vertex is reached.
#[derive(Clone)]
pub struct KuhnMunkresSolver<I: UnsignedInt> {
    csr: CsrStorage<I>,
    // vertex id -> index within its side
    position: Vec<I>,

    row_labels: Vec<Label>,
    col_labels: Vec<Label>,
    row_mate: Vec<I>,
    col_mate: Vec<I>,

    // search state of the current root
    slack: Vec<Label>,
    // row giving the minimum slack of a column
    slack_from: Vec<I>,
    s_set: IntSet<I>,
    t_set: IntSet<I>,

    // reusable row buffers
    columns: Vec<I>,
    values: Vec<Weight>,

    max_relabels_per_root: usize,

    pub nits: u32,
    pub nrelabels: u32,
    pub naugmentations: u32,
}

impl<I: UnsignedInt> KuhnMunkresSolver<I> {
    pub fn new(
        row_capacity: usize,
        column_capacity: usize,
        arcs_capacity: usize,
    ) -> (Self, MatchingSolution<I>) {
        (
            Self {
                csr: CsrStorage::with_capacity(row_capacity, arcs_capacity),
                position: Vec::with_capacity(row_capacity + column_capacity),
                row_labels: Vec::with_capacity(row_capacity),
                col_labels: Vec::with_capacity(column_capacity),
                row_mate: Vec::with_capacity(row_capacity),
                col_mate: Vec::with_capacity(column_capacity),
                slack: Vec::with_capacity(column_capacity),
                slack_from: Vec::with_capacity(column_capacity),
                s_set: IntSet::with_capacity(row_capacity),
                t_set: IntSet::with_capacity(column_capacity),
                columns: Vec::new(),
                values: Vec::new(),

                max_relabels_per_root: 0,

                nits: 0,
                nrelabels: 0,
                naugmentations: 0,
            },
            MatchingSolution::<I>::new(row_capacity, column_capacity),
        )
    }

    #[inline]
    pub fn solve<G>(
        &mut self,
        graph: &G,
        solution: &mut MatchingSolution<I>,
        maximize: bool,
    ) -> Result<(), anyhow::Error>
    where
        G: Graph<I> + ?Sized,
    {
        self.solve_with_params(graph, solution, maximize, None)
    }

    /// Computes a matching of `graph` into `solution`.
    ///
    /// `maximize = false` minimizes the total weight instead. A root whose search needs more than
    /// `max_relabels_per_root` relabelings (default: number of Y vertices + 1) is left unmatched.
    ///
    /// Fails if the graph is malformed or not bipartite, `solution` is left empty then.
    pub fn solve_with_params<G>(
        &mut self,
        graph: &G,
        solution: &mut MatchingSolution<I>,
        maximize: bool,
        max_relabels_per_root: Option<usize>,
    ) -> Result<(), anyhow::Error>
    where
        G: Graph<I> + ?Sized,
    {
        solution.clear();
        validate_graph(graph)?;
        let part = bipartition(graph).ok_or_else(|| anyhow_error!("graph is not bipartite"))?;
        self.load(graph, &part)?;
        if !maximize {
            self.csr.negate_values();
        }
        self.init_solve();

        let num_cols: usize = self.csr.num_cols().as_();
        self.max_relabels_per_root = max_relabels_per_root.unwrap_or(num_cols + 1);

        for root in num_iter::range(I::zero(), self.csr.num_rows()) {
            self.nits += 1;
            if self.grow_tree(root) {
                self.naugmentations += 1;
                trace!("row_mate: {:?}", self.row_mate);
            } else {
                debug!("no augmenting path from row {}", root);
            }
        }
        trace!("row_labels: {:?}", self.row_labels);
        trace!("col_labels: {:?}", self.col_labels);

        self.fill_solution(part, solution, maximize);
        debug!(
            "matched {} of {} rows, weight {}, relabels {}",
            self.naugmentations,
            self.csr.num_rows(),
            solution.weight,
            self.nrelabels
        );
        Ok(())
    }

    /// Every arc satisfies l(x) + l(y) >= w(x, y) under the current labels.
    pub fn is_feasible(&self) -> bool {
        self.csr.is_feasible(&self.row_labels, &self.col_labels)
    }

    /// Every matched arc is tight under the current labels.
    pub fn cs_satisfied(&self) -> bool {
        self.csr
            .cs_satisfied(&self.row_mate, &self.row_labels, &self.col_labels)
    }

    fn load<G>(&mut self, graph: &G, part: &Bipartition<I>) -> Result<(), anyhow::Error>
    where
        G: Graph<I> + ?Sized,
    {
        let n: usize = graph.order().as_();
        self.position.clear();
        self.position.resize(n, I::max_value());
        for side in [part.left(), part.right()] {
            for (idx, v_ref) in side.iter().enumerate() {
                // side lengths are bounded by the graph order
                self.position[v_ref.as_()] = I::from_usize(idx).unwrap_or_else(I::max_value);
            }
        }

        let num_rows = I::from_usize(part.left().len())
            .ok_or_else(|| anyhow_error!("X side is longer then max value of type"))?;
        let num_cols = I::from_usize(part.right().len())
            .ok_or_else(|| anyhow_error!("Y side is longer then max value of type"))?;
        self.csr.init(num_rows, num_cols)?;

        for (i, x_ref) in num_iter::range(I::zero(), num_rows).zip(part.left().iter()) {
            self.columns.clear();
            self.values.clear();
            for (y, weight) in graph.neighbors(*x_ref) {
                ensure!(
                    part.side(y) == Side::Right,
                    "edge ({}, {}) joins vertices of one side",
                    x_ref,
                    y
                );
                self.columns.push(self.position[y.as_()]);
                self.values.push(weight);
            }
            self.csr.extend_from_values(i, &self.columns, &self.values)?;
        }
        self.csr.finish()?;
        self.csr.validate_input()
    }

    /// Feasible start: l(y) = 0, l(x) = max w(x, y) (0 without arcs), empty matching.
    fn init_solve(&mut self) {
        let num_rows: usize = self.csr.num_rows().as_();
        let num_cols: usize = self.csr.num_cols().as_();

        self.row_labels.clear();
        for i in num_iter::range(I::zero(), self.csr.num_rows()) {
            let label = self.csr.row(i).map(|(_, value)| value).max().unwrap_or(0);
            self.row_labels.push(label);
        }
        self.col_labels.clear();
        self.col_labels.resize(num_cols, 0);

        self.row_mate.clear();
        self.row_mate.resize(num_rows, I::max_value());
        self.col_mate.clear();
        self.col_mate.resize(num_cols, I::max_value());

        self.slack.clear();
        self.slack.resize(num_cols, INFINITE_SLACK);
        self.slack_from.clear();
        self.slack_from.resize(num_cols, I::max_value());

        self.nits = 0;
        self.nrelabels = 0;
        self.naugmentations = 0;
    }

    /// Searches an augmenting path from the free row `root` and applies it.
    ///
    /// Returns false if no column outside the tree can become tight.
    fn grow_tree(&mut self, root: I) -> bool {
        self.s_set.clear();
        self.t_set.clear();
        self.slack.iter_mut().for_each(|s_ref| *s_ref = INFINITE_SLACK);
        self.slack_from
            .iter_mut()
            .for_each(|i_ref| *i_ref = I::max_value());
        self.add_to_tree(root);

        let mut relabels = 0;
        loop {
            let j = match self.next_tight_column() {
                Some(j) => j,
                None => {
                    if relabels >= self.max_relabels_per_root {
                        warn!(
                            "row {} abandoned after {} relabelings",
                            root, self.max_relabels_per_root
                        );
                        return false;
                    }
                    match self.min_slack() {
                        Some(alpha) => {
                            self.relabel(alpha);
                            relabels += 1;
                            continue;
                        }
                        // every column reachable from S is already in T
                        None => return false,
                    }
                }
            };

            self.t_set.insert(j);
            let z = self.col_mate[j.as_()];
            if z == I::max_value() {
                self.augment(j);
                return true;
            }
            trace!("extend tree: column {} row {}", j, z);
            self.add_to_tree(z);
        }
    }

    fn add_to_tree(&mut self, i: I) {
        self.s_set.insert(i);
        let i_usize: usize = i.as_();
        let label = self.row_labels[i_usize];
        for (j, value) in self.csr.row(i) {
            if self.t_set.contains(j) {
                continue;
            }
            let j_usize: usize = j.as_();
            let slack = label + self.col_labels[j_usize] - value;
            debug_assert!(slack >= 0, "labels are not feasible");
            if slack < self.slack[j_usize] {
                self.slack[j_usize] = slack;
                self.slack_from[j_usize] = i;
            }
        }
    }

    /// Lowest column outside T joined to S by a tight arc
    #[inline]
    fn next_tight_column(&self) -> Option<I> {
        num_iter::range(I::zero(), self.csr.num_cols())
            .find(|j| !self.t_set.contains(*j) && self.slack[j.as_()] == 0)
    }

    fn min_slack(&self) -> Option<Label> {
        num_iter::range(I::zero(), self.csr.num_cols())
            .filter(|j| !self.t_set.contains(*j))
            .map(|j| self.slack[j.as_()])
            .filter(|s| *s != INFINITE_SLACK)
            .min()
    }

    fn relabel(&mut self, alpha: Label) {
        trace!("relabel by {}", alpha);
        for i in self.s_set.iter() {
            self.row_labels[i.as_()] -= alpha;
        }
        for j in self.t_set.iter() {
            self.col_labels[j.as_()] += alpha;
        }
        for j in num_iter::range(I::zero(), self.csr.num_cols()) {
            let j_usize: usize = j.as_();
            if !self.t_set.contains(j) && self.slack[j_usize] != INFINITE_SLACK {
                self.slack[j_usize] -= alpha;
            }
        }
        self.nrelabels += 1;
        debug_assert!(self.is_feasible());
    }

    /// Flips the alternating path ending in the free column `j`.
    fn augment(&mut self, mut j: I) {
        loop {
            let i = self.slack_from[j.as_()];
            let prev = self.row_mate[i.as_()];
            self.row_mate[i.as_()] = j;
            self.col_mate[j.as_()] = i;
            if prev == I::max_value() {
                break;
            }
            j = prev;
        }
    }

    fn fill_solution(
        &self,
        part: Bipartition<I>,
        solution: &mut MatchingSolution<I>,
        maximize: bool,
    ) {
        let (left, right) = part.into_sides();
        // labels of a minimization are reported for the original weights
        let sign = if maximize { 1 } else { -1 };

        solution.labels.clear();
        solution.labels.resize(self.position.len(), 0);
        for (x_ref, label_ref) in left.iter().zip(self.row_labels.iter()) {
            solution.labels[x_ref.as_()] = sign * *label_ref;
        }
        for (y_ref, label_ref) in right.iter().zip(self.col_labels.iter()) {
            solution.labels[y_ref.as_()] = sign * *label_ref;
        }

        solution.left_to_right.extend(self.row_mate.iter().map(|j_ref| {
            if *j_ref == I::max_value() {
                I::max_value()
            } else {
                right[j_ref.as_()]
            }
        }));
        solution.right_to_left.extend(self.col_mate.iter().map(|i_ref| {
            if *i_ref == I::max_value() {
                I::max_value()
            } else {
                left[i_ref.as_()]
            }
        }));

        let num_unmatched = self
            .row_mate
            .iter()
            .filter(|j_ref| **j_ref == I::max_value())
            .count();
        solution.num_unmatched = I::from_usize(num_unmatched).unwrap_or_else(I::max_value);
        solution.weight = sign * self.csr.get_objective(&self.row_mate);
        solution.left = left;
        solution.right = right;
    }
}

/// Rejects neighbor ids outside `0..order()` and self-loops.
fn validate_graph<I, G>(graph: &G) -> Result<(), anyhow::Error>
where
    I: UnsignedInt,
    G: Graph<I> + ?Sized,
{
    let n = graph.order();
    ensure!(n < I::max_value(), "graph order {} is too large", n);
    for u in num_iter::range(I::zero(), n) {
        for (v, _) in graph.neighbors(u) {
            ensure!(v < n, "edge ({}, {}) is out of range 0..{}", u, v, n);
            ensure!(v != u, "self-loop at vertex {}", u);
        }
    }
    Ok(())
}
