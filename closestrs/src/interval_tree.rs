use std::cmp::max;

use num_traits::{PrimInt, Signed};

use super::ClosestFinder;
use closestrs_core::errors::IntervalResult;
use closestrs_core::models::interval::check_bounds;
use closestrs_core::models::Interval;

/// A static augmented interval tree for closest-interval queries.
///
/// Intervals are sorted by `(start, end)` and laid out in an arena: node `i` holds
/// `intervals[i]`, and its children are the medians of the sorted ranges on either side of
/// it, so the tree is balanced by construction. Each node also records the largest `end`
/// found anywhere in its subtree, which lets overlap searches skip whole subtrees that end
/// before the query begins.
///
/// Flanking lookups use the sorted order directly: the nearest downstream intervals are found
/// by binary search on start, and the nearest upstream ones by binary search on a secondary
/// index sorted by end.
///
/// # Examples
///
/// ```
/// use closestrs::{ClosestFinder, IntervalTree, Interval};
///
/// let peaks = vec![
///     Interval { start: 100i64, end: 200, id: 0usize },
///     Interval { start: 150, end: 200, id: 1 },
///     Interval { start: 550, end: 580, id: 2 },
/// ];
///
/// let tree = IntervalTree::build(peaks).unwrap();
///
/// // overlap wins over distance
/// let hits = tree.find_closest(500, 600).unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].id, 2);
///
/// // nothing overlaps 300-400: both peaks ending at 200 tie upstream, 550-580 is downstream
/// let hits = tree.find_closest(300, 400).unwrap();
/// let ids: Vec<usize> = hits.iter().map(|iv| iv.id).collect();
/// assert_eq!(ids, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct IntervalTree<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Intervals sorted by (start, end)
    intervals: Vec<Interval<I, T>>,
    /// One node per interval, same positions as `intervals`
    nodes: Vec<Node<I>>,
    root: Option<usize>,
    /// Positions into `intervals`, sorted by (end, start)
    by_end: Vec<usize>,
}

#[derive(Debug, Clone)]
struct Node<I> {
    left: Option<usize>,
    right: Option<usize>,
    /// Maximum end coordinate in this subtree.
    max_end: I,
}

impl<I, T> ClosestFinder<I, T> for IntervalTree<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(mut intervals: Vec<Interval<I, T>>) -> IntervalResult<Self>
    where
        Self: Sized,
    {
        for interval in intervals.iter() {
            interval.validate()?;
        }

        // stable, so duplicates stay in input order
        intervals.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

        let mut nodes: Vec<Node<I>> = intervals
            .iter()
            .map(|iv| Node {
                left: None,
                right: None,
                max_end: iv.end,
            })
            .collect();
        let root = link(&mut nodes, 0, intervals.len());

        let mut by_end: Vec<usize> = (0..intervals.len()).collect();
        by_end.sort_by_key(|&pos| (intervals[pos].end, intervals[pos].start));

        Ok(IntervalTree {
            intervals,
            nodes,
            root,
            by_end,
        })
    }

    fn find_closest(&self, start: I, end: I) -> IntervalResult<Vec<&Interval<I, T>>> {
        check_bounds(start, end)?;

        let mut closest = Vec::new();
        self.collect_overlaps(self.root, start, end, &mut closest);
        if !closest.is_empty() {
            return Ok(closest);
        }

        closest.extend(self.nearest_upstream(start, end));
        closest.extend(self.nearest_downstream(end));

        Ok(closest)
    }

    #[inline]
    fn len(&self) -> usize {
        self.intervals.len()
    }
}

impl<I, T> IntervalTree<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Find all intervals sharing a positive-length range with `start .. end`.
    pub fn find_overlaps(&self, start: I, end: I) -> IntervalResult<Vec<&Interval<I, T>>> {
        check_bounds(start, end)?;
        let mut overlaps = Vec::new();
        self.collect_overlaps(self.root, start, end, &mut overlaps);
        Ok(overlaps)
    }

    /// Walk the subtree at `node` in order, collecting intervals that overlap `start .. end`.
    fn collect_overlaps<'a>(
        &'a self,
        node: Option<usize>,
        start: I,
        end: I,
        overlaps: &mut Vec<&'a Interval<I, T>>,
    ) {
        let Some(pos) = node else {
            return;
        };
        let n = &self.nodes[pos];

        // nothing below here reaches past the query start
        if n.max_end <= start {
            return;
        }

        self.collect_overlaps(n.left, start, end, overlaps);

        let interval = &self.intervals[pos];
        // this node and everything to its right start at or after the query end
        if interval.start >= end {
            return;
        }
        if interval.overlap(start, end) {
            overlaps.push(interval);
        }

        self.collect_overlaps(n.right, start, end, overlaps);
    }

    /// The intervals with the largest `end <= start`.
    fn nearest_upstream(&self, start: I, end: I) -> Vec<&Interval<I, T>> {
        let upper = self
            .by_end
            .partition_point(|&pos| self.intervals[pos].end <= start);

        let mut best: Option<I> = None;
        let mut ties = Vec::new();
        for &pos in self.by_end[..upper].iter().rev() {
            let interval = &self.intervals[pos];
            // a zero-width interval on a zero-width query counts as downstream
            if interval.start >= end {
                continue;
            }
            match best {
                None => best = Some(interval.end),
                Some(best_end) if interval.end < best_end => break,
                Some(_) => {}
            }
            ties.push(interval);
        }
        ties.reverse();
        ties
    }

    /// The intervals with the smallest `start >= end`.
    fn nearest_downstream(&self, end: I) -> Vec<&Interval<I, T>> {
        let lower = self.intervals.partition_point(|iv| iv.start < end);
        match self.intervals.get(lower) {
            Some(first) => self.intervals[lower..]
                .iter()
                .take_while(|iv| iv.start == first.start)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Link the sorted range `lo .. hi` into a balanced subtree rooted at its median, filling in
/// child pointers and subtree max ends. Returns the root position.
fn link<I: PrimInt>(nodes: &mut [Node<I>], lo: usize, hi: usize) -> Option<usize> {
    if lo >= hi {
        return None;
    }
    let mid = lo + (hi - lo) / 2;
    let left = link(nodes, lo, mid);
    let right = link(nodes, mid + 1, hi);

    let mut max_end = nodes[mid].max_end;
    if let Some(l) = left {
        max_end = max(max_end, nodes[l].max_end);
    }
    if let Some(r) = right {
        max_end = max(max_end, nodes[r].max_end);
    }

    let node = &mut nodes[mid];
    node.left = left;
    node.right = right;
    node.max_end = max_end;
    Some(mid)
}
