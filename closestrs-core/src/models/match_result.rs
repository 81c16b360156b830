use num_traits::{PrimInt, Signed};

///
/// One (query interval, closest reference interval) pair.
///
/// `overlap` is the width of the shared range and is never negative. `distance` is 0 for
/// overlapping pairs, negative when the reference lies upstream of the query and positive
/// when it lies downstream. Abutting pairs, and a point inside the other interval, carry
/// `overlap == 0` and `distance == 0`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult<I, T> {
    pub query_id: T,
    pub ref_id: T,
    pub overlap: I,
    pub distance: I,
}

///
/// Columnar result of a closest join: four parallel vectors of equal length, one entry per
/// [`MatchResult`], in the order the join visited them.
///
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClosestOutput<I, T> {
    pub query_ids: Vec<T>,
    pub ref_ids: Vec<T>,
    pub overlaps: Vec<I>,
    pub distances: Vec<I>,
}

impl<I, T> Default for ClosestOutput<I, T> {
    fn default() -> Self {
        ClosestOutput {
            query_ids: Vec::new(),
            ref_ids: Vec::new(),
            overlaps: Vec::new(),
            distances: Vec::new(),
        }
    }
}

impl<I, T> ClosestOutput<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        ClosestOutput {
            query_ids: Vec::with_capacity(cap),
            ref_ids: Vec::with_capacity(cap),
            overlaps: Vec::with_capacity(cap),
            distances: Vec::with_capacity(cap),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.query_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.query_ids.is_empty()
    }

    #[inline]
    pub fn push(&mut self, m: MatchResult<I, T>) {
        self.query_ids.push(m.query_id);
        self.ref_ids.push(m.ref_id);
        self.overlaps.push(m.overlap);
        self.distances.push(m.distance);
    }

    /// Move every row of `other` onto the end of `self`, leaving `other` empty.
    pub fn append(&mut self, other: &mut ClosestOutput<I, T>) {
        self.query_ids.append(&mut other.query_ids);
        self.ref_ids.append(&mut other.ref_ids);
        self.overlaps.append(&mut other.overlaps);
        self.distances.append(&mut other.distances);
    }

    /// Get row `idx` as a [`MatchResult`].
    pub fn get(&self, idx: usize) -> Option<MatchResult<I, T>> {
        if idx >= self.len() {
            return None;
        }
        Some(MatchResult {
            query_id: self.query_ids[idx].clone(),
            ref_id: self.ref_ids[idx].clone(),
            overlap: self.overlaps[idx],
            distance: self.distances[idx],
        })
    }

    /// Iterate the rows as [`MatchResult`]s.
    pub fn iter(&self) -> impl Iterator<Item = MatchResult<I, T>> + '_ {
        (0..self.len()).filter_map(move |idx| self.get(idx))
    }

    /// Hand the four columns over to whoever assembles the output table.
    pub fn into_columns(self) -> (Vec<T>, Vec<T>, Vec<I>, Vec<I>) {
        (self.query_ids, self.ref_ids, self.overlaps, self.distances)
    }
}

impl<I, T> Extend<MatchResult<I, T>> for ClosestOutput<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn extend<R: IntoIterator<Item = MatchResult<I, T>>>(&mut self, iter: R) {
        for m in iter {
            self.push(m);
        }
    }
}

impl<I, T> FromIterator<MatchResult<I, T>> for ClosestOutput<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn from_iter<R: IntoIterator<Item = MatchResult<I, T>>>(iter: R) -> Self {
        let mut output = ClosestOutput::new();
        output.extend(iter);
        output
    }
}
