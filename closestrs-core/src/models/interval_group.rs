use fxhash::FxHashMap;
use num_traits::{PrimInt, Signed};

use crate::errors::IntervalResult;
use crate::models::Interval;

///
/// A named partition of intervals, typically everything on one chromosome.
/// Interval order is the order the producer handed them over.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalGroup<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub key: String,
    pub intervals: Vec<Interval<I, T>>,
}

impl<I, T> IntervalGroup<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub fn new(key: impl Into<String>, intervals: Vec<Interval<I, T>>) -> Self {
        IntervalGroup {
            key: key.into(),
            intervals,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval<I, T>> {
        self.intervals.iter()
    }

    /// Check every interval in the group, failing on the first with `start > end`.
    pub fn validate(&self) -> IntervalResult<()> {
        self.intervals.iter().try_for_each(|iv| iv.validate())
    }

    ///
    /// Partition raw `(key, start, end, id)` records into groups.
    ///
    /// Groups come out in the order their key was first seen, and intervals keep
    /// their relative input order inside each group. Coordinates are not checked here;
    /// that happens when an index is built over a group.
    ///
    pub fn group_by_key<K, R>(records: R) -> Vec<IntervalGroup<I, T>>
    where
        K: Into<String> + AsRef<str>,
        R: IntoIterator<Item = (K, I, I, T)>,
    {
        let mut groups: Vec<IntervalGroup<I, T>> = Vec::new();
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();

        for (key, start, end, id) in records {
            let interval = Interval { start, end, id };
            match positions.get(key.as_ref()) {
                Some(&pos) => groups[pos].intervals.push(interval),
                None => {
                    let key: String = key.into();
                    positions.insert(key.clone(), groups.len());
                    groups.push(IntervalGroup::new(key, vec![interval]));
                }
            }
        }

        groups
    }
}

impl<'a, I, T> IntoIterator for &'a IntervalGroup<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync + 'a,
{
    type Item = &'a Interval<I, T>;
    type IntoIter = std::slice::Iter<'a, Interval<I, T>>;

    fn into_iter(self) -> std::slice::Iter<'a, Interval<I, T>> {
        self.intervals.iter()
    }
}
