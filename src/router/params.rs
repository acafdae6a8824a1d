//! Path parameter storage and the reusable buffer pool.
//!
//! Lookups record parameter captures as byte spans into the request path and
//! decode them into pooled `String`s only once a route has matched. Buffers are
//! recycled through a bounded lock-free queue, so in steady state a lookup
//! reuses both the span vector and the value strings of an earlier request.

use crossbeam::queue::ArrayQueue;
use std::fmt;
use std::ops::{Index, Range};
use std::sync::Arc;
use tracing::trace;

use super::decode::decode_into;

/// Reusable per-lookup parameter storage.
#[derive(Debug, Default)]
pub(crate) struct ParamBuf {
    spans: Vec<Range<usize>>,
    values: Vec<String>,
    len: usize,
}

impl ParamBuf {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    pub(crate) fn spans_mut(&mut self) -> &mut Vec<Range<usize>> {
        &mut self.spans
    }

    /// Decode every recorded span of `path` into the value slots.
    pub(crate) fn fill(&mut self, path: &str) {
        let Self { spans, values, len } = self;
        for (i, span) in spans.iter().enumerate() {
            if i == values.len() {
                values.push(String::new());
            }
            decode_into(path.get(span.clone()).unwrap_or(""), &mut values[i]);
        }
        *len = spans.len();
    }

    pub(crate) fn values(&self) -> &[String] {
        &self.values[..self.len]
    }

    /// Drop all captured data while keeping the allocations.
    pub(crate) fn clear(&mut self) {
        self.spans.clear();
        for value in &mut self.values[..self.len] {
            value.clear();
        }
        self.len = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0 && self.spans.is_empty() && self.values.iter().all(String::is_empty)
    }
}

/// Bounded free list of [`ParamBuf`]s shared by all lookups on a router.
pub(crate) struct ParamPool {
    queue: ArrayQueue<ParamBuf>,
}

impl ParamPool {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
        }
    }

    /// Take a cleared buffer, allocating one sized to `max_params` if the pool is dry.
    pub(crate) fn acquire(&self, max_params: usize) -> ParamBuf {
        let buf = self
            .queue
            .pop()
            .unwrap_or_else(|| ParamBuf::with_capacity(max_params));
        debug_assert!(buf.is_empty(), "pooled parameter buffer was not cleared");
        buf
    }

    /// Clear `buf` and return it to the pool. Dropped if the pool is full.
    pub(crate) fn release(&self, mut buf: ParamBuf) {
        buf.clear();
        if self.queue.push(buf).is_err() {
            trace!(capacity = self.queue.capacity(), "Parameter pool full, dropping buffer");
        }
    }

    pub(crate) fn idle(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

impl fmt::Debug for ParamPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamPool")
            .field("idle", &self.idle())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Path parameters bound by a match.
///
/// Values are positionally aligned with the names declared in the matched
/// route; a trailing `*` is bound under the name `"*"`.
#[derive(Clone, Copy)]
pub struct Params<'m> {
    names: &'m [Arc<str>],
    values: &'m [String],
}

impl<'m> Params<'m> {
    pub(crate) fn new(names: &'m [Arc<str>], values: &'m [String]) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    pub(crate) fn empty() -> Self {
        Self {
            names: &[],
            values: &[],
        }
    }

    /// Get a parameter value by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'m str> {
        self.names
            .iter()
            .rposition(|n| n.as_ref() == name)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Iterate `(name, value)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&'m str, &'m str)> + 'm {
        let (names, values) = (self.names, self.values);
        names
            .iter()
            .zip(values)
            .map(|(n, v)| (n.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy the bindings out, e.g. into a per-request context that outlives the match.
    /// Note: This allocates
    #[must_use]
    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(n, v)| (n.to_owned(), v.to_owned()))
            .collect()
    }
}

impl Index<usize> for Params<'_> {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        &self.values[i]
    }
}

impl fmt::Debug for Params<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<Arc<str>> {
        list.iter().map(|n| Arc::from(*n)).collect()
    }

    #[test]
    fn test_fill_decodes_spans() {
        let path = "/users/42/files/a%20b";
        let mut buf = ParamBuf::with_capacity(2);
        buf.spans_mut().push(7..9);
        buf.spans_mut().push(16..21);
        buf.fill(path);
        assert_eq!(buf.values(), &["42".to_string(), "a b".to_string()]);
    }

    #[test]
    fn test_released_buffer_is_cleared() {
        let pool = ParamPool::new(4);
        let mut buf = pool.acquire(2);
        buf.spans_mut().push(1..3);
        buf.spans_mut().push(4..6);
        buf.fill("/ab/cd");
        pool.release(buf);
        assert_eq!(pool.idle(), 1);

        let reused = pool.acquire(2);
        assert!(reused.is_empty());
        assert!(reused.values().is_empty());
        // string capacity survives the round trip
        assert!(reused.values.iter().all(|v| v.capacity() >= 2));
    }

    #[test]
    fn test_refill_with_fewer_values_leaves_no_residue() {
        let pool = ParamPool::new(1);
        let mut buf = pool.acquire(2);
        buf.spans_mut().extend([1..4, 5..8]);
        buf.fill("/one/two");
        pool.release(buf);

        let mut buf = pool.acquire(2);
        buf.spans_mut().push(1..6);
        buf.fill("/three");
        assert_eq!(buf.values(), &["three".to_string()]);
        assert!(buf.values[1].is_empty());
    }

    #[test]
    fn test_full_pool_drops_buffers() {
        let pool = ParamPool::new(1);
        pool.release(ParamBuf::with_capacity(1));
        pool.release(ParamBuf::with_capacity(1));
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn test_params_lookup_by_name_and_position() {
        let names = names(&["id", "*"]);
        let values = vec!["7".to_string(), "a/b".to_string()];
        let params = Params::new(&names, &values);
        assert_eq!(params.get("id"), Some("7"));
        assert_eq!(params.get("*"), Some("a/b"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(&params[1], "a/b");
        assert_eq!(params.len(), 2);
        assert_eq!(
            params.to_vec(),
            vec![
                ("id".to_string(), "7".to_string()),
                ("*".to_string(), "a/b".to_string())
            ]
        );
        assert!(Params::empty().is_empty());
    }
}
