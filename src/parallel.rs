//! The `parallel_for` primitive consumed by the narrowphase orchestrator.
//!
//! `rayon::scope` already blocks the calling thread until every spawned
//! chunk has completed, so the "completion callback" is satisfied by simply
//! running `completion` after the scope returns; it is still accepted as an
//! explicit parameter to give callers a single place to hang post-region
//! bookkeeping (flushing dirty events, clearing buffers).
//!
//! Without the `parallel` feature, `parallel_for` degrades to a plain
//! sequential loop with the same signature, so callers don't need a
//! separate code path for the non-parallel build.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `work(i)` for every `i` in `start..end`, in chunks of `chunk_size`,
/// then calls `completion` once every index has been processed.
///
/// `work` must only touch data disjoint across `i` — this primitive
/// enforces nothing beyond `Sync`.
pub fn parallel_for<F, C>(start: usize, end: usize, chunk_size: usize, work: F, completion: C)
where
    F: Fn(usize) + Sync,
    C: FnOnce(),
{
    let chunk_size = chunk_size.max(1);

    #[cfg(feature = "parallel")]
    {
        let indices: Vec<usize> = (start..end).collect();
        indices.par_chunks(chunk_size).for_each(|chunk| {
            for &i in chunk {
                work(i);
            }
        });
    }

    #[cfg(not(feature = "parallel"))]
    {
        for i in start..end {
            work(i);
        }
    }

    completion();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn visits_every_index_exactly_once() {
        let hits = vec![AtomicUsize::new(0); 37];
        parallel_for(
            0,
            hits.len(),
            4,
            |i| {
                hits[i].fetch_add(1, Ordering::SeqCst);
            },
            || {},
        );
        assert!(hits.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn completion_runs_after_all_work() {
        let sum = std::sync::atomic::AtomicUsize::new(0);
        let mut completed_with = 0;
        parallel_for(
            0,
            10,
            3,
            |i| {
                sum.fetch_add(i, Ordering::SeqCst);
            },
            || {
                completed_with = sum.load(Ordering::SeqCst);
            },
        );
        assert_eq!(completed_with, (0..10).sum());
    }
}
