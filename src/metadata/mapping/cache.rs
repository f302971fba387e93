use std::sync::{Arc, Condvar, Mutex};

use dashmap::DashMap;

use crate::{metadata::mapping::Mapping, metadata::token::Token, Error, Result};

/// One entry of a [`MappingCache`]: a fallible once-cell.
///
/// `Vacant` means nobody has produced a result yet, `Computing` means a
/// thread is running the resolver right now, `Ready` is the published
/// result. A failed computation returns the slot to `Vacant` so the error
/// never poisons the cache; the next requester simply computes again (the
/// computation is deterministic, so it fails the same way).
struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

enum SlotState {
    Vacant,
    Computing,
    Ready(Mapping),
}

impl Slot {
    fn new() -> Self {
        Slot {
            state: Mutex::new(SlotState::Vacant),
            ready: Condvar::new(),
        }
    }
}

/// A per-kind memoization cache, keyed by source-model handle.
///
/// The contract is atomic compute-and-publish: for a given handle the
/// resolver runs at most once, concurrent requesters of the same handle
/// wait for the single in-flight computation, and no thread ever observes a
/// partially-built result. The resolver itself runs outside every lock the
/// cache holds, so it may freely recurse into other caches - or into this
/// one for a *different* handle - from the computing thread.
///
/// A resolution that transitively requires itself (a genuine handle cycle)
/// waits on its own slot and does not terminate; cycles are a documented,
/// unguarded risk of the matching heuristic, not detected here.
pub(crate) struct MappingCache {
    slots: DashMap<Token, Arc<Slot>>,
}

impl MappingCache {
    pub(crate) fn new() -> Self {
        MappingCache {
            slots: DashMap::new(),
        }
    }

    /// Returns the published result for `token`, or runs `compute` to
    /// produce and publish it.
    ///
    /// # Errors
    /// Propagates the resolver's error; the slot is left vacant and every
    /// other entry is untouched.
    pub(crate) fn get_or_try_insert_with<F>(&self, token: Token, compute: F) -> Result<Mapping>
    where
        F: FnOnce() -> Result<Mapping>,
    {
        // The shard guard is dropped before any waiting or computing, so a
        // reentrant request for another handle never contends on it.
        let slot = Arc::clone(
            self.slots
                .entry(token)
                .or_insert_with(|| Arc::new(Slot::new()))
                .value(),
        );

        {
            let mut state = slot.state.lock().map_err(|_| Error::LockError)?;
            loop {
                match &*state {
                    SlotState::Ready(mapping) => return Ok(mapping.clone()),
                    SlotState::Computing => {
                        state = slot.ready.wait(state).map_err(|_| Error::LockError)?;
                    }
                    SlotState::Vacant => {
                        *state = SlotState::Computing;
                        break;
                    }
                }
            }
        }

        match compute() {
            Ok(mapping) => {
                let mut state = slot.state.lock().map_err(|_| Error::LockError)?;
                *state = SlotState::Ready(mapping.clone());
                slot.ready.notify_all();
                Ok(mapping)
            }
            Err(error) => {
                let mut state = slot.state.lock().map_err(|_| Error::LockError)?;
                *state = SlotState::Vacant;
                slot.ready.notify_all();
                Err(error)
            }
        }
    }

    /// Number of slots that currently hold a published result
    #[cfg(test)]
    pub(crate) fn resolved_len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| {
                matches!(
                    entry.value().state.lock().as_deref(),
                    Ok(SlotState::Ready(_))
                )
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    use crate::metadata::token::HandleKind;

    fn token(row: u32) -> Token {
        Token::from_parts(HandleKind::TypeDef, row)
    }

    #[test]
    fn test_computes_once_and_memoizes() {
        let cache = MappingCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let mapping = cache
                .get_or_try_insert_with(token(1), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Mapping::unique(token(9)))
                })
                .unwrap();
            assert_eq!(mapping, Mapping::unique(token(9)));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_leaves_slot_vacant() {
        let cache = MappingCache::new();

        let result = cache.get_or_try_insert_with(token(1), || {
            Err(Error::Error("resolver failed".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(cache.resolved_len(), 0);

        // the next requester computes again and can succeed
        let mapping = cache
            .get_or_try_insert_with(token(1), || Ok(Mapping::Unmapped))
            .unwrap();
        assert_eq!(mapping, Mapping::Unmapped);
        assert_eq!(cache.resolved_len(), 1);
    }

    #[test]
    fn test_error_does_not_disturb_other_entries() {
        let cache = MappingCache::new();
        cache
            .get_or_try_insert_with(token(1), || Ok(Mapping::unique(token(5))))
            .unwrap();

        let _ = cache.get_or_try_insert_with(token(2), || {
            Err(Error::Error("resolver failed".to_string()))
        });

        let mapping = cache
            .get_or_try_insert_with(token(1), || unreachable!("must be cached"))
            .unwrap();
        assert_eq!(mapping, Mapping::unique(token(5)));
    }

    #[test]
    fn test_reentrant_compute_for_a_different_handle() {
        let cache = MappingCache::new();

        // resolving handle 1 recursively resolves handle 2 through the same
        // cache, the way nested-type resolution does
        let mapping = cache
            .get_or_try_insert_with(token(1), || {
                let inner = cache.get_or_try_insert_with(token(2), || Ok(Mapping::Unmapped))?;
                assert_eq!(inner, Mapping::Unmapped);
                Ok(Mapping::unique(token(7)))
            })
            .unwrap();

        assert_eq!(mapping, Mapping::unique(token(7)));
        assert_eq!(cache.resolved_len(), 2);
    }

    #[test]
    fn test_concurrent_requests_run_resolver_once() {
        let cache = Arc::new(MappingCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_try_insert_with(token(1), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            // widen the race window
                            thread::sleep(std::time::Duration::from_millis(10));
                            Ok(Mapping::unique(token(3)))
                        })
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Mapping::unique(token(3)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
