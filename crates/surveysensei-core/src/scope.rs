//! Generation tokens that let late async results detect they are stale.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Owner side: lives as long as a view and advances on every new load.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    generation: Arc<AtomicU64>,
}

/// Captured at the start of an async call; checked before applying its result.
#[derive(Debug, Clone)]
pub struct ViewToken {
    generation: u64,
    scope: Arc<AtomicU64>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every outstanding token.
    pub fn begin(&self) -> ViewToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        ViewToken {
            generation,
            scope: self.generation.clone(),
        }
    }

    /// Token for the current generation, without superseding anything.
    pub fn current(&self) -> ViewToken {
        ViewToken {
            generation: self.generation.load(Ordering::SeqCst),
            scope: self.generation.clone(),
        }
    }

    /// The view went away; every outstanding token becomes stale.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl ViewToken {
    pub fn is_current(&self) -> bool {
        self.scope.load(Ordering::SeqCst) == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_supersedes_older_tokens() {
        let scope = ViewScope::new();
        let first = scope.begin();
        assert!(first.is_current());
        let second = scope.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn current_shares_generation() {
        let scope = ViewScope::new();
        let a = scope.begin();
        let b = scope.current();
        assert!(a.is_current() && b.is_current());
    }

    #[test]
    fn invalidate_stales_everything() {
        let scope = ViewScope::new();
        let token = scope.begin();
        scope.invalidate();
        assert!(!token.is_current());
    }
}
