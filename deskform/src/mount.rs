use std::sync::{Arc, Weak};

/// Liveness of a form, observable from outside it.
///
/// Submit handlers usually start asynchronous work (a repository call) whose
/// result arrives after the handler returned. By then the form may have been
/// dropped; the token lets that work notice and discard its result.
#[derive(Debug, Clone)]
pub struct MountToken {
    alive: Weak<()>,
}

impl MountToken {
    pub(crate) fn new(anchor: &Arc<()>) -> Self {
        Self {
            alive: Arc::downgrade(anchor),
        }
    }

    /// Whether the form that issued this token still exists.
    pub fn is_mounted(&self) -> bool {
        self.alive.strong_count() > 0
    }

    /// Run `f` only while the form is mounted.
    pub fn run_if_mounted<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        if self.is_mounted() { Some(f()) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_anchor_lifetime() {
        let anchor = Arc::new(());
        let token = MountToken::new(&anchor);
        assert!(token.is_mounted());
        assert_eq!(token.run_if_mounted(|| 7), Some(7));

        drop(anchor);
        assert!(!token.is_mounted());
        assert_eq!(token.run_if_mounted(|| 7), None);
    }
}
