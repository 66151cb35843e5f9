//! Selected section, passed explicitly to each sheet.

use std::sync::{Arc, PoisonError, RwLock};

use granja_core::Section;

/// Shared handle to the section the user picked upstream.
///
/// Cloning shares the same slot: the navigation layer builds one per session
/// and hands a clone to every sheet it opens. Writes are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct SectionContext {
    inner: Arc<RwLock<Option<Section>>>,
}

impl SectionContext {
    pub fn new(initial: Option<Section>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    // Poisoning is ignored: the slot only ever holds a whole value.
    pub fn get(&self) -> Option<Section> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, section: Section) {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(section = %section, "section selected");
        *slot = Some(section);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(label: &str) -> Section {
        Section::new(label).unwrap()
    }

    #[test]
    fn clones_share_the_slot() {
        let ctx = SectionContext::default();
        let other = ctx.clone();
        assert_eq!(other.get(), None);

        ctx.set(section("SECCION 1"));
        assert_eq!(other.get(), Some(section("SECCION 1")));
    }

    #[test]
    fn last_write_wins() {
        let ctx = SectionContext::new(Some(section("SECCION 1")));
        ctx.set(section("SECCION 2"));
        assert_eq!(ctx.get(), Some(section("SECCION 2")));

        ctx.clear();
        assert_eq!(ctx.get(), None);
    }

    #[test]
    fn poisoned_slot_still_accepts_writes() {
        let ctx = SectionContext::new(Some(section("SECCION 1")));
        let other = ctx.clone();
        let _ = std::thread::spawn(move || {
            let _guard = other.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(ctx.inner.is_poisoned());

        assert_eq!(ctx.get(), Some(section("SECCION 1")));
        ctx.set(section("SECCION 3"));
        assert_eq!(ctx.get(), Some(section("SECCION 3")));
    }
}
