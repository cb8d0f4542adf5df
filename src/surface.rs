//! The visible surface shared by every overlay and notification.
//!
//! This is process-wide state bound to the single execution context (one
//! thread-local instance). It owns the attached overlays in attach order, the
//! background-scroll lock depth and the lazily created notification
//! container. [`reset`] tears everything down so tests start clean.

use std::cell::RefCell;
use std::rc::Rc;

use crate::notification::NotificationContainer;
use crate::overlay::{OverlayController, OverlayId};

#[derive(Default)]
struct Surface {
    overlays: Vec<OverlayController>,
    scroll_lock: usize,
    container: Option<Rc<NotificationContainer>>,
    container_creations: usize,
}

thread_local! {
    static SURFACE: RefCell<Surface> = RefCell::new(Surface::default());
}

/// Attach an overlay on top of the stack. Returns `false` if it is already attached.
pub fn attach_overlay(overlay: &OverlayController) -> bool {
    SURFACE.with(|surface| {
        let mut surface = surface.borrow_mut();
        if surface.overlays.iter().any(|o| o.id() == overlay.id()) {
            return false;
        }
        surface.overlays.push(overlay.clone());
        true
    })
}

/// Detach an overlay. Returns `false` if it was not attached.
pub fn detach_overlay(id: OverlayId) -> bool {
    // The removed handle is dropped after the borrow ends.
    let removed = SURFACE.with(|surface| {
        let mut surface = surface.borrow_mut();
        let index = surface.overlays.iter().position(|o| o.id() == id)?;
        Some(surface.overlays.remove(index))
    });
    removed.is_some()
}

/// Attached overlays, bottom first.
pub fn overlays() -> Vec<OverlayController> {
    SURFACE.with(|surface| surface.borrow().overlays.clone())
}

/// The overlay that receives keyboard and mouse input.
pub fn top_overlay() -> Option<OverlayController> {
    SURFACE.with(|surface| surface.borrow().overlays.last().cloned())
}

pub fn is_attached(id: OverlayId) -> bool {
    SURFACE.with(|surface| surface.borrow().overlays.iter().any(|o| o.id() == id))
}

/// Suppress background scrolling for one more holder.
pub fn lock_scroll() {
    SURFACE.with(|surface| surface.borrow_mut().scroll_lock += 1);
}

/// Release one holder of the scroll lock.
pub fn unlock_scroll() {
    SURFACE.with(|surface| {
        let mut surface = surface.borrow_mut();
        surface.scroll_lock = surface.scroll_lock.saturating_sub(1);
    });
}

/// Whether background scrolling is currently suppressed.
pub fn scroll_locked() -> bool {
    scroll_lock_depth() > 0
}

pub fn scroll_lock_depth() -> usize {
    SURFACE.with(|surface| surface.borrow().scroll_lock)
}

/// The notification container, created and attached on first use.
pub fn container() -> Rc<NotificationContainer> {
    SURFACE.with(|surface| {
        let mut surface = surface.borrow_mut();
        if let Some(container) = &surface.container {
            return container.clone();
        }
        let container = Rc::new(NotificationContainer::new());
        surface.container = Some(container.clone());
        surface.container_creations += 1;
        tracing::debug!("notification container attached");
        container
    })
}

/// The container if it has been created, without creating it.
pub fn existing_container() -> Option<Rc<NotificationContainer>> {
    SURFACE.with(|surface| surface.borrow().container.clone())
}

/// How many times the container has been created since the last [`reset`].
pub fn container_creations() -> usize {
    SURFACE.with(|surface| surface.borrow().container_creations)
}

/// Drop all overlays, the container and the scroll lock.
pub fn reset() {
    let old = SURFACE.with(|surface| std::mem::take(&mut *surface.borrow_mut()));
    drop(old);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_lock_counts() {
        reset();
        assert!(!scroll_locked());
        lock_scroll();
        lock_scroll();
        unlock_scroll();
        assert!(scroll_locked());
        unlock_scroll();
        assert!(!scroll_locked());
    }

    #[test]
    fn test_unlock_saturates() {
        reset();
        unlock_scroll();
        assert_eq!(scroll_lock_depth(), 0);
        lock_scroll();
        assert_eq!(scroll_lock_depth(), 1);
    }

    #[test]
    fn test_container_created_once() {
        reset();
        assert!(existing_container().is_none());
        let a = container();
        let b = container();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(container_creations(), 1);
    }

    #[test]
    fn test_reset_replaces_container() {
        reset();
        let before = container();
        reset();
        assert!(existing_container().is_none());
        let after = container();
        assert!(!Rc::ptr_eq(&before, &after));
        assert_eq!(container_creations(), 1);
    }
}
