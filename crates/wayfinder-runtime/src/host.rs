//! Seams to the host application.
//!
//! The controller never touches a document, a router or a widget tree
//! directly. It sees anchors through [`AnchorTarget`], routes through
//! [`RouteNavigator`] and callouts through [`OverlayRenderer`].

use std::cell::Cell;
use std::rc::Rc;

use wayfinder_core::{BoundingBox, Size};
use wayfinder_layout::PlacementResult;

/// An element a step's callout points at.
pub trait AnchorTarget {
    /// Current box in viewport coordinates. Read on every placement.
    fn bounding_box(&self) -> BoundingBox;

    /// Whether the anchor (or an ancestor) stays put while the page scrolls.
    fn is_fixed_positioned(&self) -> bool {
        false
    }
}

impl AnchorTarget for BoundingBox {
    fn bounding_box(&self) -> BoundingBox {
        *self
    }
}

/// A box the host moves around as layout changes.
impl AnchorTarget for Cell<BoundingBox> {
    fn bounding_box(&self) -> BoundingBox {
        self.get()
    }
}

impl<T: AnchorTarget + ?Sized> AnchorTarget for Rc<T> {
    fn bounding_box(&self) -> BoundingBox {
        (**self).bounding_box()
    }

    fn is_fixed_positioned(&self) -> bool {
        (**self).is_fixed_positioned()
    }
}

impl<T: AnchorTarget + ?Sized> AnchorTarget for Box<T> {
    fn bounding_box(&self) -> BoundingBox {
        (**self).bounding_box()
    }

    fn is_fixed_positioned(&self) -> bool {
        (**self).is_fixed_positioned()
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationStatus {
    /// The route is already active; the settle delay can start now.
    Settled,
    /// The host will call
    /// [`TourController::navigation_settled`](crate::TourController::navigation_settled)
    /// once the route has mounted.
    Pending,
}

pub trait RouteNavigator {
    fn navigate(&mut self, route: &str) -> NavigationStatus;

    /// Scroll the document back to its origin. Called when a tour closes.
    fn scroll_to_origin(&mut self) {}
}

/// Opaque id for a mounted callout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle(pub u64);

/// Everything a renderer needs to draw one callout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayContent<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub text: &'a str,
    pub number: usize,
    pub count: usize,
    /// Show a "previous" control.
    pub show_prev: bool,
    /// This is the final sequence position.
    pub is_last: bool,
}

pub trait OverlayRenderer {
    /// Size the callout will occupy once mounted.
    fn measure(&mut self, content: &OverlayContent<'_>) -> Size;

    fn mount(&mut self, content: &OverlayContent<'_>, placement: &PlacementResult) -> OverlayHandle;

    fn reposition(&mut self, handle: OverlayHandle, placement: &PlacementResult);

    fn unmount(&mut self, handle: OverlayHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_cell_anchor_tracks_updates() {
        let anchor = Rc::new(Cell::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0)));
        let seen: Box<dyn AnchorTarget> = Box::new(Rc::clone(&anchor));
        anchor.set(BoundingBox::new(5.0, 6.0, 10.0, 10.0));
        assert_eq!(seen.bounding_box().left, 5.0);
        assert_eq!(seen.bounding_box().top, 6.0);
        assert!(!seen.is_fixed_positioned());
    }

    struct Pinned;

    impl AnchorTarget for Pinned {
        fn bounding_box(&self) -> BoundingBox {
            BoundingBox::new(0.0, 0.0, 100.0, 40.0)
        }

        fn is_fixed_positioned(&self) -> bool {
            true
        }
    }

    #[test]
    fn fixed_flag_passes_through_wrappers() {
        let anchor = Rc::new(Pinned);
        assert!(anchor.is_fixed_positioned());
        let boxed: Box<dyn AnchorTarget> = Box::new(anchor);
        assert!(boxed.is_fixed_positioned());
    }
}
