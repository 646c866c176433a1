//! Recording fakes shared by the runtime integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use wayfinder_core::{BoundingBox, Size, ViewportSnapshot};
use wayfinder_layout::PlacementResult;
use wayfinder_runtime::{
    NavigationStatus, OverlayContent, OverlayHandle, OverlayRenderer, RouteNavigator,
    StaticCatalog, StepDefinition, StepHooks, TourController,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Navigate(String),
    ScrollToOrigin,
    Mount {
        handle: u64,
        name: String,
        number: usize,
        show_prev: bool,
        placement: PlacementResult,
    },
    Reposition {
        handle: u64,
        placement: PlacementResult,
    },
    Unmount(u64),
}

#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    next_handle: u64,
}

impl Recorder {
    pub fn mounts(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Mount { .. }))
            .collect()
    }

    pub fn mounted_names(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Mount { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn routes(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Navigate(route) => Some(route.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn repositions(&self) -> Vec<PlacementResult> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Reposition { placement, .. } => Some(*placement),
                _ => None,
            })
            .collect()
    }

    pub fn count_unmounts(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Unmount(_)))
            .count()
    }
}

pub type Shared = Rc<RefCell<Recorder>>;

/// Navigator that either settles at once or leaves navigation pending.
pub struct RecordingNavigator {
    pub log: Shared,
    pub status: NavigationStatus,
}

impl RouteNavigator for RecordingNavigator {
    fn navigate(&mut self, route: &str) -> NavigationStatus {
        self.log
            .borrow_mut()
            .calls
            .push(Call::Navigate(route.to_string()));
        self.status
    }

    fn scroll_to_origin(&mut self) {
        self.log.borrow_mut().calls.push(Call::ScrollToOrigin);
    }
}

/// Renderer with a fixed callout size.
pub struct RecordingRenderer {
    pub log: Shared,
    pub size: Size,
}

impl OverlayRenderer for RecordingRenderer {
    fn measure(&mut self, _content: &OverlayContent<'_>) -> Size {
        self.size
    }

    fn mount(&mut self, content: &OverlayContent<'_>, placement: &PlacementResult) -> OverlayHandle {
        let mut log = self.log.borrow_mut();
        log.next_handle += 1;
        let handle = log.next_handle;
        log.calls.push(Call::Mount {
            handle,
            name: content.name.to_string(),
            number: content.number,
            show_prev: content.show_prev,
            placement: *placement,
        });
        OverlayHandle(handle)
    }

    fn reposition(&mut self, handle: OverlayHandle, placement: &PlacementResult) {
        self.log.borrow_mut().calls.push(Call::Reposition {
            handle: handle.0,
            placement: *placement,
        });
    }

    fn unmount(&mut self, handle: OverlayHandle) {
        self.log.borrow_mut().calls.push(Call::Unmount(handle.0));
    }
}

pub fn catalog(ids: &[&str]) -> StaticCatalog {
    ids.iter()
        .map(|id| StepDefinition::new(*id, format!("/{id}"), id.to_uppercase()))
        .collect()
}

pub fn anchor() -> BoundingBox {
    BoundingBox::new(200.0, 150.0, 120.0, 40.0)
}

pub fn viewport() -> ViewportSnapshot {
    ViewportSnapshot::new(1280.0, 720.0, 3000.0)
}

/// Controller over a catalog of `catalog_ids`, with anchors registered for
/// `registered`.
pub fn controller_with(
    catalog_ids: &[&str],
    registered: &[&str],
    status: NavigationStatus,
) -> (TourController, Shared) {
    let log: Shared = Rc::new(RefCell::new(Recorder::default()));
    let mut tour = TourController::new(
        catalog(catalog_ids),
        RecordingNavigator {
            log: Rc::clone(&log),
            status,
        },
        RecordingRenderer {
            log: Rc::clone(&log),
            size: Size::new(240.0, 90.0),
        },
        viewport(),
    );
    for name in registered {
        tour.register_target(name, anchor(), StepHooks::new())
            .expect("catalog knows every registered step");
    }
    (tour, log)
}
