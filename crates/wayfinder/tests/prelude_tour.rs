//! A host wired up through the prelude alone.

use wayfinder::prelude::*;
use web_time::Duration;

struct Router;

impl RouteNavigator for Router {
    fn navigate(&mut self, _route: &str) -> NavigationStatus {
        NavigationStatus::Settled
    }
}

#[derive(Default)]
struct Callouts {
    next: u64,
}

impl OverlayRenderer for Callouts {
    fn measure(&mut self, content: &OverlayContent<'_>) -> Size {
        Size::new(8.0 * content.title.len() as f64 + 40.0, 60.0)
    }

    fn mount(&mut self, _content: &OverlayContent<'_>, _placement: &PlacementResult) -> OverlayHandle {
        self.next += 1;
        OverlayHandle(self.next)
    }

    fn reposition(&mut self, _handle: OverlayHandle, _placement: &PlacementResult) {}

    fn unmount(&mut self, _handle: OverlayHandle) {}
}

#[test]
fn prelude_is_enough_to_run_a_tour() {
    let catalog = StaticCatalog::from_definitions([
        StepDefinition::new("welcome", "/", "Welcome").side(Side::Center),
        StepDefinition::new("search", "/", "Search").side(Side::Bottom),
    ]);
    let mut tour = TourController::new(
        catalog,
        Router,
        Callouts::default(),
        ViewportSnapshot::new(1024.0, 768.0, 768.0),
    );
    tour.register_target("welcome", BoundingBox::default(), StepHooks::new())
        .expect("known step");
    tour.register_target(
        "search",
        BoundingBox::new(300.0, 20.0, 400.0, 32.0),
        StepHooks::new(),
    )
    .expect("known step");

    let rx = tour
        .start(TourOptions::new(["welcome", "search"]))
        .expect("started");
    tour.advance_time(Duration::from_millis(1));
    let welcome = tour.current_placement().copied().expect("placed");
    assert_eq!(welcome.side, Side::Center);
    assert!(welcome.arrow.is_none());

    tour.next().expect("next");
    tour.advance_time(Duration::from_millis(1));
    let search = tour.current_placement().copied().expect("placed");
    assert_eq!(search.side, Side::Bottom);
    assert_eq!(search.top, 20.0 + 32.0 + 15.0);

    tour.close();
    let names: Vec<StepInfo> = rx.iter().collect();
    assert_eq!(names.len(), 2);
    assert_eq!(tour.state(), TourState::Closed);
}
