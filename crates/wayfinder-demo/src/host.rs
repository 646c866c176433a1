//! Headless stand-ins for the router and the callout renderer. Both append
//! to a shared [`Transcript`].

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wayfinder::{
    NavigationStatus, OverlayContent, OverlayHandle, OverlayRenderer, PlacementResult,
    RouteNavigator, Side, Size, StepInfo,
};

/// One observable effect of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Action { action: String },
    Navigate { route: String },
    Mount {
        handle: u64,
        step: String,
        title: String,
        progress: String,
        side: Side,
        top: f64,
        left: f64,
        width: f64,
        height: f64,
    },
    Reposition { handle: u64, top: f64, left: f64 },
    Unmount { handle: u64 },
    Step(StepInfo),
    Rejected { action: String, reason: String },
    ScrollToOrigin,
}

pub type Transcript = Rc<RefCell<Vec<Entry>>>;

pub struct DemoNavigator {
    transcript: Transcript,
    status: NavigationStatus,
}

impl DemoNavigator {
    pub fn new(transcript: Transcript, status: NavigationStatus) -> Self {
        Self { transcript, status }
    }
}

impl RouteNavigator for DemoNavigator {
    fn navigate(&mut self, route: &str) -> NavigationStatus {
        self.transcript.borrow_mut().push(Entry::Navigate {
            route: route.to_string(),
        });
        self.status
    }

    fn scroll_to_origin(&mut self) {
        self.transcript.borrow_mut().push(Entry::ScrollToOrigin);
    }
}

/// Sizes a callout like a fixed-pitch text box: 7px per character, wrapped
/// at 40 columns.
pub struct TextRenderer {
    transcript: Transcript,
    next_handle: u64,
}

const CHAR_WIDTH: f64 = 7.0;
const LINE_HEIGHT: f64 = 18.0;
const WRAP: usize = 40;
const PADDING: f64 = 16.0;

impl TextRenderer {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript,
            next_handle: 0,
        }
    }

    fn text_lines(text: &str) -> usize {
        let chars = text.chars().count();
        chars.div_ceil(WRAP)
    }
}

impl OverlayRenderer for TextRenderer {
    fn measure(&mut self, content: &OverlayContent<'_>) -> Size {
        let columns = content
            .title
            .chars()
            .count()
            .max(content.text.chars().count().min(WRAP))
            .max(12);
        // title + body + controls row
        let rows = 1 + Self::text_lines(content.text) + 1;
        Size::new(
            columns as f64 * CHAR_WIDTH + 2.0 * PADDING,
            rows as f64 * LINE_HEIGHT + 2.0 * PADDING,
        )
    }

    fn mount(&mut self, content: &OverlayContent<'_>, placement: &PlacementResult) -> OverlayHandle {
        self.next_handle += 1;
        self.transcript.borrow_mut().push(Entry::Mount {
            handle: self.next_handle,
            step: content.name.to_string(),
            title: content.title.to_string(),
            progress: format!("{}/{}", content.number, content.count),
            side: placement.side,
            top: placement.top,
            left: placement.left,
            width: placement.width,
            height: placement.height,
        });
        OverlayHandle(self.next_handle)
    }

    fn reposition(&mut self, handle: OverlayHandle, placement: &PlacementResult) {
        self.transcript.borrow_mut().push(Entry::Reposition {
            handle: handle.0,
            top: placement.top,
            left: placement.left,
        });
    }

    fn unmount(&mut self, handle: OverlayHandle) {
        self.transcript
            .borrow_mut()
            .push(Entry::Unmount { handle: handle.0 });
    }
}

impl Entry {
    /// One line of human-readable output.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Action { action } => format!("> {action}"),
            Self::Navigate { route } => format!("  navigate {route}"),
            Self::Mount {
                handle,
                step,
                title,
                progress,
                side,
                top,
                left,
                width,
                height,
            } => format!(
                "  mount #{handle} {step} [{progress}] \"{title}\" {side} at ({left:.1}, {top:.1}) size {width:.0}x{height:.0}"
            ),
            Self::Reposition { handle, top, left } => {
                format!("  move #{handle} to ({left:.1}, {top:.1})")
            }
            Self::Unmount { handle } => format!("  unmount #{handle}"),
            Self::Step(info) => format!(
                "  step {} {} ({}) via {}",
                info.number, info.name, info.route, info.action_type
            ),
            Self::Rejected { action, reason } => format!("  {action} rejected: {reason}"),
            Self::ScrollToOrigin => "  scroll to origin".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content<'a>(title: &'a str, text: &'a str) -> OverlayContent<'a> {
        OverlayContent {
            name: "s",
            title,
            text,
            number: 1,
            count: 1,
            show_prev: false,
            is_last: true,
        }
    }

    #[test]
    fn measure_grows_with_text() {
        let transcript = Transcript::default();
        let mut renderer = TextRenderer::new(transcript);
        let short = renderer.measure(&content("Hi", ""));
        assert_eq!(short.width, 12.0 * CHAR_WIDTH + 2.0 * PADDING);
        assert_eq!(short.height, 2.0 * LINE_HEIGHT + 2.0 * PADDING);

        let long = renderer.measure(&content("Hi", &"x".repeat(81)));
        assert_eq!(long.width, 40.0 * CHAR_WIDTH + 2.0 * PADDING);
        assert_eq!(long.height, 5.0 * LINE_HEIGHT + 2.0 * PADDING);
    }

    #[test]
    fn navigator_records_routes() {
        let transcript = Transcript::default();
        let mut nav = DemoNavigator::new(Rc::clone(&transcript), NavigationStatus::Settled);
        assert_eq!(nav.navigate("/x"), NavigationStatus::Settled);
        nav.scroll_to_origin();
        assert_eq!(
            *transcript.borrow(),
            vec![
                Entry::Navigate { route: "/x".into() },
                Entry::ScrollToOrigin
            ]
        );
    }
}
