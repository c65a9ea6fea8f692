use crate::types::{ElementId, LayoutRect, ViewportSize};

/// The page the planes are overlaid on.
///
/// Implementations answer layout queries from the live document and perform
/// smooth scrolling. Every call happens on the same event loop as the engine.
pub trait Page {
    fn viewport(&self) -> ViewportSize;
    /// Current bounding box of `element` in viewport pixels, or `None` when
    /// the element is gone or not laid out.
    fn element_rect(&self, element: ElementId) -> Option<LayoutRect>;
    /// Vertical document scroll offset in pixels.
    fn scroll_y(&self) -> f32;
    /// Starts a smooth scroll toward the vertical document offset `top`.
    fn smooth_scroll_to(&mut self, top: f32);
}

/// In-memory page with fixed layout, for headless runs and tests.
///
/// Scroll requests are recorded rather than applied, so element rects do not
/// move when a scroll is requested.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    viewport: ViewportSize,
    scroll_y: f32,
    rects: Vec<Option<LayoutRect>>,
    scroll_requests: Vec<f32>,
}

impl StaticPage {
    pub fn new(viewport: ViewportSize) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn add_element(&mut self, rect: Option<LayoutRect>) -> ElementId {
        self.rects.push(rect);
        ElementId(self.rects.len() - 1)
    }

    pub fn set_rect(&mut self, element: ElementId, rect: Option<LayoutRect>) {
        if let Some(slot) = self.rects.get_mut(element.0) {
            *slot = rect;
        }
    }

    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    pub fn set_scroll_y(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
    }

    pub fn scroll_requests(&self) -> &[f32] {
        &self.scroll_requests
    }

    pub fn take_scroll_requests(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.scroll_requests)
    }
}

impl Page for StaticPage {
    fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    fn element_rect(&self, element: ElementId) -> Option<LayoutRect> {
        self.rects.get(element.0).copied().flatten()
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn smooth_scroll_to(&mut self, top: f32) {
        self.scroll_requests.push(top);
    }
}
