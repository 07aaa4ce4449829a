//! Full-screen image preview with zoom and drag-to-pan.

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom change per wheel notch
pub const WHEEL_STEP: f64 = 0.1;
/// Zoom change per +/- button press
pub const BUTTON_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePreview {
    url: String,
    zoom: f64,
    pan: Point,
    /// Pointer position minus pan offset at the start of the drag
    drag_anchor: Option<Point>,
}

impl ImagePreview {
    pub fn open(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            zoom: 1.0,
            pan: Point::default(),
            drag_anchor: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Scrolling down zooms out, scrolling up zooms in.
    pub fn wheel(&mut self, delta_y: f64) {
        let step = if delta_y > 0.0 { -WHEEL_STEP } else { WHEEL_STEP };
        self.set_zoom(self.zoom + step);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + BUTTON_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - BUTTON_STEP);
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::default();
        self.drag_anchor = None;
    }

    fn set_zoom(&mut self, zoom: f64) {
        // Round away float drift from repeated 0.1 steps
        self.zoom = ((zoom * 100.0).round() / 100.0).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Dragging only arms when the image is zoomed past its natural size.
    pub fn press(&mut self, pointer: Point) {
        if self.zoom > 1.0 {
            self.drag_anchor = Some(Point::new(pointer.x - self.pan.x, pointer.y - self.pan.y));
        }
    }

    pub fn drag(&mut self, pointer: Point) {
        if let Some(anchor) = self.drag_anchor {
            self.pan = Point::new(pointer.x - anchor.x, pointer.y - anchor.y);
        }
    }

    /// Pointer released or left the image.
    pub fn release(&mut self) {
        self.drag_anchor = None;
    }
}
