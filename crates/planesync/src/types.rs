/// Opaque handle to an element owned by the page.
///
/// The engine never owns page elements; it only asks the [`Page`](crate::page::Page)
/// for their current layout through this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub usize);

/// Bounding box of an element in viewport pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// A rect can drive a mesh only when it has a finite, non-empty area.
    pub fn is_usable(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Size of the page viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(f32::EPSILON)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

/// Unscaled size of a plane mesh, fixed when the mesh is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneGeometry {
    pub width: f32,
    pub height: f32,
}

impl PlaneGeometry {
    /// Unit plane used when an element has no layout box at creation time.
    pub const UNIT: PlaneGeometry = PlaneGeometry {
        width: 1.0,
        height: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: PlaneGeometry,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: PlaneGeometry) -> Self {
        Self {
            geometry,
            transform: Transform::default(),
        }
    }
}

/// An image on the page together with where its pixels come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub element: ElementId,
    pub src: String,
}
