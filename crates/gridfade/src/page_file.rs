use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use planesync::{ElementId, ImageSource, LayoutRect, StaticPage, ViewportSize};
use serde::Deserialize;

/// Snapshot of a page layout: the viewport, the image elements in document
/// order and the link list that drives them.
#[derive(Debug, Clone, Deserialize)]
pub struct PageDescription {
    pub viewport: ViewportSpec,
    #[serde(default)]
    pub scroll_y: f32,
    pub images: Vec<ImageSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportSpec {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RectSpec {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSpec {
    pub src: String,
    /// Missing when the element is not laid out yet.
    #[serde(default)]
    pub rect: Option<RectSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkSpec {
    #[serde(default)]
    pub rect: Option<RectSpec>,
}

/// A page description turned into engine inputs.
pub struct LoadedPage {
    pub page: StaticPage,
    pub images: Vec<ImageSource>,
    pub links: Vec<ElementId>,
}

impl From<RectSpec> for LayoutRect {
    fn from(rect: RectSpec) -> Self {
        LayoutRect::new(rect.top, rect.left, rect.width, rect.height)
    }
}

impl PageDescription {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read page description {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("failed to parse page description {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let description: Self = serde_json::from_str(raw)?;
        if description.images.is_empty() {
            anyhow::bail!("page description lists no images");
        }
        Ok(description)
    }

    pub fn viewport(&self) -> ViewportSize {
        ViewportSize::new(self.viewport.width, self.viewport.height)
    }

    pub fn into_page(self) -> LoadedPage {
        let mut page = StaticPage::new(self.viewport());
        page.set_scroll_y(self.scroll_y);

        let images = self
            .images
            .into_iter()
            .map(|image| ImageSource {
                element: page.add_element(image.rect.map(LayoutRect::from)),
                src: image.src,
            })
            .collect();
        let links = self
            .links
            .into_iter()
            .map(|link| page.add_element(link.rect.map(LayoutRect::from)))
            .collect();

        LoadedPage {
            page,
            images,
            links,
        }
    }
}
