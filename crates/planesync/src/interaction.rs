use crate::error::EngineError;
use crate::types::ElementId;

/// Pointer input on the link list, by link position in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Hover { link: usize },
    Click { link: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Transition(usize),
    TransitionAndScroll(usize),
}

/// How the host should react to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub trigger: Trigger,
    /// The host must suppress the link's default navigation.
    pub prevent_default: bool,
}

/// Maps the link list onto image indices. Link `i` drives image `i`.
#[derive(Debug, Clone, Default)]
pub struct InteractionMapper {
    links: Vec<ElementId>,
}

impl InteractionMapper {
    pub fn new(links: &[ElementId], image_count: usize) -> Self {
        if links.len() != image_count {
            tracing::warn!(
                links = links.len(),
                images = image_count,
                "link and image counts differ; binding the common prefix"
            );
        }
        let bound = links.len().min(image_count);
        Self {
            links: links[..bound].to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Position of a bound link element, for hosts that dispatch by element.
    pub fn link_index(&self, element: ElementId) -> Option<usize> {
        self.links.iter().position(|link| *link == element)
    }

    pub fn map(&self, event: PointerEvent) -> Result<Interaction, EngineError> {
        let link = match event {
            PointerEvent::Hover { link } | PointerEvent::Click { link } => link,
        };
        if link >= self.links.len() {
            return Err(EngineError::IndexOutOfRange {
                index: link,
                len: self.links.len(),
            });
        }
        Ok(match event {
            PointerEvent::Hover { .. } => Interaction {
                trigger: Trigger::Transition(link),
                prevent_default: false,
            },
            PointerEvent::Click { .. } => Interaction {
                trigger: Trigger::TransitionAndScroll(link),
                prevent_default: true,
            },
        })
    }
}
