use crate::types::ElementId;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("element {element:?} has no usable layout box")]
    LayoutUnavailable { element: ElementId },
    #[error("failed to load texture #{index} from '{src}': {reason}")]
    TextureLoad {
        index: usize,
        src: String,
        reason: String,
    },
    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("scene must contain at least one image")]
    EmptyScene,
    #[error(transparent)]
    Tween(#[from] tween::TweenError),
}
