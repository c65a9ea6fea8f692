use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use planesync::{PointerEvent, ViewportSize};

/// One scripted host event. Every step is followed by at least one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Pointer(PointerEvent),
    Resize(ViewportSize),
    Wait(u32),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (kind, arg) = value
            .split_once(':')
            .ok_or_else(|| anyhow!("step `{value}` must look like `kind:value`"))?;
        let arg = arg.trim();
        match kind.trim().to_ascii_lowercase().as_str() {
            "hover" => Ok(Step::Pointer(PointerEvent::Hover {
                link: parse_index(arg)?,
            })),
            "click" => Ok(Step::Pointer(PointerEvent::Click {
                link: parse_index(arg)?,
            })),
            "resize" => parse_size(arg).map(Step::Resize),
            "wait" => arg
                .parse::<u32>()
                .map(Step::Wait)
                .with_context(|| format!("invalid frame count `{arg}`")),
            other => bail!("unknown step kind `{other}` (expected hover, click, resize or wait)"),
        }
    }
}

pub fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(|step| step.parse().with_context(|| format!("invalid script step `{step}`")))
        .collect()
}

fn parse_index(value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("invalid link index `{value}`"))
}

fn parse_size(value: &str) -> Result<ViewportSize> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("size `{value}` must look like WIDTHxHEIGHT"))?;
    let width: f32 = width
        .trim()
        .parse()
        .with_context(|| format!("invalid width in `{value}`"))?;
    let height: f32 = height
        .trim()
        .parse()
        .with_context(|| format!("invalid height in `{value}`"))?;
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        bail!("size `{value}` must be non-negative");
    }
    Ok(ViewportSize::new(width, height))
}
