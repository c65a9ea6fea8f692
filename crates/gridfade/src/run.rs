use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use planesync::{ImageDecoder, StaticPage, Site, TransitionEvent};
use serde::Serialize;
use siteconfig::SiteConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{ConfigArgs, SimulateArgs};
use crate::headless::HeadlessTarget;
use crate::page_file::{LoadedPage, PageDescription};
use crate::script::{self, Step};

/// Upper bound on frames spent waiting for a transition to settle.
const MAX_SETTLE_FRAMES: u32 = 10_000;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

pub fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    let Some(path) = path else {
        return Ok(SiteConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = SiteConfig::from_toml_str(&raw)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded site config");
    Ok(config)
}

pub fn print_config(args: ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

pub fn simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let steps = script::parse_script(&args.script)?;
    let LoadedPage {
        page,
        images,
        links,
    } = PageDescription::load(&args.page)?.into_page();

    let mut decoder = match args.page.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ImageDecoder::with_base_dir(dir),
        _ => ImageDecoder::new(),
    };
    let site = Site::new(&config, &page, &images, &links, &mut decoder)
        .context("failed to initialise site")?;
    let (layer_width, layer_height) = site.material().texture_array().layer_extent();
    tracing::info!(
        layers = site.material().texture_array().len(),
        layer_width,
        layer_height,
        "texture array staged"
    );

    let mut simulation = Simulation {
        page,
        site,
        target: HeadlessTarget::new(),
        interval: Duration::from_millis(args.frame_ms),
        out: io::stdout().lock(),
    };

    for step in steps {
        simulation.apply(step)?;
    }

    match args.frames {
        Some(frames) => {
            for _ in 0..frames {
                simulation.frame()?;
            }
        }
        None => {
            let mut waited = 0;
            while simulation.site.transitions().is_animating() {
                if waited == MAX_SETTLE_FRAMES {
                    tracing::warn!(frames = waited, "transition did not settle; stopping");
                    break;
                }
                simulation.frame()?;
                waited += 1;
            }
        }
    }

    simulation.out.flush()?;
    tracing::info!(
        frames = simulation.site.render_loop().frames(),
        failed_draws = simulation.site.render_loop().failed_draws(),
        "simulation finished"
    );
    Ok(())
}

struct Simulation<W: Write> {
    page: StaticPage,
    site: Site,
    target: HeadlessTarget,
    interval: Duration,
    out: W,
}

impl<W: Write> Simulation<W> {
    fn apply(&mut self, step: Step) -> Result<()> {
        match step {
            Step::Pointer(event) => {
                match self.site.handle_pointer(event) {
                    Ok(interaction) => tracing::debug!(
                        ?event,
                        prevent_default = interaction.prevent_default,
                        "pointer event dispatched"
                    ),
                    Err(error) => tracing::warn!(?event, %error, "ignoring pointer event"),
                }
                self.frame()
            }
            Step::Resize(viewport) => {
                self.page.set_viewport(viewport);
                match self.site.resize(&self.page) {
                    Some(report) => tracing::info!(
                        width = viewport.width,
                        height = viewport.height,
                        synced = report.synced,
                        skipped = report.skipped,
                        "viewport resized"
                    ),
                    None => tracing::debug!("empty viewport; keeping previous layout"),
                }
                self.frame()
            }
            Step::Wait(frames) => {
                for _ in 0..frames {
                    self.frame()?;
                }
                Ok(())
            }
        }
    }

    fn frame(&mut self) -> Result<()> {
        let index = self.site.render_loop().frames();
        let draws_before = self.target.draws();
        let report = self.site.frame(self.interval, &mut self.page, &mut self.target);

        let uniforms = self.site.material().uniforms();
        let snapshot = FrameSnapshot {
            frame: index,
            time: uniforms.u_time,
            timeline: uniforms.u_timeline,
            start_index: uniforms.u_start_index,
            end_index: uniforms.u_end_index,
            idle: !self.site.transitions().is_animating(),
            drawn: self.target.draws() > draws_before,
            planes: self.target.planes(),
            events: report.events.iter().map(EventRecord::from).collect(),
            scrolls: report.scrolls,
        };
        serde_json::to_writer(&mut self.out, &snapshot)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct FrameSnapshot {
    frame: u64,
    time: f32,
    timeline: f32,
    start_index: i32,
    end_index: i32,
    idle: bool,
    drawn: bool,
    planes: usize,
    events: Vec<EventRecord>,
    scrolls: Vec<f32>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EventRecord {
    Started {
        start_index: usize,
        end_index: usize,
    },
    Progressed {
        timeline: f32,
        scroll_target: Option<usize>,
    },
    Settled {
        index: usize,
    },
}

impl From<&TransitionEvent> for EventRecord {
    fn from(event: &TransitionEvent) -> Self {
        match *event {
            TransitionEvent::Started {
                start_index,
                end_index,
            } => EventRecord::Started {
                start_index,
                end_index,
            },
            TransitionEvent::Progressed {
                timeline,
                scroll_target,
            } => EventRecord::Progressed {
                timeline,
                scroll_target,
            },
            TransitionEvent::Settled { index } => EventRecord::Settled { index },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planesync::{PointerEvent, ViewportSize};
    use tempfile::TempDir;

    fn simulation(dir: &TempDir) -> Simulation<Vec<u8>> {
        simulation_with_interval(dir, Duration::from_millis(16))
    }

    fn simulation_with_interval(dir: &TempDir, interval: Duration) -> Simulation<Vec<u8>> {
        let raw = r#"{
            "viewport": { "width": 1200, "height": 800 },
            "scroll_y": 40,
            "images": [
                { "src": "missing-0.png", "rect": { "top": 0, "left": 300, "width": 600, "height": 400 } },
                { "src": "missing-1.png", "rect": { "top": 900, "left": 300, "width": 600, "height": 400 } }
            ],
            "links": [
                { "rect": { "top": 20, "left": 20, "width": 80, "height": 16 } },
                { "rect": { "top": 40, "left": 20, "width": 80, "height": 16 } }
            ]
        }"#;
        let LoadedPage {
            page,
            images,
            links,
        } = PageDescription::from_json_str(raw).unwrap().into_page();
        let mut decoder = ImageDecoder::with_base_dir(dir.path());
        let site = Site::new(&SiteConfig::default(), &page, &images, &links, &mut decoder).unwrap();
        Simulation {
            page,
            site,
            target: HeadlessTarget::new(),
            interval,
            out: Vec::new(),
        }
    }

    fn lines(out: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn click_step_emits_scroll_requests() {
        let dir = TempDir::new().unwrap();
        let mut sim = simulation(&dir);
        sim.apply(Step::Pointer(PointerEvent::Click { link: 1 }))
            .unwrap();
        sim.apply(Step::Wait(5)).unwrap();

        let frames = lines(&sim.out);
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[0]["events"][0]["kind"], "started");
        let scrolls: Vec<f64> = frames
            .iter()
            .flat_map(|frame| frame["scrolls"].as_array().unwrap().clone())
            .map(|top| top.as_f64().unwrap())
            .collect();
        assert!(!scrolls.is_empty());
        assert!(scrolls.iter().all(|top| (top - 940.0).abs() < 1e-3));
    }

    #[test]
    fn started_transition_is_not_idle_before_timeline_moves() {
        let dir = TempDir::new().unwrap();
        let mut sim = simulation_with_interval(&dir, Duration::ZERO);
        sim.apply(Step::Pointer(PointerEvent::Hover { link: 1 }))
            .unwrap();
        let frames = lines(&sim.out);
        assert_eq!(frames[0]["timeline"], 0.0);
        assert_eq!(frames[0]["idle"], false);
        assert_eq!(frames[0]["events"][0]["kind"], "started");
    }

    #[test]
    fn bad_pointer_event_still_advances_a_frame() {
        let dir = TempDir::new().unwrap();
        let mut sim = simulation(&dir);
        sim.apply(Step::Pointer(PointerEvent::Hover { link: 9 }))
            .unwrap();
        let frames = lines(&sim.out);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["idle"], true);
        assert_eq!(frames[0]["drawn"], true);
        assert!(frames[0]["events"].as_array().unwrap().is_empty());
    }

    #[test]
    fn empty_resize_keeps_planes() {
        let dir = TempDir::new().unwrap();
        let mut sim = simulation(&dir);
        let before: Vec<_> = sim
            .site
            .scene()
            .entries()
            .iter()
            .map(|entry| entry.mesh.transform)
            .collect();
        sim.apply(Step::Resize(ViewportSize::new(0.0, 0.0))).unwrap();
        let after: Vec<_> = sim
            .site
            .scene()
            .entries()
            .iter()
            .map(|entry| entry.mesh.transform)
            .collect();
        assert_eq!(before, after);
        assert_eq!(lines(&sim.out)[0]["planes"], 2);
    }

    #[test]
    fn default_config_is_used_without_a_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.render.time_step, 0.3);
    }

    #[test]
    fn config_errors_name_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, "version = 7\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("site.toml"));
    }
}
