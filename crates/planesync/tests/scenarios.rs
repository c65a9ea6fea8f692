use std::time::Duration;

use planesync::layout::layout_transform;
use planesync::{
    DrawTarget, ElementId, Frame, ImageSource, LayoutRect, Page, PointerEvent, Site, StaticPage,
    TextureData, TextureLoader, TransitionEvent, ViewportSize,
};
use siteconfig::SiteConfig;

const FRAME: Duration = Duration::from_millis(16);

struct FlatLoader;

impl TextureLoader for FlatLoader {
    fn load(&mut self, _src: &str) -> anyhow::Result<TextureData> {
        Ok(TextureData {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        })
    }
}

/// Records the uniform values each draw observed.
#[derive(Default)]
struct UniformLog {
    frames: Vec<(f32, f32, i32, i32)>,
}

impl DrawTarget for UniformLog {
    fn draw(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        let u = frame.material.uniforms();
        self.frames
            .push((u.u_time, u.u_timeline, u.u_start_index, u.u_end_index));
        Ok(())
    }
}

struct Fixture {
    page: StaticPage,
    images: Vec<ImageSource>,
    site: Site,
}

fn fixture(viewport: ViewportSize) -> Fixture {
    let mut page = StaticPage::new(viewport);
    let images: Vec<ImageSource> = (0..3)
        .map(|i| ImageSource {
            element: page.add_element(Some(LayoutRect::new(
                120.0 + 700.0 * i as f32,
                viewport.width * 0.3,
                viewport.width * 0.4,
                viewport.height * 0.5,
            ))),
            src: format!("page-{i}.jpg"),
        })
        .collect();
    let links: Vec<ElementId> = (0..3)
        .map(|i| page.add_element(Some(LayoutRect::new(40.0 + 24.0 * i as f32, 20.0, 90.0, 18.0))))
        .collect();
    let site = Site::new(&SiteConfig::default(), &page, &images, &links, &mut FlatLoader)
        .expect("site builds");
    Fixture { page, images, site }
}

#[test]
fn hover_two_then_one_settles_on_one() {
    let Fixture {
        mut page, mut site, ..
    } = fixture(ViewportSize::new(1440.0, 900.0));
    let mut log = UniformLog::default();

    site.handle_pointer(PointerEvent::Hover { link: 2 }).unwrap();
    site.frame(FRAME, &mut page, &mut log);
    site.handle_pointer(PointerEvent::Hover { link: 1 }).unwrap();

    let mut settled = None;
    for _ in 0..500 {
        let report = site.frame(FRAME, &mut page, &mut log);
        for event in report.events {
            if let TransitionEvent::Settled { index } = event {
                settled = Some(index);
            }
        }
        let state = site.transition_state();
        assert!(state.start_index < 3 && state.end_index < 3);
        if settled.is_some() {
            break;
        }
    }

    assert_eq!(settled, Some(1));
    assert_eq!(site.transition_state().end_index, 1);
    assert_eq!(site.transition_state().start_index, 1);
    assert_eq!(site.transition_state().timeline, 0.0);
    for (_, timeline, start, end) in &log.frames {
        assert!((0.0..=4.0).contains(timeline));
        assert!((0..3).contains(start) && (0..3).contains(end));
    }
}

#[test]
fn hover_during_running_fade_starts_from_its_target() {
    let Fixture {
        mut page, mut site, ..
    } = fixture(ViewportSize::new(1440.0, 900.0));
    let mut log = UniformLog::default();

    site.handle_pointer(PointerEvent::Hover { link: 2 }).unwrap();
    for _ in 0..10 {
        site.frame(FRAME, &mut page, &mut log);
    }
    assert!(site.transition_state().timeline > 0.0);

    site.handle_pointer(PointerEvent::Hover { link: 1 }).unwrap();
    let report = site.frame(FRAME, &mut page, &mut log);
    assert_eq!(
        report.events[0],
        TransitionEvent::Started {
            start_index: 2,
            end_index: 1
        }
    );
    let uniforms = site.material().uniforms();
    assert_eq!(uniforms.u_start_index, 2);
    assert_eq!(uniforms.u_end_index, 1);
}

#[test]
fn resize_full_hd_to_800_by_600_repositions_every_plane() {
    let Fixture {
        mut page,
        images,
        mut site,
    } = fixture(ViewportSize::new(1920.0, 1080.0));
    let fov_before = site.scene().camera().fov;
    let baselines: Vec<_> = site
        .scene()
        .entries()
        .iter()
        .map(|entry| (entry.original_width, entry.original_height))
        .collect();

    let viewport = ViewportSize::new(800.0, 600.0);
    page.set_viewport(viewport);
    for (i, image) in images.iter().enumerate() {
        page.set_rect(
            image.element,
            Some(LayoutRect::new(60.0 + 400.0 * i as f32, 240.0, 320.0, 300.0)),
        );
    }
    let report = site.resize(&page).expect("non-empty viewport");
    assert_eq!(report.synced, 3);

    assert!((site.scene().camera().fov - fov_before).abs() > 1.0);
    for (entry, baseline) in site.scene().entries().iter().zip(baselines) {
        assert_eq!((entry.original_width, entry.original_height), baseline);
        let rect = page.element_rect(entry.element).unwrap();
        let expected = layout_transform(&rect, viewport, entry.mesh.geometry).unwrap();
        for axis in 0..3 {
            assert!((entry.mesh.transform.position[axis] - expected.position[axis]).abs() < 1e-3);
            assert!((entry.mesh.transform.scale[axis] - expected.scale[axis]).abs() < 1e-5);
        }
    }
}

#[test]
fn click_transitions_and_scrolls_to_image_offset() {
    let Fixture {
        mut page,
        images,
        mut site,
    } = fixture(ViewportSize::new(1280.0, 720.0));
    page.set_scroll_y(300.0);
    let mut log = UniformLog::default();

    let interaction = site.handle_pointer(PointerEvent::Click { link: 1 }).unwrap();
    assert!(interaction.prevent_default);

    let expected_top = page.element_rect(images[1].element).unwrap().top + 300.0;
    let mut progress_ticks = 0;
    for _ in 0..500 {
        let report = site.frame(FRAME, &mut page, &mut log);
        progress_ticks += report
            .events
            .iter()
            .filter(|event| matches!(event, TransitionEvent::Progressed { .. }))
            .count();
        if !site.transitions().is_animating() {
            break;
        }
    }

    let scrolls = page.take_scroll_requests();
    assert!(scrolls.len() > 1);
    assert_eq!(scrolls.len(), progress_ticks);
    assert!(scrolls.iter().all(|top| (top - expected_top).abs() < 1e-3));
    assert_eq!(site.transition_state().start_index, 1);
}

#[test]
fn time_uniform_grows_by_fixed_step_each_frame() {
    let Fixture {
        mut page, mut site, ..
    } = fixture(ViewportSize::new(1024.0, 768.0));
    let mut log = UniformLog::default();
    for _ in 0..10 {
        site.frame(Duration::from_millis(500), &mut page, &mut log);
    }
    assert_eq!(log.frames.len(), 10);
    for (i, (time, ..)) in log.frames.iter().enumerate() {
        assert!((time - 0.3 * (i + 1) as f32).abs() < 1e-4);
    }
}
