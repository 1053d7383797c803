mod bar;
mod layout;
mod render;
mod scheduler;
mod source;
mod widget;

pub use bar::{plan_windows, BarSet};
pub use layout::{BarLayout, Slot};
pub use render::{Canvas, Renderer};
pub use scheduler::{Clock, Control, Scheduler, SystemClock};
pub use source::{Battery, BatteryBands, Label, SourceKind, TextSource};
pub use widget::{Colors, Content, Registry, Widget, WidgetDescriptor};

#[cfg(test)]
pub(crate) mod testing {
    use super::{Canvas, Colors, Content, TextSource, Widget, WidgetDescriptor};
    use crate::{
        color::Color,
        draw::{Font, FontMetrics, FontSpec},
        rectangle::Rectangle,
        AnyResult,
    };
    use std::{cell::Cell, rc::Rc, time::Duration};

    pub fn fake_font(spec: &FontSpec) -> Font {
        Font::new(
            spec,
            FontMetrics {
                ascent: 12,
                descent: 4,
                advance: 10,
            },
        )
    }

    pub fn widget(
        name: &str,
        slot_width: u16,
        interval_ms: u64,
        source: impl TextSource + 'static,
    ) -> Widget {
        let font = FontSpec::new("Mono", 12);
        Widget {
            font: fake_font(&font),
            descriptor: WidgetDescriptor {
                name: name.to_string(),
                slot_width,
                interval_ms,
                border_width: 2,
                padding: 0,
                font,
            },
            source: Box::new(source),
        }
    }

    /// Source counting its invocations.
    pub struct Counting {
        text: Option<String>,
        calls: Rc<Cell<usize>>,
    }

    impl Counting {
        pub fn new(text: &str) -> Self {
            Self {
                text: Some(text.to_string()),
                calls: Rc::new(Cell::new(0)),
            }
        }

        pub fn failing() -> Self {
            Self {
                text: None,
                calls: Rc::new(Cell::new(0)),
            }
        }

        pub fn calls(&self) -> Rc<Cell<usize>> {
            self.calls.clone()
        }
    }

    impl TextSource for Counting {
        fn produce(&mut self, defaults: Colors) -> AnyResult<Content> {
            self.calls.set(self.calls.get() + 1);
            match &self.text {
                Some(text) => Ok(Content::new(text.clone(), defaults)),
                None => Err("source failed".into()),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawOp {
        Fill(Rectangle, Color),
        Text(String, i16, i16, Color),
        Present(usize, Rectangle),
        Flush,
    }

    /// Canvas recording every operation. Text is 10 pixels per character.
    pub struct Recorder {
        targets: usize,
        pub ops: Vec<DrawOp>,
    }

    impl Recorder {
        pub fn new(targets: usize) -> Self {
            Self {
                targets,
                ops: Vec::new(),
            }
        }

        pub fn presents(&self) -> usize {
            self.ops
                .iter()
                .filter(|op| matches!(op, DrawOp::Present(..)))
                .count()
        }

        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text(text, ..) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Canvas for Recorder {
        fn target_count(&self) -> usize {
            self.targets
        }

        fn fill_rect(&mut self, rect: Rectangle, color: Color) {
            self.ops.push(DrawOp::Fill(rect, color));
        }

        fn text_width(&mut self, text: &str, _font: &Font) -> u16 {
            text.chars().count() as u16 * 10
        }

        fn draw_text(&mut self, text: &str, _font: &Font, x: i16, baseline: i16, color: Color) {
            self.ops.push(DrawOp::Text(text.to_string(), x, baseline, color));
        }

        fn present(&mut self, target: usize, area: Rectangle) {
            self.ops.push(DrawOp::Present(target, area));
        }

        fn flush(&mut self) {
            self.ops.push(DrawOp::Flush);
        }
    }

    /// Clock that only advances when slept on.
    pub struct FakeClock {
        now: u64,
        pub slept_ms: Vec<u64>,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self {
                now: 0,
                slept_ms: Vec::new(),
            }
        }
    }

    impl super::Clock for FakeClock {
        fn now_ms(&self) -> u64 {
            self.now
        }

        fn sleep(&mut self, duration: Duration) {
            let ms = duration.as_millis() as u64;
            self.slept_ms.push(ms);
            self.now += ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{fake_font, DrawOp, Recorder};
    use super::*;
    use crate::{
        config::Config,
        outputs::active_outputs,
        x::randr::CrtcInfo,
    };

    fn crtc(mode: u32, x: i16, width: u16) -> CrtcInfo {
        CrtcInfo {
            crtc: 0,
            mode,
            x,
            y: 0,
            width,
            height: 1080,
        }
    }

    #[test]
    fn first_tick_on_two_outputs() {
        let crtcs = [crtc(0x51, 0, 1920), crtc(0, 0, 0), crtc(0x52, 1920, 1920)];
        let outputs = active_outputs(&crtcs);
        let config = Config::builtin();
        assert_eq!(plan_windows(&outputs, config.bar.height).len(), 2);

        let capacity = std::env::temp_dir().join(format!("tinybar-e2e-{}", std::process::id()));
        std::fs::write(&capacity, "15\n").unwrap();
        let mut registry = Registry::build(&config, fake_font);
        let battery = registry.iter_mut().nth(2).unwrap();
        battery.source = Box::new(Battery::with_path(
            &capacity,
            BatteryBands {
                low: config.colors.battery_low,
                medium: config.colors.battery_medium,
                high: config.colors.battery_high,
            },
        ));

        let renderer = Renderer::new(BarLayout::compute(&registry));
        let mut scheduler = Scheduler::new(&registry);
        let mut canvas = Recorder::new(outputs.len());
        let refreshed = scheduler.tick(0, &mut registry, &renderer, &mut canvas);
        std::fs::remove_file(&capacity).ok();

        assert_eq!(refreshed, 3);
        assert_eq!(canvas.presents(), 6);
        let battery_slot = renderer.layout().slot(2).unwrap().rect;
        assert!(canvas
            .ops
            .contains(&DrawOp::Fill(battery_slot, config.colors.battery_low)));
        assert_eq!(canvas.texts()[2], "Battery: 15%");
    }
}
