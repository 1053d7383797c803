use super::{Canvas, Content, Registry, Renderer};
use std::{
    os::unix::io::RawFd,
    time::{Duration, Instant},
};

/// Source of time for the scheduler.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed point.
    fn now_ms(&self) -> u64;

    /// Waits for at most `duration`. Returning early is allowed.
    fn sleep(&mut self, duration: Duration);
}

/// Monotonic clock. With a wake-up descriptor, sleeping returns as soon as
/// that descriptor becomes readable or a signal arrives.
pub struct SystemClock {
    start: Instant,
    wake_fd: Option<RawFd>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            wake_fd: None,
        }
    }

    pub fn with_wake_fd(fd: RawFd) -> Self {
        Self {
            wake_fd: Some(fd),
            ..Self::new()
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep(&mut self, duration: Duration) {
        match self.wake_fd {
            Some(fd) => {
                let mut pollfd = libc::pollfd {
                    fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                let timeout = duration.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
                // Interrupted and woken sleeps are fine, the caller checks the
                // time again.
                unsafe { libc::poll(&mut pollfd, 1, timeout) };
            }
            None => std::thread::sleep(duration),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Never rendered.
    Uninitialized,
    /// Rendered, waiting for its interval to pass.
    Fresh,
    /// Rendered once and never refreshed again.
    Done,
}

#[derive(Clone, Debug)]
pub struct WidgetState {
    pub phase: Phase,
    pub last_update_ms: u64,
    /// The last rendered content, used to repaint without calling the source.
    pub content: Option<Content>,
}

impl WidgetState {
    fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            last_update_ms: 0,
            content: None,
        }
    }

    pub fn is_due(&self, interval_ms: u64, now_ms: u64) -> bool {
        match self.phase {
            Phase::Uninitialized => true,
            Phase::Fresh => now_ms.saturating_sub(self.last_update_ms) >= interval_ms,
            Phase::Done => false,
        }
    }

    fn update(&mut self, interval_ms: u64, now_ms: u64, content: Content) {
        self.phase = if interval_ms == 0 {
            Phase::Done
        } else {
            Phase::Fresh
        };
        self.last_update_ms = now_ms;
        self.content = Some(content);
    }
}

/// What the run loop does after checking for outside events.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Redraw all widgets from their cached content.
    Repaint,
    Stop,
}

pub struct Scheduler {
    states: Vec<WidgetState>,
    tick: Duration,
}

impl Scheduler {
    /// Cadence used when no widget ever needs refreshing.
    pub const IDLE_TICK: Duration = Duration::from_secs(60);

    pub fn new(registry: &Registry) -> Self {
        let tick = registry
            .iter()
            .map(|widget| widget.descriptor.interval_ms)
            .filter(|&interval| interval > 0)
            .min()
            .map_or(Self::IDLE_TICK, Duration::from_millis);
        log::debug!("Scheduler tick is {}ms", tick.as_millis());
        Self {
            states: vec![WidgetState::new(); registry.len()],
            tick,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    #[cfg(test)]
    pub fn states(&self) -> &[WidgetState] {
        &self.states
    }

    /// Refreshes and draws every due widget. Returns the number of widgets
    /// whose source was invoked.
    pub fn tick(
        &mut self,
        now_ms: u64,
        registry: &mut Registry,
        renderer: &Renderer,
        canvas: &mut impl Canvas,
    ) -> usize {
        let defaults = registry.defaults();
        let mut refreshed = 0;
        for (index, (widget, state)) in registry.iter_mut().zip(&mut self.states).enumerate() {
            let interval = widget.descriptor.interval_ms;
            if !state.is_due(interval, now_ms) {
                continue;
            }
            let content = match widget.source.produce(defaults) {
                Ok(content) => content,
                Err(error) => {
                    log::warn!("Widget {}: {error}", widget.descriptor.name);
                    Content::placeholder(defaults)
                }
            };
            renderer.draw_widget(canvas, index, &widget.font, &content);
            state.update(interval, now_ms, content);
            refreshed += 1;
        }
        refreshed
    }

    /// Draws the cached content of every widget that has been rendered.
    pub fn repaint(&self, registry: &Registry, renderer: &Renderer, canvas: &mut impl Canvas) {
        log::trace!("Repainting all widgets");
        for (index, (widget, state)) in registry.iter().zip(&self.states).enumerate() {
            if let Some(content) = &state.content {
                renderer.draw_widget(canvas, index, &widget.font, content);
            }
        }
    }

    /// Runs until `between_ticks` returns `Control::Stop`. The callback is
    /// called after every tick and whenever the clock wakes up early.
    pub fn run<C, F>(
        &mut self,
        registry: &mut Registry,
        renderer: &Renderer,
        canvas: &mut impl Canvas,
        clock: &mut C,
        mut between_ticks: F,
    ) where
        C: Clock,
        F: FnMut() -> Control,
    {
        let tick_ms = self.tick_interval().as_millis() as u64;
        let mut next_tick = clock.now_ms();
        loop {
            let now = clock.now_ms();
            if now >= next_tick {
                self.tick(now, registry, renderer, canvas);
                next_tick = now + tick_ms;
            }
            match between_ticks() {
                Control::Continue => {}
                Control::Repaint => self.repaint(registry, renderer, canvas),
                Control::Stop => break,
            }
            let remaining = next_tick.saturating_sub(clock.now_ms());
            clock.sleep(Duration::from_millis(remaining));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::testing::{widget, Counting, FakeClock, Recorder};
    use crate::bar::{BarLayout, Colors, Label};
    use crate::color::Color;

    fn colors() -> Colors {
        Colors {
            foreground: Color::from_rgb_hex(0xFFFFFF),
            background: Color::from_rgb_hex(0x123456),
            border: Color::from_rgb_hex(0x123456),
        }
    }

    fn setup(widgets: Vec<crate::bar::Widget>) -> (Registry, Renderer, Scheduler) {
        let registry = Registry::from_widgets(widgets, colors(), 40);
        let renderer = Renderer::new(BarLayout::compute(&registry));
        let scheduler = Scheduler::new(&registry);
        (registry, renderer, scheduler)
    }

    #[test]
    fn interval_is_respected() {
        let counting = Counting::new("x");
        let calls = counting.calls();
        let (mut registry, renderer, mut scheduler) = setup(vec![widget("c", 8, 1000, counting)]);
        let mut canvas = Recorder::new(1);
        assert_eq!(scheduler.tick(0, &mut registry, &renderer, &mut canvas), 1);
        assert_eq!(scheduler.tick(999, &mut registry, &renderer, &mut canvas), 0);
        assert_eq!(calls.get(), 1);
        assert_eq!(scheduler.tick(1000, &mut registry, &renderer, &mut canvas), 1);
        assert_eq!(calls.get(), 2);
        assert_eq!(scheduler.states()[0].last_update_ms, 1000);
        assert_eq!(scheduler.states()[0].phase, Phase::Fresh);
        // Late ticks fire once and restart the interval from the tick time.
        assert_eq!(scheduler.tick(2500, &mut registry, &renderer, &mut canvas), 1);
        assert_eq!(scheduler.tick(3499, &mut registry, &renderer, &mut canvas), 0);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn zero_interval_fires_once() {
        let counting = Counting::new("static");
        let calls = counting.calls();
        let (mut registry, renderer, mut scheduler) = setup(vec![
            widget("label", 8, 0, counting),
            widget("clock", 8, 1000, Label::new("t")),
        ]);
        let mut canvas = Recorder::new(1);
        for now in (0..10_000).step_by(1000) {
            scheduler.tick(now, &mut registry, &renderer, &mut canvas);
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(scheduler.states()[0].phase, Phase::Done);
    }

    #[test]
    fn tick_is_smallest_positive_interval() {
        let (_, _, scheduler) = setup(vec![
            widget("a", 8, 0, Label::new("")),
            widget("b", 8, 60000, Label::new("")),
            widget("c", 8, 1000, Label::new("")),
        ]);
        assert_eq!(scheduler.tick_interval(), Duration::from_millis(1000));
        let (_, _, idle) = setup(vec![widget("a", 8, 0, Label::new(""))]);
        assert_eq!(idle.tick_interval(), Scheduler::IDLE_TICK);
    }

    #[test]
    fn failing_source_shows_placeholder() {
        let (mut registry, renderer, mut scheduler) =
            setup(vec![widget("bad", 8, 1000, Counting::failing())]);
        let mut canvas = Recorder::new(1);
        scheduler.tick(0, &mut registry, &renderer, &mut canvas);
        let content = scheduler.states()[0].content.as_ref().unwrap();
        assert_eq!(content.text, "N/A");
        assert_eq!(content.colors, colors());
        assert_eq!(canvas.texts(), ["N/A"]);
    }

    #[test]
    fn repaint_uses_cached_content() {
        let counting = Counting::new("cached");
        let calls = counting.calls();
        let (mut registry, renderer, mut scheduler) = setup(vec![widget("c", 8, 1000, counting)]);
        let mut canvas = Recorder::new(2);
        scheduler.repaint(&registry, &renderer, &mut canvas);
        assert!(canvas.ops.is_empty());
        scheduler.tick(0, &mut registry, &renderer, &mut canvas);
        let first = std::mem::take(&mut canvas.ops);
        scheduler.repaint(&registry, &renderer, &mut canvas);
        assert_eq!(canvas.ops, first);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn run_until_stopped() {
        let counting = Counting::new("x");
        let calls = counting.calls();
        let (mut registry, renderer, mut scheduler) = setup(vec![widget("c", 8, 1000, counting)]);
        let mut canvas = Recorder::new(1);
        let mut clock = FakeClock::new();
        let mut rounds = 0;
        scheduler.run(&mut registry, &renderer, &mut canvas, &mut clock, || {
            rounds += 1;
            if rounds == 5 {
                Control::Stop
            } else {
                Control::Continue
            }
        });
        assert_eq!(calls.get(), 5);
        assert_eq!(clock.slept_ms, vec![1000, 1000, 1000, 1000]);
    }

    #[test]
    fn repaint_request() {
        let counting = Counting::new("x");
        let calls = counting.calls();
        let (mut registry, renderer, mut scheduler) = setup(vec![widget("c", 8, 1000, counting)]);
        let mut canvas = Recorder::new(1);
        let mut clock = FakeClock::new();
        let mut controls = vec![Control::Repaint, Control::Stop].into_iter();
        scheduler.run(&mut registry, &renderer, &mut canvas, &mut clock, || {
            controls.next().unwrap_or(Control::Stop)
        });
        assert_eq!(calls.get(), 2);
        assert_eq!(canvas.presents(), 3);
        assert_eq!(clock.slept_ms, vec![1000]);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let before = clock.now_ms();
        clock.sleep(Duration::from_millis(5));
        assert!(clock.now_ms() >= before + 5);
    }
}
