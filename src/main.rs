mod bar;
mod cfg;
mod color;
mod config;
mod config_types;
mod draw;
mod error;
mod outputs;
mod paths;
mod process;
mod rectangle;
mod x;

use bar::{BarLayout, BarSet, Control, Registry, Renderer, Scheduler, SystemClock};
use clap::Parser;
use config::Config;
use error::{fatal_error, LogError};
use itertools::Itertools;
use std::{
    os::unix::io::AsRawFd,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use x::Display;
use xcb::{x::Event as XEvent, Event};

pub type AnyResult<T> = Result<T, Box<dyn std::error::Error>>;

static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Minimal status bar for X11
#[derive(Parser)]
#[command(version)]
struct CommandLine {
    /// Path of the configuration file
    #[arg(long)]
    config: Option<String>,
}

extern "C" fn request_stop(_signal: libc::c_int) {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
}

fn install_signal_handlers() {
    for signal in [libc::SIGINT, libc::SIGTERM] {
        let handler = request_stop as extern "C" fn(libc::c_int) as libc::sighandler_t;
        if unsafe { libc::signal(signal, handler) } == libc::SIG_ERR {
            log::warn!("Failed to install handler for signal {signal}");
        }
    }
}

fn configure_logging() {
    use log::LevelFilter;
    use log4rs::{
        append::{
            console::{ConsoleAppender, Target},
            file::FileAppender,
            Append,
        },
        config::{Appender, Config, Logger, Root},
        encode::pattern::PatternEncoder,
    };
    const PATTERN: &str = "{l:<5}| {m}\n";
    let appender: Box<dyn Append> = match FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(paths::log_path())
    {
        Ok(file) => Box::new(file),
        Err(error) => {
            eprintln!("tinybar: can't open log file {}: {error}", paths::log_path());
            Box::new(
                ConsoleAppender::builder()
                    .encoder(Box::new(PatternEncoder::new(PATTERN)))
                    .target(Target::Stderr)
                    .build(),
            )
        }
    };
    let log_config = Config::builder()
        .appender(Appender::builder().build("main", appender))
        // Enable logging for this crate
        .logger(Logger::builder().appender("main").build(
            "tinybar",
            if cfg!(debug_assertions) {
                LevelFilter::Trace
            } else {
                LevelFilter::Info
            },
        ))
        .build(Root::builder().build(LevelFilter::Off));
    if let Some(log_config) = log_config.log_error() {
        if let Err(error) = log4rs::init_config(log_config) {
            eprintln!("tinybar: can't initialize logging: {error}");
        }
    }
}

/// Handles all queued X events, runs between scheduler ticks.
fn process_events(display: &Display) -> Control {
    let mut control = Control::Continue;
    loop {
        match display.poll_for_event() {
            Ok(Some(Event::X(XEvent::Expose(event)))) => {
                if event.count() == 0 {
                    control = Control::Repaint;
                }
            }
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(xcb::Error::Connection(error)) => {
                fatal_error(format!("Lost connection to the display: {error}"))
            }
            Err(error) => log::error!("X error: {error}"),
        }
    }
    if STOP_REQUESTED.load(Ordering::SeqCst) {
        log::info!("Received stop signal");
        Control::Stop
    } else {
        control
    }
}

fn main() {
    let command_line = CommandLine::parse();
    configure_logging();
    log::info!("Starting tinybar {}", env!("CARGO_PKG_VERSION"));
    let config = Config::load(command_line.config.as_deref());

    log::trace!("Connecting to X server");
    let display = Arc::new(
        Display::connect().unwrap_or_else(|error| fatal_error(format!("can't open display: {error}"))),
    );
    let outputs = outputs::discover(&display);

    let mut bars = BarSet::create(
        display.clone(),
        &outputs,
        config.bar.height,
        config.colors.background,
    );
    let mut registry = Registry::build(&config, |spec| bars.load_font(spec));
    log::info!(
        "Widgets: {}",
        registry.iter().map(|w| &w.descriptor.name).join(", ")
    );
    let renderer = Renderer::new(BarLayout::compute(&registry));
    log::debug!(
        "Widgets use {}px on {} bar(s): {}",
        renderer.layout().width(),
        bars.windows().len(),
        bars.windows().iter().map(|bar| bar.geometry()).join(", ")
    );
    let mut scheduler = Scheduler::new(&registry);

    install_signal_handlers();
    let mut clock = SystemClock::with_wake_fd(display.as_raw_fd());
    log::trace!("Running");
    scheduler.run(&mut registry, &renderer, &mut bars, &mut clock, || {
        process_events(&display)
    });

    log::trace!("Cleaning up");
    bars.destroy();
    log::info!("Exiting");
}
