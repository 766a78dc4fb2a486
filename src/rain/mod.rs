//! The falling-glyph simulation and its per-frame renderer.
//!
//! [`RainEngine`] owns all state and is driven by calling [`RainEngine::tick`]
//! with the current time on every display frame; it decides internally
//! whether enough time has passed to advance the simulation.

mod column;
mod message;

pub use column::{between, random_glyph, Column, GLYPH_BASE, GLYPH_COUNT};
pub use message::{MessageBoard, OverlayMessage};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::RainConfig;
use crate::error::{ConfigError, SurfaceError};
use crate::surface::{Surface, Viewport};
use crate::trail::trail_alpha;

/// Failed steps in a row after which the loop gives up.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 30;

const BLACK: &str = "#000000";
/// Erased head cell, relative to the glyph size.
const CELL_WIDTH: f64 = 1.1;
const CELL_HEIGHT: f64 = 1.2;
const MESSAGE_SCALE: f64 = 1.2;
/// Average advance of a monospace glyph, for when the canvas cannot measure.
const FALLBACK_GLYPH_WIDTH: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frame scheduled.
    Idle,
    Running,
    /// Stopped because the page is hidden.
    Paused,
}

/// What a single frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The loop is not running; nothing was touched.
    Inactive,
    /// Too soon after the last step.
    Throttled,
    Stepped,
    /// The step hit a canvas error; the loop keeps going.
    Failed,
    /// Too many failures in a row; the loop is now idle.
    Halted,
}

impl Tick {
    /// Whether the driver should request another animation frame.
    pub fn reschedule(self) -> bool {
        matches!(self, Tick::Throttled | Tick::Stepped | Tick::Failed)
    }
}

pub struct RainEngine<R = SmallRng> {
    config: RainConfig,
    rng: R,
    state: LoopState,
    width: f64,
    height: f64,
    base_font: f64,
    columns: Vec<Column>,
    trail_alpha: f64,
    fade_style: String,
    last_step: f64,
    messages: MessageBoard,
    needs_resize: bool,
    failures: u32,
}

impl RainEngine<SmallRng> {
    pub fn seeded(config: RainConfig, seed: u64, now: f64) -> Result<Self, ConfigError> {
        Self::new(config, SmallRng::seed_from_u64(seed), now)
    }
}

impl<R: Rng> RainEngine<R> {
    /// Fails if `config` does not pass [`RainConfig::validate`]; every
    /// later step relies on its invariants.
    pub fn new(config: RainConfig, mut rng: R, now: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let alpha = trail_alpha(config.drop_speed, config.trail_rows, config.trail_epsilon);
        let first_message = now + between(&mut rng, config.message_interval_min, config.message_interval_max);
        let base_font = config.base_font_size_desktop;
        Ok(Self {
            config,
            rng,
            state: LoopState::Idle,
            width: 0.0,
            height: 0.0,
            base_font,
            columns: Vec::new(),
            trail_alpha: alpha,
            fade_style: format!("rgba(0, 0, 0, {alpha})"),
            last_step: now,
            messages: MessageBoard::new(first_message),
            needs_resize: true,
            failures: 0,
        })
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn messages(&self) -> &[OverlayMessage] {
        self.messages.active()
    }

    pub fn next_message_at(&self) -> f64 {
        self.messages.next_at()
    }

    /// Logical canvas size in CSS pixels; zero until first sized.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn base_font_size(&self) -> f64 {
        self.base_font
    }

    pub fn trail_alpha(&self) -> f64 {
        self.trail_alpha
    }

    pub fn last_step(&self) -> f64 {
        self.last_step
    }

    /// Returns `true` when the loop was not already running, i.e. the caller
    /// must schedule a frame. Sizing is redone on the next tick.
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        log::debug!("rain: {:?} -> Running", self.state);
        self.state = LoopState::Running;
        self.needs_resize = true;
        self.failures = 0;
        true
    }

    /// Returns `true` when a scheduled frame must be cancelled.
    pub fn stop(&mut self) -> bool {
        self.halt(LoopState::Idle)
    }

    /// Like [`stop`](Self::stop), for a hidden page.
    pub fn pause(&mut self) -> bool {
        self.halt(LoopState::Paused)
    }

    fn halt(&mut self, to: LoopState) -> bool {
        let was_running = self.state == LoopState::Running;
        if self.state != to {
            log::debug!("rain: {:?} -> {:?}", self.state, to);
        }
        self.state = to;
        was_running
    }

    /// Fits the canvas to `viewport` and lays out a fresh set of columns.
    pub fn resize<S: Surface + ?Sized>(&mut self, viewport: &Viewport, surface: &mut S) -> Result<(), SurfaceError> {
        let (width, height) = viewport.logical_size();
        let ratio = viewport.pixel_ratio();
        surface.resize_backing((width * ratio) as u32, (height * ratio) as u32, ratio)?;

        self.width = width;
        self.height = height;
        self.base_font = self.config.base_font_size(viewport.window_width);

        let count = ((width / (self.base_font * self.config.column_spacing)).floor() as usize).max(1);
        let (speed, font) = (self.config.drop_speed, self.base_font);
        let rng = &mut self.rng;
        self.columns = (0..count).map(|_| Column::spawn(&mut *rng, speed, font, height)).collect();

        surface.set_font(&format!("{}px {}", self.base_font, self.config.font_family));
        self.needs_resize = false;
        Ok(())
    }

    /// One display-frame callback at time `now` (milliseconds).
    pub fn tick<S: Surface + ?Sized>(&mut self, now: f64, viewport: &Viewport, surface: &mut S) -> Tick {
        if self.state != LoopState::Running {
            return Tick::Inactive;
        }
        if self.needs_resize || self.width == 0.0 || self.height == 0.0 {
            if let Err(err) = self.resize(viewport, surface) {
                return self.record_failure(err);
            }
        }
        if now - self.last_step < self.config.step_interval_ms {
            return Tick::Throttled;
        }
        self.last_step = now;

        match self.step(now, surface) {
            Ok(()) => {
                self.failures = 0;
                Tick::Stepped
            }
            Err(err) => self.record_failure(err),
        }
    }

    fn record_failure(&mut self, err: SurfaceError) -> Tick {
        self.failures += 1;
        if self.failures >= MAX_CONSECUTIVE_FAILURES {
            log::error!("rain: halting after {} failed frames: {err}", self.failures);
            self.state = LoopState::Idle;
            return Tick::Halted;
        }
        log::warn!("rain: frame failed ({}/{MAX_CONSECUTIVE_FAILURES}): {err}", self.failures);
        Tick::Failed
    }

    fn step<S: Surface + ?Sized>(&mut self, now: f64, surface: &mut S) -> Result<(), SurfaceError> {
        surface.set_fill(&self.fade_style);
        surface.fill_rect(0.0, 0.0, self.width, self.height);

        self.draw_columns(surface)?;

        if self.messages.is_due(now, self.config.max_messages) {
            self.spawn_message(now, surface)?;
        }
        self.draw_messages(now, surface)
    }

    fn draw_columns<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), SurfaceError> {
        let cfg = &self.config;
        let pitch = self.base_font * cfg.column_spacing;
        let height = self.height;

        for (i, column) in self.columns.iter_mut().enumerate() {
            let size = column.glyph_size;
            let x = i as f64 * pitch;
            surface.set_font(&format!("bold {}px {}", size, cfg.font_family));

            // The old head becomes the first trail glyph.
            if let Some(prev) = column.head_y.filter(|y| (0.0..=height).contains(y)) {
                surface.set_fill(BLACK);
                surface.fill_rect(x, prev - size, size * CELL_WIDTH, size * CELL_HEIGHT);
                surface.set_fill(&cfg.text_color);
                surface.fill_text(&random_glyph(&mut self.rng).to_string(), x, prev)?;
            }

            let y = column.pixel_y();
            surface.set_fill(&cfg.head_color);
            surface.fill_text(&random_glyph(&mut self.rng).to_string(), x, y)?;
            column.head_y = Some(y);

            column.advance(&mut self.rng, height, cfg.reset_probability, cfg.drop_speed, self.base_font);
        }
        Ok(())
    }

    fn message_font(&self) -> String {
        format!("bold {}px {}", self.base_font * MESSAGE_SCALE, self.config.font_family)
    }

    fn spawn_message<S: Surface + ?Sized>(&mut self, now: f64, surface: &mut S) -> Result<(), SurfaceError> {
        let pick = self.rng.random_range(0..self.config.messages.len());
        let text = self.config.messages[pick].clone();

        surface.set_font(&self.message_font());
        let measured = surface.measure_text(&text)?;
        let text_width = if measured > 0.0 {
            measured
        } else {
            text.chars().count() as f64 * self.base_font * FALLBACK_GLYPH_WIDTH
        };

        let message = OverlayMessage {
            x: (self.width - text_width) / 2.0,
            y: self.height / 2.0,
            text,
            created_at: now,
        };
        let next = now
            + between(
                &mut self.rng,
                self.config.message_interval_min,
                self.config.message_interval_max,
            );
        log::debug!("rain: showing {:?}, next at {next:.0}", message.text);
        self.messages.push(message, next);
        Ok(())
    }

    fn draw_messages<S: Surface + ?Sized>(&mut self, now: f64, surface: &mut S) -> Result<(), SurfaceError> {
        self.messages.retain_live(now, self.config.message_duration);
        if self.messages.active().is_empty() {
            return Ok(());
        }
        surface.set_fill(&self.config.message_color);
        surface.set_font(&self.message_font());
        for message in self.messages.active() {
            surface.fill_text(&message.text, message.x, message.y)?;
        }
        Ok(())
    }
}
