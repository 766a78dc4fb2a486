use rand::Rng;

/// First code point of the glyph block (katakana).
pub const GLYPH_BASE: u32 = 0x30A0;
pub const GLYPH_COUNT: u32 = 96;

/// Speed and size jitter for columns laid out by a resize.
const SPAWN_SPEED: (f64, f64) = (0.6, 1.2);
const SPAWN_SIZE: (f64, f64) = (0.65, 1.0);
/// Jitter for a column restarting at the top after leaving the screen.
const RESTART_SPEED: (f64, f64) = (0.8, 1.2);
const RESTART_SIZE: (f64, f64) = (0.85, 1.15);

/// Uniform sample in `[min, max)`; tolerates `min == max`.
pub fn between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.random::<f64>() * (max - min)
}

pub fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from_u32(GLYPH_BASE + rng.random_range(0..GLYPH_COUNT)).unwrap_or('\u{30A2}')
}

/// One vertical stream of falling glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Fall position in rows of this column's glyph size; negative above the top.
    pub position: f64,
    /// Rows advanced per step.
    pub speed: f64,
    pub glyph_size: f64,
    /// Pixel y of the head drawn on the previous step.
    pub head_y: Option<f64>,
}

impl Column {
    /// A fresh column somewhere above the screen, so streams enter staggered.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, base_speed: f64, base_font: f64, height: f64) -> Self {
        let glyph_size = base_font * between(rng, SPAWN_SIZE.0, SPAWN_SIZE.1);
        let position = rng.random::<f64>() * -(height / glyph_size);
        let speed = base_speed * between(rng, SPAWN_SPEED.0, SPAWN_SPEED.1);
        Self {
            position,
            speed,
            glyph_size,
            head_y: None,
        }
    }

    pub fn pixel_y(&self) -> f64 {
        self.position * self.glyph_size
    }

    /// Moves the column down one step. Once it is past `height`, each call
    /// restarts it at the top with probability `reset_probability`; returns
    /// whether it restarted.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        height: f64,
        reset_probability: f64,
        base_speed: f64,
        base_font: f64,
    ) -> bool {
        self.position += self.speed;
        if self.pixel_y() > height && rng.random::<f64>() < reset_probability {
            self.restart(rng, base_speed, base_font);
            return true;
        }
        false
    }

    fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R, base_speed: f64, base_font: f64) {
        self.position = 0.0;
        self.speed = base_speed * between(rng, RESTART_SPEED.0, RESTART_SPEED.1);
        self.glyph_size = base_font * between(rng, RESTART_SIZE.0, RESTART_SIZE.1);
        self.head_y = None;
    }
}
