//! Four-light RGB LED bank with on/off/blink states.
//!
//! | Light | Role                              |
//! |-------|-----------------------------------|
//! | 0     | User light (`LED`/`RGB` commands) |
//! | 1     | Power indicator                   |
//! | 2     | Temperature alarm                 |
//! | 3     | Network link                      |
//!
//! Each light keeps the colour it is showing and a remembered colour it
//! returns to when switched on. The bank is pure state; the caller pushes
//! the frame to a [`PixelPort`](crate::app::ports::PixelPort) whenever a
//! mutating call or [`tick`](LedBank::tick) reports a change.

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const BLACK: Rgb = (0, 0, 0);
pub const BLUE: Rgb = (0, 0, 255);
pub const RED: Rgb = (255, 0, 0);
pub const GREEN: Rgb = (0, 255, 0);
pub const YELLOW: Rgb = (255, 255, 0);

pub const NUM_LIGHTS: usize = 4;

pub const LIGHT_USER: usize = 0;
pub const LIGHT_POWER: usize = 1;
pub const LIGHT_ALARM: usize = 2;
pub const LIGHT_NETWORK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
    Off,
    On,
    Blink,
}

impl LightMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Blink => "blink",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Light {
    mode: LightMode,
    shown: Rgb,
    remembered: Rgb,
}

pub struct LedBank {
    lights: [Light; NUM_LIGHTS],
    blink_rate_ms: u16,
    /// Parity of `now / blink_rate` at the last blink update.
    blink_phase: bool,
}

impl LedBank {
    pub fn new(blink_rate_ms: u16) -> Self {
        Self {
            lights: [Light {
                mode: LightMode::Off,
                shown: BLACK,
                remembered: BLUE,
            }; NUM_LIGHTS],
            blink_rate_ms: blink_rate_ms.max(1),
            blink_phase: false,
        }
    }

    pub fn mode(&self, light: usize) -> Option<LightMode> {
        self.lights.get(light).map(|l| l.mode)
    }

    /// Colour currently emitted (black during the dark half of a blink).
    pub fn shown(&self, light: usize) -> Option<Rgb> {
        self.lights.get(light).map(|l| l.shown)
    }

    pub fn remembered(&self, light: usize) -> Option<Rgb> {
        self.lights.get(light).map(|l| l.remembered)
    }

    pub fn blink_rate_ms(&self) -> u16 {
        self.blink_rate_ms
    }

    /// Returns `false` for a rate of zero, which cannot be blinked.
    pub fn set_blink_rate(&mut self, rate_ms: u16) -> bool {
        if rate_ms == 0 {
            return false;
        }
        self.blink_rate_ms = rate_ms;
        true
    }

    /// Switch a light on, off or into blinking. Returns `false` for an
    /// unknown light index.
    pub fn set_mode(&mut self, light: usize, mode: LightMode) -> bool {
        let Some(l) = self.lights.get_mut(light) else {
            return false;
        };
        l.mode = mode;
        match mode {
            LightMode::On => l.shown = l.remembered,
            LightMode::Off => l.shown = BLACK,
            // Picked up by the next tick.
            LightMode::Blink => {}
        }
        true
    }

    /// Set both the shown and remembered colour. A light that is not
    /// blinking turns on for any visible colour and off for (near) black.
    pub fn set_colour(&mut self, light: usize, colour: Rgb) -> bool {
        let Some(l) = self.lights.get_mut(light) else {
            return false;
        };
        l.shown = colour;
        l.remembered = colour;
        if l.mode != LightMode::Blink {
            let sum = u16::from(colour.0) + u16::from(colour.1) + u16::from(colour.2);
            l.mode = if sum > 1 { LightMode::On } else { LightMode::Off };
        }
        true
    }

    /// Advance blinking lights. Returns `true` if any shown colour changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.lights.iter().any(|l| l.mode == LightMode::Blink) {
            return false;
        }
        let phase = (now_ms / u64::from(self.blink_rate_ms)) % 2 == 1;
        if phase == self.blink_phase {
            return false;
        }
        self.blink_phase = phase;

        let mut changed = false;
        for l in self.lights.iter_mut().filter(|l| l.mode == LightMode::Blink) {
            let next = if l.shown == l.remembered { BLACK } else { l.remembered };
            changed |= next != l.shown;
            l.shown = next;
        }
        changed
    }

    /// Colours to latch onto the strip.
    pub fn frame(&self) -> [Rgb; NUM_LIGHTS] {
        core::array::from_fn(|i| self.lights[i].shown)
    }
}
