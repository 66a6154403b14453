//! Voxel entity and color helpers

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Largest packed 24-bit RGB value
pub const MAX_PACKED_RGB: u32 = 0xFF_FFFF;

/// Color with channels normalized to [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Unpack a 24-bit `0xRRGGBB` value. Bits above 24 are ignored.
    pub fn from_packed(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Pack into `0xRRGGBB`, rounding each channel to the nearest byte
    pub fn to_packed(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex_string(&self) -> String {
        format!("#{:06x}", self.to_packed())
    }

    /// Euclidean distance between the two normalized triples
    pub fn distance(&self, other: &Rgb) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Parse `#RRGGBB` or `RRGGBB` into a packed value
pub fn parse_hex_color(text: &str) -> Option<u32> {
    let digits = text.trim().strip_prefix('#').unwrap_or(text.trim());
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// A simulated unit cube.
///
/// Kinematic fields are only meaningful while the engine is dismantling;
/// they are zero after a load.
#[derive(Clone, Debug, PartialEq)]
pub struct Voxel {
    /// Index within the currently loaded shape
    pub id: usize,
    pub position: Vec3,
    pub color: Rgb,
    pub velocity: Vec3,
    /// Euler angles (XYZ order), radians
    pub rotation: Vec3,
    pub angular_velocity: Vec3,
}

impl Voxel {
    /// Create a voxel at rest
    pub fn new(id: usize, position: Vec3, color: Rgb) -> Self {
        Self {
            id,
            position,
            color,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    /// Zero all destruction kinematics, keeping position and color
    pub fn settle(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }
}
