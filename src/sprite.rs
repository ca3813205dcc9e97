use crate::cache::{Cache, SpriteKey};
use crate::entity::{Shape, MAX_DEATH_ANIMATION_STAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// A rendered sprite image plus the color that counts as transparent.
/// Pixel (0, 0) is the top-left corner of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteMask {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    background: Rgb,
}

impl SpriteMask {
    /// Builds a mask from row-major pixels. Returns `None` if the pixel count
    /// does not match the dimensions or the image is empty.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>, background: Rgb) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
            background,
        })
    }

    /// A mask with every pixel painted.
    pub fn solid(width: usize, height: usize, color: Rgb, background: Rgb) -> Option<Self> {
        Self::new(width, height, vec![color; width * height], background)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn is_painted(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y).is_some_and(|pixel| pixel != self.background)
    }
}

/// Produces rendered masks for shapes. `None` means the shape has not been
/// rendered yet, which the collision engine treats as "cannot be hit".
pub trait SpriteSource {
    fn render(&mut self, shape: &Shape) -> Option<SpriteMask>;
}

/// Renders every shape as a fully opaque block at `pixels_per_unit`
/// resolution. Used when no terminal is attached.
#[derive(Debug, Clone)]
pub struct SolidSprites {
    pub pixels_per_unit: usize,
}

impl Default for SolidSprites {
    fn default() -> Self {
        Self { pixels_per_unit: 1 }
    }
}

impl SpriteSource for SolidSprites {
    fn render(&mut self, shape: &Shape) -> Option<SpriteMask> {
        let (width, height) = shape.pixel_dimensions(self.pixels_per_unit);
        SpriteMask::solid(width, height, Rgb::WHITE, Rgb::BLACK)
    }
}

const PATTERN_SIZE: usize = 8;
const DEATH_FRAME_PREFIX: &str = "death-animations/";

const STARSHIP: [&str; PATTERN_SIZE] = [
    "...##...",
    "...##...",
    "..####..",
    ".######.",
    "########",
    "##.##.##",
    "#..##..#",
    "........",
];

const BEE: [&str; PATTERN_SIZE] = [
    ".#....#.",
    "..#..#..",
    ".######.",
    "##.##.##",
    "########",
    ".######.",
    ".#.##.#.",
    "#......#",
];

const BOSS: [&str; PATTERN_SIZE] = [
    "..####..",
    ".######.",
    "##.##.##",
    "########",
    ".##..##.",
    "##.##.##",
    "#.#..#.#",
    ".#....#.",
];

const ABDUCTOR: [&str; PATTERN_SIZE] = [
    "...##...",
    ".######.",
    "#.####.#",
    "########",
    "..#..#..",
    ".#.##.#.",
    "#.#..#.#",
    "........",
];

/// Draws the built-in 8x8 sprite art at the requested pixel size, upright
/// art turned in quarter steps toward the shape's rotation. Masks are cached
/// per [`SpriteKey`] until the resolution changes.
#[derive(Debug)]
pub struct PatternSprites {
    pixels_per_unit: usize,
    ink: Rgb,
    cache: Cache<SpriteKey, Option<SpriteMask>>,
}

impl PatternSprites {
    pub fn new(pixels_per_unit: usize) -> Self {
        Self {
            pixels_per_unit: pixels_per_unit.max(1),
            ink: Rgb::WHITE,
            cache: Cache::new(),
        }
    }

    pub fn pixels_per_unit(&self) -> usize {
        self.pixels_per_unit
    }

    /// Changes the output resolution. Every cached mask is dropped.
    pub fn set_pixels_per_unit(&mut self, pixels_per_unit: usize) {
        let pixels_per_unit = pixels_per_unit.max(1);
        if pixels_per_unit != self.pixels_per_unit {
            self.pixels_per_unit = pixels_per_unit;
            self.cache.purge();
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl SpriteSource for PatternSprites {
    fn render(&mut self, shape: &Shape) -> Option<SpriteMask> {
        let key = SpriteKey::for_shape(shape, self.pixels_per_unit);
        let ink = self.ink;
        self.cache.get_or_load(key, |key| draw(key, ink)).clone()
    }
}

fn draw(key: &SpriteKey, ink: Rgb) -> Option<SpriteMask> {
    let turns = key.quarter_turns;
    let painted = pattern_for(&key.id)?;
    let (width, height) = (key.pixel_width, key.pixel_height);
    let mut pixels = Vec::with_capacity(width * height);
    for py in 0..height {
        for px in 0..width {
            let cx = px * PATTERN_SIZE / width;
            let cy = py * PATTERN_SIZE / height;
            let (sx, sy) = rotate(cx, cy, turns);
            pixels.push(if painted(sx, sy) { ink } else { Rgb::BLACK });
        }
    }
    SpriteMask::new(width, height, pixels, Rgb::BLACK)
}

fn rotate(x: usize, y: usize, turns: usize) -> (usize, usize) {
    let last = PATTERN_SIZE - 1;
    match turns {
        1 => (last - y, x),
        2 => (last - x, last - y),
        3 => (y, last - x),
        _ => (x, y),
    }
}

fn pattern_for(id: &str) -> Option<Box<dyn Fn(usize, usize) -> bool>> {
    let art = match id {
        "starship" => STARSHIP,
        "bee" => BEE,
        "boss" => BOSS,
        "abductor" => ABDUCTOR,
        _ => {
            let stage: u32 = id.strip_prefix(DEATH_FRAME_PREFIX)?.parse().ok()?;
            return Some(Box::new(move |x, y| explosion_ring(stage, x, y)));
        }
    };
    Some(Box::new(move |x, y| art[y].as_bytes()[x] == b'#'))
}

/// Death frames are a ring that widens as the stage advances.
fn explosion_ring(stage: u32, x: usize, y: usize) -> bool {
    let center = (PATTERN_SIZE as f64 - 1.0) / 2.0;
    let radius = 0.5 + 3.5 * f64::from(stage) / f64::from(MAX_DEATH_ANIMATION_STAGE);
    let dx = x as f64 - center;
    let dy = y as f64 - center;
    ((dx * dx + dy * dy).sqrt() - radius).abs() < 0.8
}
