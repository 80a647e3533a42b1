//! Color palettes for hardware drawings

use image::Rgb;

use crate::core::context::GenerationContext;

/// Named pools of colors a drawing routine picks from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub metals: &'static [Rgb<u8>],
    pub composites: &'static [Rgb<u8>],
    pub highlights: &'static [Rgb<u8>],
    pub labels: &'static [Rgb<u8>],
}

/// Silver/aluminium metals, carbon composites, blue/orange/red highlights
pub const AEROSPACE: Palette = Palette {
    name: "aerospace",
    metals: &[
        Rgb([192, 192, 192]),
        Rgb([160, 160, 160]),
        Rgb([120, 120, 120]),
        Rgb([100, 100, 100]),
    ],
    composites: &[Rgb([50, 50, 50]), Rgb([30, 30, 30]), Rgb([20, 20, 20])],
    highlights: &[
        Rgb([0, 102, 204]),
        Rgb([0, 51, 153]),
        Rgb([255, 102, 0]),
        Rgb([204, 0, 0]),
    ],
    labels: &[Rgb([255, 255, 0]), Rgb([255, 102, 0]), Rgb([0, 204, 0])],
};

/// Dark metals, brown composites, fire-colored highlights
pub const ENGINE: Palette = Palette {
    name: "engine",
    metals: &[Rgb([100, 100, 100]), Rgb([80, 80, 80]), Rgb([60, 60, 60])],
    composites: &[Rgb([50, 30, 10]), Rgb([40, 25, 5]), Rgb([30, 20, 5])],
    highlights: &[Rgb([255, 60, 0]), Rgb([200, 40, 0]), Rgb([150, 30, 0])],
    labels: &[Rgb([255, 240, 0]), Rgb([240, 240, 240])],
};

/// Light metals, green circuit boards, LED highlights
pub const ELECTRONIC: Palette = Palette {
    name: "electronic",
    metals: &[Rgb([220, 220, 220]), Rgb([180, 180, 180])],
    composites: &[Rgb([0, 50, 0]), Rgb([0, 30, 0]), Rgb([0, 20, 0])],
    highlights: &[
        Rgb([255, 0, 0]),
        Rgb([0, 0, 255]),
        Rgb([0, 255, 0]),
        Rgb([255, 255, 0]),
    ],
    labels: &[Rgb([255, 255, 255]), Rgb([0, 0, 0])],
};

/// Pick one color from a pool; black for an empty pool
pub fn pick(ctx: &mut GenerationContext, pool: &[Rgb<u8>]) -> Rgb<u8> {
    ctx.choose(pool).copied().unwrap_or(Rgb([0, 0, 0]))
}

/// Jitter each channel of `base` by up to `amount` in either direction
pub fn variation(ctx: &mut GenerationContext, base: Rgb<u8>, amount: i64) -> Rgb<u8> {
    let Rgb(channels) = base;
    let mut out = [0u8; 3];
    for (slot, c) in out.iter_mut().zip(channels) {
        *slot = (c as i64 + ctx.range(-amount, amount)).clamp(0, 255) as u8;
    }
    Rgb(out)
}
