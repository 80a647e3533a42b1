//! Schematic drawing routines, one per component category
//!
//! Shapes are placed by fractions of the canvas size so both orientations
//! work. Only sub-element placement is random (fill levels, valve state,
//! texture spots); structure is fixed per category.

use std::f32::consts::PI;

use image::Rgb;

use crate::core::context::GenerationContext;
use crate::hardware::palette::{pick, variation, Palette};
use crate::raster::{shade, Canvas, Paint, BLACK};

/// Paints one component onto the canvas
pub type Drawer = fn(&mut Canvas, &mut GenerationContext, &Palette);

fn size(canvas: &Canvas) -> (i32, i32) {
    (canvas.width() as i32, canvas.height() as i32)
}

/// `v * f`, truncated
fn at(v: i32, f: f32) -> i32 {
    (v as f32 * f) as i32
}

pub fn rocket_engine(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);
    let cx = w / 2;

    let nozzle = pick(ctx, palette.metals);
    canvas.polygon(
        &[(cx - 150, h / 4), (cx + 150, h / 4), (cx + 250, h * 3 / 4), (cx - 250, h * 3 / 4)],
        Paint::solid(nozzle),
    );
    let interior = pick(ctx, palette.highlights);
    canvas.polygon(
        &[
            (cx - 120, h / 4 + 20),
            (cx + 120, h / 4 + 20),
            (cx + 220, h * 3 / 4 - 20),
            (cx - 220, h * 3 / 4 - 20),
        ],
        Paint::solid(interior),
    );

    let chamber = pick(ctx, palette.metals);
    canvas.rect(cx - 100, h / 8, cx + 100, h / 4, Paint::solid(chamber));

    let fuel_line = pick(ctx, palette.metals);
    canvas.rect(cx - 80, h / 16, cx - 60, h / 8, Paint::solid(fuel_line));
    canvas.rect(cx + 60, h / 16, cx + 80, h / 8, Paint::solid(fuel_line));

    let pump = pick(ctx, palette.metals);
    canvas.ellipse(cx - 40, h / 32, cx + 40, h / 8, Paint::solid(pump));

    // cooling channels
    for i in (-200..=200).step_by(40) {
        canvas.line((cx + i, h / 4), (cx + at(i, 1.6), h * 3 / 4), BLACK, 2);
    }
}

pub fn solar_panel(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);

    let backing = pick(ctx, palette.composites);
    canvas.rect(w / 10, h / 10, w * 9 / 10, h * 9 / 10, Paint::solid(backing));

    let cell_w = (w * 8 / 10) / 8;
    let cell_h = (h * 8 / 10) / 10;
    let cell = Rgb([20, 30, 80]);
    for row in 0..10 {
        for col in 0..8 {
            let x = w / 10 + col * cell_w;
            let y = h / 10 + row * cell_h;
            canvas.rect(x, y, x + cell_w - 2, y + cell_h - 2, Paint::solid(cell));
        }
    }

    let hinge = pick(ctx, palette.metals);
    canvas.rect(w / 20, h * 4 / 10, w / 10, h * 6 / 10, Paint::solid(hinge));

    let connector = pick(ctx, palette.highlights);
    canvas.rect(w / 40, at(h, 0.45), w / 20, at(h, 0.55), Paint::solid(connector));

    // bus bars
    for row in 0..=10 {
        let y = h / 10 + row * cell_h;
        canvas.line((w / 10, y), (w * 9 / 10, y), Rgb([120, 120, 120]), 1);
    }
}

pub fn landing_gear(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);

    let strut = pick(ctx, palette.metals);
    canvas.rect(w * 4 / 10, h / 10, w * 6 / 10, h * 8 / 10, Paint::solid(strut));

    let housing = pick(ctx, palette.metals);
    canvas.rect(w * 3 / 10, h * 7 / 10, w * 7 / 10, h * 9 / 10, Paint::solid(housing));

    canvas.ellipse(at(w, 0.35), at(h, 0.75), at(w, 0.65), at(h, 0.95), Paint::solid(Rgb([30, 30, 30])));
    let rim = pick(ctx, palette.metals);
    canvas.ellipse(at(w, 0.425), at(h, 0.825), at(w, 0.575), at(h, 0.875), Paint::solid(rim));

    let cylinder = pick(ctx, palette.metals);
    canvas.rect(at(w, 0.25), h * 3 / 10, at(w, 0.35), h * 6 / 10, Paint::solid(cylinder));
    let piston = pick(ctx, palette.highlights);
    canvas.rect(at(w, 0.275), h * 2 / 10, at(w, 0.325), h * 3 / 10, Paint::solid(piston));

    let linkage = pick(ctx, palette.metals);
    canvas.line((at(w, 0.35), h * 4 / 10), (w * 4 / 10, h * 3 / 10), linkage, 5);
    canvas.line((at(w, 0.35), h * 5 / 10), (w * 4 / 10, h * 6 / 10), linkage, 5);
}

pub fn avionics(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);

    let housing = pick(ctx, palette.metals);
    canvas.rect(w / 10, h / 10, w * 9 / 10, h * 9 / 10, Paint::solid(housing));
    let panel = pick(ctx, palette.metals);
    canvas.rect(w / 10, h / 10, w * 9 / 10, h * 2 / 10, Paint::solid(panel));

    let board = pick(ctx, palette.composites);
    let (bx1, by1, bx2, by2) = (w * 2 / 10, h * 3 / 10, w * 8 / 10, h * 8 / 10);
    canvas.rect(bx1, by1, bx2, by2, Paint::solid(board));
    electronic_components(canvas, ctx, (bx1, by1, bx2, by2), 20, palette.highlights);

    for i in 0..3 {
        let y = h * (3 + i) / 10;
        let left = pick(ctx, palette.highlights);
        canvas.rect(w / 10 - 10, y, w / 10, y + h / 20, Paint::solid(left));
        let right = pick(ctx, palette.highlights);
        canvas.rect(w * 9 / 10, y, w * 9 / 10 + 10, y + h / 20, Paint::solid(right));
    }

    // indicator LEDs
    for i in 0..4 {
        let x = w * (2 + 2 * i) / 10;
        let led = pick(ctx, palette.highlights);
        canvas.ellipse(x, at(h, 0.125), x + w / 40, at(h, 0.175), Paint::solid(led));
    }
}

pub fn fuel_tank(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);

    let tank = pick(ctx, palette.metals);
    canvas.ellipse(w / 4, h / 10, w * 3 / 4, h * 9 / 10, Paint::solid(tank));

    let ridge = shade(tank, -20);
    for i in 1..10 {
        let y = h * i / 10;
        canvas.line((w / 4, y), (w * 3 / 4, y), ridge, 2);
    }

    let valve = pick(ctx, palette.metals);
    canvas.rect(w * 2 / 5, h / 20, w * 3 / 5, h / 10, Paint::solid(valve));
    canvas.rect(w * 2 / 5, h * 9 / 10, w * 3 / 5, h * 19 / 20, Paint::solid(valve));

    let port = pick(ctx, palette.highlights);
    canvas.ellipse(w * 3 / 4 - 10, h * 4 / 10, w * 3 / 4 + 10, h * 5 / 10, Paint::solid(port));

    // level gauge with a random fill height
    let indicator = pick(ctx, palette.highlights);
    canvas.rect(w * 3 / 4 - 5, h * 2 / 10, w * 3 / 4 + 5, h * 8 / 10, Paint::solid(Rgb([220, 220, 220])));
    let level = ctx.range(3, 7) as i32;
    canvas.rect(w * 3 / 4 - 4, h * level / 10, w * 3 / 4 + 4, h * 8 / 10, Paint::fill(indicator));
}

pub fn heat_shield(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);

    let shield = pick(ctx, palette.composites);
    let thickness = (h / 8).max(1) as u32;
    canvas.arc((w / 10, h / 10, w * 9 / 10, h * 19 / 10), 180.0, 0.0, shield, thickness);

    // ablative texture
    for _ in 0..20 {
        let x = ctx.range((w / 5) as i64, (w * 4 / 5) as i64) as i32;
        let dip = (x - w / 2) * (x - w / 2) / 1000;
        let y = h - dip - ctx.range(10, 30) as i32;
        let spot = ctx.range(5, 15) as i32;
        let color = variation(ctx, shield, 20);
        canvas.ellipse(x, y, x + spot, y + spot, Paint::fill(color));
    }

    let attachment = pick(ctx, palette.metals);
    for i in 0..3 {
        let x = w * (i + 1) / 4;
        let y = h / 5;
        canvas.rect(x - 10, y - 10, x + 10, y + 10, Paint::solid(attachment));
    }

    let (cx, cy, radius) = (w as f32 / 2.0, h as f32 * 1.7, w as f32 * 0.4);
    let sensor = pick(ctx, palette.highlights);
    for i in 0..4 {
        let angle = PI * (0.3 + 0.15 * i as f32);
        let x = (cx + radius * angle.cos()) as i32;
        let y = (cy - radius * angle.sin()) as i32;
        canvas.ellipse(x - 5, y - 5, x + 5, y + 5, Paint::solid(sensor));
        let drift = ctx.range(-30, 30) as i32;
        canvas.line((x, y), (x + drift, h / 5), Rgb([50, 50, 50]), 2);
    }

    // edge seal
    for degrees in (180..=360).step_by(5) {
        let angle = (degrees as f32).to_radians();
        let x = (cx + radius * angle.cos()) as i32;
        let y = (cy - radius * angle.sin()) as i32;
        canvas.ellipse(x - 2, y - 2, x + 2, y + 2, Paint::fill(Rgb([30, 30, 30])));
    }
}

/// Upper and lower airfoil surface heights at `x`
fn airfoil(x: i32, w: i32, h: i32) -> (i32, i32) {
    let t = 2.0 * (x as f32 / w as f32 - 0.5);
    let bulge = 1.0 - t * t;
    let upper = h / 2 - ((h / 3) as f32 * bulge) as i32;
    let lower = h / 2 + ((h / 6) as f32 * bulge) as i32;
    (upper, lower)
}

fn airfoil_outline(from: i32, to: i32, w: i32, h: i32) -> Vec<(i32, i32)> {
    let mut points: Vec<(i32, i32)> = (from..to).step_by(10).map(|x| (x, airfoil(x, w, h).0)).collect();
    let mut x = to;
    while x > from {
        points.push((x, airfoil(x, w, h).1));
        x -= 10;
    }
    points
}

pub fn control_surface(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);

    let skin = pick(ctx, palette.composites);
    canvas.polygon(&airfoil_outline(w / 10, w * 9 / 10, w, h), Paint::solid(skin));

    let hinge = pick(ctx, palette.metals);
    canvas.line((w * 7 / 10, h / 3), (w * 7 / 10, h * 2 / 3), hinge, 3);

    let flap = pick(ctx, palette.composites);
    canvas.polygon(&airfoil_outline(w * 7 / 10, w * 9 / 10, w, h), Paint::solid(flap));

    let actuator = pick(ctx, palette.metals);
    canvas.rect(w * 6 / 10, h * 5 / 12, w * 7 / 10, h * 7 / 12, Paint::solid(actuator));
    canvas.line((w * 7 / 10, h / 2), (w * 8 / 10, h / 2), actuator, 3);

    let rib = pick(ctx, palette.metals);
    for i in 1..6 {
        let x = w * i / 6;
        if x < w * 7 / 10 {
            let (upper, lower) = airfoil(x, w, h);
            canvas.line((x, upper), (x, lower), rib, 2);
        }
    }
}

pub fn propellant_valve(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);

    let body = pick(ctx, palette.metals);
    canvas.rect(w / 4, h / 3, w * 3 / 4, h * 2 / 3, Paint::solid(body));
    let inlet = pick(ctx, palette.metals);
    canvas.rect(w / 8, h * 2 / 5, w / 4, h * 3 / 5, Paint::solid(inlet));
    let outlet = pick(ctx, palette.metals);
    canvas.rect(w * 3 / 4, h * 2 / 5, w * 7 / 8, h * 3 / 5, Paint::solid(outlet));

    let actuator = pick(ctx, palette.metals);
    canvas.rect(w * 2 / 5, h / 6, w * 3 / 5, h / 3, Paint::solid(actuator));
    let solenoid = pick(ctx, palette.highlights);
    canvas.ellipse(w * 3 / 8, h / 5, w * 5 / 8, h * 7 / 20, Paint::solid(solenoid));

    // flow path, then the poppet in a random state
    let poppet = pick(ctx, palette.highlights);
    canvas.rect(w / 4, h * 9 / 20, w * 3 / 4, h * 11 / 20, Paint::fill(Rgb([220, 220, 220])));
    if ctx.chance(0.5) {
        canvas.rect(w * 7 / 16, h / 3, w * 9 / 16, h * 3 / 5, Paint::solid(poppet));
    } else {
        canvas.rect(w * 7 / 16, h / 3, w * 9 / 16, h / 2, Paint::solid(poppet));
        canvas.rect(w * 3 / 8, h * 9 / 20, w * 5 / 8, h * 11 / 20, Paint::fill(poppet));
    }

    canvas.ellipse(w * 5 / 8, h * 2 / 3, w * 3 / 4, h * 5 / 6, Paint::solid(Rgb([220, 220, 220])));
    let needle = (ctx.unit() as f32) * PI * 0.8 + PI * 0.1;
    let (cx, cy) = (w * 11 / 16, h * 3 / 4);
    let reach = (w / 16) as f32;
    let end = (cx + (reach * needle.cos()) as i32, cy - (reach * needle.sin()) as i32);
    canvas.line((cx, cy), end, Rgb([255, 0, 0]), 2);
}

pub fn payload_fairing(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);
    let cx = w / 2;
    let half_span = (w * 4 / 10).max(1);

    let shell = pick(ctx, palette.composites);
    let mut points: Vec<(i32, i32)> = Vec::new();
    for x in (w / 10..w * 9 / 10).step_by(10) {
        let rel = (x - cx) as f32 / half_span as f32;
        if rel.abs() <= 1.0 {
            let y = ((h * 8 / 10) as f32 * (1.0 - rel * rel).sqrt()) as i32;
            points.push((x, h / 10 + y));
        }
    }
    points.push((w * 9 / 10, h * 9 / 10));
    points.push((w / 10, h * 9 / 10));
    canvas.polygon(&points, Paint::solid(shell));

    let separation = pick(ctx, palette.metals);
    canvas.line((cx, h / 10), (cx, h * 9 / 10), separation, 3);

    let cord = if ctx.chance(0.5) { Rgb([255, 80, 0]) } else { Rgb([240, 240, 0]) };
    for i in 1..9 {
        let y = h * i / 10;
        canvas.ellipse(cx - 5, y - 5, cx + 5, y + 5, Paint::solid(cord));
    }

    // acoustic blanket patches, clear of the separation line
    let blanket = shade(shell, 30);
    for _ in 0..20 {
        let x = ctx.range((w / 8) as i64, (w * 7 / 8) as i64) as i32;
        if (x - cx).abs() < 20 {
            continue;
        }
        let y = ctx.range((h / 8) as i64, (h * 7 / 8) as i64) as i32;
        let patch = ctx.range(10, 30) as i32;
        canvas.rect(x, y, x + patch, y + patch, Paint::fill(blanket));
    }

    let port = pick(ctx, palette.metals);
    let port_x = if ctx.chance(0.5) { w / 4 } else { w * 3 / 4 };
    canvas.ellipse(port_x - 20, h / 2 - 20, port_x + 20, h / 2 + 20, Paint::solid(port));

    for i in 0..3 {
        let side = if ctx.chance(0.5) { w / 4 } else { w * 3 / 4 };
        let x = side + ctx.range(-30, 30) as i32;
        let y = h * (i + 1) / 4;
        let r = ctx.range(5, 10) as i32;
        canvas.ellipse(x - r, y - r, x + r, y + r, Paint::solid(Rgb([50, 50, 50])));
    }
}

pub fn docking_mechanism(canvas: &mut Canvas, ctx: &mut GenerationContext, palette: &Palette) {
    let (w, h) = size(canvas);
    let (cx, cy) = (w / 2, h / 2);

    let ring = pick(ctx, palette.metals);
    canvas.ring(w / 4, h / 4, w * 3 / 4, h * 3 / 4, ring, 10);

    let inner = pick(ctx, palette.metals);
    canvas.ellipse(w * 3 / 8, h * 3 / 8, w * 5 / 8, h * 5 / 8, Paint::solid(inner));

    let guide = pick(ctx, palette.highlights);
    for i in 0..4 {
        let angle = i as f32 * PI / 2.0;
        let x = cx + ((w * 3 / 10) as f32 * angle.cos()) as i32;
        let y = cy + ((h * 3 / 10) as f32 * angle.sin()) as i32;
        canvas.ellipse(x - 10, y - 10, x + 10, y + 10, Paint::solid(guide));
    }

    let latch = pick(ctx, palette.metals);
    for i in 0..8 {
        let angle = i as f32 * PI / 4.0;
        let x = cx + ((w * 2 / 8) as f32 * angle.cos()) as i32;
        let y = cy + ((h * 2 / 8) as f32 * angle.sin()) as i32;
        canvas.rect(x - 8, y - 8, x + 8, y + 8, Paint::solid(latch));
        let arm = (x + (15.0 * angle.cos()) as i32, y + (15.0 * angle.sin()) as i32);
        canvas.line((x, y), arm, latch, 4);
    }

    let connector = pick(ctx, palette.highlights);
    for (x, y) in [
        (cx, h * 3 / 4 - 10),
        (cx, h / 4 + 10),
        (w * 3 / 4 - 10, cy),
        (w / 4 + 10, cy),
    ] {
        canvas.rect(x - 7, y - 7, x + 7, y + 7, Paint::solid(connector));
    }

    canvas.ring(w * 5 / 16, h * 5 / 16, w * 11 / 16, h * 11 / 16, Rgb([50, 50, 50]), 3);

    // shock attenuators
    let spring = pick(ctx, palette.metals);
    for i in 0..4 {
        let angle = i as f32 * PI / 2.0 + PI / 4.0;
        let x = cx + ((w * 5 / 16) as f32 * angle.cos()) as i32;
        let y = cy + ((h * 5 / 16) as f32 * angle.sin()) as i32;
        for j in 0..3 {
            let r = 5 + j * 3;
            canvas.ring(x - r, y - r, x + r, y + r, spring, 2);
        }
    }
}

/// Scatter chips and capacitors over a board region
fn electronic_components(
    canvas: &mut Canvas,
    ctx: &mut GenerationContext,
    region: (i32, i32, i32, i32),
    count: usize,
    colors: &[Rgb<u8>],
) {
    let (x1, y1, x2, y2) = region;
    for _ in 0..count {
        let x = ctx.range(x1 as i64, x2 as i64) as i32;
        let y = ctx.range(y1 as i64, y2 as i64) as i32;
        let size = ctx.range(10, 30) as i32;
        let color = pick(ctx, colors);
        if ctx.chance(0.3) {
            canvas.rect(x, y, x + size, y + size / 2, Paint::solid(color));
        } else {
            canvas.ellipse(x, y, x + size / 2, y + size / 2, Paint::solid(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::palette::{AEROSPACE, ELECTRONIC, ENGINE};
    use crate::raster::WHITE;

    const ALL: [(&str, Drawer); 10] = [
        ("rocket_engine", rocket_engine),
        ("solar_panel", solar_panel),
        ("landing_gear", landing_gear),
        ("avionics", avionics),
        ("fuel_tank", fuel_tank),
        ("heat_shield", heat_shield),
        ("control_surface", control_surface),
        ("propellant_valve", propellant_valve),
        ("payload_fairing", payload_fairing),
        ("docking_mechanism", docking_mechanism),
    ];

    #[test]
    fn test_every_drawer_paints_in_both_orientations() {
        let mut ctx = GenerationContext::seeded(101);
        for (name, draw) in ALL {
            for (w, h) in [(800, 600), (600, 800)] {
                for palette in [AEROSPACE, ENGINE, ELECTRONIC] {
                    let mut canvas = Canvas::new(w, h, WHITE);
                    draw(&mut canvas, &mut ctx, &palette);
                    let painted = canvas.image().pixels().filter(|p| **p != WHITE).count();
                    assert!(painted > 1000, "{name} drew almost nothing at {w}x{h}");
                }
            }
        }
    }

    #[test]
    fn test_tiny_canvas_does_not_panic() {
        let mut ctx = GenerationContext::seeded(102);
        for (_, draw) in ALL {
            let mut canvas = Canvas::new(8, 8, WHITE);
            draw(&mut canvas, &mut ctx, &AEROSPACE);
        }
    }

    #[test]
    fn test_airfoil_is_thicker_at_mid_chord() {
        let (up_mid, low_mid) = airfoil(400, 800, 600);
        let (up_edge, low_edge) = airfoil(100, 800, 600);
        assert!(low_mid - up_mid > low_edge - up_edge);
    }
}
