//! Hardware image generator
//!
//! A component name is classified into one of ten [`ComponentCategory`]
//! values by keyword, in a fixed priority order. Each category owns one
//! drawing routine and one [`Palette`]. The image is drawn on a light gray
//! canvas, framed, captioned and written as a JPEG.

pub mod drawers;
pub mod palette;

use std::fmt;
use std::path::{Path, PathBuf};

use image::Rgb;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::core::catalog::sanitize_filename;
use crate::core::context::GenerationContext;
use crate::core::layout::{draw_unused, hardware_filename, photograph_filename};
use crate::raster::{Canvas, FontFace, RasterFormat, TextStyle, BLACK};

pub use drawers::Drawer;
pub use palette::Palette;

const BACKGROUND: Rgb<u8> = Rgb([240, 240, 240]);
const BORDER_WIDTH: u32 = 2;
const CAPTION_SIZE: f32 = 20.0;
/// Distance of the first caption line from the bottom edge
const CAPTION_OFFSET: i32 = 30;

/// The drawing category a component name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentCategory {
    Engine,
    SolarPanel,
    LandingGear,
    Avionics,
    FuelTank,
    HeatShield,
    ControlSurface,
    Valve,
    Fairing,
    Docking,
}

/// Keyword sets in match priority order; the first category with a keyword
/// contained in the lower-cased name wins
pub const CATEGORY_RULES: [(&[&str], ComponentCategory); 10] = [
    (
        &["engine", "nozzle", "combustion", "turbopump", "propulsion", "thruster"],
        ComponentCategory::Engine,
    ),
    (
        &["solar", "panel", "array", "pv", "photovoltaic"],
        ComponentCategory::SolarPanel,
    ),
    (
        &["landing", "gear", "wheel", "strut", "shock", "absorber"],
        ComponentCategory::LandingGear,
    ),
    (
        &["avionics", "computer", "electronic", "controller", "circuit", "board"],
        ComponentCategory::Avionics,
    ),
    (
        &["tank", "fuel", "propellant", "storage", "container"],
        ComponentCategory::FuelTank,
    ),
    (
        &["heat", "shield", "thermal", "ablative", "protection"],
        ComponentCategory::HeatShield,
    ),
    (
        &["control", "surface", "aileron", "rudder", "elevator", "flap"],
        ComponentCategory::ControlSurface,
    ),
    (
        &["valve", "regulator", "flow", "control", "relief", "check"],
        ComponentCategory::Valve,
    ),
    (
        &["fairing", "payload", "shroud", "nose", "cone", "cowling"],
        ComponentCategory::Fairing,
    ),
    (
        &["dock", "latch", "mechanism", "capture", "port", "berthing"],
        ComponentCategory::Docking,
    ),
];

impl ComponentCategory {
    pub fn all() -> [ComponentCategory; 10] {
        CATEGORY_RULES.map(|(_, category)| category)
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        CATEGORY_RULES
            .iter()
            .find(|(_, category)| category == self)
            .map(|(keywords, _)| *keywords)
            .unwrap_or(&[])
    }

    pub fn drawer(&self) -> Drawer {
        match self {
            ComponentCategory::Engine => drawers::rocket_engine,
            ComponentCategory::SolarPanel => drawers::solar_panel,
            ComponentCategory::LandingGear => drawers::landing_gear,
            ComponentCategory::Avionics => drawers::avionics,
            ComponentCategory::FuelTank => drawers::fuel_tank,
            ComponentCategory::HeatShield => drawers::heat_shield,
            ComponentCategory::ControlSurface => drawers::control_surface,
            ComponentCategory::Valve => drawers::propellant_valve,
            ComponentCategory::Fairing => drawers::payload_fairing,
            ComponentCategory::Docking => drawers::docking_mechanism,
        }
    }

    pub fn palette(&self) -> &'static Palette {
        match self {
            ComponentCategory::Engine => &palette::ENGINE,
            ComponentCategory::Avionics => &palette::ELECTRONIC,
            _ => &palette::AEROSPACE,
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentCategory::Engine => "engine",
            ComponentCategory::SolarPanel => "solar_panel",
            ComponentCategory::LandingGear => "landing_gear",
            ComponentCategory::Avionics => "avionics",
            ComponentCategory::FuelTank => "fuel_tank",
            ComponentCategory::HeatShield => "heat_shield",
            ComponentCategory::ControlSurface => "control_surface",
            ComponentCategory::Valve => "valve",
            ComponentCategory::Fairing => "fairing",
            ComponentCategory::Docking => "docking",
        };
        write!(f, "{}", name)
    }
}

/// Classify a component name; unmatched names are avionics
pub fn component_category(name: &str) -> ComponentCategory {
    let lower = name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(ComponentCategory::Avionics)
}

/// Drawing routine and palette for a component name
pub fn get_component_drawer(name: &str) -> (Drawer, &'static Palette) {
    let category = component_category(name);
    (category.drawer(), category.palette())
}

/// Image orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Pixel size as `(width, height)`
    pub fn size(&self) -> (u32, u32) {
        match self {
            Orientation::Landscape => (800, 600),
            Orientation::Portrait => (600, 800),
        }
    }

    pub fn random(ctx: &mut GenerationContext) -> Self {
        if ctx.chance(0.5) {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Portrait => write!(f, "portrait"),
        }
    }
}

/// Errors raised while producing a hardware image
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("cannot create directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot save image {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no component names to choose from")]
    NoComponents,

    #[error("no unused file name for {0:?}")]
    NameTaken(PathBuf),
}

/// Draws and saves hardware images
#[derive(Debug, Clone)]
pub struct HardwareImageGenerator {
    caption: TextStyle,
}

impl HardwareImageGenerator {
    /// `font_path` is tried before the system font locations
    pub fn new(font_path: Option<&Path>) -> Self {
        Self::with_face(FontFace::load(font_path))
    }

    pub fn with_face(face: FontFace) -> Self {
        Self {
            caption: TextStyle::new(face, CAPTION_SIZE),
        }
    }

    /// Draw a framed, captioned image of `component` without saving it
    pub fn render_image(&self, ctx: &mut GenerationContext, component: &str, orientation: Orientation) -> Canvas {
        let (width, height) = orientation.size();
        let mut canvas = Canvas::new(width, height, BACKGROUND);

        let category = component_category(component);
        debug!(component, %category, "drawing hardware image");
        (category.drawer())(&mut canvas, ctx, category.palette());

        canvas.border(BLACK, BORDER_WIDTH);

        let cx = width as i32 / 2;
        let line = self.caption.line_height() as i32;
        let y = height as i32 - CAPTION_OFFSET - line;
        canvas.centered_text(cx, y, &format!("Component: {}", component), &self.caption, BLACK);
        canvas.centered_text(cx, y + line, &format!("Orientation: {}", orientation), &self.caption, BLACK);
        canvas
    }

    /// Write `hardware_<component>_<NNNN>.jpeg` into `dir`
    ///
    /// The four-digit disambiguator is redrawn while it names an existing file.
    pub fn generate_hardware_image(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        component: &str,
        orientation: Orientation,
    ) -> Result<PathBuf, HardwareError> {
        let component = sanitize_filename(component);
        let canvas = self.render_image(ctx, &component, orientation);
        let filename = draw_unused(
            || hardware_filename(&component, ctx.range(1000, 9999) as u16),
            |name| dir.join(name),
        )
        .map_err(HardwareError::NameTaken)?;
        self.save(&canvas, dir, &filename)
    }

    /// Write `photo_<index>_<component>.jpeg` into `dir`, in a random orientation
    pub fn save_photograph(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        index: usize,
        component: &str,
    ) -> Result<PathBuf, HardwareError> {
        let component = sanitize_filename(component);
        let orientation = Orientation::random(ctx);
        let canvas = self.render_image(ctx, &component, orientation);
        self.save(&canvas, dir, &photograph_filename(index, &component))
    }

    /// Generate `count` images of randomly chosen components
    ///
    /// Failed images are logged and skipped; only created paths are returned.
    pub fn generate_multiple_images(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        components: &[String],
        count: usize,
    ) -> Result<Vec<PathBuf>, HardwareError> {
        if components.is_empty() {
            return Err(HardwareError::NoComponents);
        }
        ensure_dir(dir)?;

        info!(count, dir = %dir.display(), "generating hardware images");
        let mut created = Vec::with_capacity(count);
        for i in 0..count {
            let component = ctx.pick(components);
            let orientation = Orientation::random(ctx);
            match self.generate_hardware_image(ctx, dir, &component, orientation) {
                Ok(path) => created.push(path),
                Err(e) => error!(
                    image = i + 1,
                    count,
                    component = %component,
                    error = %e,
                    "hardware image failed"
                ),
            }
        }
        Ok(created)
    }

    fn save(&self, canvas: &Canvas, dir: &Path, filename: &str) -> Result<PathBuf, HardwareError> {
        ensure_dir(dir)?;
        let path = dir.join(filename);
        canvas
            .save(&path, RasterFormat::Jpeg)
            .map_err(|source| HardwareError::Save {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "hardware image created");
        Ok(path)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), HardwareError> {
    std::fs::create_dir_all(dir).map_err(|source| HardwareError::Directory {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::ArtifactName;
    use tempfile::tempdir;

    fn generator() -> HardwareImageGenerator {
        HardwareImageGenerator::with_face(FontFace::Bitmap)
    }

    #[test]
    fn test_first_matching_category_wins() {
        assert_eq!(component_category("Main Engine Nozzle"), ComponentCategory::Engine);
        assert_eq!(component_category("Deployable Solar Array"), ComponentCategory::SolarPanel);
        assert_eq!(component_category("Nose Gear Strut"), ComponentCategory::LandingGear);
        assert_eq!(component_category("Flight Computer"), ComponentCategory::Avionics);
        assert_eq!(component_category("LOX Tank"), ComponentCategory::FuelTank);
        assert_eq!(component_category("Ablative Heat Shield"), ComponentCategory::HeatShield);
        // "control" is registered to both; the control-surface rule comes first
        assert_eq!(component_category("Flow Control Unit"), ComponentCategory::ControlSurface);
        assert_eq!(component_category("Pressure Relief Valve"), ComponentCategory::Valve);
        assert_eq!(component_category("Payload Fairing"), ComponentCategory::Fairing);
        assert_eq!(component_category("Berthing Latch"), ComponentCategory::Docking);
    }

    #[test]
    fn test_unmatched_names_default_to_avionics() {
        for name in ["Gyroscope", "Star Tracker", ""] {
            assert_eq!(component_category(name), ComponentCategory::Avionics);
            let (drawer, palette) = get_component_drawer(name);
            assert_eq!(drawer as usize, drawers::avionics as usize);
            assert_eq!(palette.name, "electronic");
        }
    }

    #[test]
    fn test_every_keyword_resolves_to_first_registering_category() {
        for (keywords, _) in CATEGORY_RULES {
            for keyword in keywords {
                let expected = CATEGORY_RULES
                    .iter()
                    .find(|(ks, _)| ks.iter().any(|k| keyword.contains(k)))
                    .map(|(_, c)| *c)
                    .unwrap();
                let name = format!("Test {} Assembly", keyword.to_uppercase());
                assert_eq!(component_category(&name), expected, "keyword {keyword}");
                let (drawer, _) = get_component_drawer(&name);
                assert_eq!(drawer as usize, expected.drawer() as usize);
            }
        }
    }

    #[test]
    fn test_palettes_per_category() {
        assert_eq!(ComponentCategory::Engine.palette().name, "engine");
        assert_eq!(ComponentCategory::Avionics.palette().name, "electronic");
        assert_eq!(ComponentCategory::Docking.palette().name, "aerospace");
        assert_eq!(ComponentCategory::all().len(), 10);
        assert!(ComponentCategory::Valve.keywords().contains(&"regulator"));
    }

    #[test]
    fn test_render_image_sizes_and_frame() {
        let mut ctx = GenerationContext::seeded(111);
        let gen = generator();
        let landscape = gen.render_image(&mut ctx, "Turbopump", Orientation::Landscape);
        assert_eq!((landscape.width(), landscape.height()), (800, 600));
        let portrait = gen.render_image(&mut ctx, "Turbopump", Orientation::Portrait);
        assert_eq!((portrait.width(), portrait.height()), (600, 800));
        assert_eq!(*portrait.image().get_pixel(0, 0), BLACK);
        assert_eq!(*portrait.image().get_pixel(599, 799), BLACK);
    }

    #[test]
    fn test_generate_hardware_image_filename() {
        let dir = tempdir().unwrap();
        let mut ctx = GenerationContext::seeded(112);
        let path = generator()
            .generate_hardware_image(&mut ctx, dir.path(), "Docking/Port", Orientation::Portrait)
            .unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("hardware_Docking-Port_"));
        assert!(name.ends_with(".jpeg"));
        assert!(matches!(ArtifactName::parse(&name), Some(ArtifactName::Hardware { .. })));
        assert!(path.exists());
    }

    #[test]
    fn test_hardware_image_never_overwrites() {
        let dir = tempdir().unwrap();
        let first = generator()
            .generate_hardware_image(&mut GenerationContext::seeded(115), dir.path(), "Valve", Orientation::Landscape)
            .unwrap();
        // same seed, so the first disambiguator drawn is the one already on disk
        let second = generator()
            .generate_hardware_image(&mut GenerationContext::seeded(115), dir.path(), "Valve", Orientation::Landscape)
            .unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_save_photograph_filename() {
        let dir = tempdir().unwrap();
        let mut ctx = GenerationContext::seeded(113);
        let path = generator()
            .save_photograph(&mut ctx, dir.path(), 7, "Heat Shield")
            .unwrap();
        assert_eq!(path, dir.path().join("photo_007_Heat Shield.jpeg"));
        assert!(path.exists());
    }

    #[test]
    fn test_generate_multiple_images() {
        let dir = tempdir().unwrap();
        let mut ctx = GenerationContext::seeded(114);
        let components = vec!["Fuel Tank".to_string(), "Avionics Bay".to_string()];
        let paths = generator()
            .generate_multiple_images(&mut ctx, &dir.path().join("receiving"), &components, 3)
            .unwrap();
        assert!(!paths.is_empty() && paths.len() <= 3);
        for path in &paths {
            assert!(path.exists());
        }

        let err = generator()
            .generate_multiple_images(&mut ctx, dir.path(), &[], 2)
            .unwrap_err();
        assert!(matches!(err, HardwareError::NoComponents));
    }
}
