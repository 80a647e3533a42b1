//! Synthetic data plots
//!
//! A description string picks the waveform: vibration/shock data is a
//! damped oscillation, temperature/thermal data a plateaued profile,
//! pressure/flow data an offset sinusoid with a step, anything else a
//! composite sinusoid. Every sample gets independent gaussian noise.
//! Plots are 1000x600 JPEGs with time on the x axis.

use std::path::{Path, PathBuf};

use image::Rgb;
use thiserror::Error;
use tracing::debug;

use crate::core::catalog::sanitize_filename;
use crate::core::context::GenerationContext;
use crate::raster::{Canvas, FontFace, RasterFormat, TextStyle, BLACK, WHITE};

pub const PLOT_WIDTH: u32 = 1000;
pub const PLOT_HEIGHT: u32 = 600;
pub const SAMPLE_COUNT: usize = 100;
pub const X_MAX: f64 = 10.0;

const X_LABEL: &str = "Time (s)";
const LINE_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
const GRID_COLOR: Rgb<u8> = Rgb([220, 220, 220]);

// plot area margins
const LEFT: i32 = 90;
const RIGHT: i32 = 30;
const TOP: i32 = 70;
const BOTTOM: i32 = 70;

/// Waveform family chosen from a description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Vibration,
    Thermal,
    Pressure,
    Generic,
}

impl SignalKind {
    /// Case-sensitive substring classification, first match wins
    pub fn classify(description: &str) -> Self {
        let has = |words: &[&str]| words.iter().any(|w| description.contains(w));
        if has(&["Vibration", "Shock"]) {
            SignalKind::Vibration
        } else if has(&["Temperature", "Thermal"]) {
            SignalKind::Thermal
        } else if has(&["Pressure", "Flow"]) {
            SignalKind::Pressure
        } else {
            SignalKind::Generic
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            SignalKind::Vibration => "Acceleration (g)",
            SignalKind::Thermal => "Temperature (°C)",
            SignalKind::Pressure => "Pressure (kPa)",
            SignalKind::Generic => "Measurement",
        }
    }

    /// Noise-free signal value at time `x`
    pub fn baseline(&self, x: f64) -> f64 {
        match self {
            SignalKind::Vibration => (-0.2 * x).exp() * (5.0 * x).sin(),
            SignalKind::Thermal => {
                let plateau = if x > 3.0 && x < 7.0 { 50.0 } else { 0.0 };
                20.0 + 5.0 * x.sin() + plateau
            }
            SignalKind::Pressure => {
                let step = if x > 5.0 { 10.0 } else { 0.0 };
                100.0 + 20.0 * (x / 2.0).sin() + step
            }
            SignalKind::Generic => 50.0 + 20.0 * (x / 2.0).sin() + 5.0 * (3.0 * x).cos(),
        }
    }

    /// Standard deviation of the added noise
    pub fn noise(&self) -> f64 {
        match self {
            SignalKind::Vibration => 0.1,
            SignalKind::Thermal => 0.5,
            SignalKind::Pressure => 1.0,
            SignalKind::Generic => 2.0,
        }
    }
}

/// Sampled signal ready to plot
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    pub kind: SignalKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl DataSeries {
    /// `SAMPLE_COUNT` evenly spaced samples over `[0, X_MAX]`
    pub fn synthesize(ctx: &mut GenerationContext, description: &str) -> Self {
        let kind = SignalKind::classify(description);
        let step = X_MAX / (SAMPLE_COUNT - 1) as f64;
        let x: Vec<f64> = (0..SAMPLE_COUNT).map(|i| i as f64 * step).collect();
        let y = x
            .iter()
            .map(|&t| kind.baseline(t) + kind.noise() * ctx.gaussian())
            .collect();
        Self { kind, x, y }
    }

    /// `(min, max)` of the y values, widened when flat
    fn y_bounds(&self) -> (f64, f64) {
        let (min, max) = self
            .y
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        if max - min < f64::EPSILON {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

/// Errors raised while writing a plot
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("cannot create directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot save plot {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Draws data series as line charts
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    title: TextStyle,
    label: TextStyle,
    tick: TextStyle,
}

impl PlotRenderer {
    pub fn new(font_path: Option<&Path>) -> Self {
        Self::with_face(FontFace::load(font_path))
    }

    pub fn with_face(face: FontFace) -> Self {
        Self {
            title: TextStyle::new(face.clone(), 22.0),
            label: TextStyle::new(face.clone(), 18.0),
            tick: TextStyle::new(face, 14.0),
        }
    }

    pub fn render(&self, series: &DataSeries, title: &str) -> Canvas {
        let mut canvas = Canvas::new(PLOT_WIDTH, PLOT_HEIGHT, WHITE);
        let (w, h) = (PLOT_WIDTH as i32, PLOT_HEIGHT as i32);
        let (x0, x1) = (LEFT, w - RIGHT);
        let (y0, y1) = (TOP, h - BOTTOM);
        let (y_min, y_max) = series.y_bounds();

        let px = |x: f64| x0 + ((x / X_MAX) * (x1 - x0) as f64).round() as i32;
        let py = |y: f64| y1 - (((y - y_min) / (y_max - y_min)) * (y1 - y0) as f64).round() as i32;

        // grid and ticks
        for i in 0..=5 {
            let x = X_MAX * i as f64 / 5.0;
            let gx = px(x);
            canvas.line((gx, y0), (gx, y1), GRID_COLOR, 1);
            canvas.line((gx, y1), (gx, y1 + 5), BLACK, 1);
            canvas.centered_text(gx, y1 + 8, &format!("{:.0}", x), &self.tick, BLACK);
        }
        let decimals = tick_decimals(y_max - y_min);
        for i in 0..=5 {
            let y = y_min + (y_max - y_min) * i as f64 / 5.0;
            let gy = py(y);
            canvas.line((x0, gy), (x1, gy), GRID_COLOR, 1);
            canvas.line((x0 - 5, gy), (x0, gy), BLACK, 1);
            let text = format!("{:.*}", decimals, y);
            let width = self.tick.text_width(&text) as i32;
            let half = self.tick.line_height() as i32 / 2;
            canvas.text(x0 - 8 - width, gy - half, &text, &self.tick, BLACK);
        }

        canvas.frame(x0, y0, x1, y1, BLACK, 1);

        let points: Vec<(i32, i32)> = series.x.iter().zip(&series.y).map(|(&x, &y)| (px(x), py(y))).collect();
        for pair in points.windows(2) {
            canvas.line(pair[0], pair[1], LINE_COLOR, 2);
        }

        canvas.centered_text(w / 2, TOP / 4, title, &self.title, BLACK);
        canvas.centered_text((x0 + x1) / 2, h - BOTTOM / 2, X_LABEL, &self.label, BLACK);
        canvas.text(8, TOP - self.label.line_height() as i32 - 6, series.kind.y_label(), &self.label, BLACK);
        canvas
    }

    /// Synthesize and save one plot as `<dir>/<filename>`
    ///
    /// The filename is sanitized; `description` titles the plot and picks the waveform.
    pub fn create_data_plot(
        &self,
        ctx: &mut GenerationContext,
        dir: &Path,
        filename: &str,
        description: &str,
    ) -> Result<PathBuf, PlotError> {
        debug!(filename, "creating data plot");
        std::fs::create_dir_all(dir).map_err(|source| PlotError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let series = DataSeries::synthesize(ctx, description);
        let canvas = self.render(&series, description);
        let path = dir.join(sanitize_filename(filename));
        canvas
            .save(&path, RasterFormat::Jpeg)
            .map_err(|source| PlotError::Save {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

fn tick_decimals(span: f64) -> usize {
    if span >= 50.0 {
        0
    } else if span >= 5.0 {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classification_order() {
        assert_eq!(SignalKind::classify("Strut_Shock Load_Random"), SignalKind::Vibration);
        assert_eq!(SignalKind::classify("Nozzle_Thermal Gradient_Sine Sweep"), SignalKind::Thermal);
        assert_eq!(SignalKind::classify("Valve_Flow Rate_Burst"), SignalKind::Pressure);
        assert_eq!(SignalKind::classify("Valve_Vibration Temperature"), SignalKind::Vibration);
        // case-sensitive, like the filename tokens it is applied to
        assert_eq!(SignalKind::classify("valve_flow rate"), SignalKind::Generic);
        assert_eq!(SignalKind::Thermal.y_label(), "Temperature (°C)");
    }

    #[test]
    fn test_series_shape() {
        let mut ctx = GenerationContext::seeded(121);
        let series = DataSeries::synthesize(&mut ctx, "Tank_Pressure_Proof");
        assert_eq!(series.x.len(), SAMPLE_COUNT);
        assert_eq!(series.y.len(), SAMPLE_COUNT);
        assert_eq!(series.x[0], 0.0);
        assert!((series.x[SAMPLE_COUNT - 1] - X_MAX).abs() < 1e-9);

        // step after t = 5 shifts the pressure mean up
        let before: f64 = series.y[40..50].iter().sum::<f64>() / 10.0;
        let after: f64 = series.y[51..61].iter().sum::<f64>() / 10.0;
        assert!(series.kind.baseline(6.0) > series.kind.baseline(4.0));
        assert!(before > 80.0 && after > 80.0);
    }

    #[test]
    fn test_thermal_plateau() {
        let kind = SignalKind::Thermal;
        assert!(kind.baseline(5.0) - kind.baseline(1.0) > 40.0);
        assert!(kind.baseline(8.0) < 30.0);
    }

    #[test]
    fn test_noise_is_seeded() {
        let a = DataSeries::synthesize(&mut GenerationContext::seeded(122), "X");
        let b = DataSeries::synthesize(&mut GenerationContext::seeded(122), "X");
        assert_eq!(a, b);
        assert_ne!(a.y[10], SignalKind::Generic.baseline(a.x[10]));
    }

    #[test]
    fn test_create_data_plot_writes_jpeg() {
        let dir = tempdir().unwrap();
        let mut ctx = GenerationContext::seeded(123);
        let renderer = PlotRenderer::with_face(FontFace::Bitmap);
        let path = renderer
            .create_data_plot(
                &mut ctx,
                &dir.path().join("data"),
                "001_Engine_Vibration Level_Sine Sweep.jpg",
                "Engine_Vibration Level_Sine Sweep",
            )
            .unwrap();
        assert!(path.exists());
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (PLOT_WIDTH, PLOT_HEIGHT));
    }
}
