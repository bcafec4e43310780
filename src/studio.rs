// Poem builders on top of the sampler and composer, plus the batch
// "art collection" that writes images, ASCII art and poetry to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use rand::Rng;
use tracing::info;

use crate::error::Result;
use crate::export::{export_poetry_analysis, render_ppm};
use crate::fractal::{FractalFamily, resolve_family};
use crate::grid::Viewport;
use crate::palette::ColorPalette;
use crate::poetry::compose;
use crate::render::{AsciiStyle, overlay_poem, render_ascii};
use crate::sampler::{JOURNEY_BATCH, Region, journey, sample_fractal_region, sample_region};

/// Sample a region and turn it into a titled poem, one line per sample.
pub fn region_poem<R: Rng + ?Sized>(
    engine: &str,
    center_x: f64,
    center_y: f64,
    zoom: f64,
    lines: usize,
    max_iter: u32,
    rng: &mut R,
) -> Result<String> {
    let family = resolve_family(engine)?;
    let points = sample_fractal_region(engine, center_x, center_y, zoom, lines, max_iter, rng)?;
    let title = format!("Fractal Dreams: {}", family.name());
    Ok(compose(&points, Some(&title), rng))
}

/// Two samples per step along a zooming journey from the origin.
pub fn journey_poem<R: Rng + ?Sized>(engine: &str, steps: usize, max_iter: u32, rng: &mut R) -> Result<String> {
    let family = resolve_family(engine)?;
    let trip = journey(&family, steps, JOURNEY_BATCH, max_iter, rng)?;
    let title = format!("Journey Through {}", family.name());
    Ok(compose(&trip.points, Some(&title), rng))
}

/// ASCII rendering of a region with an untitled poem from the same region
/// laid over evenly spaced rows.
pub fn illustrated_poem<R: Rng + ?Sized>(
    family: &FractalFamily,
    region: &Region,
    (width, height): (usize, usize),
    lines: usize,
    max_iter: u32,
    style: AsciiStyle,
    rng: &mut R,
) -> Result<String> {
    let viewport = Viewport::around(region.center_x, region.center_y, region.zoom)?;
    let art = render_ascii(family, &viewport, width, height, max_iter, style)?;
    let points = sample_region(family, region, lines, max_iter, rng)?;
    let poem = compose(&points, None, rng);
    let poem_lines: Vec<&str> = poem.lines().collect();
    Ok(overlay_poem(&art, &poem_lines, width))
}

pub struct Piece {
    pub engine: &'static str,
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub palette: &'static str,
    pub title: &'static str,
}

pub const COLLECTION: &[Piece] = &[
    Piece { engine: "mandelbrot", x: -0.5, y: 0.0, zoom: 2.0, palette: "fire", title: "The Classic View" },
    Piece { engine: "mandelbrot", x: -0.7, y: 0.0, zoom: 4.0, palette: "ocean", title: "Seahorse Valley" },
    Piece { engine: "mandelbrot", x: -0.16, y: 1.04, zoom: 20.0, palette: "cosmic", title: "Spiral Dreams" },
    Piece { engine: "julia", x: 0.0, y: 0.0, zoom: 1.0, palette: "sunset", title: "Julia Beauty" },
    Piece { engine: "julia", x: 0.0, y: 0.0, zoom: 1.0, palette: "forest", title: "Spiral Dance" },
    Piece { engine: "julia", x: 0.0, y: 0.0, zoom: 2.0, palette: "fire", title: "Dragon Curves" },
];

pub struct Theme {
    pub name: &'static str,
    pub engine: &'static str,
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

pub const CHALLENGE: &[Theme] = &[
    Theme { name: "Infinite Recursion", engine: "mandelbrot", x: -0.75, y: 0.1, zoom: 10.0 },
    Theme { name: "Chaos and Order", engine: "julia", x: 0.0, y: 0.0, zoom: 2.0 },
    Theme { name: "Mathematical Beauty", engine: "mandelbrot", x: -0.16, y: 1.04, zoom: 50.0 },
    Theme { name: "Complex Dynamics", engine: "julia_spiral", x: 0.0, y: 0.0, zoom: 1.0 },
    Theme { name: "Fractal Dreams", engine: "julia_dragon", x: 0.0, y: 0.0, zoom: 3.0 },
];

const ART_ITER: u32 = 150;
const ASCII_ITER: u32 = 100;
const COLLECTION_POEM_LINES: usize = 6;
const CHALLENGE_POEM_LINES: usize = 4;

pub struct ArtStudio {
    pub output_dir: PathBuf,
    pub width: usize,
    pub height: usize,
    pub max_iter: u32,
}

impl ArtStudio {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        ArtStudio { output_dir: output_dir.into(), width: 400, height: 300, max_iter: crate::fractal::DEFAULT_MAX_ITER }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    /// Render every piece of [`COLLECTION`] and write the poetry report and
    /// catalog. Returns the paths written, in order.
    pub fn create_collection<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;
        let mut written = Vec::new();
        let mut poems = Vec::with_capacity(COLLECTION.len());

        for (i, piece) in COLLECTION.iter().enumerate() {
            let n = i + 1;
            info!(piece = n, title = piece.title, "creating collection piece");

            let family = resolve_family(piece.engine)?;
            let viewport = Viewport::around(piece.x, piece.y, piece.zoom)?;
            let palette = ColorPalette::named_or_default(piece.palette);

            let ppm = self.path(&format!("{}_{:02}_{}_{}.ppm", name, n, piece.engine, piece.palette));
            render_ppm(&family, &viewport, self.width, self.height, ART_ITER, &palette, &ppm)?;
            written.push(ppm);

            let ascii = render_ascii(
                &family,
                &viewport,
                self.width / 8,
                self.height / 8,
                ASCII_ITER,
                AsciiStyle::Gradient,
            )?;
            let ascii_path = self.path(&format!("{}_{:02}_ascii.txt", name, n));
            write_ascii_piece(&ascii_path, piece.title, &ascii)?;
            written.push(ascii_path);

            poems.push(region_poem(
                piece.engine,
                piece.x,
                piece.y,
                piece.zoom,
                COLLECTION_POEM_LINES,
                self.max_iter,
                rng,
            )?);
        }

        let report = self.path(&format!("{}_poetry.txt", name));
        export_poetry_analysis(&poems, &report)?;
        written.push(report);

        let catalog = self.path(&format!("{}_catalog.txt", name));
        write_catalog(&catalog, name)?;
        written.push(catalog);

        info!(collection = name, pieces = COLLECTION.len(), "collection complete");
        Ok(written)
    }
}

fn write_ascii_piece(path: &Path, title: &str, lines: &[String]) -> Result<()> {
    let mut f = fs::File::create(path)?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}\n", "=".repeat(title.chars().count()))?;
    write!(f, "{}", lines.join("\n"))?;
    Ok(())
}

fn write_catalog(path: &Path, name: &str) -> Result<()> {
    let mut f = fs::File::create(path)?;
    writeln!(f, "{} - FRACTAL ART COLLECTION", name.to_uppercase())?;
    writeln!(f, "{}\n", "=".repeat(50))?;
    writeln!(f, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(f, "Created by Fractal Poetry Generator - AI Art Studio\n")?;
    writeln!(f, "COLLECTION CONTENTS:")?;
    for (i, piece) in COLLECTION.iter().enumerate() {
        writeln!(f, "{:2}. {}", i + 1, piece.title)?;
        writeln!(f, "    Fractal: {}", piece.engine)?;
        writeln!(f, "    Region: ({:.3}, {:.3}) at {:.1}x zoom", piece.x, piece.y, piece.zoom)?;
        writeln!(f, "    Palette: {}", piece.palette)?;
        writeln!(f, "    Files: {}_{:02}_*\n", name, i + 1)?;
    }
    Ok(())
}

/// One short poem per theme of [`CHALLENGE`].
pub fn poetry_challenge<R: Rng + ?Sized>(max_iter: u32, rng: &mut R) -> Result<String> {
    let mut out = String::from("🏆 FRACTAL POETRY CHALLENGE 🏆\n");
    out.push_str(&"=".repeat(40));
    out.push('\n');

    for theme in CHALLENGE {
        out.push_str(&format!("\n📝 Theme: {}\n", theme.name));
        out.push_str(&"-".repeat(30));
        out.push('\n');
        out.push_str(&region_poem(theme.engine, theme.x, theme.y, theme.zoom, CHALLENGE_POEM_LINES, max_iter, rng)?);
        out.push('\n');
    }

    out.push_str("\n🌟 Challenge complete! Each poem inspired by unique fractal mathematics.");
    Ok(out)
}
