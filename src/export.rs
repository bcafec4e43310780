// Flat-file export: PPM/PNG images, CSV point dumps, and the poetry report.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use image::{Rgb, RgbImage};
use tracing::info;

use crate::error::{Error, Result};
use crate::fractal::{FractalFamily, FractalPoint};
use crate::grid::{Viewport, evaluate_grid};
use crate::palette::ColorPalette;

pub const CSV_HEADER: &str = "x,y,iterations,escaped,magnitude";

/// `(width, height)` of a rectangular grid; ragged rows are rejected.
fn grid_dimensions(grid: &[Vec<FractalPoint>]) -> Result<(usize, usize)> {
    let width = grid.first().map_or(0, Vec::len);
    match grid.iter().position(|row| row.len() != width) {
        Some(i) => Err(Error::InvalidParameter(format!(
            "grid row {} has {} cells, expected {}",
            i,
            grid[i].len(),
            width
        ))),
        None => Ok((width, grid.len())),
    }
}

/// Plain PPM (`P3`): header, then one text row of `r g b ` triplets per pixel row.
pub fn write_ppm<W: Write>(
    w: &mut W,
    grid: &[Vec<FractalPoint>],
    max_iter: u32,
    palette: &ColorPalette,
) -> Result<()> {
    let (width, height) = grid_dimensions(grid)?;
    write!(w, "P3\n{} {}\n255\n", width, height)?;

    for row in grid {
        for point in row {
            let [r, g, b] = palette.shade(point, max_iter);
            write!(w, "{} {} {} ", r, g, b)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn render_ppm(
    family: &FractalFamily,
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iter: u32,
    palette: &ColorPalette,
    path: &Path,
) -> Result<()> {
    let grid = evaluate_grid(family, viewport, width, height, max_iter)?;
    let mut w = BufWriter::new(File::create(path)?);
    write_ppm(&mut w, &grid, max_iter, palette)?;
    w.flush()?;
    info!(path = %path.display(), width, height, palette = palette.name, "wrote PPM");
    Ok(())
}

pub fn grid_to_image(grid: &[Vec<FractalPoint>], max_iter: u32, palette: &ColorPalette) -> Result<RgbImage> {
    let (width, height) = grid_dimensions(grid)?;
    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        Rgb(palette.shade(&grid[y as usize][x as usize], max_iter))
    }))
}

pub fn render_png(
    family: &FractalFamily,
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iter: u32,
    palette: &ColorPalette,
    path: &Path,
) -> Result<()> {
    let grid = evaluate_grid(family, viewport, width, height, max_iter)?;
    grid_to_image(&grid, max_iter, palette)?.save(path)?;
    info!(path = %path.display(), width, height, palette = palette.name, "wrote PNG");
    Ok(())
}

pub fn write_points_csv<'a, W, I>(w: &mut W, points: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a FractalPoint>,
{
    writeln!(w, "{}", CSV_HEADER)?;
    for p in points {
        writeln!(w, "{},{},{},{},{}", p.x, p.y, p.iterations, p.escaped, p.magnitude)?;
    }
    Ok(())
}

/// Grid dump at `resolution × resolution`.
pub fn export_grid_csv(
    family: &FractalFamily,
    viewport: &Viewport,
    resolution: usize,
    max_iter: u32,
    path: &Path,
) -> Result<()> {
    let grid = evaluate_grid(family, viewport, resolution, resolution, max_iter)?;
    let mut w = BufWriter::new(File::create(path)?);
    write_points_csv(&mut w, grid.iter().flatten())?;
    w.flush()?;
    info!(path = %path.display(), rows = resolution * resolution, "wrote CSV");
    Ok(())
}

pub fn export_points_csv(points: &[FractalPoint], path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_points_csv(&mut w, points)?;
    w.flush()?;
    info!(path = %path.display(), rows = points.len(), "wrote CSV");
    Ok(())
}

/// Parse rows written by [`write_points_csv`]. The header and blank lines are
/// skipped; `True`/`False` are accepted alongside `true`/`false`.
pub fn read_points_csv<R: BufRead>(r: R) -> Result<Vec<FractalPoint>> {
    let mut points = Vec::new();

    for (idx, line) in r.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let line_no = idx + 1;
        if line.is_empty() || line == CSV_HEADER {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [x, y, iterations, escaped, magnitude] = fields[..] else {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected 5 fields, found {}", fields.len()),
            });
        };

        let bad = |what: &str, value: &str| Error::Parse {
            line: line_no,
            message: format!("invalid {} '{}'", what, value),
        };

        points.push(FractalPoint {
            x: x.parse().map_err(|_| bad("x", x))?,
            y: y.parse().map_err(|_| bad("y", y))?,
            iterations: iterations.parse().map_err(|_| bad("iterations", iterations))?,
            escaped: match escaped {
                "true" | "True" => true,
                "false" | "False" => false,
                other => return Err(bad("escaped", other)),
            },
            magnitude: magnitude.parse().map_err(|_| bad("magnitude", magnitude))?,
        });
    }

    Ok(points)
}

pub fn write_poetry_report<W: Write>(
    w: &mut W,
    poems: &[String],
    generated: DateTime<Local>,
) -> std::io::Result<()> {
    writeln!(w, "Fractal Poetry Analysis Report")?;
    writeln!(w, "{}\n", "=".repeat(40))?;
    writeln!(w, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(w, "Total poems: {}\n", poems.len())?;

    for (i, poem) in poems.iter().enumerate() {
        writeln!(w, "Poem {}:", i + 1)?;
        writeln!(w, "{}", "-".repeat(20))?;
        writeln!(w, "{}\n", poem)?;

        let lines: Vec<&str> = poem.split('\n').filter(|l| !l.trim().is_empty()).collect();
        let words: usize = lines.iter().map(|l| l.split_whitespace().count()).sum();
        writeln!(w, "Lines: {}", lines.len())?;
        writeln!(w, "Words: {}", words)?;
        writeln!(w, "Characters: {}\n", poem.chars().count())?;
    }
    Ok(())
}

pub fn export_poetry_analysis(poems: &[String], path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_poetry_report(&mut w, poems, Local::now())?;
    w.flush()?;
    info!(path = %path.display(), poems = poems.len(), "wrote poetry report");
    Ok(())
}
