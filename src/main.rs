use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use fractal_poetry::{
    ArtStudio, AsciiStyle, ColorPalette, Config, Explorer, Region, Repl, Session, Viewport,
    export_grid_csv, illustrated_poem, journey_poem, mandala, poetry_challenge, region_poem,
    render_ansi, render_ascii, render_png, render_ppm, resolve_family,
};

/// Fractal poetry generator: escape-time fractals turned into verse and art.
///
/// With no mode flag the interactive exploration session starts.
#[derive(Parser, Debug)]
#[command(name = "fractal-poetry", version)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
struct Cli {
    /// Start the interactive exploration session
    #[arg(short, long, group = "mode")]
    interactive: bool,

    /// Sample poems, an exploration and a mandala
    #[arg(long, group = "mode")]
    demo: bool,

    /// Guided tour of five well-known regions
    #[arg(long, group = "mode")]
    tour: bool,

    /// One titled poem from the chosen region
    #[arg(long, group = "mode")]
    poem: bool,

    /// Zooming journey from the origin, `--lines` steps long
    #[arg(long, group = "mode")]
    journey: bool,

    /// Write the art collection NAME into the output directory
    #[arg(long, group = "mode", value_name = "NAME")]
    collection: Option<String>,

    /// One short poem per challenge theme
    #[arg(long, group = "mode")]
    challenge: bool,

    /// Render the region to a plain PPM file
    #[arg(long, group = "mode", value_name = "FILE")]
    ppm: Option<PathBuf>,

    /// Render the region to a PNG file
    #[arg(long, group = "mode", value_name = "FILE")]
    png: Option<PathBuf>,

    /// Dump a `--width`² grid of evaluated points as CSV
    #[arg(long, group = "mode", value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Render the region as ASCII art
    #[arg(long, group = "mode")]
    ascii: bool,

    /// Render the region with ANSI colours
    #[arg(long, group = "mode")]
    color: bool,

    /// Print an N×N mandala
    #[arg(long, group = "mode", value_name = "N")]
    mandala: Option<usize>,

    /// ASCII ramp: gradient, blocks, dots or simple
    #[arg(long, requires = "ascii", default_value = "gradient")]
    style: String,

    /// Lay a poem over the ASCII rendering
    #[arg(long, requires = "ascii")]
    overlay: bool,

    #[arg(long, default_value = "mandelbrot")]
    fractal: String,

    #[arg(long, default_value_t = 8)]
    lines: usize,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    y: f64,

    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    zoom: f64,

    /// Overrides FRACTAL_POETRY_MAX_ITER
    #[arg(long)]
    max_iter: Option<u32>,

    #[arg(long, default_value = "fire")]
    palette: String,

    #[arg(long, default_value_t = 80)]
    width: usize,

    #[arg(long, default_value_t = 40)]
    height: usize,

    /// Overrides FRACTAL_POETRY_SEED
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Interactive,
    Demo,
    Tour,
    Poem,
    Journey,
    Collection(String),
    Challenge,
    Ppm(PathBuf),
    Png(PathBuf),
    Csv(PathBuf),
    Ascii,
    Color,
    Mandala(usize),
}

impl Cli {
    /// The mode flags form one group, so at most one of these is set.
    fn mode(&self) -> Mode {
        if let Some(name) = &self.collection {
            Mode::Collection(name.clone())
        } else if let Some(path) = &self.ppm {
            Mode::Ppm(path.clone())
        } else if let Some(path) = &self.png {
            Mode::Png(path.clone())
        } else if let Some(path) = &self.csv {
            Mode::Csv(path.clone())
        } else if let Some(size) = self.mandala {
            Mode::Mandala(size)
        } else if self.demo {
            Mode::Demo
        } else if self.tour {
            Mode::Tour
        } else if self.poem {
            Mode::Poem
        } else if self.journey {
            Mode::Journey
        } else if self.challenge {
            Mode::Challenge
        } else if self.ascii {
            Mode::Ascii
        } else if self.color {
            Mode::Color
        } else {
            Mode::Interactive
        }
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_iter) = self.max_iter {
            config.max_iter = max_iter;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env();

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    cli.apply_overrides(&mut config);
    let mode = cli.mode();
    let max_iter = config.max_iter;
    let style = AsciiStyle::from_name(&cli.style);
    info!(mode = ?mode, fractal = %cli.fractal, seed = ?config.seed, "starting fractal poetry");

    let mut rng = config.rng();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &mode {
        Mode::Interactive => {
            let mut repl = Repl::new(Session::new(), config.max_iter);
            repl.run(io::stdin().lock(), &mut out, &mut rng)?;
        }
        Mode::Demo => demo(&mut out, &config, &mut rng)?,
        Mode::Tour => writeln!(out, "{}", Explorer::default().guided_tour(&mut rng)?)?,
        Mode::Poem => {
            let poem = region_poem(&cli.fractal, cli.x, cli.y, cli.zoom, cli.lines, max_iter, &mut rng)?;
            writeln!(out, "{}", poem)?;
        }
        Mode::Journey => {
            writeln!(out, "{}", journey_poem(&cli.fractal, cli.lines, max_iter, &mut rng)?)?;
        }
        Mode::Collection(name) => {
            let studio = ArtStudio { max_iter: config.max_iter, ..ArtStudio::new(&config.output_dir) };
            let written = studio.create_collection(name, &mut rng)?;
            writeln!(out, "🎨 Collection '{}' complete: {} files in {}", name, written.len(), config.output_dir.display())?;
        }
        Mode::Challenge => writeln!(out, "{}", poetry_challenge(max_iter, &mut rng)?)?,
        Mode::Ppm(path) | Mode::Png(path) => {
            let family = resolve_family(&cli.fractal)?;
            let viewport = Viewport::around(cli.x, cli.y, cli.zoom)?;
            let palette = ColorPalette::named_or_default(&cli.palette);
            let path = config.output_dir.join(path);
            if matches!(mode, Mode::Ppm(_)) {
                render_ppm(&family, &viewport, cli.width, cli.height, max_iter, &palette, &path)?;
            } else {
                render_png(&family, &viewport, cli.width, cli.height, max_iter, &palette, &path)?;
            }
            writeln!(out, "🖼️  wrote {}", path.display())?;
        }
        Mode::Csv(path) => {
            let family = resolve_family(&cli.fractal)?;
            let viewport = Viewport::around(cli.x, cli.y, cli.zoom)?;
            let path = config.output_dir.join(path);
            export_grid_csv(&family, &viewport, cli.width, max_iter, &path)?;
            writeln!(out, "📊 wrote {}", path.display())?;
        }
        Mode::Ascii if cli.overlay => {
            let family = resolve_family(&cli.fractal)?;
            let region = Region::new(cli.x, cli.y, cli.zoom)?;
            let size = (cli.width, cli.height);
            let art = illustrated_poem(&family, &region, size, cli.lines, max_iter, style, &mut rng)?;
            writeln!(out, "{}", art)?;
        }
        Mode::Ascii => {
            let family = resolve_family(&cli.fractal)?;
            let viewport = Viewport::around(cli.x, cli.y, cli.zoom)?;
            let rows = render_ascii(&family, &viewport, cli.width, cli.height, max_iter, style)?;
            writeln!(out, "{}", rows.join("\n"))?;
        }
        Mode::Color => {
            let family = resolve_family(&cli.fractal)?;
            let viewport = Viewport::around(cli.x, cli.y, cli.zoom)?;
            writeln!(out, "{}", render_ansi(&family, &viewport, cli.width, cli.height, max_iter)?)?;
        }
        Mode::Mandala(size) => writeln!(out, "{}", mandala(*size))?,
    }

    out.flush()?;
    Ok(())
}

fn demo<W: Write>(out: &mut W, config: &Config, rng: &mut StdRng) -> fractal_poetry::Result<()> {
    writeln!(out, "🌌✨ FRACTAL POETRY GENERATOR DEMO ✨🌌")?;
    writeln!(out, "{}", "=".repeat(50))?;

    writeln!(out, "\n🎭 Sample Poems:")?;
    writeln!(out, "{}", "-".repeat(30))?;
    writeln!(out, "{}\n", region_poem("mandelbrot", -0.5, 0.0, 2.0, 4, config.max_iter, rng)?)?;
    writeln!(out, "{}", region_poem("julia", 0.0, 0.0, 1.0, 4, config.max_iter, rng)?)?;

    writeln!(out, "\n🎨 Fractal Visualization:")?;
    writeln!(out, "{}", "-".repeat(30))?;
    writeln!(out, "{}", Explorer::default().explore_region("mandelbrot", -0.7, 0.0, 4.0, rng)?)?;

    writeln!(out, "\n🕉️ Fractal Mandala:")?;
    writeln!(out, "{}", "-".repeat(20))?;
    writeln!(out, "{}", mandala(12))?;

    writeln!(out, "\n🚀 Try Interactive Mode: fractal-poetry --interactive")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("fractal-poetry").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_mode_means_interactive() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.mode(), Mode::Interactive);
        assert_eq!((cli.lines, cli.width, cli.height), (8, 80, 40));
        assert_eq!(cli.fractal, "mandelbrot");
    }

    #[test]
    fn mode_flags_carry_their_values() {
        assert_eq!(parse(&["--collection", "gallery"]).unwrap().mode(), Mode::Collection("gallery".into()));
        assert_eq!(parse(&["--png", "out.png"]).unwrap().mode(), Mode::Png(PathBuf::from("out.png")));
        assert_eq!(parse(&["--mandala", "12"]).unwrap().mode(), Mode::Mandala(12));
        assert_eq!(parse(&["-i"]).unwrap().mode(), Mode::Interactive);
    }

    #[test]
    fn two_modes_conflict() {
        let err = parse(&["--poem", "--tour"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = parse(&["--poem", "--sparkle"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = parse(&["--poem", "--lines", "many"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn overlay_needs_ascii() {
        let err = parse(&["--overlay"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let cli = parse(&["--ascii", "--overlay", "--style", "dots", "--x", "-0.5", "--zoom", "4"]).unwrap();
        assert_eq!(cli.mode(), Mode::Ascii);
        assert!(cli.overlay);
        assert_eq!(AsciiStyle::from_name(&cli.style), AsciiStyle::Dots);
        assert_eq!((cli.x, cli.zoom), (-0.5, 4.0));
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        parse(&["--max-iter", "250", "--seed", "7"]).unwrap().apply_overrides(&mut config);
        assert_eq!(config.max_iter, 250);
        assert_eq!(config.seed, Some(7));

        let mut config = Config { seed: Some(3), ..Config::default() };
        parse(&[]).unwrap().apply_overrides(&mut config);
        assert_eq!((config.max_iter, config.seed), (100, Some(3)));
    }
}
