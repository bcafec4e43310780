//! Line-oriented exploration shell. Reads commands from any `BufRead`, writes
//! to any `Write`, so the binary drives it with stdin/stdout and tests drive
//! it with byte slices.

use std::io::{BufRead, Write};
use std::path::Path;

use rand::Rng;
use tracing::warn;

use crate::error::Result;
use crate::explorer::Explorer;
use crate::fractal::FAMILY_NAMES;
use crate::render::mandala;
use crate::session::{Action, DEFAULT_STEP, Direction, Session};
use crate::studio::{journey_poem, region_poem};

pub const PROMPT: &str = "🔮 fractal-poetry> ";
pub const DEFAULT_POEM_LINES: usize = 8;
pub const DEFAULT_JOURNEY_STEPS: usize = 5;
const MANDALA_SIZE: usize = 20;
const HISTORY_SHOWN: usize = 10;

pub const BANNER: &str = "
🌌✨ WELCOME TO FRACTAL POETRY EXPLORER ✨🌌

Where mathematics meets poetry, and chaos becomes art.
Type 'help' for commands or 'tour' for a guided experience.
";

pub const HELP: &str = "
🌌 FRACTAL POETRY EXPLORER COMMANDS 🌌

Navigation:
  up/down/left/right [step]  - Move through fractal space
  in/out                     - Zoom in/out
  jump <x> <y> [zoom]        - Jump to specific coordinates
  random                     - Jump to a random interesting location

Fractals:
  mandelbrot | julia | julia_spiral | julia_dragon | julia_snowflake
  fractals                   - List fractal families

Exploration:
  explore                    - Explore current location
  poem [lines]               - Generate poetry at current location
  journey [steps]            - Zooming journey from the origin
  tour                       - Full guided tour
  mandala                    - Show fractal mandala

Bookmarks:
  save <name> | load <name> | bookmarks

Session:
  history                    - Last ten actions
  export <file> | import <file>
  status

  help | quit | exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    pub session: Session,
    pub explorer: Explorer,
    pub max_iter: u32,
}

impl Repl {
    pub fn new(session: Session, max_iter: u32) -> Self {
        Repl { session, explorer: Explorer::default(), max_iter }
    }

    /// Read commands until `quit`/`exit` or end of input. Failures inside a
    /// command are printed and the loop carries on.
    pub fn run<I, O, R>(&mut self, input: I, out: &mut O, rng: &mut R) -> Result<()>
    where
        I: BufRead,
        O: Write,
        R: Rng + ?Sized,
    {
        writeln!(out, "{}", BANNER)?;
        let mut lines = input.lines();

        loop {
            write!(out, "\n{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next() else { break };
            let line = line?;
            let line = line.trim();
            if line.is_empty() { continue; }

            match self.execute(line, out, rng) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    warn!(command = line, error = %e, "command failed");
                    writeln!(out, "❌ Error: {}", e)?;
                }
            }
        }

        writeln!(out, "🌟 Thank you for exploring the infinite! Goodbye! 🌟")?;
        Ok(())
    }

    pub fn execute<O, R>(&mut self, line: &str, out: &mut O, rng: &mut R) -> Result<Flow>
    where
        O: Write,
        R: Rng + ?Sized,
    {
        let lowered = line.to_lowercase();
        let parts: Vec<&str> = lowered.split_whitespace().collect();
        let Some(&cmd) = parts.first() else { return Ok(Flow::Continue) };
        let args = &parts[1..];

        match cmd {
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => writeln!(out, "{}", HELP)?,

            "up" | "down" | "left" | "right" | "in" | "out" => {
                let Some(direction) = Direction::parse(cmd) else { return Ok(Flow::Continue) };
                let step = match args.first() {
                    Some(raw) => match raw.parse::<f64>() {
                        Ok(step) => step,
                        Err(_) => {
                            writeln!(out, "❌ Usage: {} [step]", cmd)?;
                            return Ok(Flow::Continue);
                        }
                    },
                    None => DEFAULT_STEP,
                };
                self.session.navigate(direction, step);
                writeln!(out, "🧭 Moved {}. Now at {}", cmd, self.session.current)?;
            }

            "jump" => {
                let coords: Option<Vec<f64>> = args.iter().map(|a| a.parse().ok()).collect();
                match coords.as_deref() {
                    Some(&[x, y]) => self.jump(x, y, 1.0, out)?,
                    Some(&[x, y, zoom]) => self.jump(x, y, zoom, out)?,
                    _ => writeln!(out, "❌ Usage: jump <x> <y> [zoom]")?,
                }
            }

            "random" => {
                let loc = self.session.random_jump(rng);
                writeln!(out, "🎲 Random jump to {}", loc)?;
                self.explore(out, rng)?;
            }

            "explore" => self.explore(out, rng)?,

            "poem" => {
                let Some(lines) = count_arg(args, DEFAULT_POEM_LINES) else {
                    writeln!(out, "❌ Usage: poem [lines]")?;
                    return Ok(Flow::Continue);
                };
                let loc = &self.session.current;
                let poem = region_poem(&loc.engine, loc.x, loc.y, loc.zoom, lines, self.max_iter, rng)?;
                writeln!(out, "{}", poem)?;
                self.session.record(Action::Poem, Some(poem));
            }

            "journey" => {
                let Some(steps) = count_arg(args, DEFAULT_JOURNEY_STEPS) else {
                    writeln!(out, "❌ Usage: journey [steps]")?;
                    return Ok(Flow::Continue);
                };
                let poem = journey_poem(&self.session.current.engine, steps, self.max_iter, rng)?;
                writeln!(out, "{}", poem)?;
                self.session.record(Action::Journey, Some(poem));
            }

            "tour" => writeln!(out, "{}", self.explorer.guided_tour(rng)?)?,

            "mandala" => {
                writeln!(out, "\n🕉️  Fractal Mandala:")?;
                writeln!(out, "{}", mandala(MANDALA_SIZE))?;
            }

            "save" => match args.first() {
                Some(name) => {
                    self.session.save_bookmark(name);
                    writeln!(out, "🔖 Saved bookmark '{}'", name)?;
                }
                None => writeln!(out, "❌ Usage: save <name>")?,
            },

            "load" => match args.first() {
                Some(name) if self.session.load_bookmark(name) => {
                    writeln!(out, "📍 Loaded '{}': {}", name, self.session.current)?;
                }
                Some(name) => writeln!(out, "❌ Bookmark '{}' not found", name)?,
                None => writeln!(out, "❌ Usage: load <name>")?,
            },

            "bookmarks" => {
                if self.session.bookmarks.is_empty() {
                    writeln!(out, "📚 No bookmarks saved")?;
                } else {
                    writeln!(out, "📚 Bookmarks:")?;
                    for (name, loc) in &self.session.bookmarks {
                        writeln!(out, "  {}: {}", name, loc)?;
                    }
                }
            }

            "history" => {
                let recent = self.session.recent(HISTORY_SHOWN);
                if recent.is_empty() {
                    writeln!(out, "📝 No history yet")?;
                } else {
                    writeln!(out, "📜 Session History:")?;
                    for (i, entry) in recent.iter().enumerate() {
                        writeln!(out, "  {}. {:?} at {}", i + 1, entry.action, entry.location)?;
                    }
                }
            }

            // File names keep the case they were typed with.
            "export" | "import" => {
                let Some(file) = line.split_whitespace().nth(1) else {
                    writeln!(out, "❌ Usage: {} <file>", cmd)?;
                    return Ok(Flow::Continue);
                };
                let path = Path::new(file);
                if cmd == "export" {
                    self.session.export(path)?;
                    writeln!(out, "💾 Session exported to {}", file)?;
                } else {
                    self.session = Session::import(path)?;
                    writeln!(out, "📂 Session imported from {}: {}", file, self.session.current)?;
                }
            }

            "fractals" => {
                for name in FAMILY_NAMES {
                    let marker = if *name == self.session.current.engine { "*" } else { " " };
                    writeln!(out, " {} {}", marker, name)?;
                }
            }

            "status" => {
                writeln!(out, "📍 Current: {}", self.session.current)?;
                writeln!(out, "📚 Bookmarks: {}", self.session.bookmarks.len())?;
                writeln!(out, "📜 History entries: {}", self.session.history.len())?;
            }

            other => match self.session.switch_fractal(other) {
                Ok(()) => writeln!(out, "🔄 Switched to {} fractal", other)?,
                Err(_) => writeln!(out, "❌ Unknown command: {}. Type 'help' for available commands.", other)?,
            },
        }

        Ok(Flow::Continue)
    }

    fn jump<O: Write>(&mut self, x: f64, y: f64, zoom: f64, out: &mut O) -> Result<()> {
        self.session.jump(x, y, zoom)?;
        writeln!(out, "🚀 Jumped to ({:.3}, {:.3}) zoom {:.1}x", x, y, zoom)?;
        Ok(())
    }

    fn explore<O, R>(&mut self, out: &mut O, rng: &mut R) -> Result<()>
    where
        O: Write,
        R: Rng + ?Sized,
    {
        let loc = &self.session.current;
        let report = self.explorer.explore_region(&loc.engine, loc.x, loc.y, loc.zoom, rng)?;
        writeln!(out, "{}", report)?;
        self.session.record(Action::Explore, None);
        Ok(())
    }
}

/// `None` when the argument is present but not a non-negative integer.
fn count_arg(args: &[&str], default: usize) -> Option<usize> {
    match args.first() {
        Some(raw) => raw.parse().ok(),
        None => Some(default),
    }
}
