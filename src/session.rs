//! Interactive exploration state: where the user is, what they bookmarked,
//! and what they did. Serialized to JSON for export and import.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fractal::resolve_family;
use crate::sampler::validate_zoom;

pub const DEFAULT_STEP: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub engine: String,
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Location {
    pub fn new(engine: &str, x: f64, y: f64, zoom: f64) -> Self {
        Location { engine: engine.to_string(), x, y, zoom }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new("mandelbrot", 0.0, 0.0, 1.0)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at ({:.3}, {:.3}) zoom {:.1}x", self.engine, self.x, self.y, self.zoom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    In,
    Out,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Direction> {
        match s {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Explore,
    Poem,
    Journey,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: Action,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poem: Option<String>,
    pub timestamp: usize,
}

pub fn interesting_locations() -> Vec<Location> {
    vec![
        Location::new("mandelbrot", -0.7, 0.0, 4.0),
        Location::new("mandelbrot", -0.16, 1.04, 20.0),
        Location::new("mandelbrot", -0.4, 0.6, 10.0),
        Location::new("julia", 0.0, 0.0, 2.0),
        Location::new("mandelbrot", -1.25, 0.0, 8.0),
    ]
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub history: Vec<HistoryEntry>,
    pub bookmarks: BTreeMap<String, Location>,
    #[serde(rename = "current_location")]
    pub current: Location,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Pan by `step / zoom` in the given direction, or halve/double the zoom.
    pub fn navigate(&mut self, direction: Direction, step: f64) {
        let delta = step / self.current.zoom;
        match direction {
            Direction::Up => self.current.y += delta,
            Direction::Down => self.current.y -= delta,
            Direction::Left => self.current.x -= delta,
            Direction::Right => self.current.x += delta,
            Direction::In => self.current.zoom *= 2.0,
            Direction::Out => self.current.zoom /= 2.0,
        }
        debug!(location = %self.current, ?direction, "navigated");
    }

    pub fn jump(&mut self, x: f64, y: f64, zoom: f64) -> Result<()> {
        validate_zoom(zoom)?;
        self.current.x = x;
        self.current.y = y;
        self.current.zoom = zoom;
        Ok(())
    }

    pub fn switch_fractal(&mut self, engine: &str) -> Result<()> {
        resolve_family(engine)?;
        self.current.engine = engine.to_lowercase();
        Ok(())
    }

    pub fn random_jump<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Location {
        if let Some(loc) = interesting_locations().choose(rng) {
            self.current = loc.clone();
        }
        &self.current
    }

    pub fn save_bookmark(&mut self, name: &str) {
        self.bookmarks.insert(name.to_string(), self.current.clone());
    }

    pub fn load_bookmark(&mut self, name: &str) -> bool {
        match self.bookmarks.get(name) {
            Some(loc) => {
                self.current = loc.clone();
                true
            }
            None => false,
        }
    }

    pub fn record(&mut self, action: Action, poem: Option<String>) {
        let entry = HistoryEntry {
            action,
            location: self.current.clone(),
            poem,
            timestamp: self.history.len(),
        };
        self.history.push(entry);
    }

    /// The last `n` history entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        &self.history[self.history.len().saturating_sub(n)..]
    }

    pub fn write_json<W: Write>(&self, w: W) -> Result<()> {
        serde_json::to_writer_pretty(w, self)?;
        Ok(())
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        self.write_json(&mut w)?;
        w.flush()?;
        info!(path = %path.display(), entries = self.history.len(), "session exported");
        Ok(())
    }

    pub fn import(path: &Path) -> Result<Session> {
        let session: Session = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        validate_zoom(session.current.zoom)?;
        resolve_family(&session.current.engine).map_err(|_| {
            Error::InvalidParameter(format!("session has unknown engine '{}'", session.current.engine))
        })?;
        info!(path = %path.display(), entries = session.history.len(), "session imported");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn panning_scales_with_zoom() {
        let mut s = Session::new();
        s.navigate(Direction::Right, 0.2);
        assert!((s.current.x - 0.2).abs() < 1e-12);
        s.navigate(Direction::In, DEFAULT_STEP);
        s.navigate(Direction::In, DEFAULT_STEP);
        assert_eq!(s.current.zoom, 4.0);
        s.navigate(Direction::Up, 0.4);
        assert!((s.current.y - 0.1).abs() < 1e-12);
        s.navigate(Direction::Out, DEFAULT_STEP);
        assert_eq!(s.current.zoom, 2.0);
    }

    #[test]
    fn bookmarks_round_trip() {
        let mut s = Session::new();
        s.jump(-0.7, 0.1, 4.0).unwrap();
        s.save_bookmark("valley");
        s.jump(0.0, 0.0, 1.0).unwrap();
        assert!(s.load_bookmark("valley"));
        assert_eq!(s.current, Location::new("mandelbrot", -0.7, 0.1, 4.0));
        assert!(!s.load_bookmark("nowhere"));
    }

    #[test]
    fn switch_rejects_unknown_family() {
        let mut s = Session::new();
        assert!(s.switch_fractal("Julia").is_ok());
        assert_eq!(s.current.engine, "julia");
        assert!(matches!(s.switch_fractal("newton"), Err(Error::UnknownEngine(_))));
        assert_eq!(s.current.engine, "julia");
    }

    #[test]
    fn random_jump_lands_on_a_known_location() {
        let mut s = Session::new();
        let loc = s.random_jump(&mut StdRng::seed_from_u64(2)).clone();
        assert!(interesting_locations().contains(&loc));
    }

    #[test]
    fn history_timestamps_count_up() {
        let mut s = Session::new();
        s.record(Action::Explore, None);
        s.record(Action::Poem, Some("line".to_string()));
        s.record(Action::Journey, None);
        let ts: Vec<usize> = s.history.iter().map(|e| e.timestamp).collect();
        assert_eq!(ts, vec![0, 1, 2]);
        assert_eq!(s.recent(2).len(), 2);
        assert_eq!(s.recent(2)[0].action, Action::Poem);
        assert_eq!(s.recent(10).len(), 3);
    }

    #[test]
    fn json_shape() {
        let mut s = Session::new();
        s.save_bookmark("home");
        s.record(Action::Poem, Some("# t\n\nline".to_string()));
        let mut buf = Vec::new();
        s.write_json(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["current_location"]["engine"], "mandelbrot");
        assert_eq!(value["bookmarks"]["home"]["zoom"], 1.0);
        assert_eq!(value["history"][0]["action"], "poem");
        let back: Session = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, s);
    }
}
