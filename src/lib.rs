pub mod math;
pub mod error;
pub mod fractal;
pub mod features;
pub mod sampler;
pub mod poetry;
pub mod grid;
pub mod palette;
pub mod render;
pub mod export;
pub mod explorer;
pub mod session;
pub mod studio;
pub mod repl;
pub mod config;

pub use math::C;
pub use error::{Error, Result};
pub use fractal::{
    DEFAULT_MAX_ITER, FAMILY_NAMES, FractalFamily, FractalPoint,
    evaluate, resolve_family
};
pub use features::{PoeticFeatures, extract};
pub use sampler::{Journey, Region, journey, pick_recenter, sample_fractal_region, sample_region};
pub use poetry::{Category, Template, TEMPLATES, compose, compose_line, select_word};
pub use grid::{Viewport, evaluate_grid};
pub use palette::ColorPalette;
pub use render::{AsciiStyle, mandala, overlay_poem, render_ansi, render_ascii};
pub use export::{
    export_grid_csv, export_points_csv, export_poetry_analysis,
    read_points_csv, render_png, render_ppm
};
pub use explorer::Explorer;
pub use session::{Action, Direction, Location, Session};
pub use studio::{ArtStudio, illustrated_poem, journey_poem, poetry_challenge, region_poem};
pub use repl::Repl;
pub use config::Config;
