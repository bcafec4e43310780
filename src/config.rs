//! Runtime configuration loaded from environment variables.
//!
//! | Variable                    | Default | Description                          |
//! |-----------------------------|---------|--------------------------------------|
//! | `FRACTAL_POETRY_LOG`        | `info`  | tracing filter (e.g. `fractal_poetry=debug`) |
//! | `FRACTAL_POETRY_SEED`       | unset   | RNG seed for reproducible poems      |
//! | `FRACTAL_POETRY_MAX_ITER`   | `100`   | iteration cap used for poems         |
//! | `FRACTAL_POETRY_OUTPUT_DIR` | `.`     | where studio and export files go     |

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::fractal::DEFAULT_MAX_ITER;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: String,
    pub seed: Option<u64>,
    pub max_iter: u32,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values fall back to
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("FRACTAL_POETRY_LOG").unwrap_or_else(|| "info".to_string()),
            seed: parse_var(&lookup, "FRACTAL_POETRY_SEED"),
            max_iter: parse_var(&lookup, "FRACTAL_POETRY_MAX_ITER").unwrap_or(DEFAULT_MAX_ITER),
            output_dir: lookup("FRACTAL_POETRY_OUTPUT_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.max_iter, 100);
        assert_eq!(cfg.output_dir, PathBuf::from("."));
    }

    #[test]
    fn overrides_applied_and_garbage_ignored() {
        let env: HashMap<&str, &str> = [
            ("FRACTAL_POETRY_SEED", "42"),
            ("FRACTAL_POETRY_MAX_ITER", "lots"),
            ("FRACTAL_POETRY_OUTPUT_DIR", "/tmp/art"),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.max_iter, 100);
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/art"));
    }

    #[test]
    fn seeded_rng_repeats() {
        let cfg = Config { seed: Some(7), ..Config::default() };
        assert_eq!(cfg.rng().r#gen::<u64>(), cfg.rng().r#gen::<u64>());
    }
}
