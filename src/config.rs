/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub pacing: PacingConfig,
    pub levels_dir: PathBuf,
}

/// Playback cadence. Delays are counted in simulation ticks; the tick
/// itself is `tick_rate_ms` long.
#[derive(Clone, Debug)]
pub struct PacingConfig {
    pub tick_rate_ms: u64,
    /// Ticks between consecutive commands of a run.
    pub step_ticks: u32,
    /// Settle delay after launch, before the first command, so the
    /// reset-to-start renders.
    pub pre_run_ticks: u32,
    /// How long the crash message holds before control returns.
    pub crash_recover_ticks: u32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    pacing: TomlPacing,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPacing {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_step_ticks")]
    step_ticks: u32,
    #[serde(default = "default_pre_run_ticks")]
    pre_run_ticks: u32,
    #[serde(default = "default_crash_recover_ticks")]
    crash_recover_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
}

// ── Defaults ──
// At the 50 ms tick: 600 ms between commands, a 300 ms pre-run settle,
// and a 2 s crash hold.

fn default_tick_rate() -> u64 { 50 }
fn default_step_ticks() -> u32 { 12 }
fn default_pre_run_ticks() -> u32 { 6 }
fn default_crash_recover_ticks() -> u32 { 40 }
fn default_levels_dir() -> String { "levels".into() }

impl Default for TomlPacing {
    fn default() -> Self {
        TomlPacing {
            tick_rate_ms: default_tick_rate(),
            step_ticks: default_step_ticks(),
            pre_run_ticks: default_pre_run_ticks(),
            crash_recover_ticks: default_crash_recover_ticks(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { levels_dir: default_levels_dir() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs
                .iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        GameConfig {
            pacing: PacingConfig {
                tick_rate_ms: toml_cfg.pacing.tick_rate_ms.max(1),
                step_ticks: toml_cfg.pacing.step_ticks,
                pre_run_ticks: toml_cfg.pacing.pre_run_ticks,
                crash_recover_ticks: toml_cfg.pacing.crash_recover_ticks,
            },
            levels_dir,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its data.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
