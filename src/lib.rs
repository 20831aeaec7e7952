//! # CamKit
//!
//! Toolpath ingestion, synthesis and post-processing for CNC milling:
//! - G-code text and MCAM binary files normalized into one toolpath model
//! - Contour, pocket and drill toolpaths generated from 2D geometry
//! - Dialect-specific G-code output for Fanuc, Haas, Mach3, LinuxCNC and GRBL
//!
//! ## Architecture
//!
//! CamKit is organized as a workspace with multiple crates:
//!
//! 1. **camkit-core** - Toolpath model, geometry, tools, units, validation types
//! 2. **camkit-parser** - G-code parser and MCAM binary decoder
//! 3. **camkit-camtools** - Operations and toolpath generators
//! 4. **camkit-post** - Dialects, G-code emission and program validation
//! 5. **camkit-settings** - Machine limits and defaults from JSON/TOML files
//! 6. **camkit** - This facade and the `camkit` command-line tool

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::{debug, info};

pub use camkit_camtools::{
    calculate_cycle_time, generate, generate_all, verify_toolpath, CamToolError, ContourOp,
    CutSettings, DrillOp, HelixSettings, Job, Operation, PocketOp,
};
pub use camkit_core::{
    Bounds, GcodeError, MachineLimits, MotionPoint, MotionType, Point2, Polyline2, Tool,
    ToolKind, ToolLibrary, Toolpath, Units, ValidationIssue, ValidationReport,
};
pub use camkit_parser::binary::has_mcam_magic;
pub use camkit_parser::{DecodeOutcome, DecodeSource, GcodeParser, McamDecoder, ParseOutcome};
pub use camkit_post::{validate_gcode, Dialect, DialectRegistry, PostError, PostProcessor};
pub use camkit_settings::{CamDefaults, Config, PostSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, keeping stdout free for program text
/// - RUST_LOG environment variable support, INFO when unset
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

/// Parse G-code text. Never fails; problems are reported as warnings.
pub fn parse_gcode(text: &str) -> ParseOutcome {
    GcodeParser::new().parse(text)
}

/// Decode MCAM bytes, falling back to G-code text when they are not MCAM
pub fn parse_binary(bytes: &[u8]) -> DecodeOutcome {
    McamDecoder::new().decode(bytes)
}

/// Where a loaded toolpath came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramSource {
    Gcode,
    Mcam,
    /// MCAM magic present but the body only parsed as text
    GcodeFallback,
}

/// A program file normalized into toolpaths
#[derive(Debug, Clone, Serialize)]
pub struct LoadedProgram {
    pub path: PathBuf,
    pub source: ProgramSource,
    pub units: Units,
    /// One toolpath per tool, in file order
    pub toolpaths: Vec<Toolpath>,
    pub warnings: Vec<ValidationIssue>,
    /// Original text, kept for text-level validation
    #[serde(skip)]
    pub text: Option<String>,
}

impl LoadedProgram {
    /// All toolpaths concatenated in file order
    pub fn combined_toolpath(&self) -> Toolpath {
        let mut combined = Toolpath::new();
        for toolpath in &self.toolpaths {
            combined.extend(toolpath.iter().cloned());
        }
        combined
    }
}

/// Read a program file, sniffing the MCAM magic to pick the decoder
pub fn load_file(path: &Path) -> anyhow::Result<LoadedProgram> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if has_mcam_magic(&bytes) {
        debug!("{} carries the MCAM magic", path.display());
        let outcome = parse_binary(&bytes);
        if !outcome.success {
            bail!(
                "Failed to decode {}: {}",
                path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
        let source = match outcome.source {
            DecodeSource::Binary => ProgramSource::Mcam,
            DecodeSource::GcodeFallback => ProgramSource::GcodeFallback,
        };
        let program = LoadedProgram {
            path: path.to_path_buf(),
            source,
            units: outcome.units.unwrap_or_default(),
            toolpaths: outcome.toolpaths.unwrap_or_default(),
            warnings: outcome.warnings,
            text: None,
        };
        info!(
            "Loaded {} toolpath(s) from {}",
            program.toolpaths.len(),
            path.display()
        );
        return Ok(program);
    }

    let text = String::from_utf8_lossy(&bytes).into_owned();
    let outcome = parse_gcode(&text);
    info!(
        "Loaded {} point(s) from {} with {} warning(s)",
        outcome.toolpath.len(),
        path.display(),
        outcome.warnings.len()
    );
    Ok(LoadedProgram {
        path: path.to_path_buf(),
        source: ProgramSource::Gcode,
        units: outcome.units,
        toolpaths: outcome.toolpaths,
        warnings: outcome.warnings,
        text: Some(text),
    })
}

/// Post-processor configured from the `post` section
pub fn post_processor(config: &Config) -> PostProcessor {
    PostProcessor::new()
        .with_units(config.post.units)
        .with_decimals(config.post.decimals)
}

/// Cutting data for `tool` with the configured retract heights
pub fn cut_settings(
    config: &Config,
    tool: Tool,
    feed_rate: f64,
    spindle_speed: f64,
) -> CutSettings {
    CutSettings::new(tool, feed_rate, spindle_speed)
        .with_safe_z(config.cam.safe_z)
        .with_clearance_z(config.cam.clearance_z)
}

/// Helical entry from the `cam` section
pub fn helix_settings(config: &Config) -> HelixSettings {
    HelixSettings {
        pitch: config.cam.helix_pitch,
        segments_per_revolution: config.cam.segments_per_revolution,
    }
}

/// Read a JSON list of operations, generate each and concatenate the paths
///
/// Fails on the first operation that cannot be generated.
pub fn generate_from_file(path: &Path) -> anyhow::Result<(Vec<Operation>, Toolpath)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let operations: Vec<Operation> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid operation list in {}", path.display()))?;

    let mut combined = Toolpath::new();
    for (index, result) in generate_all(&operations).into_iter().enumerate() {
        let toolpath = result.with_context(|| {
            format!("Operation {} ({}) failed", index + 1, operations[index].name())
        })?;
        combined.append(toolpath);
    }
    Ok((operations, combined))
}
