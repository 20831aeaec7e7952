use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use tracing::warn;

use camkit::{
    calculate_cycle_time, init_logging, load_file, post_processor, validate_gcode,
    verify_toolpath, Config, DialectRegistry, LoadedProgram, ValidationReport,
};
use camkit_core::units::format_length;

#[derive(Parser, Debug)]
#[command(name = "camkit", version, about = "CNC toolpath ingestion and post-processing")]
struct Cli {
    /// Configuration file (.json or .toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a G-code or MCAM file.
    Parse(ParseArgs),
    /// Re-emit a program for a controller dialect.
    Post(PostArgs),
    /// Check a program against the machine limits.
    Validate(ValidateArgs),
    /// Generate and post a JSON list of operations.
    Cam(CamArgs),
    /// List the available dialects.
    Dialects,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    file: PathBuf,

    /// Print the toolpaths as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PostArgs {
    file: PathBuf,

    /// Dialect id; defaults to the configured dialect.
    #[arg(long)]
    dialect: Option<String>,

    /// Output path; stdout when omitted.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct CamArgs {
    /// Operations JSON.
    file: PathBuf,

    #[arg(long)]
    dialect: Option<String>,

    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Also write the setup sheet as JSON.
    #[arg(long)]
    setup_sheet: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => Config::default(),
    };

    match cli.cmd {
        Command::Parse(args) => cmd_parse(args),
        Command::Post(args) => cmd_post(args, &config),
        Command::Validate(args) => cmd_validate(args, &config),
        Command::Cam(args) => cmd_cam(args, &config),
        Command::Dialects => cmd_dialects(),
    }
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let program = load_file(&args.file)?;
    if args.json {
        let json = serde_json::to_string_pretty(&program).context("serialize toolpaths")?;
        println!("{}", json);
        return Ok(());
    }

    let toolpath = program.combined_toolpath();
    println!("File:      {}", program.path.display());
    println!("Source:    {:?}", program.source);
    println!("Units:     {}", program.units.label());
    println!("Points:    {}", toolpath.len());
    println!("Tools:     {:?}", toolpath.tool_ids());
    if let Some(b) = toolpath.bounds() {
        println!(
            "Bounds:    X {:.3}..{:.3}  Y {:.3}..{:.3}  Z {:.3}..{:.3}",
            b.min_x, b.max_x, b.min_y, b.max_y, b.min_z, b.max_z
        );
    }
    println!(
        "Length:    {}",
        format_length(toolpath.length(), program.units)
    );
    println!(
        "Run time:  {:.1} s",
        calculate_cycle_time(&toolpath).as_secs_f64()
    );
    for issue in &program.warnings {
        println!("warning: {}", issue.message);
    }
    Ok(())
}

fn cmd_post(args: PostArgs, config: &Config) -> anyhow::Result<()> {
    let program = load_file(&args.file)?;
    let toolpath = program.combined_toolpath();
    let dialect = args
        .dialect
        .unwrap_or_else(|| config.post.default_dialect.clone());
    let gcode = post_processor(config)
        .generate_gcode(&toolpath, &[], &dialect)
        .with_context(|| format!("post '{}'", args.file.display()))?;
    write_output(args.out.as_deref(), &gcode)
}

fn cmd_validate(args: ValidateArgs, config: &Config) -> anyhow::Result<()> {
    let program = load_file(&args.file)?;
    let report = validation_report(&program, config);

    for issue in &report.warnings {
        println!("warning: {}", issue.message);
    }
    for issue in &report.errors {
        println!("error: {}", issue.message);
    }
    if !report.is_valid() {
        bail!(
            "{} failed validation with {} error(s)",
            args.file.display(),
            report.errors.len()
        );
    }
    println!(
        "{}: OK ({} warning(s))",
        args.file.display(),
        report.warnings.len()
    );
    Ok(())
}

/// Text files are checked line by line; decoded binaries by their toolpath
fn validation_report(program: &LoadedProgram, config: &Config) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.warnings.extend(program.warnings.iter().cloned());
    let checked = match &program.text {
        Some(text) => validate_gcode(text, &config.machine),
        None => {
            let toolpath = program.combined_toolpath();
            let diameter = toolpath.tool_diameter.unwrap_or(0.0);
            verify_toolpath(&toolpath, &config.machine, diameter)
        }
    };
    report.merge(checked);
    report
}

fn cmd_cam(args: CamArgs, config: &Config) -> anyhow::Result<()> {
    let (operations, toolpath) = camkit::generate_from_file(&args.file)?;
    let dialect = args
        .dialect
        .unwrap_or_else(|| config.post.default_dialect.clone());

    let verification = verify_toolpath(
        &toolpath,
        &config.machine,
        operations
            .first()
            .map(|op| op.tool().diameter)
            .unwrap_or_default(),
    );
    for issue in verification.warnings.iter().chain(&verification.errors) {
        warn!("{}", issue.message);
    }

    let post = post_processor(config);
    let gcode = post
        .generate_gcode(&toolpath, &operations, &dialect)
        .with_context(|| format!("post '{}'", args.file.display()))?;
    write_output(args.out.as_deref(), &gcode)?;

    if let Some(path) = args.setup_sheet {
        let sheet = post.setup_sheet(&gcode, &toolpath, &operations, &dialect);
        let json = serde_json::to_string_pretty(&sheet).context("serialize setup sheet")?;
        fs::write(&path, json).with_context(|| format!("write '{}'", path.display()))?;
    }
    Ok(())
}

fn cmd_dialects() -> anyhow::Result<()> {
    for dialect in DialectRegistry::standard().iter() {
        println!(
            "{:<14} {:<22} .{:<6} {}",
            dialect.id, dialect.name, dialect.extension, dialect.description
        );
    }
    Ok(())
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
