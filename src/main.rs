//! CLI entry point for dirscope

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dirscope::config::{self, CONFIG_FILE_NAME, ConfigFile, InitOutcome};
use dirscope::{Format, OutputConfig, analyze, render};

/// Determine whether stdout should get colour escapes.
fn should_use_color() -> bool {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    // Respect FORCE_COLOR environment variable
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    // Respect TERM=dumb
    if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Parser, Debug)]
#[command(name = "dirscope")]
#[command(about = "Directory structure reports that respect .gitignore")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory to analyze
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Write the report to FILE
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,

    /// Extra ignore patterns, comma separated (gitignore syntax)
    #[arg(short = 'i', long = "ignore", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Only discover paths matching these globs, comma separated
    #[arg(long = "include", value_delimiter = ',')]
    include: Vec<String>,

    /// Append statistics (totals, categories, extensions, largest files)
    #[arg(long = "stats")]
    stats: bool,

    /// Append a list of every file
    #[arg(long = "files")]
    files: bool,

    /// Show file sizes
    #[arg(long = "sizes")]
    sizes: bool,

    /// Do not apply the root .gitignore
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// Do not apply the built-in ignore list
    #[arg(long = "no-default-patterns")]
    no_default_patterns: bool,

    /// Include hidden files and directories
    #[arg(long = "hidden")]
    hidden: bool,

    /// Descend only N levels deep
    #[arg(short = 'd', long = "depth", value_name = "N")]
    depth: Option<usize>,

    /// Output format: txt, json or markdown
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    format: Option<Format>,

    /// Group the file list by category
    #[arg(long = "group-by-type")]
    group_by_type: bool,

    /// Show modification dates
    #[arg(long = "timestamps")]
    timestamps: bool,

    /// Show permission bits
    #[arg(long = "permissions")]
    permissions: bool,

    /// Leave out directories with nothing in them
    #[arg(long = "exclude-empty")]
    exclude_empty: bool,

    /// Follow symbolic links
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,

    /// Show git working tree status badges
    #[arg(long = "git-status")]
    git_status: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Keep colors when writing the report to a file
    #[arg(long = "color-file")]
    color_file: bool,

    /// Do not print the report to stdout
    #[arg(long = "no-print")]
    no_print: bool,

    /// Save the effective options to the config file
    #[arg(long = "save-config")]
    save_config: bool,

    /// Enable debug logging on stderr
    #[arg(long = "debug")]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a default config file in the current directory
    Init,
    /// Check the config file, .gitignore, git and write access
    Check,
}

impl Args {
    /// Overlay explicitly given flags on a config record.
    fn merge_into(&self, mut config: ConfigFile) -> ConfigFile {
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if !self.ignore.is_empty() {
            config.ignore = self.ignore.clone();
        }
        if !self.include.is_empty() {
            config.include = self.include.clone();
        }
        if let Some(depth) = self.depth {
            config.depth = Some(depth);
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        config.stats |= self.stats;
        config.files |= self.files;
        config.sizes |= self.sizes;
        config.hidden |= self.hidden;
        config.group_by_type |= self.group_by_type;
        config.timestamps |= self.timestamps;
        config.permissions |= self.permissions;
        config.exclude_empty |= self.exclude_empty;
        config.follow_symlinks |= self.follow_symlinks;
        config.git_status |= self.git_status;
        config.no_default_patterns |= self.no_default_patterns;
        if self.no_gitignore {
            config.gitignore = false;
        }
        if self.no_color {
            config.color = false;
        }
        config
    }
}

fn init_tracing(debug: bool) {
    // Starts from RUST_LOG; --debug raises the level to DEBUG.
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("dirscope: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;

    match args.command {
        Some(Command::Init) => return run_init(&cwd),
        Some(Command::Check) => {
            println!("{}", config::check(&cwd));
            return Ok(());
        }
        None => {}
    }

    let file = ConfigFile::load(&cwd)?;
    let loaded = file.is_some();
    let effective = args.merge_into(file.unwrap_or_default());

    if args.save_config {
        let path = effective.save(&cwd)?;
        eprintln!("Configuration saved to {}", path.display());
    }

    let mut analysis = effective.analysis_config();
    // The report path is relative to the working directory, not the root.
    analysis.output_file = effective.output.as_ref().map(|output| cwd.join(output));
    if loaded || args.save_config {
        analysis.exclude_config_file = Some(CONFIG_FILE_NAME.to_string());
    }

    let result = analyze(&args.directory, &analysis)?;
    let format = effective.format;
    let display = effective.output_config();

    if !args.no_print {
        let stdout_display = OutputConfig {
            use_color: effective.color && format == Format::Text && should_use_color(),
            ..display.clone()
        };
        let report = render(&result, format, &stdout_display).context("failed to render report")?;
        print!("{}", with_trailing_newline(report));
    }

    if let Some(output) = &effective.output {
        let file_display = OutputConfig {
            use_color: effective.color && args.color_file && format == Format::Text,
            ..display
        };
        write_report(Path::new(output), &render(&result, format, &file_display)?)?;
    }

    Ok(())
}

fn run_init(cwd: &Path) -> Result<()> {
    match config::init(cwd)? {
        InitOutcome::Created(path) => println!("Created {}", path.display()),
        InitOutcome::AlreadyExists(path) => {
            println!("{} already exists, leaving it unchanged", path.display())
        }
    }
    Ok(())
}

fn write_report(path: &Path, report: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, with_trailing_newline(report.to_string()))
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    eprintln!("Report written to {}", path.display());
    Ok(())
}

fn with_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
