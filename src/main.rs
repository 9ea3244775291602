use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use godecl::config::{discover, load_from_path, Config};
use godecl::{parse_with_options, File};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "godecl")]
#[command(about = "Build structural declaration trees for Go source files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse Go files and print their declaration trees as JSON
    Parse {
        /// Go files or directories to walk for *.go files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Source encoding (only UTF-8 is supported)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Config file (default: nearest godecl.toml above the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log every resolved block
        #[arg(long)]
        print_blocks: bool,

        /// Compute the file footer span from trailing content
        #[arg(long)]
        trailing_footer: bool,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Report Go files that fail to parse
    Check {
        /// Go files or directories to walk for *.go files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Config file (default: nearest godecl.toml above the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("godecl=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            paths,
            encoding,
            config,
            print_blocks,
            trailing_footer,
            compact,
        } => {
            let mut config = resolve_config(config)?;
            if let Some(encoding) = encoding {
                config.parse.encoding = encoding;
            }
            config.parse.trailing_footer |= trailing_footer;
            config.debug.print_blocks |= print_blocks;
            cmd_parse(&paths, &config, compact)
        }

        Commands::Check { paths, config } => cmd_check(&paths, &resolve_config(config)?),
    }
}

/// Explicit `--config` wins; otherwise the nearest `godecl.toml` walking up
/// from the current directory; otherwise defaults.
fn resolve_config(explicit: Option<PathBuf>) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(path),
        None => discover(&env::current_dir()?),
    };
    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_from_path(&path)?
        }
        None => Config::default(),
    };
    Ok(config)
}

/// Expand directories into the `.go` files below them, sorted.
fn collect_go_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.exists() {
            anyhow::bail!("No such file or directory: {}", path.display());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|s| s.to_str()) == Some("go")
            {
                found.push(entry.path().to_path_buf());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

fn parse_file(path: &Path, config: &Config) -> Result<File> {
    let reader =
        fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_with_options(reader, &config.parse.encoding, &config.parse)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn cmd_parse(paths: &[PathBuf], config: &Config, compact: bool) -> Result<()> {
    config.apply_debug();

    for path in collect_go_files(paths)? {
        let file = parse_file(&path, config)?;
        let json = if compact {
            serde_json::to_string(&file)?
        } else {
            serde_json::to_string_pretty(&file)?
        };
        println!("{json}");
    }
    Ok(())
}

fn cmd_check(paths: &[PathBuf], config: &Config) -> Result<()> {
    let files = collect_go_files(paths)?;
    let mut failed = 0usize;

    for path in &files {
        let file = parse_file(path, config)?;
        match &file.parsing_errors {
            Some(errors) if !errors.is_empty() => {
                failed += 1;
                for error in errors {
                    eprintln!("{} {}:{}", "✗".red(), path.display(), error.message);
                }
            }
            _ => println!("{} {}", "✓".green(), path.display()),
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} parsed", format!("{}", files.len() - failed).green());
    println!("  {} with syntax errors", format!("{failed}").red());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
