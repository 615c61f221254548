use clap::{Parser, Subcommand};
use colored::Colorize;
use fsf_core::{ContrastKind, DesignMatrix, Fsf};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// fsf — inspect FSL FEAT design files
///
/// Parse `.fsf` designs and `.mat` design matrices, and print the
/// contrasts, EV groups, events and group membership they define.
#[derive(Parser)]
#[command(name = "fsf", version, about, long_about = None)]
struct Cli {
    /// Log parser activity to stderr (overrides FSF_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a design and print its containers
    Parse {
        /// Path to .fsf file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the named contrast vectors
    Contrasts {
        /// Path to .fsf file
        file: PathBuf,
        /// Read the original-EV contrasts instead of the real ones
        #[arg(long)]
        orig: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the higher-level EV values, one row per input
    Evgs {
        /// Path to .fsf file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print per-EV model settings
    Events {
        /// Path to .fsf file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print group membership per input
    Groupmem {
        /// Path to .fsf file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a .mat design matrix
    Mat {
        /// Path to .mat file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("FSF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 0 = success, 1 = malformed design, 2 = unreadable file
    let exit_code = match run(cli.command) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            match err.downcast_ref::<fsf_core::Error>() {
                Some(fsf_core::Error::Io { .. }) => 2,
                _ => 1,
            }
        }
    };

    process::exit(exit_code);
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Parse { file, json } => {
            let fsf = load(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&fsf.design)?);
            } else {
                for name in fsf.design.container_names() {
                    let Some(container) = fsf.design.get(name) else {
                        continue;
                    };
                    println!("{} ({} entries)", name.bold(), container.len());
                }
                if let Some(version) = fsf.attrs().version() {
                    println!("version: {}", version);
                }
                if let Some(level) = fsf.attrs().level() {
                    println!("level: {}", level);
                }
                println!("contrasts: {}", fsf.n_contrasts());
            }
        }
        Commands::Contrasts { file, orig, json } => {
            let fsf = load(&file)?;
            let kind = if orig { ContrastKind::Orig } else { ContrastKind::Real };
            let contrasts = fsf.view().contrasts(kind)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&contrasts)?);
            } else if contrasts.is_empty() {
                println!("no {} contrasts", kind.as_str());
            } else {
                for (name, weights) in &contrasts {
                    println!("{}: {}", name.bold(), format_row(weights));
                }
            }
        }
        Commands::Evgs { file, json } => {
            let evgs = load(&file)?.evgs()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&evgs.to_rows())?);
            } else {
                for row in evgs.rows() {
                    println!("{}", format_row(row));
                }
            }
        }
        Commands::Events { file, json } => {
            let events = load(&file)?.events()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                for (name, event) in &events {
                    println!(
                        "{}: shape={} convolve={} tempfilt={} deriv={} custom={}",
                        name.bold(),
                        show(event.shape),
                        show(event.convolve),
                        show(event.tempfilt),
                        show(event.deriv),
                        show(event.custom.as_deref()),
                    );
                }
            }
        }
        Commands::Groupmem { file, json } => {
            let groupmem = load(&file)?.groupmem()?;
            if json {
                println!("{}", serde_json::to_string(&groupmem)?);
            } else {
                println!("{}", format_row(&groupmem));
            }
        }
        Commands::Mat { file, json } => {
            let dmat = DesignMatrix::from_file(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dmat)?);
            } else {
                println!("NumWaves: {}", dmat.num_waves);
                println!("NumPoints: {}", dmat.num_points);
                println!("PPheights: {}", format_row(&dmat.pp_heights));
            }
        }
        Commands::Version => {
            println!(
                "fsf {} (fsf-core {})",
                env!("CARGO_PKG_VERSION"),
                fsf_core::VERSION
            );
        }
    }
    Ok(())
}

fn load(file: &Path) -> Result<Fsf, fsf_core::Error> {
    debug!(file = %file.display(), "loading design");
    Fsf::from_file(file)
}

fn format_row(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
