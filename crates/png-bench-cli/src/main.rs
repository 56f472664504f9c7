//! png-bench CLI - PNG encoder size/speed comparison

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Compare a candidate PNG encoder against reference encoders.
#[derive(Parser)]
#[command(name = "png-bench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the benchmark corpus lives and how its files are named.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Directory of raw pixel files named <case>-<width>x<height>.<raw-ext>
    #[arg(long, env = "PNG_BENCH_RAW_DIR", default_value = "examples/raw")]
    pub raw_dir: PathBuf,

    /// Directory of reference-encoded files named <case>.<reference-ext>
    #[arg(long, env = "PNG_BENCH_REFERENCE_DIR", default_value = "examples/png")]
    pub reference_dir: PathBuf,

    /// Raw file extension
    #[arg(long, default_value = "raw")]
    pub raw_ext: String,

    /// Reference file extension
    #[arg(long, default_value = "png")]
    pub reference_ext: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark every available encoder over the corpus
    Run {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Candidate encoder executable
        #[arg(long, env = "PNG_BENCH_ENCODER", default_value = "build/png_encoder")]
        encoder: PathBuf,

        /// Parent directory for per-run scratch directories
        #[arg(long)]
        scratch_dir: Option<PathBuf>,

        /// Also write png-bench.json and png-bench.csv here
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Disable ANSI colors in the table
        #[arg(long)]
        no_color: bool,

        /// Optional backends to leave out (repeatable)
        #[arg(long)]
        skip: Vec<String>,
    },

    /// List resolved corpus cases without benchmarking
    Corpus {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Show registered encoders and their availability
    Backends {
        /// Candidate encoder executable
        #[arg(long, env = "PNG_BENCH_ENCODER", default_value = "build/png_encoder")]
        encoder: PathBuf,
    },

    /// Convert images into raw corpus files named <name>-<width>x<height>.raw
    Prepare {
        /// Source images
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Case name (only with a single source; defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "png_bench=debug,png_bench_cli=debug"
    } else {
        "png_bench=info,png_bench_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { corpus, encoder, scratch_dir, report_dir, no_color, skip } => {
            commands::run::run(commands::run::RunOptions {
                corpus,
                encoder,
                scratch_dir,
                report_dir,
                color: !no_color,
                skip,
            })
        }
        Commands::Corpus { corpus } => commands::corpus::run(&corpus),
        Commands::Backends { encoder } => commands::backends::run(&encoder),
        Commands::Prepare { sources, out_dir, name } => {
            commands::prepare::run(&sources, &out_dir, name.as_deref())
        }
    }
}
