use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process;
use tracing::{debug, info};
use wordcount_pipeline::{
    write_report, PipelineBuilder, PipelineConfig, PipelineError, Result,
};

/// Count word frequencies in a text file with a parallel map/merge pipeline
#[derive(Parser, Debug)]
#[command(name = "wordcount", version, about)]
struct Cli {
    /// Input file to count
    input: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Maximum lines buffered per streaming batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Worker threads (default: number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Lock stripes in the merge table (default: worker count)
    #[arg(long)]
    stripes: Option<usize>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders usage errors, --help and --version itself
            let _ = err.print();
            process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 3)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = PipelineConfig::default();
    if let Some(n) = cli.batch_size {
        config.batch_size = n;
    }
    if let Some(n) = cli.workers {
        config.workers = n;
    }
    // stripes default tracks the (possibly overridden) worker count
    config.stripes = cli.stripes.unwrap_or(config.workers);

    let file = File::open(&cli.input).map_err(|source| PipelineError::InputOpen {
        path: cli.input.clone(),
        source,
    })?;

    debug!(?config, "starting pipeline");
    let mut pipeline = PipelineBuilder::from_config(config).build()?;
    pipeline.run(BufReader::new(file))?;
    let snapshot = pipeline.stats().snapshot();
    let counts = pipeline.finish()?;
    info!("{}", snapshot.format());

    match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| PipelineError::OutputOpen {
                path: path.clone(),
                source,
            })?;
            write_report(&mut BufWriter::new(file), &counts)?;
        }
        None => {
            write_report(&mut io::stdout().lock(), &counts)?;
        }
    }
    Ok(())
}
