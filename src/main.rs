use std::path::PathBuf;
use clap::{Parser, Subcommand};
use anyhow::Result;

use crossfilter_dash::{dump, print_dashboard_info, Project};
use crossfilter_dash::model::{Dataset, DEFAULT_GLOBAL_NAME};
use crossfilter_dash::parser::{parse_config, parse_dataset};
use crossfilter_dash::visualization::{bootstrap, Resources};

#[derive(Parser)]
#[command(name = "crossfilter-dash")]
#[command(author, version, about = "Linked crossfilter/dc.js dashboard generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard script body
    Render {
        /// Path to JSON dashboard configuration
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Path to CSV dataset
        #[arg(value_name = "DATA")]
        data: PathBuf,
    },

    /// Write <name>.html, <name>.csv and <name>.json artifacts
    Save {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Artifact base name (default: the configuration's output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the loader configuration and stylesheet tag
    Bootstrap {
        /// Configuration whose resource overrides to apply
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print a script publishing the dataset as a global variable
    Data {
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Global variable name
        #[arg(short, long, default_value = DEFAULT_GLOBAL_NAME)]
        name: String,

        /// Columns to load as categorical - can be specified multiple times
        #[arg(short, long)]
        categorical: Vec<String>,
    },

    /// Display information about the dashboard
    Info {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Show columns and per-chart details
        #[arg(short, long)]
        verbose: bool,
    },

    /// Dump chart previews and fragments to a text file for debugging
    Dump {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Output text file path (default: <output>.dump.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum buckets listed per chart
        #[arg(long, default_value_t = 20)]
        max_buckets: usize,

        /// Omit generated fragments from output
        #[arg(long)]
        no_fragments: bool,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .filter_module("crossfilter_dash", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { config, data } => {
            let project = Project::open(&config, &data)?;
            let rendered = project.dashboard.render(&project.bootstrap)?;
            print!("{}", rendered.script);
        }

        Commands::Save { config, data, output } => {
            let project = Project::open(&config, &data)?;
            let base = output.unwrap_or_else(|| PathBuf::from(&project.config.output));
            let saved = project.dashboard.save(&project.bootstrap, &base)?;
            println!("Dashboard saved: {}", saved.paths.html.display());
            println!("Data exported: {}", saved.paths.csv.display());
        }

        Commands::Bootstrap { config } => {
            let resources = match config {
                Some(path) => parse_config(&std::fs::read_to_string(path)?)?.resources,
                None => Resources::default(),
            };
            let boot = bootstrap(&resources)?;
            println!("{}", boot.loader_script);
            println!("{}", boot.stylesheet);
        }

        Commands::Data { data, name, categorical } => {
            let dataset: Dataset = parse_dataset(std::fs::File::open(&data)?, &categorical)?;
            println!("{}", dataset.global_script(&name)?);
        }

        Commands::Info { config, data, verbose } => {
            let project = Project::open(&config, &data)?;
            print_dashboard_info(&project, verbose);
        }

        Commands::Dump { config, data, output, max_buckets, no_fragments } => {
            let project = Project::open(&config, &data)?;

            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!("{}.dump.txt", project.config.output))
            });

            let options = dump::DumpOptions {
                max_buckets,
                fragments: !no_fragments,
            };

            dump::dump_to_file(&project.dashboard, &output_path, &options)?;

            println!("Dump written to: {}", output_path.display());
        }
    }

    Ok(())
}
