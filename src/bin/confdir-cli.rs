use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use confdir::observability::logging::{init_logging, DEFAULT_FILTER};
use confdir::{ConfigStore, DEFAULT_CONFIG_DIR};

#[derive(Parser)]
#[command(name = "confdir-cli")]
#[command(about = "Inspect a set.config directory and its module descriptors", long_about = None)]
struct Cli {
    /// Directory holding set.config
    #[arg(short, long, default_value = DEFAULT_CONFIG_DIR)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed settings file
    Global {
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print one module descriptor
    Module { name: String },
    /// Look up a dotted path inside a module, e.g. `get web server.port`
    Get {
        module: String,
        path: String,
        /// Value printed when the path is absent (JSON, or a plain string)
        #[arg(short, long)]
        default: Option<String>,
    },
    /// Print settings and all modules, or a single module
    Dump {
        #[arg(short, long)]
        module: Option<String>,
    },
    /// List module descriptors that failed to load
    Report,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(DEFAULT_FILTER);
    let cli = Cli::parse();

    let store = ConfigStore::load(&cli.dir)?;

    match cli.command {
        Commands::Global { format } => match format {
            Format::Json => print_json(&store.global_config().to_value())?,
            Format::Toml => print!("{}", toml::to_string_pretty(store.global_config())?),
        },
        Commands::Module { name } => match store.module_config(&name) {
            Some(value) => print_json(value)?,
            None => return Err(format!("module '{}' is not loaded", name).into()),
        },
        Commands::Get {
            module,
            path,
            default,
        } => {
            let default = default
                .map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
                .unwrap_or(Value::Null);
            print_json(&store.get_value(&module, &path, default))?;
        }
        Commands::Dump { module } => println!("{}", store.to_json(module.as_deref())?),
        Commands::Report => {
            let report = store.load_report();
            if report.is_clean() {
                eprintln!("All modules loaded");
            }
            print_json(&serde_json::to_value(report)?)?;
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
