use clap::{Parser, Subcommand, ValueEnum};
use poemsite::api::PoemTool;
use poemsite::types::SiteOrder;
use poemsite::{config, output};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Shared flag for commands that act on one configuration.
#[derive(clap::Args, Clone)]
struct ConfigArg {
    /// Configuration to use (defaults to the first registered one)
    #[arg(short = 'c', long = "config", value_name = "NAME")]
    name: Option<String>,
}

/// Shared flag for listing commands.
#[derive(clap::Args, Clone)]
struct JsonArg {
    /// Print machine-readable JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "poemsite")]
#[command(about = "Catalog plain-text poems and publish them as a static site")]
#[command(long_about = "\
Catalog plain-text poems and publish them as a static site

Poems are text files named <YYYY.MM.DD>_<N>_<title>.txt. They are grouped
into named configurations; each configuration can be generated into a site
with one page per poem and an index page.

Store layout:

  config/
  ├── _base.cfg        # Registry: one `name,path` line per configuration
  ├── winter.cfg       # Poem store: one `id,date,title,filepath` line per poem
  └── spring.cfg

Generated site:

  site/
  ├── index.html       # Table of contents
  ├── styles.css       # Bundled stylesheet (written only if absent)
  ├── 2024.01.05_1_morning-light.html
  └── src/
      └── 2024.01.05_1_morning-light.txt

Run 'poemsite gen-config' to print a documented poems.toml.")]
#[command(version)]
struct Cli {
    /// Settings file
    #[arg(long, default_value = config::DEFAULT_SETTINGS_FILE, global = true)]
    settings: PathBuf,

    /// Store directory (overrides `store.dir` from the settings file)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered configurations
    #[command(visible_alias = "lscfg")]
    ListConfigs(JsonArg),
    /// Register a new, empty configuration
    #[command(visible_alias = "addcfg")]
    AddConfig { name: String },
    /// Remove a configuration and its poem store
    #[command(visible_alias = "rmcfg")]
    RemoveConfig { name: String },
    /// List the poems of a configuration
    #[command(visible_alias = "lsp")]
    ListPoems {
        #[command(flatten)]
        config: ConfigArg,
        #[command(flatten)]
        json: JsonArg,
    },
    /// Add a poem file to a configuration
    #[command(visible_alias = "addp")]
    AddPoem {
        /// Poem source file
        source: PathBuf,
        #[command(flatten)]
        config: ConfigArg,
        /// Title to store instead of the one in the filename
        #[arg(long)]
        title: Option<String>,
    },
    /// Add every poem file in a directory
    Import {
        dir: PathBuf,
        #[command(flatten)]
        config: ConfigArg,
    },
    /// Remove a poem by id, title, filepath, or filename
    #[command(visible_alias = "rmp")]
    RemovePoem {
        identifier: String,
        #[command(flatten)]
        config: ConfigArg,
    },
    /// Generate the static site for a configuration
    #[command(visible_alias = "gen")]
    Generate {
        /// Output directory
        dest: PathBuf,
        #[command(flatten)]
        config: ConfigArg,
        /// Page and index order
        #[arg(long, value_enum, default_value_t = OrderArg::Catalog)]
        order: OrderArg,
    },
    /// Print a stock poems.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Order the poems were added in
    Catalog,
    /// Oldest first
    Date,
}

impl From<OrderArg> for SiteOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Catalog => SiteOrder::Catalog,
            OrderArg::Date => SiteOrder::Chronological,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        settings,
        store_dir,
        command,
    } = cli;
    let open = || open_tool(&settings, store_dir.clone());

    match command {
        Command::ListConfigs(args) => {
            let configs = open()?.list_configs()?;
            emit(args.json, &configs, || output::format_config_list(&configs))?;
        }
        Command::AddConfig { name } => {
            let record = open()?.add_config(&name)?;
            output::print_lines(output::format_config_added(&record));
        }
        Command::RemoveConfig { name } => {
            let record = open()?.remove_config(&name)?;
            output::print_lines(output::format_config_removed(&record));
        }
        Command::ListPoems { config, json } => {
            let listing = open()?.list_poems(config.name.as_deref())?;
            emit(json.json, &listing, || output::format_poem_list(&listing))?;
        }
        Command::AddPoem {
            source,
            config,
            title,
        } => {
            let (configuration, record) =
                open()?.add_poem(config.name.as_deref(), &source, title.as_deref())?;
            output::print_lines(output::format_poem_added(&configuration, &record));
        }
        Command::Import { dir, config } => {
            let report = open()?.import(config.name.as_deref(), &dir)?;
            output::print_lines(output::format_import_report(&report));
        }
        Command::RemovePoem { identifier, config } => {
            let (configuration, removed) =
                open()?.remove_poem(config.name.as_deref(), &identifier)?;
            output::print_lines(output::format_poem_removed(&configuration, &removed));
        }
        Command::Generate {
            dest,
            config,
            order,
        } => {
            let report = open()?.generate_site(config.name.as_deref(), &dest, order.into())?;
            output::print_lines(output::format_generate_report(&report));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load settings, apply the `--store-dir` override, and build the tool.
fn open_tool(
    settings: &Path,
    store_dir: Option<PathBuf>,
) -> Result<PoemTool, config::ConfigError> {
    let mut settings = config::load_config(settings)?;
    if let Some(dir) = store_dir {
        settings.store.dir = dir;
        settings.validate()?;
    }
    Ok(PoemTool::new(settings))
}

/// Print `value` as JSON, or the text lines from `format`.
fn emit<T: Serialize>(
    json: bool,
    value: &T,
    format: impl FnOnce() -> Vec<String>,
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        output::print_lines(format());
    }
    Ok(())
}
