use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use socv3::cli::AppContext;
use socv3::models::{Choice, MetadataField, Phase};
use socv3::{Result, SocConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "socv3")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SOC V3 behavior observation forms", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: ~/.config/socv3/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for drafts and the working form
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the evaluation items
    Items,

    /// Start a blank form
    New {
        /// Discard the current form without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Set a header field (date, name, area, tenure, supervisor)
    Set {
        field: MetadataField,
        value: String,
    },

    /// Answer an item: socv3 mark 3 initial yes
    Mark {
        /// Item number (1-based)
        row: usize,

        /// initial or final
        phase: Phase,

        /// yes, no or unset
        choice: Choice,
    },

    /// Show the working form
    Show {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Draft operations
    #[command(subcommand)]
    Draft(socv3::cli::draft::DraftCommands),

    /// Send the working form and close the case
    Submit,

    /// Run the forwarding proxy
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Spreadsheet endpoint to forward to
        #[arg(long)]
        upstream: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write a default config file instead
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_log = match cli.command {
        Commands::Serve { .. } => "socv3=info,tower_http=info",
        _ => "warn",
    };
    socv3::logging::init(default_log);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to start runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        generate(shell, &mut Cli::command(), "socv3", &mut io::stdout());
        return Ok(());
    }

    let config = SocConfig::load(cli.config.as_deref())?;
    if let Commands::Config { init, force } = cli.command {
        return socv3::cli::config::run(&config, cli.config.as_deref(), init, force);
    }
    let ctx = AppContext::new(config, cli.data_dir)?;

    match cli.command {
        Commands::Items => socv3::cli::form::items(&ctx)?,

        Commands::New { yes } => socv3::cli::form::new(&ctx, yes)?,

        Commands::Set { field, value } => socv3::cli::form::set(&ctx, field, value)?,

        Commands::Mark { row, phase, choice } => {
            socv3::cli::form::mark(&ctx, row, phase, choice)?
        }

        Commands::Show { json } => socv3::cli::form::show(&ctx, json)?,

        Commands::Draft(cmd) => socv3::cli::draft::run(&ctx, cmd).await?,

        Commands::Submit => socv3::cli::submit::run(&ctx).await?,

        Commands::Serve {
            port,
            bind,
            upstream,
        } => socv3::cli::serve::run(&ctx, port, bind, upstream).await?,

        Commands::Config { .. } | Commands::Completions { .. } => {
            unreachable!("handled before dispatch")
        }
    }

    Ok(())
}
