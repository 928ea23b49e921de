use accumulo_storage::runner::{BindArgs, Mode, describe_location, run_bind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Subcommand)]
enum Command {
    /// Parse a location string and print what it describes
    Parse {
        /// Location, e.g. accumulo://table?instance=i&user=u&password=p&zookeepers=zk:2181
        #[arg(short, long)]
        location: String,
    },

    /// Bind a location into a job configuration
    Bind {
        /// Location, e.g. accumulo://table?instance=i&user=u&password=p&zookeepers=zk:2181
        #[arg(short, long)]
        location: String,

        /// Side to bind (load, store)
        #[arg(short, long, default_value = "load")]
        mode: String,

        /// Schema of stored tuples (format: name:type,name2:type2)
        #[arg(short, long)]
        schema: Option<String>,

        /// UDF context signature (defaults to the table name)
        #[arg(long)]
        signature: Option<String>,

        /// Existing job configuration to bind into (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the resulting configuration here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bind in memory and show the result without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Quiet mode - only warnings and the summary
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Parse { location } => {
            init_tracing(false);
            println!("{}", describe_location(&location)?);
        }
        Command::Bind {
            location,
            mode,
            schema,
            signature,
            config,
            output,
            dry_run,
            quiet,
        } => {
            init_tracing(quiet);
            run_binder(BindArgs {
                location,
                mode: Mode::parse(&mode)?,
                schema,
                signature,
                config_path: config,
                output_path: output,
                dry_run,
            })?;
        }
    }
    Ok(())
}

fn init_tracing(quiet: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let filter = if quiet {
        EnvFilter::new("accumulo_storage=warn")
    } else {
        EnvFilter::new("accumulo_storage=info")
    };
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run_binder(args: BindArgs) -> anyhow::Result<()> {
    let dry_run = args.dry_run;
    let result = run_bind(args)?;

    if dry_run {
        println!("DRY RUN MODE - No configuration was written");
        println!();
    }

    println!("Bind Summary");
    println!("============");
    println!("Table: {}", result.table);
    println!("Mode: {:?}", result.mode);
    println!("Entries changed: {}", result.entries_changed);
    println!("Schema recorded: {}", result.schema_recorded);

    match result.written_to {
        Some(path) => println!("Configuration written to {}", path.display()),
        None => {
            println!();
            println!("{}", redacted(&result.configuration).to_json_pretty()?);
        }
    }

    Ok(())
}

/// Copy of the configuration safe to print: password entries are masked
fn redacted(
    conf: &accumulo_storage::job::JobConfiguration,
) -> accumulo_storage::job::JobConfiguration {
    let mut shown = conf.clone();
    for (key, _) in conf.iter() {
        if key.ends_with(".password") {
            shown.set(key, "<redacted>");
        }
    }
    shown
}
