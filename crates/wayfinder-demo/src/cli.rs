use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wayfinder::StepCatalog;

use crate::error::{DemoError, Result};
use crate::runner::{RunSettings, Runner};
use crate::scene::{load_catalog, load_options, load_scene};
use crate::script::parse_script;

#[derive(Debug, Parser)]
#[command(
    name = "wayfinder-demo",
    about = "Run a Wayfinder guided tour headlessly against a simulated page",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Raise log verbosity (-v, -vv, -vvv). Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a scripted tour and print what the host would see.
    Run(RunArgs),

    /// Check a catalog and tour options for problems.
    Validate(ValidateArgs),

    /// List the steps a catalog defines.
    List(ListArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Step catalog (TOML or JSON).
    #[arg(long)]
    pub catalog: PathBuf,

    /// Tour options (TOML or JSON).
    #[arg(long)]
    pub options: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Simulated page: viewport and anchor boxes (TOML or JSON).
    #[arg(long)]
    pub scene: PathBuf,

    /// Comma-separated actions, e.g. `next,scroll:0x200,prev,close`.
    /// Without a script the tour is stepped through with `next`.
    #[arg(long, default_value = "")]
    pub script: String,

    /// Report navigation as pending and settle it explicitly.
    #[arg(long)]
    pub async_navigation: bool,

    /// Print the transcript as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Step catalog (TOML or JSON).
    #[arg(long)]
    pub catalog: PathBuf,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.log_json, cli.verbose);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_tour(&args),
        Commands::Validate(args) => {
            let problems = validate(&args.input)?;
            for problem in &problems {
                println!("{problem}");
            }
            if problems.is_empty() {
                println!("ok");
                Ok(())
            } else {
                Err(DemoError::Invalid {
                    count: problems.len(),
                })
            }
        }
        Commands::List(args) => {
            let catalog = load_catalog(&args.catalog)?;
            for def in catalog.iter() {
                let side = def.side.map_or("-", |side| side.as_str());
                println!("{:<24} {:<20} {:<7} {}", def.id, def.route, side, def.title);
            }
            Ok(())
        }
    }
}

/// Every problem found in the catalog, the options, and between them.
pub fn validate(input: &InputArgs) -> Result<Vec<String>> {
    let catalog = load_catalog(&input.catalog)?;
    let options = load_options(&input.options)?;

    let mut problems: Vec<String> = catalog
        .validate()
        .into_iter()
        .map(|p| format!("catalog: {p}"))
        .collect();
    problems.extend(options.validate().into_iter().map(|p| format!("options: {p}")));
    problems.extend(
        catalog
            .missing(&options.steps)
            .into_iter()
            .map(|id| format!("options: step `{id}` is not in the catalog")),
    );
    if let Some(first) = options.first_step.as_deref()
        && options.first_step_index().is_none()
    {
        problems.push(format!(
            "options: first_step `{first}` is not in steps (tour will open on the first step)"
        ));
    }
    Ok(problems)
}

fn run_tour(args: &RunArgs) -> Result<()> {
    let catalog = load_catalog(&args.input.catalog)?;
    let options = load_options(&args.input.options)?
        .validated()
        .map_err(|err| DemoError::config(&args.input.options, err))?;
    for id in &options.steps {
        if catalog.get(id).is_none() {
            tracing::warn!(step = %id, "step is not in the catalog");
        }
    }
    let scene = load_scene(&args.scene)?;
    let actions = parse_script(&args.script)?;

    let settings = RunSettings {
        async_navigation: args.async_navigation,
    };
    let mut runner = Runner::new(catalog, scene, settings)?;
    runner.start(options)?;
    runner.run_script(&actions);
    let entries = runner.finish();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", entry.render());
        }
    }
    Ok(())
}
