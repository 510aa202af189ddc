use arkscript::cli::{self, CliError, RunOptions};
use arkscript::{Config, Workspace, to_json, to_json_pretty};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(ClapParser)]
#[command(name = "ark")]
#[command(about = "ArkScript - batch editing of text and PDF documents")]
#[command(version)]
struct Cli {
    /// Working directory holding inputs and outputs
    #[arg(long, global = true, env = "ARKSCRIPT_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script against the working directory
    Run {
        /// Script file (reads from stdin if neither this nor -e is given)
        script: Option<PathBuf>,

        /// Inline script
        #[arg(short = 'e', long = "eval")]
        code: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,

        /// Keep the documents generated by earlier runs
        #[arg(long)]
        keep_outputs: bool,
    },

    /// Validate a script's syntax without running it
    Check {
        /// Script file (reads from stdin if neither this nor -e is given)
        script: Option<PathBuf>,

        /// Inline script
        #[arg(short = 'e', long = "eval")]
        code: Option<String>,
    },

    /// Copy input documents into the working directory
    Stage {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List the staged input documents
    Inputs,

    /// Delete generated documents
    Clean {
        /// Delete inputs and the manifest too
        #[arg(long)]
        all: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'ark docs' to list categories)
        category: String,
    },

    /// Interactive onboarding tutorial
    Onboard,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match cli.dir {
        Some(dir) => Config::with_root(dir),
        None => Config::from_env(),
    };

    let result = match cli.command {
        Commands::Run {
            script,
            code,
            json,
            pretty,
            keep_outputs,
        } => run_script(config, script, code, json, pretty, keep_outputs),
        Commands::Check { script, code } => run_check(script, code),
        Commands::Stage { files } => run_stage(config, &files),
        Commands::Inputs => open(config).map(|ws| {
            for name in ws.inputs() {
                println!("{}", name);
            }
        }),
        Commands::Clean { all } => open(config).and_then(|ws| {
            let removed = if all { ws.reset()? } else { ws.clean_outputs()? };
            println!("Removed {} file(s)", removed);
            Ok(())
        }),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
        Commands::Onboard => {
            print!("{}", cli::get_onboarding_content());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn open(config: Config) -> Result<Workspace, CliError> {
    Ok(Workspace::open(config)?)
}

fn piped_stdin() -> Result<Option<String>, CliError> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

fn run_options(script: Option<PathBuf>, code: Option<String>) -> Result<RunOptions, CliError> {
    let stdin = if script.is_none() && code.is_none() {
        piped_stdin()?
    } else {
        None
    };
    Ok(RunOptions {
        script,
        code,
        stdin,
        keep_outputs: false,
    })
}

fn run_script(
    config: Config,
    script: Option<PathBuf>,
    code: Option<String>,
    json: bool,
    pretty: bool,
    keep_outputs: bool,
) -> Result<(), CliError> {
    let options = RunOptions {
        keep_outputs,
        ..run_options(script, code)?
    };
    let workspace = open(config)?;
    let result = cli::execute_run(&workspace, &options)?;

    if json || pretty {
        let out = if pretty {
            to_json_pretty(&result)
        } else {
            to_json(&result)
        };
        println!("{}", out);
    } else {
        for line in result.log() {
            println!("{}", line);
        }
        if !result.generated_files.is_empty() {
            println!();
            println!("Generated:");
            for name in &result.generated_files {
                println!("  {}", name);
            }
        }
    }

    match result.error {
        Some(e) if result.failed => Err(CliError::RunFailed(e)),
        _ => Ok(()),
    }
}

fn run_check(script: Option<PathBuf>, code: Option<String>) -> Result<(), CliError> {
    let source = cli::read_script(&run_options(script, code)?)?;
    let result = cli::execute_check(&source)?;
    println!("Syntax is valid ({} statement(s))", result.statements.len());
    for line in result.statements {
        println!("{}", line);
    }
    Ok(())
}

fn run_stage(config: Config, files: &[PathBuf]) -> Result<(), CliError> {
    let workspace = open(config)?;
    let staged = workspace.stage(files)?;
    println!("Staged {}", staged.join(", "));
    Ok(())
}
