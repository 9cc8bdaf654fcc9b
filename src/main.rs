use std::{fs, io, path::PathBuf, process, time::Instant};

use clap::{ArgAction, Parser as ClapParser};
use huopascript::{
    compiler::compiler::compile, config::CompileOptions, errors::errors::Error, format_error,
    parser::parser::parse,
};
use log::{info, LevelFilter};
use thiserror::Error as ThisError;

#[derive(ClapParser)]
#[command(name = "hsc")]
#[command(about = "HuopaScript - compiles .hsc scripts to JavaScript")]
#[command(version)]
struct Cli {
    /// The script to compile
    input: PathBuf,

    /// Output file (defaults to the input with a .js extension)
    output: Option<PathBuf>,

    /// Directory that relative import paths are resolved against
    #[arg(long)]
    imports_dir: Option<PathBuf>,

    /// Skip the check of the generated JavaScript
    #[arg(long)]
    no_check: bool,

    /// Print the parsed syntax tree as JSON and exit
    #[arg(long)]
    ast: bool,

    /// Write the JavaScript to stdout instead of a file
    #[arg(long)]
    stdout: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, ThisError)]
enum CliError {
    #[error("Cannot read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Cannot write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Cannot serialize the syntax tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Compilation failed with {0} error(s)")]
    Failed(usize),
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).env().init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(&cli) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let start = Instant::now();

    let source = fs::read_to_string(&cli.input).map_err(|source| CliError::Read {
        path: cli.input.clone(),
        source,
    })?;

    let parsed = parse(&source);
    info!("Parsed in {:?}", start.elapsed());
    if !parsed.errors.is_empty() {
        return Err(report(&parsed.errors, &source, cli));
    }

    if cli.ast {
        println!("{}", serde_json::to_string_pretty(&parsed.ast)?);
        return Ok(());
    }

    let mut options = CompileOptions::default();
    if let Some(imports_dir) = &cli.imports_dir {
        options = options.with_imports_dir(imports_dir.clone());
    }
    options.check_output = !cli.no_check;

    let compile_start = Instant::now();
    let output = compile(&parsed.ast, &options);
    info!("Compiled in {:?}", compile_start.elapsed());
    if !output.errors.is_empty() {
        return Err(report(&output.errors, &source, cli));
    }

    if cli.stdout {
        print!("{}", output.code);
    } else {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| cli.input.with_extension("js"));
        fs::write(&path, &output.code).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Wrote {}", path.display());
    }

    info!("Total time: {:?}", start.elapsed());
    Ok(())
}

fn report(errors: &[Error], source: &str, cli: &Cli) -> CliError {
    for error in errors {
        eprintln!("{}", format_error(error, source, &cli.input));
    }
    CliError::Failed(errors.len())
}
