use clap::Parser;
use lexgen::gen::generate;
use lexgen::parser::Config;
use log::info;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Compile a lex-style grammar file into a table-driven C scanner.
#[derive(Debug, Parser)]
#[command(name = "lexgen", version, about)]
struct Args {
    /// Grammar file to compile.
    grammar: Option<PathBuf>,

    /// Grammar file to compile (flag form).
    #[arg(short = 'i', long = "input", value_name = "INPUT", conflicts_with = "grammar")]
    input: Option<PathBuf>,

    /// Write the generated scanner here instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("missing input file (pass a path or -i <INPUT>)")]
    MissingInput,
    #[error("cannot open {0}: {1}")]
    Open(String, io::Error),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Generate(#[from] lexgen::Error),
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lexgen: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let path: &Path = args
        .grammar
        .as_deref()
        .or(args.input.as_deref())
        .ok_or(CliError::MissingInput)?;
    let input = BufReader::new(
        File::open(path).map_err(|e| CliError::Open(path.display().to_string(), e))?,
    );
    let config = Config::default();

    match &args.output {
        Some(out_path) => {
            let file = File::create(out_path)
                .map_err(|e| CliError::Open(out_path.display().to_string(), e))?;
            let mut out = BufWriter::new(file);
            generate(input, &mut out, &config)?;
            out.flush()?;
            info!("wrote scanner to {}", out_path.display());
        }
        None => {
            let stdout = io::stdout();
            generate(input, &mut stdout.lock(), &config)?;
        }
    }
    Ok(())
}
