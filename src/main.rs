use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, ExitCode},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{builder::FalseyValueParser, Parser};
use gpj::{
    compiler::compiler::generate, errors::errors::Error, lexer::lexer::tokenize,
    parser::parser::parse, render_error, type_checker::type_checker::check, CompileOptions,
};
use tracing::{debug, Level};

/// Compiles a GPJ source file to JavaScript and runs it with Node.
#[derive(Parser, Debug)]
#[command(name = "gpj", version, about, long_about = None)]
struct Cli {
    /// The .gpj file to compile
    file: PathBuf,

    /// Print the generated JavaScript instead of running it
    #[arg(long)]
    emit: bool,

    /// Write the generated JavaScript to PATH instead of running it
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Directory containing `stdlib/`, used for bare import names
    #[arg(long, value_name = "DIR", env = "GPJ_STDLIB_ROOT")]
    stdlib_root: Option<PathBuf>,

    /// JavaScript runtime used to execute the output
    #[arg(long, value_name = "BIN", env = "GPJ_RUNTIME", default_value = "node")]
    runtime: String,

    /// Keep the temporary output directory and print its path
    #[arg(long, env = "GPJ_PRESERVE_OUT", value_parser = FalseyValueParser::new())]
    preserve_out: bool,

    /// Log phase timings and runtime details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("gpj: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let mut options = CompileOptions::default();
    if let Some(stdlib_root) = &cli.stdlib_root {
        options.stdlib_root = stdlib_root.clone();
    }

    let js = match compile_timed(&source, &options) {
        Ok(js) => js,
        Err(error) => {
            eprintln!("gpj: {}", error);
            eprint!("{}", render_error(&error, &source, &cli.file.to_string_lossy()));
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.emit || cli.out.is_some() {
        if let Some(out) = &cli.out {
            write_output(out, &js)?;
        }
        if cli.emit {
            print!("{}", js);
        }
        return Ok(ExitCode::SUCCESS);
    }

    execute(&js, &cli.runtime, cli.preserve_out)
}

/// Runs each phase in turn, logging how long it took.
fn compile_timed(source: &str, options: &CompileOptions) -> Result<String, Error> {
    let start = Instant::now();

    let tokens = tokenize(source)?;
    debug!("tokenized {} tokens in {:?}", tokens.len(), start.elapsed());

    let parse_start = Instant::now();
    let program = parse(tokens)?;
    debug!("parsed in {:?}", parse_start.elapsed());

    let check_start = Instant::now();
    check(&program)?;
    debug!("type checked in {:?}", check_start.elapsed());

    let generate_start = Instant::now();
    let js = generate(&program, options)?;
    debug!("generated in {:?}", generate_start.elapsed());
    debug!("total compile time: {:?}", start.elapsed());

    Ok(js)
}

fn write_output(path: &Path, js: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    fs::write(path, js).with_context(|| format!("failed to write {}", path.display()))
}

/// Writes the module to `out.mjs` in a fresh temp directory and runs it,
/// forwarding the runtime's exit code.
fn execute(js: &str, runtime: &str, preserve_out: bool) -> Result<ExitCode> {
    let dir = tempfile::Builder::new()
        .prefix("gpj-")
        .tempdir()
        .context("failed to create a temporary directory")?;
    let out_file = dir.path().join("out.mjs");
    fs::write(&out_file, js)
        .with_context(|| format!("failed to write {}", out_file.display()))?;
    debug!("wrote {}", out_file.display());

    let status = Command::new(runtime)
        .arg(&out_file)
        .status()
        .with_context(|| format!("failed to run {}", runtime));

    if preserve_out {
        let kept = dir.keep().join("out.mjs");
        eprintln!("gpj: compiled output preserved at: {}", kept.display());
    }

    let status = status?;
    debug!("{} exited with {}", runtime, status);

    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
