//! The `latticec` command: compiles a lattice file to C.

mod diagnostic;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use clap::{ArgAction, Parser, ValueEnum};
use lattice::{builtins::Builtins, driver, source::SourceFile};
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::diagnostic::CompileDiagnostic;

/// Compiles an accelerator lattice description into a C program.
#[derive(Debug, Parser)]
#[command(name = "latticec", version, about)]
struct Cli {
    /// The lattice source file.
    input: PathBuf,

    /// Directory the generated C file is written to.
    #[arg(short, long, default_value = "transpiler_out")]
    out_dir: PathBuf,

    /// Name of the generated C file.
    #[arg(long, default_value = "transpiled_file.c")]
    file_name: String,

    /// What to produce.
    #[arg(long, value_enum, default_value_t = Emit::C)]
    emit: Emit,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The C translation unit.
    C,
    /// The typed tree, on stdout.
    Ast,
    /// The token stream, on stdout.
    Tokens,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(io::stderr)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let text = fs::read_to_string(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", cli.input.display()))?;
    let source = SourceFile::new(cli.input.display().to_string(), text);
    let builtins = Builtins::standard();

    let output = match cli.emit {
        Emit::C => driver::compile(&source, &builtins),
        Emit::Ast => driver::dump_ast(&source, &builtins),
        Emit::Tokens => driver::dump_tokens(&source),
    }
    .map_err(|error| CompileDiagnostic::new(&error, &source))?;

    if cli.emit != Emit::C {
        return io::stdout().write_all(output.as_bytes()).into_diagnostic();
    }

    fs::create_dir_all(&cli.out_dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create {}", cli.out_dir.display()))?;
    let path = cli.out_dir.join(&cli.file_name);
    fs::write(&path, output)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote C output");
    Ok(())
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "latticec=warn,lattice=warn",
        1 => "latticec=info,lattice=info",
        2 => "latticec=debug,lattice=debug",
        _ => "latticec=trace,lattice=trace",
    }
}
