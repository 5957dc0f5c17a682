use clap::{Parser, Subcommand};

mod commands;
mod logging;

use commands::{CompileArgs, ReorderArgs, SampleArgs};

#[derive(Parser)]
#[command(author, version, about = "Reorders dependency-parsed sentences under counterfactual word-order grammars")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Linearize every sentence of a CoNLL-U file under a grammar
    Reorder(ReorderArgs),
    /// Draw a random grammar over the known relations
    Sample(SampleArgs),
    /// Compile a JSON grammar into the binary archive format
    Compile(CompileArgs),
}

fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Reorder(args) => commands::reorder(&args).map(drop)?,
        Command::Sample(args) => commands::sample(&args)?,
        Command::Compile(args) => commands::compile(&args)?,
    }
    Ok(())
}
