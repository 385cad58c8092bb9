// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::io::{self, Write};

use clap::Parser;
use cli::{ApplyArgs, Cli, Commands, SchemaArgs};
use pgschema_core::{ApplyConfig, SplitMode};

mod cli;
mod logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Apply(apply_args) => apply(apply_args).await?,
        Commands::Split(schema_args) => split(schema_args).await?,
        Commands::Version => {
            println!(
                "pgschema {} (core {})",
                env!("CARGO_PKG_VERSION"),
                pgschema_core::version()
            );
        }
    }

    Ok(())
}

async fn apply(args: &ApplyArgs) -> Result<()> {
    let config = ApplyConfig::new(args.database_url.clone(), args.schema.schema.clone())?
        .with_split_mode(args.schema.splitter.into())
        .with_style(args.style());

    let summary = pgschema_core::apply_schema(&config, io::stdout()).await?;
    if summary.failed > 0 {
        log::warn!(
            "{} of {} statements failed",
            summary.failed,
            summary.attempted
        );
    }
    Ok(())
}

async fn split(args: &SchemaArgs) -> Result<()> {
    let script = pgschema_core::apply::read_schema(&args.schema).await?;
    let statements = SplitMode::from(args.splitter).split(&script);
    log::info!(
        "{} contains {} statements",
        args.schema.display(),
        statements.len()
    );

    let mut out = io::stdout().lock();
    write_statements(&mut out, &statements)?;
    out.flush()?;
    Ok(())
}

/// Write statements in re-splittable form: each terminated by `;` and
/// followed by a blank line.
fn write_statements(out: &mut impl Write, statements: &[&str]) -> io::Result<()> {
    for statement in statements {
        writeln!(out, "{statement};")?;
        writeln!(out)?;
    }
    Ok(())
}
