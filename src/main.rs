//! dbpulse CLI entry point

use clap::error::ErrorKind;
use clap::Parser;

use dbpulse::bench::Benchmark;
use dbpulse::config::cli::Cli;
use dbpulse::store::SqliteOpener;
use dbpulse::Result;

fn main() -> Result<()> {
    // Usage errors exit with status 1; help and version are not errors
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            std::process::exit(0);
        }
        Err(err) => {
            eprint!("{err}");
            std::process::exit(1);
        }
    };

    let config = cli.into_config();
    let mut bench = Benchmark::new(config, SqliteOpener)?;
    bench.run()?;
    Ok(())
}
