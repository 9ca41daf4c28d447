/*!
 * Command-line interface for codecat
 */

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process::ExitCode;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::error;

use codecat::config::{Args, Command, JoinArgs, SplitArgs};
use codecat::report::{ReportFormat, Reporter};
use codecat::{join, logging, JoinConfig, SplitConfig, Splitter};

fn run_join(args: JoinArgs) -> codecat::Result<()> {
    let config = JoinConfig::from_args(args)?;
    config.validate()?;

    let start_time = Instant::now();
    let stdout = io::stdout();
    let summary = join(&config, BufWriter::new(stdout.lock()))?;

    if summary.emitted.is_empty() {
        tracing::warn!("no files matched; nothing written");
    }
    if config.stats {
        Reporter::new(ReportFormat::ConsoleTable).print_join(&summary, start_time.elapsed());
    }
    Ok(())
}

fn run_split(args: SplitArgs) -> codecat::Result<()> {
    let config = SplitConfig::from_args(args)?;
    config.validate()?;

    let start_time = Instant::now();
    let splitter = Splitter::new(&config.output_root);
    let summary = match &config.input {
        Some(path) => splitter.split(BufReader::new(File::open(path)?))?,
        None => splitter.split(io::stdin().lock())?,
    };

    if config.stats {
        Reporter::new(ReportFormat::ConsoleTable).print_split(&summary, start_time.elapsed());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let result = match args.command {
        Some(Command::Join(join_args)) => run_join(join_args),
        Some(Command::Split(split_args)) => run_split(split_args),
        None => {
            if let Err(e) = Args::command().print_help() {
                error!("cannot print help: {}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
