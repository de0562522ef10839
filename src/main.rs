use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget};
use log::{error, info, warn};

use areashell::cli::Cli;
use areashell::io::reader;
use areashell::{AreaError, ProofReport, Prover, Theorem, Verdict};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AreaError> {
    let theorems = reader::read_theorems(cli.file())?;
    let prover = Prover::new(cli.prover_conf());

    let bar = ProgressBar::with_draw_target(
        Some(theorems.len() as u64),
        ProgressDrawTarget::stderr(),
    );
    let mut reports = Vec::with_capacity(theorems.len());
    for theorem in &theorems {
        bar.set_message(theorem.name().to_owned());
        reports.push(prove(&prover, theorem)?);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let proved = reports
        .iter()
        .filter(|r| r.verdict == Verdict::Proved)
        .count();
    info!("Proved {proved} of {} theorems", reports.len());

    match cli.output() {
        Some(path) => {
            let mut f = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut f, &reports)?;
            f.flush()?;
            info!("Reports written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &reports)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn prove(prover: &Prover, theorem: &Theorem) -> Result<ProofReport, AreaError> {
    match prover.prove(theorem) {
        Err(AreaError::UnknownStatement(reason)) => {
            warn!("{} is inconclusive: {reason}", theorem.name());
            Ok(ProofReport::inconclusive(
                theorem.name().to_owned(),
                theorem.statement().to_string(),
                reason,
            ))
        }
        Err(e) if e.is_resource_limit() => {
            warn!("{} hit a limit: {e}", theorem.name());
            Ok(ProofReport::inconclusive(
                theorem.name().to_owned(),
                theorem.statement().to_string(),
                e.to_string(),
            ))
        }
        result => result,
    }
}
