use crate::engine::CypherEngine;
use crate::engines::generation::{EvolutionOutcome, ProgressCallback};
use crate::error::{CypherError, Result};
use crate::ml::ArchitectureSearchOutcome;
use crate::protocol::command::{parse_bytes, Command, ParsedLine};
use crate::protocol::writer::{emit, emit_error, ProtocolProgressCallback, FITNESS_PREFIX, NAS_PREFIX};
use crate::types::Sector;
use std::io::{BufRead, Write};

/// What the dispatcher drives. Implemented by the engine; tests substitute fakes.
pub trait CommandHandler {
    fn evolve(&mut self, sector: Sector, progress: &mut dyn ProgressCallback) -> Result<EvolutionOutcome>;
    fn architecture_search(&mut self, sector: Sector) -> Result<ArchitectureSearchOutcome>;
}

impl CommandHandler for CypherEngine {
    fn evolve(&mut self, sector: Sector, progress: &mut dyn ProgressCallback) -> Result<EvolutionOutcome> {
        self.run_evolution(sector, progress)
    }

    fn architecture_search(&mut self, sector: Sector) -> Result<ArchitectureSearchOutcome> {
        self.neural_architecture_search(sector)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchExit {
    Shutdown,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    pub executed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub exit: DispatchExit,
}

pub struct Dispatcher<H> {
    handler: H,
}

impl<H: CommandHandler> Dispatcher<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Read commands until `shutdown` or end of input.
    ///
    /// Command failures are reported on `errors` and the loop keeps going;
    /// only I/O failures on the protocol streams end it early. Lines that
    /// are not valid UTF-8 are skipped like any other malformed line.
    pub fn run<R, W, E>(&mut self, mut input: R, output: &mut W, errors: &mut E) -> Result<DispatchSummary>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut summary = DispatchSummary {
            executed: 0,
            skipped: 0,
            failed: 0,
            exit: DispatchExit::EndOfInput,
        };

        let mut line = Vec::new();
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }

            match parse_bytes(&line) {
                ParsedLine::Command(Command::Shutdown) => {
                    log::info!("Shutting down genetic engine");
                    summary.exit = DispatchExit::Shutdown;
                    return Ok(summary);
                }
                ParsedLine::Command(command) => match self.execute(command, output) {
                    Ok(()) => summary.executed += 1,
                    Err(CypherError::Io(e)) => return Err(CypherError::Io(e)),
                    Err(e) => {
                        log::error!("Command {:?} failed: {}", command, e);
                        emit_error(errors, &e.to_string())?;
                        summary.failed += 1;
                    }
                },
                ParsedLine::Invalid(e) => {
                    emit_error(errors, &e.to_string())?;
                    summary.failed += 1;
                }
                ParsedLine::Unrecognized(name) => {
                    log::warn!("Ignoring unrecognized command: {:?}", name);
                    summary.skipped += 1;
                }
                ParsedLine::Malformed => {
                    log::debug!("Skipping malformed line: {}", String::from_utf8_lossy(&line).trim_end());
                    summary.skipped += 1;
                }
                ParsedLine::Empty => {}
            }
        }

        log::info!("Input closed, stopping dispatcher");
        Ok(summary)
    }

    fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> Result<()> {
        match command {
            Command::Evolve { sector } => {
                let outcome = {
                    let mut progress = ProtocolProgressCallback::new(&mut *output);
                    self.handler.evolve(sector, &mut progress)?
                };
                emit(output, FITNESS_PREFIX, &outcome)
            }
            Command::Nas { sector } => {
                let outcome = self.handler.architecture_search(sector)?;
                emit(output, NAS_PREFIX, &outcome)
            }
            Command::Shutdown => Err(CypherError::Protocol(
                "Shutdown is handled by the dispatch loop".to_string(),
            )),
        }
    }
}
