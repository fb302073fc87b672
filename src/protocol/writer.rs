use crate::engines::generation::progress::{GenerationReport, ProgressCallback};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

pub const READY_PREFIX: &str = "READY:";
pub const EVOLUTION_PREFIX: &str = "EVOLUTION:";
pub const FITNESS_PREFIX: &str = "FITNESS:";
pub const NAS_PREFIX: &str = "NAS:";
pub const ERROR_PREFIX: &str = "ERROR:";

/// Write one `PREFIX:{json}` line and flush so the orchestrator sees it now
pub fn emit<W: Write + ?Sized, T: Serialize>(writer: &mut W, prefix: &str, payload: &T) -> Result<()> {
    let json = serde_json::to_string(payload)?;
    writeln!(writer, "{}{}", prefix, json)?;
    writer.flush()?;
    Ok(())
}

pub fn emit_ready<W: Write + ?Sized>(writer: &mut W) -> Result<()> {
    writeln!(writer, "{} Cypher AI Genetic Engine initialized", READY_PREFIX)?;
    writer.flush()?;
    Ok(())
}

pub fn emit_error<W: Write + ?Sized>(writer: &mut W, message: &str) -> Result<()> {
    writeln!(writer, "{} {}", ERROR_PREFIX, message)?;
    writer.flush()?;
    Ok(())
}

/// Streams `EVOLUTION:` lines, one per generation
pub struct ProtocolProgressCallback<'a, W: Write + ?Sized> {
    writer: &'a mut W,
}

impl<'a, W: Write + ?Sized> ProtocolProgressCallback<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<W: Write + ?Sized> ProgressCallback for ProtocolProgressCallback<'_, W> {
    fn on_generation_complete(&mut self, report: &GenerationReport) -> Result<()> {
        log::debug!(
            "[{}] generation {} best {:.4}",
            report.sector,
            report.generation,
            report.best_fitness
        );
        emit(&mut *self.writer, EVOLUTION_PREFIX, report)
    }

    fn on_networks_retrained(&mut self, generation: usize) {
        log::info!("Neural network training completed at generation {}", generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sector;

    #[test]
    fn test_progress_lines_are_prefixed_json() {
        let mut buffer = Vec::new();
        {
            let mut callback = ProtocolProgressCallback::new(&mut buffer);
            callback
                .on_generation_complete(&GenerationReport {
                    sector: Sector::Ferpa,
                    generation: 3,
                    best_fitness: 71.5,
                    avg_fitness: 50.25,
                    diversity: 0.5,
                    population_size: 100,
                })
                .unwrap();
        }

        let text = String::from_utf8(buffer).unwrap();
        let payload = text.trim_end().strip_prefix(EVOLUTION_PREFIX).unwrap();
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["sector"], "FERPA");
        assert_eq!(value["generation"], 3);
        assert_eq!(value["population_size"], 100);
    }

    #[test]
    fn test_ready_and_error_lines() {
        let mut buffer = Vec::new();
        emit_ready(&mut buffer).unwrap();
        emit_error(&mut buffer, "Unknown sector: HIPAA").unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "READY: Cypher AI Genetic Engine initialized");
        assert_eq!(lines[1], "ERROR: Unknown sector: HIPAA");
    }
}
