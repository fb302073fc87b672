use crate::error::Result;
use crate::types::Sector;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

/// Snapshot emitted once per generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub sector: Sector,
    pub generation: usize,
    pub best_fitness: f64,
    pub avg_fitness: f64,
    pub diversity: f64,
    pub population_size: usize,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, report: &GenerationReport) -> Result<()>;
    fn on_networks_retrained(&mut self, _generation: usize) {}
}

/// Reports progress through the log only
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::trace!("Generation {} starting", generation);
    }

    fn on_generation_complete(&mut self, report: &GenerationReport) -> Result<()> {
        log::debug!(
            "[{}] generation {} best {:.4} avg {:.4} diversity {:.4}",
            report.sector,
            report.generation,
            report.best_fitness,
            report.avg_fitness,
            report.diversity
        );
        Ok(())
    }

    fn on_networks_retrained(&mut self, generation: usize) {
        log::info!("Neural network training completed at generation {}", generation);
    }
}

/// Forwards reports to another component, e.g. a monitor thread
pub struct ChannelProgressCallback {
    sender: Sender<GenerationReport>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<GenerationReport>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_complete(&mut self, report: &GenerationReport) -> Result<()> {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.sender.send(report.clone());
        Ok(())
    }
}
