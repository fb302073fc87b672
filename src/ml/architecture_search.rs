use burn::module::AutodiffModule;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ArchitectureSearchConfig;
use crate::error::{CypherError, Result};
use crate::ml::sector_models::{scorer_config, SectorModels};
use crate::ml::synthetic::generate_training_data;
use crate::ml::training::{create_optimizer, measure_accuracy, train_epochs, TrainBackend};
use crate::types::Sector;

/// Reply payload of a `nas` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureSearchOutcome {
    pub sector: Sector,
    pub best_architecture: Vec<usize>,
    pub accuracy: f64,
}

/// Measured accuracy of one candidate shape
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    pub architecture: Vec<usize>,
    pub accuracy: f64,
}

/// Train every candidate from scratch on fresh data and install the winner.
///
/// The winning scorer keeps the weights it was measured with; the sector's
/// fixed training set is left untouched.
pub fn neural_architecture_search<R: Rng>(
    models: &mut SectorModels,
    sector: Sector,
    search: &ArchitectureSearchConfig,
    rng: &mut R,
) -> Result<(ArchitectureSearchOutcome, Vec<CandidateResult>)> {
    log::info!("Starting Neural Architecture Search for {}", sector);

    let network = models.network_config().clone();
    let (device, learning_rate) = {
        let model = models
            .get(sector)
            .ok_or_else(|| CypherError::UnknownSector(sector.to_string()))?;
        (model.device().clone(), model.learning_rate())
    };

    let mut results = Vec::with_capacity(search.candidates.len());
    let mut best = None;

    for architecture in &search.candidates {
        let scorer = scorer_config(&network, architecture).init::<TrainBackend>(&device);
        let mut optimizer = create_optimizer();
        let data = generate_training_data(sector, network.samples_per_sector, network.input_size, rng);

        let (scorer, _) = train_epochs(scorer, &mut optimizer, &data, search.epochs, learning_rate, &device)?;
        let accuracy = measure_accuracy(&scorer.valid(), &data, &device)?;

        log::debug!("   Architecture {:?}: {:.3} accuracy", architecture, accuracy);
        results.push(CandidateResult {
            architecture: architecture.clone(),
            accuracy,
        });

        let improves = match &best {
            Some((_, _, best_accuracy)) => accuracy > *best_accuracy,
            None => true,
        };
        if improves {
            best = Some((architecture.clone(), scorer, accuracy));
        }
    }

    let (architecture, scorer, accuracy) = best.ok_or_else(|| {
        CypherError::Configuration("Architecture search has no candidates".to_string())
    })?;

    log::info!(
        "Best architecture for {}: {:?} (Accuracy: {:.3})",
        sector,
        architecture,
        accuracy
    );

    let model = models
        .get_mut(sector)
        .ok_or_else(|| CypherError::UnknownSector(sector.to_string()))?;
    model.install(architecture.clone(), scorer, accuracy);

    Ok((
        ArchitectureSearchOutcome {
            sector,
            best_architecture: architecture,
            accuracy,
        },
        results,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tiny_network() -> NetworkConfig {
        NetworkConfig {
            hidden_sizes: vec![8],
            samples_per_sector: 128,
            ..Default::default()
        }
    }

    #[test]
    fn test_installs_best_candidate() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut models = SectorModels::new(&tiny_network(), &mut rng);
        let search = ArchitectureSearchConfig {
            candidates: vec![vec![4], vec![16, 8]],
            epochs: 3,
        };

        let (outcome, results) =
            neural_architecture_search(&mut models, Sector::Fisma, &search, &mut rng).unwrap();

        assert_eq!(results.len(), 2);
        let top = results
            .iter()
            .fold(f64::NEG_INFINITY, |acc, r| acc.max(r.accuracy));
        assert_eq!(outcome.accuracy, top);
        assert!(search.candidates.contains(&outcome.best_architecture));

        let fisma = models.get(Sector::Fisma).unwrap();
        assert_eq!(fisma.architecture(), outcome.best_architecture.as_slice());
        assert_eq!(fisma.accuracy(), outcome.accuracy);

        // Other sectors keep their original shape
        assert_eq!(models.get(Sector::Ferpa).unwrap().architecture(), &[8]);
    }

    #[test]
    fn test_installed_scorer_keeps_trained_weights() {
        let network = NetworkConfig {
            learning_rate: 0.05,
            ..tiny_network()
        };
        let mut rng = StdRng::seed_from_u64(34);
        let mut models = SectorModels::new(&network, &mut rng);
        let search = ArchitectureSearchConfig {
            candidates: vec![vec![4], vec![16, 8], vec![12]],
            epochs: 15,
        };

        // Candidate data is the only draw from `rng` during the search
        let mut replay = rng.clone();
        let candidate_data: Vec<_> = search
            .candidates
            .iter()
            .map(|_| {
                generate_training_data(Sector::Cipa, network.samples_per_sector, network.input_size, &mut replay)
            })
            .collect();

        let (outcome, _) =
            neural_architecture_search(&mut models, Sector::Cipa, &search, &mut rng).unwrap();

        let winner = search
            .candidates
            .iter()
            .position(|c| *c == outcome.best_architecture)
            .unwrap();
        let cipa = models.get(Sector::Cipa).unwrap();
        assert_eq!(cipa.measure(&candidate_data[winner]).unwrap(), outcome.accuracy);
    }
}
