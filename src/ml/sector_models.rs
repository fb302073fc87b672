use burn::backend::ndarray::NdArrayDevice;
use burn::module::AutodiffModule;
use burn::prelude::*;
use rand::Rng;

use crate::config::NetworkConfig;
use crate::engines::generation::genome::Genome;
use crate::error::{CypherError, Result};
use crate::ml::network::{PolicyScorer, PolicyScorerConfig};
use crate::ml::synthetic::{generate_training_data, TrainingSet};
use crate::ml::training::{
    create_optimizer, default_device, measure_accuracy, to_vec, train_epochs, InferenceBackend,
    SectorOptimizer, TrainBackend,
};
use crate::types::Sector;

/// Scorer, optimizer state and fixed training set for one sector
pub struct SectorModel {
    sector: Sector,
    architecture: Vec<usize>,
    scorer: PolicyScorer<TrainBackend>,
    optimizer: SectorOptimizer,
    training_data: TrainingSet,
    accuracy: f64,
    learning_rate: f64,
    input_size: usize,
    device: NdArrayDevice,
}

impl SectorModel {
    pub fn new(sector: Sector, config: &NetworkConfig, training_data: TrainingSet) -> Self {
        let device = default_device();
        let scorer = scorer_config(config, &config.hidden_sizes).init::<TrainBackend>(&device);

        Self {
            sector,
            architecture: config.hidden_sizes.clone(),
            scorer,
            optimizer: create_optimizer(),
            training_data,
            accuracy: 0.0,
            learning_rate: config.learning_rate,
            input_size: config.input_size,
            device,
        }
    }

    /// Score genomes in inference mode, one value in [0, 1] per genome.
    pub fn score(&self, genomes: &[&Genome]) -> Result<Vec<f32>> {
        if genomes.is_empty() {
            return Ok(Vec::new());
        }

        let mut values = Vec::with_capacity(genomes.len() * self.input_size);
        for genome in genomes {
            if genome.len() != self.input_size {
                return Err(CypherError::Model(format!(
                    "{} scorer expects {} genes, got {}",
                    self.sector,
                    self.input_size,
                    genome.len()
                )));
            }
            values.extend(genome.iter().map(|&gene| gene as f32));
        }

        let input = Tensor::<InferenceBackend, 2>::from_data(
            TensorData::new(values, [genomes.len(), self.input_size]),
            &self.device,
        );
        to_vec(self.scorer.valid().forward(input))
    }

    /// Train on the fixed set and refresh the measured accuracy.
    pub fn train(&mut self, epochs: usize) -> Result<f64> {
        let (scorer, loss) = train_epochs(
            self.scorer.clone(),
            &mut self.optimizer,
            &self.training_data,
            epochs,
            self.learning_rate,
            &self.device,
        )?;
        self.scorer = scorer;
        self.accuracy = self.measure(&self.training_data)?;

        log::debug!(
            "{} trained {} epochs: loss {:.4}, accuracy {:.3}",
            self.sector,
            epochs,
            loss,
            self.accuracy
        );
        Ok(self.accuracy)
    }

    /// Swap in a scorer trained elsewhere; optimizer state starts fresh.
    pub fn install(&mut self, architecture: Vec<usize>, scorer: PolicyScorer<TrainBackend>, accuracy: f64) {
        self.architecture = architecture;
        self.scorer = scorer;
        self.optimizer = create_optimizer();
        self.accuracy = accuracy;
    }

    /// Accuracy of the current scorer on `data`.
    pub fn measure(&self, data: &TrainingSet) -> Result<f64> {
        measure_accuracy(&self.scorer.valid(), data, &self.device)
    }

    pub fn sector(&self) -> Sector {
        self.sector
    }

    pub fn architecture(&self) -> &[usize] {
        &self.architecture
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn training_data(&self) -> &TrainingSet {
        &self.training_data
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn device(&self) -> &NdArrayDevice {
        &self.device
    }
}

pub(crate) fn scorer_config(config: &NetworkConfig, hidden_sizes: &[usize]) -> PolicyScorerConfig {
    PolicyScorerConfig::new(hidden_sizes.to_vec())
        .with_input_size(config.input_size)
        .with_dropout(config.dropout)
}

/// The four sector models, in `Sector::ALL` order
pub struct SectorModels {
    models: Vec<SectorModel>,
    config: NetworkConfig,
}

impl SectorModels {
    pub fn new<R: Rng>(config: &NetworkConfig, rng: &mut R) -> Self {
        let models = Sector::ALL
            .iter()
            .map(|&sector| {
                let data = generate_training_data(
                    sector,
                    config.samples_per_sector,
                    config.input_size,
                    rng,
                );
                log::debug!(
                    "{} training set: {} samples, {:.1}% positive",
                    sector,
                    data.len(),
                    data.positive_rate() * 100.0
                );
                SectorModel::new(sector, config, data)
            })
            .collect();

        log::info!("Neural networks initialized for all sectors");
        Self {
            models,
            config: config.clone(),
        }
    }

    pub fn get(&self, sector: Sector) -> Option<&SectorModel> {
        self.models.iter().find(|m| m.sector == sector)
    }

    pub fn get_mut(&mut self, sector: Sector) -> Option<&mut SectorModel> {
        self.models.iter_mut().find(|m| m.sector == sector)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectorModel> {
        self.models.iter()
    }

    pub fn sectors(&self) -> Vec<Sector> {
        self.models.iter().map(|m| m.sector).collect()
    }

    pub fn network_config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Average each listed sector's scorer with an external peer's.
    ///
    /// Every update is shape-checked before any model changes, so a bad
    /// entry leaves all sectors untouched.
    pub fn federated_average(&mut self, updates: &[(Sector, PolicyScorer<TrainBackend>)]) -> Result<()> {
        let mut averaged = Vec::with_capacity(updates.len());
        for (sector, external) in updates {
            let model = self
                .get(*sector)
                .ok_or_else(|| CypherError::UnknownSector(sector.to_string()))?;
            averaged.push((*sector, model.scorer.clone().average_with(external)?));
        }

        for (sector, scorer) in averaged {
            if let Some(model) = self.get_mut(sector) {
                model.scorer = scorer;
                model.accuracy = model.measure(&model.training_data)?;
            }
        }

        log::info!("Federated averaging applied to {} sector(s)", updates.len());
        Ok(())
    }

    pub fn train_all(&mut self, epochs: usize) -> Result<()> {
        for model in self.models.iter_mut() {
            model.train(epochs)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tiny_config() -> NetworkConfig {
        NetworkConfig {
            hidden_sizes: vec![8],
            samples_per_sector: 64,
            ..Default::default()
        }
    }

    #[test]
    fn test_creates_one_model_per_sector() {
        let mut rng = StdRng::seed_from_u64(8);
        let models = SectorModels::new(&tiny_config(), &mut rng);

        assert_eq!(models.sectors(), Sector::ALL.to_vec());
        for model in models.iter() {
            assert_eq!(model.training_data().len(), 64);
            assert_eq!(model.architecture(), &[8]);
            assert_eq!(model.accuracy(), 0.0);
        }
    }

    #[test]
    fn test_scoring_rejects_wrong_genome_length() {
        let mut rng = StdRng::seed_from_u64(8);
        let models = SectorModels::new(&tiny_config(), &mut rng);
        let short: Genome = vec![1; 10];

        let result = models.get(Sector::Cipa).unwrap().score(&[&short]);
        assert!(matches!(result, Err(CypherError::Model(_))));
    }

    #[test]
    fn test_training_updates_accuracy_and_fixed_set_is_kept() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut models = SectorModels::new(&tiny_config(), &mut rng);
        let labels_before = models.get(Sector::General).unwrap().training_data().labels().to_vec();

        models.train_all(2).unwrap();

        let general = models.get(Sector::General).unwrap();
        assert!(general.accuracy() > 0.0);
        assert_eq!(general.training_data().labels(), labels_before.as_slice());
    }

    fn sample_genomes() -> Vec<Genome> {
        (0..6u8)
            .map(|k| (0..64u8).map(|i| ((i + k) % 3 == 0) as u8).collect())
            .collect()
    }

    fn scores(model: &SectorModel, genomes: &[Genome]) -> Vec<f32> {
        let refs: Vec<&Genome> = genomes.iter().collect();
        model.score(&refs).unwrap()
    }

    #[test]
    fn test_averaging_with_itself_keeps_scores() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut models = SectorModels::new(&tiny_config(), &mut rng);
        let genomes = sample_genomes();
        let before = scores(models.get(Sector::Ferpa).unwrap(), &genomes);

        let own = models.get(Sector::Ferpa).unwrap().scorer.clone();
        models.federated_average(&[(Sector::Ferpa, own)]).unwrap();

        let after = scores(models.get(Sector::Ferpa).unwrap(), &genomes);
        for (b, a) in before.iter().zip(&after) {
            assert!((b - a).abs() < 1e-6, "{} vs {}", b, a);
        }
    }

    #[test]
    fn test_federated_average_moves_toward_peer() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut models = SectorModels::new(&tiny_config(), &mut rng);
        let peer = scorer_config(&tiny_config(), &[8]).init::<TrainBackend>(&default_device());
        let genomes = sample_genomes();
        let before = scores(models.get(Sector::Fisma).unwrap(), &genomes);
        let untouched = scores(models.get(Sector::Cipa).unwrap(), &genomes);

        models.federated_average(&[(Sector::Fisma, peer)]).unwrap();

        assert_ne!(scores(models.get(Sector::Fisma).unwrap(), &genomes), before);
        assert_eq!(scores(models.get(Sector::Cipa).unwrap(), &genomes), untouched);
    }

    #[test]
    fn test_federated_average_rejects_shape_mismatch_atomically() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut models = SectorModels::new(&tiny_config(), &mut rng);
        let device = default_device();
        let good = scorer_config(&tiny_config(), &[8]).init::<TrainBackend>(&device);
        let wrong = scorer_config(&tiny_config(), &[16, 4]).init::<TrainBackend>(&device);
        let genomes = sample_genomes();
        let before = scores(models.get(Sector::Ferpa).unwrap(), &genomes);

        let result = models.federated_average(&[(Sector::Ferpa, good), (Sector::General, wrong)]);

        assert!(matches!(result, Err(CypherError::Model(_))));
        assert_eq!(scores(models.get(Sector::Ferpa).unwrap(), &genomes), before);
    }
}
