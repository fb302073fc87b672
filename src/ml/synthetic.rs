use crate::types::Sector;
use burn::prelude::*;
use rand::Rng;
use rand_distr::StandardNormal;

/// Labelled samples for one sector, stored row-major
#[derive(Debug, Clone)]
pub struct TrainingSet {
    features: Vec<f32>,
    labels: Vec<f32>,
    num_features: usize,
}

impl TrainingSet {
    pub fn new(features: Vec<f32>, labels: Vec<f32>, num_features: usize) -> Self {
        debug_assert_eq!(features.len(), labels.len() * num_features);
        Self {
            features,
            labels,
            num_features,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn labels(&self) -> &[f32] {
        &self.labels
    }

    pub fn row(&self, index: usize) -> &[f32] {
        &self.features[index * self.num_features..(index + 1) * self.num_features]
    }

    pub fn positive_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|&&l| l > 0.5).count() as f64 / self.labels.len() as f64
    }

    pub fn inputs<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        Tensor::from_data(
            TensorData::new(self.features.clone(), [self.len(), self.num_features]),
            device,
        )
    }

    pub fn targets<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        Tensor::from_data(TensorData::new(self.labels.clone(), [self.len()]), device)
    }
}

/// Synthetic security-event data with a sector-specific labelling rule.
///
/// Features are standard normal; labels are a fixed function of a few of them.
pub fn generate_training_data<R: Rng>(
    sector: Sector,
    num_samples: usize,
    num_features: usize,
    rng: &mut R,
) -> TrainingSet {
    let mut features = Vec::with_capacity(num_samples * num_features);
    let mut labels = Vec::with_capacity(num_samples);

    for _ in 0..num_samples {
        let start = features.len();
        features.extend((0..num_features).map(|_| rng.sample::<f32, _>(StandardNormal)));
        let row = &features[start..];
        labels.push(if label_for(sector, row) { 1.0 } else { 0.0 });
    }

    TrainingSet::new(features, labels, num_features)
}

pub fn label_for(sector: Sector, row: &[f32]) -> bool {
    let at = |i: usize| row.get(i).copied().unwrap_or(0.0);
    match sector {
        // Education data protection
        Sector::Ferpa => at(0) > 0.5 && at(1) > 0.3,
        // Government systems: aggregate risk over the first ten signals
        Sector::Fisma => row.iter().take(10).sum::<f32>() > 2.0,
        // Content filtering
        Sector::Cipa => at(2) > 0.0 && at(3) < -0.5,
        Sector::General => {
            if row.is_empty() {
                false
            } else {
                row.iter().sum::<f32>() / row.len() as f32 > 0.1
            }
        }
    }
}
