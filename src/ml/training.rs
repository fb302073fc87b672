//! Full-batch training and evaluation of policy scorers.

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;

use crate::error::{CypherError, Result};
use crate::ml::network::PolicyScorer;
use crate::ml::synthetic::TrainingSet;

/// Backend used while training (gradients tracked, dropout active).
pub type TrainBackend = Autodiff<NdArray>;
/// Backend used for scoring (no gradients, dropout disabled).
pub type InferenceBackend = NdArray;

/// Adam state kept per sector between training rounds.
pub type SectorOptimizer = OptimizerAdaptor<Adam, PolicyScorer<TrainBackend>, TrainBackend>;

/// Probability clamp keeping `ln` finite.
const EPSILON: f32 = 1e-7;
const DECISION_THRESHOLD: f32 = 0.5;

pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::Cpu
}

pub fn create_optimizer() -> SectorOptimizer {
    AdamConfig::new().init()
}

/// Train for `epochs` full-batch steps. Returns the updated model and the
/// loss of the final step.
pub fn train_epochs<B: AutodiffBackend>(
    model: PolicyScorer<B>,
    optimizer: &mut impl Optimizer<PolicyScorer<B>, B>,
    data: &TrainingSet,
    epochs: usize,
    lr: f64,
    device: &B::Device,
) -> Result<(PolicyScorer<B>, f32)> {
    let mut model = model;
    let mut last_loss = 0.0f32;
    if data.is_empty() {
        return Ok((model, last_loss));
    }

    let inputs = data.inputs::<B>(device);
    let targets = data.targets::<B>(device);

    for _ in 0..epochs {
        let predictions = model.forward(inputs.clone()).reshape([data.len()]);
        let loss = binary_cross_entropy(predictions, targets.clone());
        last_loss = scalar(loss.clone())?;

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optimizer.step(lr, model, grads);
    }

    Ok((model, last_loss))
}

/// Mean binary cross-entropy between probabilities and 0/1 targets.
pub fn binary_cross_entropy<B: Backend>(
    predictions: Tensor<B, 1>,
    targets: Tensor<B, 1>,
) -> Tensor<B, 1> {
    let p = predictions.clamp(EPSILON, 1.0 - EPSILON);
    let positive = targets.clone() * p.clone().log();
    let negative = targets.neg().add_scalar(1.0) * p.neg().add_scalar(1.0).log();
    (positive + negative).mean().neg()
}

/// Fraction of samples whose thresholded prediction matches the label.
pub fn measure_accuracy<B: Backend>(
    model: &PolicyScorer<B>,
    data: &TrainingSet,
    device: &B::Device,
) -> Result<f64> {
    if data.is_empty() {
        return Ok(0.0);
    }

    let predictions = to_vec(model.forward(data.inputs::<B>(device)))?;
    let correct = predictions
        .iter()
        .zip(data.labels())
        .filter(|(&p, &label)| (p > DECISION_THRESHOLD) == (label > DECISION_THRESHOLD))
        .count();

    Ok(correct as f64 / data.len() as f64)
}

pub(crate) fn to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| CypherError::Model(format!("Failed to read tensor data: {:?}", e)))
}

fn scalar<B: Backend>(tensor: Tensor<B, 1>) -> Result<f32> {
    to_vec(tensor)?
        .first()
        .copied()
        .ok_or_else(|| CypherError::Model("Empty loss tensor".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::network::PolicyScorerConfig;
    use crate::ml::synthetic::generate_training_data;
    use crate::types::Sector;
    use burn::module::AutodiffModule;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bce_matches_closed_form() {
        let device = default_device();
        let p = Tensor::<InferenceBackend, 1>::from_data(TensorData::new(vec![0.8f32, 0.3], [2]), &device);
        let y = Tensor::<InferenceBackend, 1>::from_data(TensorData::new(vec![1.0f32, 0.0], [2]), &device);

        let loss = scalar(binary_cross_entropy(p, y)).unwrap();
        let expected = -((0.8f32).ln() + (0.7f32).ln()) / 2.0;
        assert!((loss - expected).abs() < 1e-5, "loss {} expected {}", loss, expected);
    }

    #[test]
    fn test_training_reduces_loss() {
        let device = default_device();
        let mut rng = StdRng::seed_from_u64(4);
        let data = generate_training_data(Sector::Ferpa, 256, 64, &mut rng);

        let model = PolicyScorerConfig::new(vec![32, 16])
            .with_dropout(0.0)
            .init::<TrainBackend>(&device);
        let mut optimizer = create_optimizer();

        let (model, first_loss) = train_epochs(model, &mut optimizer, &data, 1, 0.01, &device).unwrap();
        let (model, later_loss) = train_epochs(model, &mut optimizer, &data, 30, 0.01, &device).unwrap();

        assert!(first_loss.is_finite());
        assert!(later_loss < first_loss, "{} !< {}", later_loss, first_loss);

        let accuracy = measure_accuracy(&model.valid(), &data, &device).unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
    }
}
