//! Feed-forward policy scorer.
//!
//! Linear → ReLU → Dropout per hidden layer, then a single sigmoid output.
//! Dropout is only active on autodiff backends, so the inner (validation)
//! module scores deterministically.

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation::{relu, sigmoid};

use crate::error::{self, CypherError};

/// Policy scorer configuration.
#[derive(Config, Debug)]
pub struct PolicyScorerConfig {
    /// Hidden layer widths, input side first.
    pub hidden_sizes: Vec<usize>,
    /// Genome length.
    #[config(default = 64)]
    pub input_size: usize,
    /// Dropout rate between hidden layers.
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl PolicyScorerConfig {
    /// Initialize a scorer with random weights.
    pub fn init<B: Backend>(&self, device: &B::Device) -> PolicyScorer<B> {
        let mut hidden = Vec::with_capacity(self.hidden_sizes.len());
        let mut prev_size = self.input_size;
        for &width in &self.hidden_sizes {
            hidden.push(LinearConfig::new(prev_size, width).init(device));
            prev_size = width;
        }

        PolicyScorer {
            hidden,
            dropout: DropoutConfig::new(self.dropout).init(),
            output: LinearConfig::new(prev_size, 1).init(device),
        }
    }
}

/// Maps `[batch, input_size]` genomes to `[batch, 1]` scores in [0, 1].
#[derive(Module, Debug)]
pub struct PolicyScorer<B: Backend> {
    hidden: Vec<Linear<B>>,
    dropout: Dropout,
    output: Linear<B>,
}

impl<B: Backend> PolicyScorer<B> {
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = input;
        for layer in &self.hidden {
            x = self.dropout.forward(relu(layer.forward(x)));
        }
        sigmoid(self.output.forward(x))
    }

    /// Element-wise mean of this scorer's parameters and `other`'s.
    ///
    /// Both scorers must have the same layer shapes. The averaged tensors
    /// are fresh leaves, so later training still updates them.
    pub fn average_with(self, other: &PolicyScorer<B>) -> error::Result<Self> {
        if self.hidden.len() != other.hidden.len() {
            return Err(CypherError::Model(format!(
                "Cannot average scorers with {} and {} hidden layers",
                self.hidden.len(),
                other.hidden.len()
            )));
        }

        let hidden = self
            .hidden
            .into_iter()
            .zip(&other.hidden)
            .map(|(local, external)| average_linear(local, external))
            .collect::<error::Result<Vec<_>>>()?;
        let output = average_linear(self.output, &other.output)?;

        Ok(Self {
            hidden,
            dropout: self.dropout,
            output,
        })
    }
}

fn average_linear<B: Backend>(local: Linear<B>, external: &Linear<B>) -> error::Result<Linear<B>> {
    let external_weight = external.weight.val();
    let (local_dims, external_dims) = (local.weight.val().dims(), external_weight.dims());
    if local_dims != external_dims {
        return Err(CypherError::Model(format!(
            "Layer shape mismatch: {:?} vs {:?}",
            local_dims, external_dims
        )));
    }

    let weight = local.weight.map(|w| mean_of(w, external_weight));
    let bias = match (local.bias, &external.bias) {
        (Some(bias), Some(external_bias)) => {
            let external_bias = external_bias.val();
            Some(bias.map(|b| mean_of(b, external_bias)))
        }
        (None, None) => None,
        _ => return Err(CypherError::Model("Layer bias mismatch".to_string())),
    };

    Ok(Linear { weight, bias })
}

fn mean_of<B: Backend, const D: usize>(a: Tensor<B, D>, b: Tensor<B, D>) -> Tensor<B, D> {
    (a + b).div_scalar(2.0).detach().require_grad()
}
