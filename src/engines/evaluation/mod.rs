pub mod fitness;

pub use fitness::{
    average_false_positive_rate, false_positive_rate, FitnessEvaluator, PolicyFitnessEvaluator,
};
