pub mod estimator;
pub mod model;
pub mod smoothing;
pub mod viterbi;

pub use estimator::{Estimator, EstimatorConfig};
pub use model::HmmModel;
pub use viterbi::ViterbiDecoder;
