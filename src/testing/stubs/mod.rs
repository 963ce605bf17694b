mod classifiers;
mod vec_stream;

pub use classifiers::{
    OracleClassifier, ParityClassifier, RandomClassifier, TrainSpyClassifier, TrainSpyHandle,
};
pub use vec_stream::VecStream;
