pub mod dummies;
pub mod stubs;

pub use stubs::{
    OracleClassifier, ParityClassifier, RandomClassifier, TrainSpyClassifier, TrainSpyHandle,
    VecStream,
};
