mod delayed_prequential;

pub use delayed_prequential::{
    DEFAULT_DECAY_LAMBDAS, DelayedPrequentialConfig, DelayedPrequentialEvaluator,
};
