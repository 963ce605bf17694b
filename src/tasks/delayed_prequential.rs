use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::evaluation::pending::{PendingBuffer, PendingInstance, PredictionItem, PredictionKind};
use crate::evaluation::{
    BinSet, ClassificationEvaluator, EvaluationError, EvaluatorConfig, ExponentialDecaySummary,
    LearningCurve, MaximumSummary, Measurement, PerformanceEvaluator, Snapshot, SummaryEvaluator,
};
use crate::streams::Stream;
use crate::utils::system::current_rss_gb;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Instant;

/// Decay factors reported by default, from aggressive forgetting of late
/// bins (1e-5) up to a plain average (1).
pub const DEFAULT_DECAY_LAMBDAS: [f64; 10] = [
    1.0, 0.5, 0.3, 0.25, 0.125, 0.1, 0.01, 0.001, 0.0001, 0.00001,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayedPrequentialConfig {
    /// Metric flags and estimator kind shared by the top-level evaluator
    /// and the bins.
    pub evaluator: EvaluatorConfig,
    /// Interior time-slice bins per waiting period.
    pub bin_count: usize,
    /// Re-predict each buffered instance every this many labeled arrivals.
    pub prediction_frequency: u64,
    /// One exponential-decay summary per factor; must be positive, at most
    /// 1, and strictly descending.
    pub decay_lambdas: Vec<f64>,
    pub max_instances: Option<u64>,
    pub max_seconds: Option<u64>,
    /// Snapshot every this many arrivals.
    pub sample_frequency: u64,
    /// RAM-hours sample every this many arrivals.
    pub mem_check_frequency: u64,
}

impl Default for DelayedPrequentialConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorConfig::default(),
            bin_count: 50,
            prediction_frequency: 10,
            decay_lambdas: DEFAULT_DECAY_LAMBDAS.to_vec(),
            max_instances: None,
            max_seconds: None,
            sample_frequency: 100_000,
            mem_check_frequency: 100_000,
        }
    }
}

impl DelayedPrequentialConfig {
    pub fn validate(&self) -> Result<(), EvaluationError> {
        self.evaluator.validate()?;
        if self.sample_frequency == 0 {
            return Err(EvaluationError::InvalidConfig(
                "sample_frequency must be > 0".into(),
            ));
        }
        if self.mem_check_frequency == 0 {
            return Err(EvaluationError::InvalidConfig(
                "mem_check_frequency must be > 0".into(),
            ));
        }
        if self.prediction_frequency == 0 {
            return Err(EvaluationError::InvalidConfig(
                "prediction_frequency must be > 0".into(),
            ));
        }
        if self.bin_count == 0 {
            return Err(EvaluationError::InvalidConfig("bin_count must be > 0".into()));
        }
        for pair in self.decay_lambdas.windows(2) {
            if pair[1] >= pair[0] {
                return Err(EvaluationError::InvalidConfig(
                    "decay_lambdas must be strictly descending".into(),
                ));
            }
        }
        if self.decay_lambdas.iter().any(|&l| l <= 0.0 || l > 1.0) {
            return Err(EvaluationError::InvalidConfig(
                "decay_lambdas must lie in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Prequential evaluation under delayed labels.
///
/// Instances arrive twice: unlabeled first, labeled once the delay elapses.
/// An unlabeled arrival is predicted immediately and parked in the pending
/// buffer; while it waits, the model re-predicts it on a fixed cadence of
/// labeled arrivals. When the label shows up, a final prediction is made,
/// the whole prediction timeline is scored into the bins, the summaries are
/// refreshed lazily at sampling time, and only then is the model trained on
/// the labeled instance (test-then-train).
pub struct DelayedPrequentialEvaluator {
    learner: Box<dyn Classifier>,
    stream: Box<dyn Stream>,
    evaluator: ClassificationEvaluator,
    bins: BinSet,
    summaries: Vec<Box<dyn SummaryEvaluator>>,
    pending: PendingBuffer,
    config: DelayedPrequentialConfig,

    curve: LearningCurve,
    bin_curve: LearningCurve,
    summary_curve: LearningCurve,

    processed: u64,
    start_time: Instant,
    last_mem_sample: Instant,
    ram_hours: f64,

    progress_tx: Option<Sender<Snapshot>>,
}

impl DelayedPrequentialEvaluator {
    pub fn new(
        mut learner: Box<dyn Classifier>,
        stream: Box<dyn Stream>,
        config: DelayedPrequentialConfig,
    ) -> Result<Self, EvaluationError> {
        config.validate()?;

        let header = stream.header();
        let header_arc = Arc::new(InstanceHeader::new(
            header.relation_name().to_string(),
            header.attributes.clone(),
            header.class_index(),
        ));
        learner.set_model_context(Arc::clone(&header_arc));

        // The top-level evaluator never sees (earlier, final) pairs, so its
        // ledger would stay empty; keep the differential flag on the bins.
        let mut top_config = config.evaluator;
        top_config.calculate_differential_matrices = false;
        let mut evaluator = ClassificationEvaluator::new(top_config);

        let mut bins = BinSet::new(config.evaluator, config.bin_count);
        let num_classes = header_arc.number_of_classes();
        if num_classes > 0 {
            evaluator.reset_with(num_classes)?;
            bins.reset_with(num_classes)?;
        }

        let mut summaries: Vec<Box<dyn SummaryEvaluator>> = vec![Box::new(MaximumSummary)];
        for &lambda in &config.decay_lambdas {
            summaries.push(Box::new(ExponentialDecaySummary::new(
                config.bin_count,
                lambda,
            )));
        }

        Ok(Self {
            learner,
            stream,
            evaluator,
            bins,
            summaries,
            pending: PendingBuffer::default(),
            config,
            curve: LearningCurve::default(),
            bin_curve: LearningCurve::default(),
            summary_curve: LearningCurve::default(),
            processed: 0,
            start_time: Instant::now(),
            last_mem_sample: Instant::now(),
            ram_hours: 0.0,
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&mut self) -> Result<(), EvaluationError> {
        self.start_time = Instant::now();
        self.last_mem_sample = self.start_time;

        while self.stream.has_more_instances() {
            if let Some(n) = self.config.max_instances {
                if self.processed >= n {
                    break;
                }
            }
            if let Some(s) = self.config.max_seconds {
                if self.start_time.elapsed().as_secs() >= s {
                    break;
                }
            }
            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            if instance.is_class_missing() {
                self.handle_unlabeled_arrival(instance)?;
            } else {
                self.handle_labeled_arrival(instance)?;
            }

            if self.processed % self.config.mem_check_frequency == 0 {
                self.bump_ram_hours();
            }
            if self.processed % self.config.sample_frequency == 0 {
                self.push_snapshots();
            }
        }

        self.push_snapshots();
        Ok(())
    }

    fn handle_unlabeled_arrival(
        &mut self,
        instance: Box<dyn Instance>,
    ) -> Result<(), EvaluationError> {
        let votes = self.learner.get_votes_for_instance(instance.as_ref());
        self.evaluator.add_result(instance.as_ref(), &votes)?;

        let timestamp = instance.timestamp();
        self.pending.add(PendingInstance::new(
            instance,
            PredictionItem::new(votes, timestamp, PredictionKind::First),
        ));
        self.sync_buffer_gauges(false);
        Ok(())
    }

    fn handle_labeled_arrival(
        &mut self,
        instance: Box<dyn Instance>,
    ) -> Result<(), EvaluationError> {
        let votes = self.learner.get_votes_for_instance(instance.as_ref());
        self.evaluator.add_result(instance.as_ref(), &votes)?;

        let id = instance.instance_id();
        let matching = (0..self.pending.len())
            .find(|&i| self.pending.get(i).map(|e| e.instance.instance_id()) == Some(id));
        match matching {
            Some(index) => {
                let mut entry = self.pending.remove(index);
                let repredictions = entry.predictions.len() as u64 - 1;
                self.bins
                    .first_prediction_bin_mut()
                    .increment_repredictions(repredictions);
                entry.predictions.push(PredictionItem::new(
                    votes,
                    instance.timestamp(),
                    PredictionKind::Final,
                ));
                self.bins.resolve(instance.as_ref(), &entry.predictions)?;
            }
            // A label for an instance never seen unlabeled is a data
            // consistency problem, not a reason to stop the run.
            None => log::warn!("label arrived for unknown instance {id}"),
        }

        let repredicted = self.repredict_pending(instance.timestamp())?;
        self.learner.train_on_instance(instance.as_ref());
        self.sync_buffer_gauges(repredicted);
        Ok(())
    }

    /// Every labeled arrival ages the buffered instances; each one is
    /// re-predicted once its age hits the configured cadence again.
    /// Returns whether any reprediction was made this round.
    fn repredict_pending(&mut self, timestamp: f64) -> Result<bool, EvaluationError> {
        let mut repredicted = false;
        for i in 0..self.pending.len() {
            let Some(entry) = self.pending.get_mut(i) else {
                continue;
            };
            entry.instances_passed += 1;
            if entry.instances_passed % self.config.prediction_frequency != 0 {
                continue;
            }
            let votes = self.learner.get_votes_for_instance(entry.instance.as_ref());
            entry.predictions.push(PredictionItem::new(
                votes.clone(),
                timestamp,
                PredictionKind::Reprediction,
            ));
            // Bill the extra model call: the instance is still unlabeled, so
            // only the prediction counter moves.
            self.evaluator.add_result(entry.instance.as_ref(), &votes)?;
            self.evaluator.increment_repredictions(1);
            repredicted = true;
        }
        Ok(repredicted)
    }

    fn sync_buffer_gauges(&mut self, repredicted: bool) {
        self.evaluator
            .set_instances_in_buffer_count(self.pending.len() as f64);
        let bin0 = self.bins.first_prediction_bin_mut();
        bin0.set_instances_in_buffer_count(self.pending.len() as f64);
        if repredicted {
            let outstanding = self.pending.prediction_count() as f64;
            self.evaluator.set_predictions_in_buffer_count(outstanding);
            bin0.set_predictions_in_buffer_count(outstanding);
        }
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    pub fn bin_curve(&self) -> &LearningCurve {
        &self.bin_curve
    }

    pub fn summary_curve(&self) -> &LearningCurve {
        &self.summary_curve
    }

    pub fn evaluator(&self) -> &ClassificationEvaluator {
        &self.evaluator
    }

    pub fn bins(&self) -> &BinSet {
        &self.bins
    }

    pub fn pending_instances(&self) -> usize {
        self.pending.len()
    }

    fn push_snapshots(&mut self) {
        let seconds = self.start_time.elapsed().as_secs_f64();

        let top = snapshot_from(
            self.evaluator.performance(),
            "accuracy",
            "kappa",
            self.processed,
            self.ram_hours,
            seconds,
        );
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(top.clone());
        }
        self.curve.push(top);

        let final_tag = self.bins.final_bin().tag().to_string();
        self.bin_curve.push(snapshot_from(
            self.bins.performance(),
            &format!("{final_tag}accuracy"),
            &format!("{final_tag}kappa"),
            self.processed,
            self.ram_hours,
            seconds,
        ));

        let summary_measurements: Vec<Measurement> = self
            .summaries
            .iter()
            .flat_map(|s| s.reduce(&self.bins))
            .collect();
        self.summary_curve.push(snapshot_from(
            summary_measurements,
            "maxperf:accuracy",
            "maxperf:kappa",
            self.processed,
            self.ram_hours,
            seconds,
        ));
    }

    fn bump_ram_hours(&mut self) {
        let now = Instant::now();
        let duration = now - self.last_mem_sample;
        let dt_h = duration.as_secs_f64() / 3600.0;
        self.last_mem_sample = now;

        let rss_gb = current_rss_gb().unwrap_or(0.0);
        self.ram_hours += rss_gb * dt_h;
    }
}

/// Builds a snapshot whose fixed columns come from the named measurements;
/// everything else rides along as extras.
fn snapshot_from(
    measurements: Vec<Measurement>,
    accuracy_name: &str,
    kappa_name: &str,
    instances_seen: u64,
    ram_hours: f64,
    seconds: f64,
) -> Snapshot {
    let mut snapshot = Snapshot::new(instances_seen, f64::NAN, f64::NAN, ram_hours, seconds);
    for m in measurements {
        if m.name == accuracy_name {
            snapshot.accuracy = m.value;
        } else if m.name == kappa_name {
            snapshot.kappa = m.value;
        } else {
            snapshot.extras.insert(m.name, m.value);
        }
    }
    snapshot
}
