use crate::core::instances::Instance;
use crate::evaluation::config::EvaluatorConfig;
use crate::evaluation::error::EvaluationError;
use crate::evaluation::estimators::{BoxedEstimator, Estimator, EstimatorKind};
use crate::evaluation::ledger::{BoxedLabelUpdateLog, LabelUpdateLog, LabelUpdateTuple};
use crate::evaluation::pending::PredictionItem;
use crate::evaluation::{Measurement, PerformanceEvaluator};

/// Incremental classification evaluator.
///
/// Tracks:
/// - overall accuracy (`weight_correct`);
/// - marginals of predicted (`row_kappa`) and true (`column_kappa`) classes
///   for Cohen's κ;
/// - per-class precision and recall (macro-averaged in `performance()`);
/// - two chance baselines for the κ variants:
///   - **no-change** (predict the last true class): κ-temporal;
///   - **majority** (predict the most frequent class so far): κ-M;
/// - prediction/buffer counters for delayed-label overhead reporting;
/// - optionally, the label-transition ledger behind the differential
///   confusion matrices.
///
/// Whether updates are unbounded or sliding-window is decided once, by the
/// `EstimatorKind` inside the config captured at construction.
pub struct ClassificationEvaluator {
    config: EvaluatorConfig,
    tag: String,
    num_classes: usize,
    weight_correct: BoxedEstimator,
    row_kappa: Vec<BoxedEstimator>,
    column_kappa: Vec<BoxedEstimator>,
    precision: Vec<BoxedEstimator>,
    recall: Vec<BoxedEstimator>,
    weight_correct_no_change: BoxedEstimator,
    weight_majority: BoxedEstimator,
    last_seen_class: usize,
    total_weight_observed: f64,
    /// Predictions actually computed by the model (cloned ones excluded).
    total_prediction_count: f64,
    predictions_in_buffer_count: f64,
    instances_in_buffer_count: f64,
    total_reprediction_count: f64,
    label_update_log: Option<BoxedLabelUpdateLog>,
}

impl ClassificationEvaluator {
    /// Creates an evaluator with an unknown class count; the first weighted
    /// example triggers the allocation from the instance schema.
    pub fn new(config: EvaluatorConfig) -> Self {
        // A zero-width window cannot back an estimator; construction stays
        // infallible with inert placeholders and the first reset reports the
        // bad width as `InvalidConfig`.
        let kind = if config.validate().is_ok() {
            config.estimator
        } else {
            EstimatorKind::Cumulative
        };
        Self {
            config,
            tag: String::new(),
            num_classes: 0,
            weight_correct: kind.new_estimator(),
            row_kappa: Vec::new(),
            column_kappa: Vec::new(),
            precision: Vec::new(),
            recall: Vec::new(),
            weight_correct_no_change: kind.new_estimator(),
            weight_majority: kind.new_estimator(),
            last_seen_class: 0,
            total_weight_observed: 0.0,
            total_prediction_count: 0.0,
            predictions_in_buffer_count: 0.0,
            instances_in_buffer_count: 0.0,
            total_reprediction_count: 0.0,
            label_update_log: None,
        }
    }

    pub fn with_classes(
        config: EvaluatorConfig,
        num_classes: usize,
    ) -> Result<Self, EvaluationError> {
        let mut evaluator = Self::new(config);
        evaluator.reset_with(num_classes)?;
        Ok(evaluator)
    }

    /// Measurement-name prefix, e.g. `"bin 0:"`.
    pub fn set_tag<S: Into<String>>(&mut self, tag: S) {
        self.tag = tag.into();
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn total_weight_observed(&self) -> f64 {
        self.total_weight_observed
    }

    pub fn total_prediction_count(&self) -> f64 {
        self.total_prediction_count
    }

    /// Reallocates all per-class state for `num_classes` classes.
    ///
    /// A zero class count is a stream/schema misconfiguration and reported
    /// as an error rather than terminating the process.
    pub fn reset_with(&mut self, num_classes: usize) -> Result<(), EvaluationError> {
        if num_classes == 0 {
            return Err(EvaluationError::NoClasses);
        }
        self.config.validate()?;
        let kind = self.config.estimator;
        let make_vec = |n: usize| (0..n).map(|_| kind.new_estimator()).collect::<Vec<_>>();
        self.num_classes = num_classes;
        self.row_kappa = make_vec(num_classes);
        self.column_kappa = make_vec(num_classes);
        self.precision = make_vec(num_classes);
        self.recall = make_vec(num_classes);
        self.weight_correct = kind.new_estimator();
        self.weight_correct_no_change = kind.new_estimator();
        self.weight_majority = kind.new_estimator();
        self.last_seen_class = 0;
        self.total_weight_observed = 0.0;
        self.total_prediction_count = 0.0;
        self.predictions_in_buffer_count = 0.0;
        self.instances_in_buffer_count = 0.0;
        self.total_reprediction_count = 0.0;
        self.label_update_log = if self.config.calculate_differential_matrices {
            Some(kind.new_label_update_log(num_classes))
        } else {
            None
        };
        Ok(())
    }

    /// Lazy reset once the class count becomes known (or changes) from the
    /// first weighted example of the stream.
    fn ensure_reset_for(&mut self, example: &dyn Instance) -> Result<(), EvaluationError> {
        if self.total_weight_observed == 0.0 {
            let k = example.number_of_classes();
            if self.num_classes != k {
                self.reset_with(k)?;
            }
        }
        Ok(())
    }

    /// Scores one prediction against the (possibly still missing) label.
    pub fn add_result(
        &mut self,
        example: &dyn Instance,
        class_votes: &[f64],
    ) -> Result<(), EvaluationError> {
        let weight = example.weight();

        if example.is_class_missing() {
            // Label unknown: only the prediction-cost counter moves.
            if weight > 0.0 {
                self.ensure_reset_for(example)?;
                self.total_prediction_count += 1.0;
            }
            return Ok(());
        }

        let Some(true_value) = example.class_value() else {
            return Ok(());
        };
        let true_class = true_value as usize;

        let Some(predicted_class) = argmax(class_votes) else {
            return Ok(());
        };

        if weight > 0.0 {
            self.ensure_reset_for(example)?;
            self.total_prediction_count += 1.0;
            self.total_weight_observed += weight;

            self.weight_correct.add(if predicted_class == true_class {
                weight
            } else {
                0.0
            });

            for i in 0..self.num_classes {
                self.row_kappa[i].add(if predicted_class == i { weight } else { 0.0 });
                self.column_kappa[i].add(if true_class == i { weight } else { 0.0 });

                // For both precision and recall, NaN values 'balance' the
                // number of window slots consumed across classes.
                if predicted_class == i {
                    self.precision[i].add(if predicted_class == true_class {
                        weight
                    } else {
                        0.0
                    });
                } else {
                    self.precision[i].add(f64::NAN);
                }
                if true_class == i {
                    self.recall[i].add(if predicted_class == true_class {
                        weight
                    } else {
                        0.0
                    });
                } else {
                    self.recall[i].add(f64::NAN);
                }
            }
        }

        self.weight_correct_no_change
            .add(if self.last_seen_class == true_class {
                weight
            } else {
                0.0
            });
        self.weight_majority
            .add(if self.majority_class() == true_class {
                weight
            } else {
                0.0
            });
        self.last_seen_class = true_class;
        Ok(())
    }

    /// Scores a prediction copied from a prior bin: the usual update, but
    /// the prediction must not be billed against the model-call counter.
    pub fn add_cloned_result(
        &mut self,
        example: &dyn Instance,
        class_votes: &[f64],
    ) -> Result<(), EvaluationError> {
        let billed_before = self.total_prediction_count;
        self.add_result(example, class_votes)?;
        self.total_prediction_count = billed_before;
        Ok(())
    }

    /// Scores the final prediction and, when differential tracking is on,
    /// records the (earlier, final, true) transition in the ledger.
    pub fn add_differential_result(
        &mut self,
        example: &dyn Instance,
        earlier_class_votes: &[f64],
        class_votes: &[f64],
    ) -> Result<(), EvaluationError> {
        self.add_result(example, class_votes)?;

        if !self.config.calculate_differential_matrices {
            return Ok(());
        }
        if example.is_class_missing() {
            return Err(EvaluationError::MissingTrueLabel);
        }
        let Some(log) = self.label_update_log.as_mut() else {
            return Ok(());
        };
        let (Some(predicted_class), Some(earlier_predicted_class)) =
            (argmax(class_votes), argmax(earlier_class_votes))
        else {
            return Ok(());
        };
        let true_class = example.class_value().unwrap_or(f64::NAN) as usize;
        let worst = true_class.max(predicted_class).max(earlier_predicted_class);
        if worst >= self.num_classes {
            return Err(EvaluationError::ClassOutOfRange {
                class: worst,
                num_classes: self.num_classes,
            });
        }
        log.add(LabelUpdateTuple::new(
            example.weight(),
            earlier_predicted_class,
            predicted_class,
            true_class,
        ));
        Ok(())
    }

    /// Reduces a timestamped prediction timeline to a single dwell-time
    /// weighted vote and scores it once. Each prediction stays "in force"
    /// until the next timestamp, so its one-hot vote accrues impact
    /// proportional to how long it was the current guess.
    pub fn add_multiple_results(
        &mut self,
        example: &dyn Instance,
        predictions: &[PredictionItem],
    ) -> Result<(), EvaluationError> {
        let class_count = if self.num_classes > 0 {
            self.num_classes
        } else {
            example.number_of_classes()
        };
        let weighted_impact = aggregate_decision(predictions, class_count);
        let aggregated_votes = binary_votes(&weighted_impact);
        self.add_result(example, &aggregated_votes)
    }

    pub fn increment_repredictions(&mut self, value_to_add: u64) {
        self.total_reprediction_count += value_to_add as f64;
    }

    pub fn set_instances_in_buffer_count(&mut self, count: f64) {
        self.instances_in_buffer_count = count;
    }

    pub fn set_predictions_in_buffer_count(&mut self, count: f64) {
        self.predictions_in_buffer_count = count;
    }

    fn majority_class(&self) -> usize {
        let mut majority = 0;
        let mut max_prob = 0.0;
        for (i, est) in self.column_kappa.iter().enumerate() {
            let p = est.estimation();
            if p > max_prob {
                majority = i;
                max_prob = p;
            }
        }
        majority
    }

    pub fn fraction_correct(&self) -> f64 {
        self.weight_correct.estimation()
    }

    pub fn kappa(&self) -> f64 {
        if self.total_weight_observed <= 0.0 {
            return 0.0;
        }
        let mut pc = 0.0;
        for i in 0..self.num_classes {
            let pt = self.row_kappa[i].estimation();
            let pp = self.column_kappa[i].estimation();
            if pt.is_finite() && pp.is_finite() {
                pc += pt * pp;
            }
        }
        chance_corrected(self.fraction_correct(), pc)
    }

    pub fn kappa_temporal(&self) -> f64 {
        if self.total_weight_observed <= 0.0 {
            return 0.0;
        }
        chance_corrected(
            self.fraction_correct(),
            self.weight_correct_no_change.estimation(),
        )
    }

    pub fn kappa_m(&self) -> f64 {
        if self.total_weight_observed <= 0.0 {
            return 0.0;
        }
        chance_corrected(self.fraction_correct(), self.weight_majority.estimation())
    }

    pub fn precision_for_class(&self, class: usize) -> f64 {
        self.precision[class].estimation()
    }

    pub fn recall_for_class(&self, class: usize) -> f64 {
        self.recall[class].estimation()
    }

    pub fn macro_precision(&self) -> f64 {
        finite_mean(self.precision.iter().map(|e| e.estimation()))
    }

    pub fn macro_recall(&self) -> f64 {
        finite_mean(self.recall.iter().map(|e| e.estimation()))
    }

    pub fn macro_f1(&self) -> f64 {
        harmonic_f1(self.macro_precision(), self.macro_recall())
    }

    pub fn f1_for_class(&self, class: usize) -> f64 {
        harmonic_f1(self.precision_for_class(class), self.recall_for_class(class))
    }

    pub fn average_repredictions_per_instance(&self) -> f64 {
        if self.total_weight_observed > 0.0 {
            self.total_reprediction_count / self.total_weight_observed
        } else {
            0.0
        }
    }

    fn append_differential_measurements(&self, out: &mut Vec<Measurement>) {
        let Some(log) = self.label_update_log.as_ref() else {
            return;
        };
        let n = self.num_classes;
        let tag = &self.tag;

        // Confusion matrix over final predictions (test-then-train).
        let mut fcm = vec![vec![0.0; n]; n];
        let mut total = 0.0;
        let mut correct = 0.0;
        for t in 0..n {
            for p in 0..n {
                let mut v = 0.0;
                for e in 0..n {
                    v += log.total_weight(e, p, t);
                }
                fcm[t][p] = v;
                total += v;
                if t == p {
                    correct += v;
                }
                out.push(Measurement::new(format!("{tag}fcm_{t}_{p}"), v));
            }
        }

        // Confusion matrix over initial (pre-label) predictions.
        let mut icm = vec![vec![0.0; n]; n];
        for t in 0..n {
            for e in 0..n {
                let mut v = 0.0;
                for p in 0..n {
                    v += log.total_weight(e, p, t);
                }
                icm[t][e] = v;
                out.push(Measurement::new(format!("{tag}icm_{t}_{e}"), v));
            }
        }

        for t in 0..n {
            for p in 0..n {
                out.push(Measurement::new(
                    format!("{tag}dcm_{t}_{p}"),
                    fcm[t][p] - icm[t][p],
                ));
            }
        }

        // Label-update matrix: initial prediction e converted to final p.
        let mut changes = 0.0;
        for e in 0..n {
            for p in 0..n {
                let mut v = 0.0;
                for t in 0..n {
                    v += log.total_weight(e, p, t);
                }
                out.push(Measurement::new(format!("{tag}lu_{e}_{p}"), v));
                if e != p {
                    changes += v;
                }
            }
        }

        // Transitions whose destination matched the true class.
        for e in 0..n {
            for p in 0..n {
                out.push(Measurement::new(
                    format!("{tag}lim_{e}_{p}"),
                    log.total_weight(e, p, p),
                ));
            }
        }

        out.push(Measurement::new(
            format!("{tag}label_changes_ratio"),
            if total > 0.0 { changes / total } else { f64::NAN },
        ));
        out.push(Measurement::new(
            format!("{tag}cross_check_accuracy"),
            if total > 0.0 {
                100.0 * correct / total
            } else {
                f64::NAN
            },
        ));
    }
}

impl PerformanceEvaluator for ClassificationEvaluator {
    fn reset(&mut self) -> Result<(), EvaluationError> {
        if self.num_classes == 0 {
            // Nothing allocated yet; the lazy reset will do it.
            return Ok(());
        }
        self.reset_with(self.num_classes)
    }

    fn add_result(
        &mut self,
        example: &dyn Instance,
        class_votes: &[f64],
    ) -> Result<(), EvaluationError> {
        ClassificationEvaluator::add_result(self, example, class_votes)
    }

    fn performance(&self) -> Vec<Measurement> {
        let tag = &self.tag;
        let mut m = vec![
            Measurement::new(
                format!("{tag}classified_instances"),
                self.total_weight_observed,
            ),
            Measurement::new(format!("{tag}accuracy"), self.fraction_correct()),
            Measurement::new(format!("{tag}kappa"), self.kappa()),
            Measurement::new(format!("{tag}kappa_t"), self.kappa_temporal()),
            Measurement::new(format!("{tag}kappa_m"), self.kappa_m()),
        ];

        if self.config.precision_recall_output {
            m.push(Measurement::new(
                format!("{tag}precision"),
                self.macro_precision(),
            ));
            m.push(Measurement::new(format!("{tag}recall"), self.macro_recall()));
            m.push(Measurement::new(format!("{tag}f1"), self.macro_f1()));
        }
        if self.config.precision_per_class {
            for c in 0..self.num_classes {
                m.push(Measurement::new(
                    format!("{tag}precision_class_{c}"),
                    self.precision_for_class(c),
                ));
            }
        }
        if self.config.recall_per_class {
            for c in 0..self.num_classes {
                m.push(Measurement::new(
                    format!("{tag}recall_class_{c}"),
                    self.recall_for_class(c),
                ));
            }
        }
        if self.config.f1_per_class {
            for c in 0..self.num_classes {
                m.push(Measurement::new(
                    format!("{tag}f1_class_{c}"),
                    self.f1_for_class(c),
                ));
            }
        }

        if self.config.report_extended_overhead {
            m.push(Measurement::new(
                format!("{tag}prediction_count"),
                self.total_prediction_count,
            ));
            m.push(Measurement::new(
                format!("{tag}instances_in_buffer"),
                self.instances_in_buffer_count,
            ));
            m.push(Measurement::new(
                format!("{tag}predictions_in_buffer"),
                self.predictions_in_buffer_count,
            ));
            m.push(Measurement::new(
                format!("{tag}avg_repredictions"),
                self.average_repredictions_per_instance(),
            ));
        }

        if self.config.calculate_differential_matrices {
            self.append_differential_measurements(&mut m);
        }
        m
    }
}

/// Index of the highest finite vote; ties keep the lowest index.
#[inline]
fn argmax(votes: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &x) in votes.iter().enumerate() {
        if !x.is_finite() {
            continue;
        }
        if best.is_none() || x > best_value {
            best = Some(i);
            best_value = x;
        }
    }
    best
}

/// One-hot vector selecting the maximum vote (lowest index on ties).
fn binary_votes(votes: &[f64]) -> Vec<f64> {
    let mut max_vote = 0;
    for (i, &v) in votes.iter().enumerate() {
        if votes[max_vote] < v {
            max_vote = i;
        }
    }
    (0..votes.len())
        .map(|i| if i == max_vote { 1.0 } else { 0.0 })
        .collect()
}

/// Dwell-time impact vector: prediction `j-1` is in force during
/// `[t_{j-1}, t_j)` and its one-hot vote accrues that interval's length.
fn aggregate_decision(predictions: &[PredictionItem], class_count: usize) -> Vec<f64> {
    let mut weighted_impact = vec![0.0; class_count];
    for j in 1..predictions.len() {
        let votes = binary_votes(&predictions[j - 1].votes);
        let dt = predictions[j].timestamp - predictions[j - 1].timestamp;
        for (c, v) in votes.iter().enumerate().take(class_count) {
            weighted_impact[c] += v * dt;
        }
    }
    weighted_impact
}

#[inline]
fn chance_corrected(p0: f64, pc: f64) -> f64 {
    let denom = 1.0 - pc;
    if denom.abs() > f64::EPSILON {
        (p0 - pc) / denom
    } else {
        f64::NAN
    }
}

fn finite_mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count > 0 {
        sum / count as f64
    } else {
        f64::NAN
    }
}

fn harmonic_f1(p: f64, r: f64) -> f64 {
    let s = p + r;
    if p.is_finite() && r.is_finite() && s > f64::EPSILON {
        2.0 * (p * r) / s
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::DenseInstance;
    use crate::evaluation::PerformanceEvaluatorExt;
    use crate::evaluation::estimators::EstimatorKind;
    use crate::evaluation::pending::PredictionKind;
    use crate::testing::dummies::{header_binary, header_nominal};
    use std::sync::Arc;

    fn cumulative_config() -> EvaluatorConfig {
        EvaluatorConfig {
            estimator: EstimatorKind::Cumulative,
            ..Default::default()
        }
    }

    fn inst(h: &Arc<crate::core::instance_header::InstanceHeader>, y: usize, w: f64) -> DenseInstance {
        DenseInstance::new(Arc::clone(h), vec![0.0, y as f64], w)
    }

    fn unlabeled(h: &Arc<crate::core::instance_header::InstanceHeader>, w: f64) -> DenseInstance {
        DenseInstance::new(Arc::clone(h), vec![0.0, f64::NAN], w)
    }

    fn votes(pred: usize) -> Vec<f64> {
        if pred == 0 {
            vec![1.0, 0.0]
        } else {
            vec![0.0, 1.0]
        }
    }

    #[test]
    fn perf_is_zero_when_empty() {
        let ev = ClassificationEvaluator::new(cumulative_config());
        assert!(ev.metric("accuracy").unwrap().is_nan());
        assert_eq!(ev.metric("kappa").unwrap(), 0.0);
        assert_eq!(ev.metric("kappa_t").unwrap(), 0.0);
        assert_eq!(ev.metric("kappa_m").unwrap(), 0.0);
    }

    #[test]
    fn reset_with_zero_classes_is_an_error() {
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        assert!(matches!(
            ev.reset_with(0),
            Err(EvaluationError::NoClasses)
        ));
    }

    #[test]
    fn zero_window_width_is_an_error_not_a_panic() {
        let cfg: EvaluatorConfig =
            serde_json::from_str(r#"{"estimator":{"Window":{"width":0}}}"#).unwrap();
        let mut ev = ClassificationEvaluator::new(cfg);
        assert!(matches!(
            ev.reset_with(2),
            Err(EvaluationError::InvalidConfig(_))
        ));
        // The lazy reset path surfaces the same error.
        let h = header_binary();
        assert!(ev.add_result(&inst(&h, 0, 1.0), &votes(0)).is_err());
    }

    #[test]
    fn lazy_reset_discovers_class_count_from_schema() {
        let h = header_nominal(3);
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        assert_eq!(ev.num_classes(), 0);
        ev.add_result(&inst(&h, 2, 1.0), &[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(ev.num_classes(), 3);
        assert!((ev.fraction_correct() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn five_instance_scenario() {
        // true [0,1,0,1,0], predicted [0,1,1,1,0]
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        for (y, p) in [(0, 0), (1, 1), (0, 1), (1, 1), (0, 0)] {
            ev.add_result(&inst(&h, y, 1.0), &votes(p)).unwrap();
        }
        assert!((ev.fraction_correct() - 0.8).abs() < 1e-12);
        assert_eq!(ev.total_weight_observed(), 5.0);
        assert_eq!(ev.total_prediction_count(), 5.0);
    }

    #[test]
    fn kappa_one_when_perfect_on_balanced() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.add_result(&inst(&h, 0, 1.0), &votes(0)).unwrap();
        ev.add_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        assert!((ev.kappa() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn kappa_zero_when_accuracy_equals_chance() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.add_result(&inst(&h, 0, 1.0), &votes(1)).unwrap();
        ev.add_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        assert!(ev.kappa().abs() < 1e-12);
    }

    #[test]
    fn kappa_converges_to_zero_on_random_stream() {
        use rand::Rng;
        let h = header_binary();
        let mut rng = rand::rng();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        for _ in 0..100_000 {
            let y = rng.random_range(0..2usize);
            let p = rng.random_range(0..2usize);
            ev.add_result(&inst(&h, y, 1.0), &votes(p)).unwrap();
        }
        assert!(ev.kappa().abs() < 0.05, "kappa={}", ev.kappa());
    }

    #[test]
    fn weight_zero_is_ignored_by_accuracy() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.add_result(&inst(&h, 1, 0.0), &votes(1)).unwrap();
        ev.add_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        assert!((ev.fraction_correct() - 1.0).abs() < 1e-12);
        assert_eq!(ev.total_weight_observed(), 1.0);
    }

    #[test]
    fn missing_label_counts_prediction_only() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.add_result(&unlabeled(&h, 1.0), &votes(0)).unwrap();
        assert_eq!(ev.total_prediction_count(), 1.0);
        assert_eq!(ev.total_weight_observed(), 0.0);
        assert!(ev.fraction_correct().is_nan());
    }

    #[test]
    fn cloned_result_not_billed_as_prediction() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.add_result(&inst(&h, 0, 1.0), &votes(0)).unwrap();
        ev.add_cloned_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        assert_eq!(ev.total_prediction_count(), 1.0);
        assert_eq!(ev.total_weight_observed(), 2.0);
        assert!((ev.fraction_correct() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cloned_result_never_drives_the_prediction_count_negative() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        // A zero-weight example is not billed by add_result, so there is
        // nothing to give back either.
        ev.add_cloned_result(&inst(&h, 0, 0.0), &votes(0)).unwrap();
        assert_eq!(ev.total_prediction_count(), 0.0);
    }

    #[test]
    fn empty_votes_skip_the_update() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.add_result(&inst(&h, 1, 1.0), &[]).unwrap();
        assert_eq!(ev.total_weight_observed(), 0.0);
    }

    #[test]
    fn argmax_ties_keep_lowest_index() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), Some(0));
        assert_eq!(argmax(&[0.1, 0.5, 0.5]), Some(1));
        assert_eq!(argmax(&[]), None);
        assert_eq!(binary_votes(&[2.0, 2.0]), vec![1.0, 0.0]);
    }

    #[test]
    fn summary_metrics_present_only_when_enabled() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.add_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        assert!(ev.metric("precision").is_none());
        assert!(ev.metric("recall").is_none());
        assert!(ev.metric("f1").is_none());

        let mut ev = ClassificationEvaluator::new(EvaluatorConfig {
            precision_recall_output: true,
            ..cumulative_config()
        });
        ev.add_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        assert!((ev.metric("precision").unwrap() - 1.0).abs() < 1e-12);
        assert!((ev.metric("recall").unwrap() - 1.0).abs() < 1e-12);
        assert!((ev.metric("f1").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn per_class_metrics_present_only_when_enabled() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(EvaluatorConfig {
            precision_per_class: true,
            recall_per_class: true,
            f1_per_class: true,
            ..cumulative_config()
        });
        ev.add_result(&inst(&h, 0, 1.0), &votes(0)).unwrap();
        ev.add_result(&inst(&h, 1, 1.0), &votes(0)).unwrap();

        for name in [
            "precision_class_0",
            "precision_class_1",
            "recall_class_0",
            "recall_class_1",
            "f1_class_0",
            "f1_class_1",
        ] {
            assert!(ev.metric(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn extended_overhead_block() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(EvaluatorConfig {
            report_extended_overhead: true,
            ..cumulative_config()
        });
        ev.add_result(&inst(&h, 0, 1.0), &votes(0)).unwrap();
        ev.add_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        ev.increment_repredictions(3);
        ev.set_instances_in_buffer_count(4.0);
        ev.set_predictions_in_buffer_count(9.0);

        assert_eq!(ev.metric("prediction_count").unwrap(), 2.0);
        assert_eq!(ev.metric("instances_in_buffer").unwrap(), 4.0);
        assert_eq!(ev.metric("predictions_in_buffer").unwrap(), 9.0);
        assert!((ev.metric("avg_repredictions").unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn differential_matrices_and_ratios() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(EvaluatorConfig {
            calculate_differential_matrices: true,
            ..cumulative_config()
        });
        // three resolved instances: 0->1 (true 1), 1->1 (true 1), 0->0 (true 1)
        ev.add_differential_result(&inst(&h, 1, 1.0), &votes(0), &votes(1))
            .unwrap();
        ev.add_differential_result(&inst(&h, 1, 1.0), &votes(1), &votes(1))
            .unwrap();
        ev.add_differential_result(&inst(&h, 1, 1.0), &votes(0), &votes(0))
            .unwrap();

        // final predictions: two 1s and one 0, all true class 1
        assert_eq!(ev.metric("fcm_1_1").unwrap(), 2.0);
        assert_eq!(ev.metric("fcm_1_0").unwrap(), 1.0);
        // initial predictions: two 0s and one 1
        assert_eq!(ev.metric("icm_1_0").unwrap(), 2.0);
        assert_eq!(ev.metric("icm_1_1").unwrap(), 1.0);
        assert_eq!(ev.metric("dcm_1_1").unwrap(), 1.0);
        assert_eq!(ev.metric("dcm_1_0").unwrap(), -1.0);
        // one transition changed label (0 -> 1) out of three
        assert!((ev.metric("label_changes_ratio").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        // FCM diagonal sum is 2 of 3 total
        assert!((ev.metric("cross_check_accuracy").unwrap() - 100.0 * 2.0 / 3.0).abs() < 1e-12);
        // lim counts transitions whose destination was correct
        assert_eq!(ev.metric("lim_0_1").unwrap(), 1.0);
        assert_eq!(ev.metric("lim_1_1").unwrap(), 1.0);
    }

    #[test]
    fn label_change_ratio_matches_lu_matrix() {
        let h = header_nominal(3);
        let mut ev = ClassificationEvaluator::new(EvaluatorConfig {
            calculate_differential_matrices: true,
            ..cumulative_config()
        });
        let one_hot = |c: usize| {
            let mut v = vec![0.0; 3];
            v[c] = 1.0;
            v
        };
        let transitions = [(0, 1, 1), (1, 1, 0), (2, 0, 2), (0, 0, 0), (1, 2, 2)];
        for (e, p, y) in transitions {
            ev.add_differential_result(
                &DenseInstance::new(Arc::clone(&h), vec![0.0, y as f64], 1.0),
                &one_hot(e),
                &one_hot(p),
            )
            .unwrap();
        }

        let mut lu_total = 0.0;
        let mut lu_off_diagonal = 0.0;
        for e in 0..3 {
            for p in 0..3 {
                let v = ev.metric(&format!("lu_{e}_{p}")).unwrap();
                lu_total += v;
                if e != p {
                    lu_off_diagonal += v;
                }
            }
        }
        let ratio = ev.metric("label_changes_ratio").unwrap();
        assert!((ratio - lu_off_diagonal / lu_total).abs() < 1e-12);

        let mut fcm_diagonal = 0.0;
        let mut fcm_total = 0.0;
        for t in 0..3 {
            for p in 0..3 {
                let v = ev.metric(&format!("fcm_{t}_{p}")).unwrap();
                fcm_total += v;
                if t == p {
                    fcm_diagonal += v;
                }
            }
        }
        let cross = ev.metric("cross_check_accuracy").unwrap();
        assert!((cross / 100.0 - fcm_diagonal / fcm_total).abs() < 1e-12);
    }

    #[test]
    fn differential_requires_true_label() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::with_classes(
            EvaluatorConfig {
                calculate_differential_matrices: true,
                ..cumulative_config()
            },
            2,
        )
        .unwrap();
        let err = ev.add_differential_result(&unlabeled(&h, 1.0), &votes(0), &votes(1));
        assert!(matches!(err, Err(EvaluationError::MissingTrueLabel)));
    }

    #[test]
    fn dwell_time_aggregation_prefers_longest_standing_vote() {
        // predictions [(A, t=0), (B, t=10), (A, t=12)] => impact A:10, B:2
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        let timeline = vec![
            PredictionItem::new(votes(0), 0.0, PredictionKind::First),
            PredictionItem::new(votes(1), 10.0, PredictionKind::Reprediction),
            PredictionItem::new(votes(0), 12.0, PredictionKind::Final),
        ];
        let impact = aggregate_decision(&timeline, 2);
        assert_eq!(impact, vec![10.0, 2.0]);

        // true class A: the aggregated vote should score as correct
        ev.add_multiple_results(&inst(&h, 0, 1.0), &timeline).unwrap();
        assert!((ev.fraction_correct() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn windowed_evaluator_forgets_old_results() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(EvaluatorConfig {
            estimator: EstimatorKind::Window { width: 4 },
            ..Default::default()
        });
        // four wrong then four right: window of 4 sees only the right ones
        for _ in 0..4 {
            ev.add_result(&inst(&h, 0, 1.0), &votes(1)).unwrap();
        }
        assert!((ev.fraction_correct() - 0.0).abs() < 1e-12);
        for _ in 0..4 {
            ev.add_result(&inst(&h, 0, 1.0), &votes(0)).unwrap();
        }
        assert!((ev.fraction_correct() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_metrics() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.add_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        assert!((ev.metric("accuracy").unwrap() - 1.0).abs() < 1e-12);

        PerformanceEvaluator::reset(&mut ev).unwrap();
        assert!(ev.metric("accuracy").unwrap().is_nan());
        assert_eq!(ev.metric("kappa").unwrap(), 0.0);
        assert_eq!(ev.num_classes(), 2);
    }

    #[test]
    fn tag_prefixes_every_measurement() {
        let h = header_binary();
        let mut ev = ClassificationEvaluator::new(cumulative_config());
        ev.set_tag("bin 0:");
        ev.add_result(&inst(&h, 1, 1.0), &votes(1)).unwrap();
        for m in ev.performance() {
            assert!(m.name.starts_with("bin 0:"), "unexpected name {}", m.name);
        }
        // Ext lookups still work against the untagged name
        assert!((ev.metric("accuracy").unwrap() - 1.0).abs() < 1e-12);
    }
}
