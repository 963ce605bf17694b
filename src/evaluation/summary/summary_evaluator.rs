use crate::evaluation::bins::BinSet;
use crate::evaluation::evaluators::PerformanceEvaluator;
use crate::evaluation::measurement::Measurement;

/// Reduces a set of per-bin metric vectors to one summary vector.
///
/// Implementations are injected into the task alongside the bins; they never
/// consume stream results themselves, only fold what the bins accumulated.
pub trait SummaryEvaluator {
    /// Measurement-name prefix identifying this summary in exported curves.
    fn tag(&self) -> String;

    fn reduce(&self, bins: &BinSet) -> Vec<Measurement>;
}

/// Collects the metric vectors of the bins a summary folds over, matched
/// positionally against bin 0's layout by untagged name. A bin whose layout
/// diverges at a position is logged and contributes `None` there; the other
/// bins still feed the metric.
pub(super) fn aligned_columns(
    bins: &BinSet,
    include_final_bin: bool,
) -> Vec<(String, Vec<Option<f64>>)> {
    let Some(template) = bins.get(0).map(|b| b.performance()) else {
        return Vec::new();
    };
    let folded = if include_final_bin {
        bins.len()
    } else {
        bins.len() - 1
    };
    let per_bin: Vec<Vec<Measurement>> = bins.iter().take(folded).map(|b| b.performance()).collect();

    template
        .iter()
        .enumerate()
        .map(|(j, t)| {
            let name = t.untagged_name().to_string();
            let column = per_bin
                .iter()
                .enumerate()
                .map(|(b, ms)| match ms.get(j) {
                    Some(m) if m.untagged_name() == name => Some(m.value),
                    _ => {
                        log::warn!("bin {b} metric layout diverges at '{name}', skipping it");
                        None
                    }
                })
                .collect();
            (name, column)
        })
        .collect()
}
