use crate::evaluation::measurement::Measurement;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result};

/// One sampled point of an evaluation run.
///
/// Beyond the fixed columns, a snapshot carries the extra measurements of
/// whatever produced it (per-bin metrics, summary reductions), keyed by
/// measurement name. `BTreeMap` keeps exported column order stable.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub accuracy: f64,
    pub kappa: f64,
    pub ram_hours: f64,
    pub seconds: f64,
    #[serde(flatten)]
    pub extras: BTreeMap<String, f64>,
}

impl Snapshot {
    pub fn new(instances_seen: u64, accuracy: f64, kappa: f64, ram_hours: f64, seconds: f64) -> Self {
        Self {
            instances_seen,
            accuracy,
            kappa,
            ram_hours,
            seconds,
            extras: BTreeMap::new(),
        }
    }

    pub fn with_measurements(mut self, measurements: &[Measurement]) -> Self {
        for m in measurements {
            self.extras.insert(m.name.clone(), m.value);
        }
        self
    }

    pub fn extra(&self, name: &str) -> Option<f64> {
        self.extras.get(name).copied()
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "seen={}, acc={:.6}, kappa={:.6}, ram_h={:.6}, t={:.3}s",
            self.instances_seen, self.accuracy, self.kappa, self.ram_hours, self.seconds
        )?;
        if !self.extras.is_empty() {
            write!(f, " (+{} extras)", self.extras.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extras_keep_measurement_values() {
        let s = Snapshot::new(100, 0.9, 0.8, 0.0, 1.0).with_measurements(&[
            Measurement::new("bin 0:accuracy", 0.95),
            Measurement::new("maxperf:accuracy", 0.97),
        ]);
        assert_eq!(s.extra("bin 0:accuracy"), Some(0.95));
        assert_eq!(s.extra("maxperf:accuracy"), Some(0.97));
        assert_eq!(s.extra("missing"), None);
    }

    #[test]
    fn serializes_extras_inline() {
        let s = Snapshot::new(10, 1.0, 1.0, 0.0, 0.5)
            .with_measurements(&[Measurement::new("maxperf:kappa", 0.5)]);
        let json: serde_json::Value = serde_json::to_value(&s).unwrap();
        assert_eq!(json["instances_seen"], 10);
        assert_eq!(json["maxperf:kappa"], 0.5);
    }
}
