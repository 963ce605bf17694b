use crate::evaluation::preview::Snapshot;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

pub struct LearningCurve {
    entries: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: CurveFormat) -> Result<(), Error> {
        match fmt {
            CurveFormat::Csv => self.export_with_delimiter(path, ','),
            CurveFormat::Tsv => self.export_with_delimiter(path, '\t'),
            CurveFormat::Json => self.export_json(path),
        }
    }

    /// Extra columns follow the first snapshot's key set; rows missing a key
    /// print NaN.
    fn export_with_delimiter<P: AsRef<Path>>(&self, path: P, delimiter: char) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        let extra_names: Vec<&String> = self
            .entries
            .first()
            .map(|s| s.extras.keys().collect())
            .unwrap_or_default();

        write!(
            w,
            "instances_seen{d}accuracy{d}kappa{d}ram_hours{d}seconds",
            d = delimiter
        )?;
        for name in &extra_names {
            write!(w, "{delimiter}{name}")?;
        }
        writeln!(w)?;

        for s in &self.entries {
            write!(
                w,
                "{}{d}{:.12}{d}{:.12}{d}{:.12}{d}{:.6}",
                s.instances_seen,
                s.accuracy,
                s.kappa,
                s.ram_hours,
                s.seconds,
                d = delimiter
            )?;
            for name in &extra_names {
                write!(
                    w,
                    "{delimiter}{:.12}",
                    s.extra(name).unwrap_or(f64::NAN)
                )?;
            }
            writeln!(w)?;
        }
        w.flush()
    }

    fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, &self.entries).map_err(Error::other)?;
        writeln!(w)?;
        w.flush()
    }
}

impl Default for LearningCurve {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Measurement;
    use std::fs;
    use tempfile::NamedTempFile;

    fn snap(seen: u64, acc: f64, kap: f64, ram: f64, secs: f64) -> Snapshot {
        Snapshot::new(seen, acc, kap, ram, secs)
    }

    #[test]
    fn default_is_empty_and_latest_none() {
        let lc = LearningCurve::default();
        assert_eq!(lc.len(), 0);
        assert!(lc.latest().is_none());
    }

    #[test]
    fn push_increases_len_and_latest_is_newest() {
        let mut lc = LearningCurve::default();
        lc.push(snap(10, 1.0, 0.5, 0.125, 2.5));
        assert_eq!(lc.len(), 1);
        lc.push(snap(20, 0.25, 0.0, 1.5, 3.0));
        assert_eq!(lc.len(), 2);
        let last = lc.latest().unwrap();
        assert_eq!(last.instances_seen, 20);
        assert_eq!(last.accuracy, 0.25);
    }

    #[test]
    fn export_csv_with_two_rows() {
        let mut lc = LearningCurve::default();
        lc.push(snap(10, 1.0, 0.5, 0.125, 2.5));
        lc.push(snap(20, 0.25, 0.0, 1.5, 3.0));

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Csv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
instances_seen,accuracy,kappa,ram_hours,seconds
10,1.000000000000,0.500000000000,0.125000000000,2.500000
20,0.250000000000,0.000000000000,1.500000000000,3.000000
";
        assert_eq!(got, exp);
    }

    #[test]
    fn export_tsv_includes_extra_columns() {
        let mut lc = LearningCurve::default();
        lc.push(
            snap(10, 1.0, 0.5, 0.0, 1.0)
                .with_measurements(&[Measurement::new("maxperf:accuracy", 0.75)]),
        );

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Tsv).unwrap();

        let got = fs::read_to_string(tf.path()).unwrap();
        let mut lines = got.lines();
        assert_eq!(
            lines.next().unwrap(),
            "instances_seen\taccuracy\tkappa\tram_hours\tseconds\tmaxperf:accuracy"
        );
        assert!(lines.next().unwrap().ends_with("\t0.750000000000"));
    }

    #[test]
    fn export_json_round_trips() {
        let mut lc = LearningCurve::default();
        lc.push(
            snap(10, 1.0, 0.5, 0.125, 2.5)
                .with_measurements(&[Measurement::new("bin 1:kappa", 0.25)]),
        );
        lc.push(snap(20, 0.25, 0.0, 1.5, 3.0));

        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Json).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tf.path()).unwrap()).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["instances_seen"], 10);
        assert_eq!(rows[0]["bin 1:kappa"], 0.25);
        assert_eq!(rows[1]["accuracy"], 0.25);
    }

    #[test]
    fn export_empty_csv() {
        let lc = LearningCurve::default();
        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Csv).unwrap();
        let got = fs::read_to_string(tf.path()).unwrap();
        assert_eq!(got, "instances_seen,accuracy,kappa,ram_hours,seconds\n");
    }
}
