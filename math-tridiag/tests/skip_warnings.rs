//! Warnings emitted when skip validation drops input entries
//!
//! Runs in its own test binary so it can install a recording logger.

use log::{LevelFilter, Log, Metadata, Record};
use math_audio_tridiag::{TridiagBatch, TridiagConfig, Validation};
use ndarray::{Array3, array};
use std::sync::{Mutex, Once};

struct RecordingLogger {
    warnings: Mutex<Vec<String>>,
}

impl Log for RecordingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut warnings) = self.warnings.lock() {
                warnings.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

static LOGGER: RecordingLogger = RecordingLogger {
    warnings: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in this binary");
        log::set_max_level(LevelFilter::Warn);
    });
}

/// Warnings mentioning matrices of size `n`; each test uses its own size
/// since the tests share the logger.
fn warnings_for_size(n: usize) -> Vec<String> {
    let suffix = format!("matrices of size {n})");
    LOGGER
        .warnings
        .lock()
        .expect("logger lock")
        .iter()
        .filter(|message| message.ends_with(&suffix))
        .cloned()
        .collect()
}

fn skip() -> TridiagConfig<f64> {
    TridiagConfig::lower().with_validation(Validation::Skip)
}

#[test]
fn test_dropped_super_diagonal_is_reported() {
    init_logger();
    let dense = array![[[4.0, 9.0, 0.0], [1.0, 5.0, 2.0], [0.0, 2.0, 6.0]]];

    let batch = TridiagBatch::from_dense(dense.view(), &skip()).expect("skip mode");
    assert_eq!(batch.offdiag(), array![[1.0, 2.0]]);

    let warnings = warnings_for_size(3);
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(
        warnings[0].starts_with(
            "Ignoring 0 entries outside the tridiagonal band and 1 super-diagonal entries"
        ),
        "{}",
        warnings[0]
    );
}

#[test]
fn test_off_band_and_asymmetry_counted_across_batch() {
    init_logger();
    let mut dense = Array3::<f64>::zeros((2, 4, 4));
    for b in 0..2 {
        for i in 0..4 {
            dense[[b, i, i]] = 4.0;
        }
        for i in 0..3 {
            dense[[b, i + 1, i]] = 1.0;
            dense[[b, i, i + 1]] = 1.0;
        }
    }
    dense[[0, 3, 0]] = 0.5;
    dense[[1, 0, 2]] = -0.5;
    dense[[1, 2, 3]] = 3.0;

    TridiagBatch::from_dense(dense.view(), &skip()).expect("skip mode");

    let warnings = warnings_for_size(4);
    assert_eq!(
        warnings,
        vec![
            "Ignoring 2 entries outside the tridiagonal band and 1 super-diagonal entries \
             that differ from the sub-diagonal (2 matrices of size 4)"
                .to_string()
        ]
    );
}

#[test]
fn test_clean_input_is_silent() {
    init_logger();
    let dense = array![[
        [2.0, -1.0, 0.0, 0.0, 0.0],
        [-1.0, 2.0, -1.0, 0.0, 0.0],
        [0.0, -1.0, 2.0, -1.0, 0.0],
        [0.0, 0.0, -1.0, 2.0, -1.0],
        [0.0, 0.0, 0.0, -1.0, 2.0],
    ]];

    TridiagBatch::from_dense(dense.view(), &skip()).expect("skip mode");
    // strict mode never warns, it rejects
    let mut asymmetric = dense.clone();
    asymmetric[[0, 0, 1]] = 5.0;
    assert!(TridiagBatch::from_dense(asymmetric.view(), &TridiagConfig::lower()).is_err());

    assert!(warnings_for_size(5).is_empty());
}
