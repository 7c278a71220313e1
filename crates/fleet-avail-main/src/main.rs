// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use fleet_avail_core::time::{TimeDelta, TimeInterval, TimePoint};
use fleet_avail_engine::prelude::*;
use fleet_avail_model::prelude::*;
use serde::Serialize;
use std::{
    env,
    error::Error,
    fs::File,
    io::BufWriter,
    path::Path,
    process::ExitCode,
    time::Instant,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

#[derive(Debug, Clone, Serialize)]
struct MeasurementInfo {
    domain_start: i64,
    domain_end: i64,
    average: f64,
    weighted_sum: i128,
    peak: u64,
    peak_start: i64,
    peak_end: i64,
    covered_secs: i128,
    segments: usize,
    seen: usize,
    admitted: usize,
    outside_region: usize,
    skipped_source: usize,
    skipped_invalid: usize,
}

impl From<&Measurement<i64>> for MeasurementInfo {
    fn from(m: &Measurement<i64>) -> Self {
        let tally = m.tally();
        Self {
            domain_start: m.domain().start().value(),
            domain_end: m.domain().end().value(),
            average: m.average(),
            weighted_sum: m.weighted_sum(),
            peak: m.peak().count(),
            peak_start: m.peak().at().start().value(),
            peak_end: m.peak().at().end().value(),
            covered_secs: m.covered(),
            segments: m.segments(),
            seen: tally.seen(),
            admitted: tally.admitted(),
            outside_region: tally.outside_region(),
            skipped_source: tally.skipped_source(),
            skipped_invalid: tally.skipped_invalid(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct DatasetReport {
    source: String,
    records: usize,
    elapsed_ms: u128,
    measurement: MeasurementInfo,
}

#[derive(Debug, Clone, Serialize)]
struct SweepRun {
    idx: usize,
    seed: u64,
    records: usize,
    sequential_ms: u128,
    parallel_ms: u128,
    measurement: MeasurementInfo,
}

#[derive(Debug, Clone, Serialize)]
struct SweepReport {
    description: String,
    runs: Vec<SweepRun>,
}

fn interpolate_u(val0: usize, val1: usize, step: usize, steps: usize) -> usize {
    if steps <= 1 {
        return val1;
    }
    let num = (val1 as isize - val0 as isize) * step as isize;
    (val0 as isize + num / (steps as isize - 1)).max(0) as usize
}

fn write_json<S: Serialize>(path: &str, value: &S) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    Ok(())
}

fn run_dataset(path: &Path) -> Result<(), Box<dyn Error>> {
    let dataset = Dataset::from_path(path)?;
    info!(path = %path.display(), records = dataset.len(), "loaded dataset");

    let region = dataset.region();
    let t0 = Instant::now();
    let measurement = measure_fallible(
        dataset.records(),
        dataset.domain().to_range(),
        |p| region.contains(p),
        &MeasureConfig::default(),
    )?;
    let elapsed = t0.elapsed();

    let report = DatasetReport {
        source: path.display().to_string(),
        records: dataset.len(),
        elapsed_ms: elapsed.as_millis(),
        measurement: MeasurementInfo::from(&measurement),
    };
    write_json("measurement_report.json", &report)?;

    println!("{measurement}");
    println!("Wrote: measurement_report.json");
    Ok(())
}

fn run_sweep() -> Result<(), Box<dyn Error>> {
    type Tm = i64;

    // One week, as in a typical availability window.
    let domain: TimeInterval<Tm> = TimeInterval::new(TimePoint::new(0), TimePoint::new(7 * 24 * 3600));
    let region: Polygon = "POLYGON ((0.1 0.1, 0.9 0.2, 0.8 0.9, 0.3 0.7, 0.1 0.1))".parse()?;
    let config = MeasureConfig {
        coalesce: true,
        ..MeasureConfig::default()
    };

    let n_runs = 10usize;
    let min_records = 1_000usize;
    let max_records = 100_000usize;

    let mut runs: Vec<SweepRun> = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let amount = interpolate_u(min_records, max_records, i, n_runs);
        let seed: u64 = 42 + (i as u64);

        let gen_config = RecordGenConfigBuilder::<Tm>::new()
            .domain(domain)
            .amount(amount)
            .mean_active(TimeDelta::new(3 * 3600))
            .seed(seed)
            .build()?;
        let records = RecordGenerator::from(gen_config).generate();

        let t0 = Instant::now();
        let sequential = measure_with(records.iter().cloned(), domain.to_range(), |p| region.contains(p), &config)?;
        let sequential_elapsed = t0.elapsed();

        let t1 = Instant::now();
        let parallel = measure_par(&records, domain.to_range(), |p| region.contains(p), &config)?;
        let parallel_elapsed = t1.elapsed();

        if sequential != parallel {
            error!(idx = i, "parallel admission diverged from the sequential run");
        }

        runs.push(SweepRun {
            idx: i,
            seed,
            records: amount,
            sequential_ms: sequential_elapsed.as_millis(),
            parallel_ms: parallel_elapsed.as_millis(),
            measurement: MeasurementInfo::from(&sequential),
        });
    }

    let report = SweepReport {
        description: "Fleet availability sweep: 10 synthetic one-week datasets from 1k to 100k records; sequential vs parallel admission.".into(),
        runs,
    };
    write_json("bench_results.json", &report)?;

    println!();
    println!("=================================================================");
    println!("========================== Sweep Done ===========================");
    println!("=================================================================");
    println!();
    println!("Wrote: bench_results.json");
    Ok(())
}

fn main() -> ExitCode {
    enable_tracing();

    let result = match env::args_os().nth(1) {
        Some(path) => run_dataset(Path::new(&path)),
        None => run_sweep(),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
