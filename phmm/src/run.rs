use std::io::Write;

use crate::args::Cli;
use crate::extension_traits::PathExt;

use anyhow::{Context, Result};
use colored::Colorize;
use libphmm::align::structs::ViterbiPath;
use libphmm::align::{viterbi_parallel, BatchConfigBuilder};
use libphmm::classify::{classify, Classification};
use libphmm::diagnostics::LogDiagnostics;
use libphmm::output::{write_tabular_output, Field};
use libphmm::structs::{Profile, Sequence};
use serde::Serialize;

#[derive(Serialize)]
struct JsonResult<'a> {
    #[serde(flatten)]
    path: &'a ViterbiPath,
    label: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    model: &'a str,
    threshold: f64,
    results: Vec<JsonResult<'a>>,
}

/// Trains a profile, decodes the test sequences and writes the results.
pub fn run(args: &Cli) -> Result<Classification> {
    let model_name = args
        .train_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "phmm".to_string());

    let training = Sequence::from_fasta(&args.train_path).context(format!(
        "failed to read training alignment: {}",
        args.train_path.to_string_lossy()
    ))?;

    let targets = Sequence::from_fasta(&args.test_path).context(format!(
        "failed to read test sequences: {}",
        args.test_path.to_string_lossy()
    ))?;

    log::info!(
        "read {} training sequences and {} test sequences",
        training.len(),
        targets.len()
    );

    let config = args.model_args.profile_config(&model_name)?;
    let profile = Profile::from_alignment(&training, &config, &LogDiagnostics)?;

    let mut batch_builder = BatchConfigBuilder::default();
    if let Some(num_threads) = args.common_args.num_threads {
        batch_builder.worker_count(num_threads);
    }
    let batch_config = batch_builder.build()?;

    let paths = viterbi_parallel(&profile, &targets, &batch_config, &LogDiagnostics)?;
    let classification = classify(&paths)?;

    write_results(args, &profile, &paths, &classification)?;

    eprintln!(
        "{} {:.4}",
        "classification threshold:".bold(),
        classification.threshold
    );

    Ok(classification)
}

fn write_results(
    args: &Cli,
    profile: &Profile,
    paths: &[ViterbiPath],
    classification: &Classification,
) -> Result<()> {
    let allow_overwrite = args.common_args.allow_overwrite;

    let mut tbl_out: Box<dyn Write> = match &args.output_args.tbl_results_path {
        Some(path) => Box::new(path.open(allow_overwrite)?),
        None => Box::new(std::io::stdout().lock()),
    };
    write_tabular_output(paths, classification, &Field::all(), &mut tbl_out)?;
    tbl_out.flush()?;

    if let Some(path) = &args.output_args.json_results_path {
        let output = JsonOutput {
            model: &profile.name,
            threshold: classification.threshold,
            results: paths
                .iter()
                .zip(&classification.labels)
                .map(|(path, &label)| JsonResult { path, label })
                .collect(),
        };

        let mut json_out = path.open(allow_overwrite)?;
        serde_json::to_writer_pretty(&mut json_out, &output)
            .context("failed to write JSON output")?;
        writeln!(json_out)?;
        json_out.flush()?;
    }

    Ok(())
}
