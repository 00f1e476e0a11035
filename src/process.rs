use std::fmt::Display;

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::Cli,
    io_utils,
    pipeline::{self, SAVE_STEP, Stage, StageReport},
};

const RULE_WIDTH: usize = 50;

/// Human-readable progress. Goes to stderr when the CSV itself is written to
/// stdout.
#[derive(Debug, Clone, Copy)]
struct Progress {
    to_stderr: bool,
}

impl Progress {
    fn line(self, message: impl Display) {
        if self.to_stderr {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }

    fn stage(self, report: &StageReport) {
        let stage = report.stage;
        if stage.opens_step() {
            self.line(format_args!(
                "\nStep {}: {}...",
                stage.progress_step(),
                stage.description()
            ));
        }
        if stage == Stage::FilterHighValueHighRating {
            self.line(format_args!(
                "Filtered from {} to {} rows",
                report.rows_before, report.rows_after
            ));
        } else if let Some(done) = stage.completion() {
            self.line(done);
        }
    }
}

pub fn execute(args: &Cli) -> Result<()> {
    let input = args.input_path();
    let output = args.output_path();
    let progress = Progress {
        to_stderr: io_utils::is_dash(&output),
    };
    progress.line("Starting data processing pipeline...");

    progress.line("\nStep 0: Loading JSON data...");
    let table = io_utils::load_json_table(input)
        .with_context(|| format!("Loading orders from {input:?}"))?;
    info!(
        "Loaded {} row(s) and {} column(s) from {:?}",
        table.row_count(),
        table.column_count(),
        input
    );
    progress.line(format_args!(
        "Loaded {} rows and {} columns",
        table.row_count(),
        table.column_count()
    ));

    let table = pipeline::run(table, |report| progress.stage(report))
        .context("Running order pipeline")?;

    progress.line(format_args!("\nStep {SAVE_STEP}: Saving to CSV..."));
    io_utils::save_table_csv(&table, &output)
        .with_context(|| format!("Saving orders to {output:?}"))?;
    info!("Wrote {} row(s) to {:?}", table.row_count(), output);
    progress.line(format_args!("Data successfully saved to {}", output.display()));

    let rule = "=".repeat(RULE_WIDTH);
    progress.line(format_args!("\n{rule}"));
    progress.line("Pipeline completed successfully!");
    progress.line(format_args!(
        "Final dataset: {} rows, {} columns",
        table.row_count(),
        table.column_count()
    ));
    progress.line(format_args!("Output file: {}", output.display()));
    progress.line(rule);
    Ok(())
}
