use std::path::{Path, PathBuf};

use clap::Parser;

pub const DEFAULT_INPUT: &str = "orders_simple.json";
pub const DEFAULT_RUN_ID: &str = "123456789";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Clean, enrich and filter order records from JSON into CSV",
    long_about = None
)]
pub struct Cli {
    /// JSON file holding the raw order records ('-' reads stdin)
    #[arg(short = 'i', long = "input", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
    /// Run identifier embedded in the output file name
    #[arg(long = "id", default_value = DEFAULT_RUN_ID)]
    pub run_id: String,
    /// Directory receiving clean_orders_<id>.csv
    #[arg(short = 'd', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
    /// Explicit output CSV path, overriding the derived name ('-' writes stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.output_dir.join(output_file_name(&self.run_id)),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input
    }
}

pub fn output_file_name(run_id: &str) -> String {
    format!("clean_orders_{run_id}.csv")
}
