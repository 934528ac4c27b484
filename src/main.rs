mod analysis;
mod args;

use clap::Parser;
use log::{debug, LevelFilter};

use crate::analysis::{report_error, run_analysis, RunSettings};
use crate::args::Args;

fn settings_from_args(args: &Args) -> RunSettings {
    RunSettings {
        config: args.config.clone(),
        input: args.input.clone(),
        input_type: args.input_type.clone(),
        weights: args.weights.clone(),
        directions: args.directions.clone(),
        excel_worksheet_name: args.excel_worksheet_name.clone(),
        out: args.out.clone(),
        reference: args.reference.clone(),
    }
}

fn main() {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    debug!("args: {:?}", args);

    let settings = settings_from_args(&args);
    if let Err(e) = run_analysis(&settings) {
        report_error(&e);
        std::process::exit(1);
    }
}
