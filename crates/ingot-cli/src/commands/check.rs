//! Check command implementation.

use super::build_config;
use super::open_payload;
use crate::cli::CheckArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use ingot_core::Ingestor;

pub fn execute(args: &CheckArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = build_config(&args.limits)?;
    let payload = open_payload(&args.archive)?;

    let report = add_archive_context(Ingestor::new(config).check(&payload), &args.archive)?;

    formatter.format_check_result(&args.archive, &report)
}
