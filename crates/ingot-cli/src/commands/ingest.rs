//! Ingest command implementation.

use super::build_config;
use super::open_payload;
use crate::cli::IngestArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use ingot_core::ExportLayout;
use ingot_core::Ingestor;
use ingot_core::NoopProgress;
use ingot_core::ProgressSink;

pub fn execute(
    args: &IngestArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let config =
        build_config(&args.limits)?.with_structure_validation(!args.skip_structure_check);
    let media_dir = args
        .media_dir
        .clone()
        .unwrap_or_else(|| args.export_dir.join("media"));
    let layout = ExportLayout::new(args.export_dir.clone(), media_dir);
    let payload = open_payload(&args.archive)?;

    log::info!(
        "ingesting '{}' into '{}'",
        args.archive.display(),
        layout.export_root().display()
    );

    let mut sink: Box<dyn ProgressSink> = if show_progress && CliProgress::should_show() {
        Box::new(CliProgress::new())
    } else {
        Box::new(NoopProgress)
    };

    let result = Ingestor::new(config).ingest(&payload, &layout, &mut *sink);
    drop(sink);
    let report = add_archive_context(result, &args.archive)?;

    for warning in &report.relocation.warnings {
        formatter.format_warning(warning);
    }
    formatter.format_ingest_result(&report)
}
