//! The `dsir check` command.

use dsir_common::Interner;
use dsir_diagnostics::DiagnosticSink;
use dsir_elaborate::verify_design;
use tracing::debug;

use crate::pipeline;
use crate::{CheckArgs, GlobalArgs};

/// Runs `dsir check`, returning the process exit code.
///
/// Elaborates every module and verifies the expression DAG of each one.
/// Only diagnostics and the summary are printed.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::find_config(global)?;
    let mut settings = pipeline::resolve_settings(&args.files, config)?;
    if let Some(format) = args.format {
        settings.format = format.into();
    }

    let sink = DiagnosticSink::new();
    let loaded = pipeline::load_documents(&settings.sources, &sink)?;
    let interner = Interner::new();
    let design = pipeline::elaborate_documents(&loaded, &settings, &interner, &sink);
    let failed = verify_design(&design, &interner, &sink);
    debug!(failed, "verification finished");

    let diags = sink.take_all();
    pipeline::report_diagnostics(&diags, &loaded.source_db, settings.format, global);
    let errors = diags.iter().filter(|d| d.severity.is_error()).count();
    pipeline::print_summary(global, design.module_count() - failed, errors);

    Ok(if errors > 0 { 1 } else { 0 })
}
