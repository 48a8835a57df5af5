//! The `dsir elaborate` command.

use dsir_common::Interner;
use dsir_config::OutputFormat;
use dsir_diagnostics::DiagnosticSink;
use dsir_ir::{render_module, Design, DesignDump};

use crate::pipeline::{self, Settings};
use crate::{ElaborateArgs, GlobalArgs};

/// Runs `dsir elaborate`, returning the process exit code.
pub fn run(args: &ElaborateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::find_config(global)?;
    let mut settings = pipeline::resolve_settings(&args.files, config)?;
    apply_overrides(&mut settings, args);

    let sink = DiagnosticSink::new();
    let loaded = pipeline::load_documents(&settings.sources, &sink)?;
    let interner = Interner::new();
    let design = pipeline::elaborate_documents(&loaded, &settings, &interner, &sink);

    let rendered = render_design(&design, &interner, settings.format)?;
    if !rendered.is_empty() {
        println!("{}", rendered.trim_end());
    }

    let diags = sink.take_all();
    pipeline::report_diagnostics(&diags, &loaded.source_db, settings.format, global);
    let errors = diags.iter().filter(|d| d.severity.is_error()).count();
    pipeline::print_summary(global, design.module_count(), errors);

    Ok(if errors > 0 { 1 } else { 0 })
}

fn apply_overrides(settings: &mut Settings, args: &ElaborateArgs) {
    if let Some(format) = args.format {
        settings.format = format.into();
    }
    if let Some(arithmetic) = args.arithmetic {
        settings.arithmetic = arithmetic.into();
    }
    if args.sequential {
        settings.parallel = false;
    }
}

/// Renders every module of `design` in the requested format.
pub fn render_design(
    design: &Design,
    interner: &Interner,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(design
            .iter()
            .map(|(_, module)| render_module(module, interner))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => serde_json::to_string_pretty(&DesignDump::new(design, interner)),
    }
}
