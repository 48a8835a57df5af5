//! Translation-unit elaboration.

use crate::errors::{error_verification, ElabError, ElabErrorKind};
use crate::{elaborate_in, ElabOptions};
use dsir_ast::ModuleDecl;
use dsir_common::Interner;
use dsir_diagnostics::DiagnosticSink;
use dsir_ir::{verify_module, Design, Module};
use dsir_source::Location;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A module declaration together with where it was read from.
#[derive(Clone, Debug)]
pub struct UnitEntry<'a> {
    /// The declaration.
    pub decl: &'a ModuleDecl,
    /// The declaration's document and node path.
    pub origin: Location,
}

/// Elaborates every module of a translation unit into a [`Design`].
///
/// Modules are independent, so with `options.parallel` they are elaborated
/// on the rayon pool. Results are collected in declaration order either way,
/// so the design and the diagnostics are the same as for a sequential run.
///
/// A module whose name was already declared earlier in `entries` is
/// reported as a duplicate and skipped. A module that fails to elaborate is
/// reported to `sink` and left out of the design.
pub fn elaborate_unit(
    entries: &[UnitEntry<'_>],
    interner: &Interner,
    options: &ElabOptions,
    sink: &DiagnosticSink,
) -> Design {
    let mut seen = HashSet::new();
    let duplicate: Vec<bool> = entries
        .iter()
        .map(|e| !seen.insert(e.decl.name.as_str()))
        .collect();

    let run = |(entry, dup): (&UnitEntry<'_>, &bool)| -> Result<Module, ElabError> {
        if *dup {
            return Err(ElabError::new(
                ElabErrorKind::DuplicateModule(entry.decl.name.clone()),
                entry.origin.clone(),
            ));
        }
        elaborate_in(entry.decl, interner, options, entry.origin.clone())
    };

    let results: Vec<Result<Module, ElabError>> = if options.parallel {
        debug!(modules = entries.len(), "elaborating unit in parallel");
        entries.par_iter().zip(duplicate.par_iter()).map(run).collect()
    } else {
        entries.iter().zip(duplicate.iter()).map(run).collect()
    };

    let mut design = Design::new();
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(module) => {
                if let Err(err) = design.insert(module) {
                    sink.emit(ElabError::from_ir(err, entry.origin.clone()).to_diagnostic());
                }
            }
            Err(err) => {
                warn!(module = %entry.decl.name, error = %err, "module failed to elaborate");
                sink.emit(err.to_diagnostic());
            }
        }
    }
    design
}

/// Verifies every module of `design`, reporting failures to `sink`.
///
/// Returns the number of modules that failed.
pub fn verify_design(design: &Design, interner: &Interner, sink: &DiagnosticSink) -> usize {
    let mut failed = 0;
    for (id, module) in design.iter() {
        if let Err(err) = verify_module(module) {
            let name = interner.resolve(module.name);
            warn!(module = name, %id, error = %err, "verification failed");
            sink.emit(error_verification(name, &err));
            failed += 1;
        }
    }
    failed
}
