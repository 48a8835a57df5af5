//! Shared pipeline helpers for CLI commands.
//!
//! Resolves the effective settings from `dsir.toml` and the command line,
//! loads and parses AST documents, elaborates them and renders diagnostics.

use std::path::PathBuf;

use dsir_ast::{parse_document, AstError, SourceDocument};
use dsir_common::{Arithmetic, Interner};
use dsir_config::{load_config, load_config_from_str, OutputFormat, ProjectConfig, CONFIG_FILE_NAME};
use dsir_diagnostics::{
    Category, Diagnostic, DiagnosticCode, DiagnosticRenderer, DiagnosticSink, JsonRenderer,
    TerminalRenderer,
};
use dsir_elaborate::{elaborate_unit, ElabOptions, UnitEntry};
use dsir_ir::Design;
use dsir_source::{FileId, Location, NodePath, SourceDb};
use tracing::{debug, info};

use crate::GlobalArgs;

/// Malformed AST document.
pub const E001: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);

/// The effective settings of one run.
#[derive(Debug)]
pub struct Settings {
    /// AST documents to load, in order.
    pub sources: Vec<PathBuf>,
    /// Overflow policy for constant folding.
    pub arithmetic: Arithmetic,
    /// Elaborate unit modules on the rayon pool.
    pub parallel: bool,
    /// Output format.
    pub format: OutputFormat,
}

/// Loads the project configuration, if there is one.
///
/// `--config` may name the file itself or its directory. Without it, a
/// `dsir.toml` in the current directory is used when present. Returns the
/// project directory alongside the config.
pub fn find_config(
    global: &GlobalArgs,
) -> Result<Option<(PathBuf, ProjectConfig)>, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            let dir = p
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            let content = std::fs::read_to_string(&p)?;
            return Ok(Some((dir, load_config_from_str(&content)?)));
        }
        return Ok(Some((p.clone(), load_config(&p)?)));
    }
    let cwd = std::env::current_dir()?;
    if cwd.join(CONFIG_FILE_NAME).is_file() {
        let config = load_config(&cwd)?;
        return Ok(Some((cwd, config)));
    }
    Ok(None)
}

/// Combines explicit file arguments with the project configuration.
///
/// Files named on the command line replace the config's `sources`, which
/// are otherwise resolved relative to the project directory.
pub fn resolve_settings(
    files: &[String],
    config: Option<(PathBuf, ProjectConfig)>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings {
        sources: files.iter().map(PathBuf::from).collect(),
        arithmetic: Arithmetic::default(),
        parallel: true,
        format: OutputFormat::default(),
    };
    if let Some((dir, config)) = config {
        if settings.sources.is_empty() {
            settings.sources = config.project.sources.iter().map(|s| dir.join(s)).collect();
        }
        settings.arithmetic = config.elaborate.arithmetic;
        settings.parallel = config.elaborate.parallel;
        settings.format = config.output.format;
    }
    if settings.sources.is_empty() {
        return Err(format!(
            "no AST documents given and no `project.sources` in {CONFIG_FILE_NAME}"
        )
        .into());
    }
    Ok(settings)
}

/// The AST documents of one run.
pub struct LoadedDocuments {
    /// Every document read, including ones that failed to parse.
    pub source_db: SourceDb,
    /// Successfully parsed documents.
    pub documents: Vec<(FileId, SourceDocument)>,
}

impl LoadedDocuments {
    /// Returns one [`UnitEntry`] per module, in document then declaration
    /// order.
    ///
    /// A module document's origin is its root; unit members are located at
    /// `modules[i]`.
    pub fn entries(&self) -> Vec<UnitEntry<'_>> {
        let mut entries = Vec::new();
        for (file, doc) in &self.documents {
            match doc {
                SourceDocument::Module(decl) => entries.push(UnitEntry {
                    decl,
                    origin: Location::new(*file, NodePath::root()),
                }),
                SourceDocument::Unit(unit) => {
                    let modules = NodePath::root().field("modules");
                    entries.extend(unit.modules.iter().enumerate().map(|(i, decl)| UnitEntry {
                        decl,
                        origin: Location::new(*file, modules.index(i)),
                    }));
                }
            }
        }
        entries
    }
}

/// Reads and parses every document in `paths`.
///
/// Unreadable files abort the run. Malformed documents are reported to
/// `sink` and skipped.
pub fn load_documents(
    paths: &[PathBuf],
    sink: &DiagnosticSink,
) -> Result<LoadedDocuments, Box<dyn std::error::Error>> {
    let mut source_db = SourceDb::new();
    let mut documents = Vec::new();
    for path in paths {
        let file = source_db
            .load_file(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        match parse_document(&source_db.get_file(file).content) {
            Ok(doc) => {
                debug!(path = %path.display(), modules = doc.modules().len(), "parsed document");
                documents.push((file, doc));
            }
            Err(err) => sink.emit(malformed_document(file, &err)),
        }
    }
    Ok(LoadedDocuments {
        source_db,
        documents,
    })
}

fn malformed_document(file: FileId, err: &AstError) -> Diagnostic {
    let AstError::Json {
        line,
        column,
        message,
    } = err;
    let diag = Diagnostic::error(E001, format!("malformed AST document: {message}"))
        .at(Location::new(file, NodePath::root()));
    if *line > 0 {
        diag.with_note(format!("at line {line}, column {column}"))
    } else {
        diag
    }
}

/// Elaborates every module of the loaded documents into one design.
pub fn elaborate_documents(
    loaded: &LoadedDocuments,
    settings: &Settings,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Design {
    let options = ElabOptions {
        arithmetic: settings.arithmetic,
        parallel: settings.parallel,
    };
    let entries = loaded.entries();
    let design = elaborate_unit(&entries, interner, &options, sink);
    info!(
        documents = loaded.documents.len(),
        declared = entries.len(),
        elaborated = design.module_count(),
        "elaboration finished"
    );
    design
}

/// Prints every diagnostic in `diags` to stderr.
pub fn report_diagnostics(
    diags: &[Diagnostic],
    source_db: &SourceDb,
    format: OutputFormat,
    global: &GlobalArgs,
) {
    let renderer: Box<dyn DiagnosticRenderer> = match format {
        OutputFormat::Text => Box::new(TerminalRenderer::new(global.color, 100)),
        OutputFormat::Json => Box::new(JsonRenderer),
    };
    for diag in diags {
        eprintln!("{}", renderer.render(diag, source_db));
    }
}

/// Prints the run summary unless `--quiet`.
pub fn print_summary(global: &GlobalArgs, modules: usize, errors: usize) {
    if global.quiet {
        return;
    }
    if errors > 0 {
        eprintln!("{modules} module(s) elaborated, {errors} error(s)");
    } else {
        eprintln!("{modules} module(s) elaborated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn global_with(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config,
        }
    }

    const CONFIG: &str = r#"
[project]
name = "adders"
sources = ["ast/and.json", "ast/unit.json"]

[elaborate]
arithmetic = "checked"
parallel = false

[output]
format = "json"
"#;

    #[test]
    fn config_sources_resolved_against_project_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), CONFIG).unwrap();
        let global = global_with(Some(tmp.path().to_string_lossy().into_owned()));
        let config = find_config(&global).unwrap();
        let settings = resolve_settings(&[], config).unwrap();
        assert_eq!(
            settings.sources,
            vec![tmp.path().join("ast/and.json"), tmp.path().join("ast/unit.json")]
        );
        assert_eq!(settings.arithmetic, Arithmetic::Checked);
        assert!(!settings.parallel);
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn config_file_path_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, CONFIG).unwrap();
        let global = global_with(Some(path.to_string_lossy().into_owned()));
        let (dir, config) = find_config(&global).unwrap().unwrap();
        assert_eq!(dir, tmp.path());
        assert_eq!(config.project.name, "adders");
    }

    #[test]
    fn invalid_config_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "[project]\nname = \"\"\n").unwrap();
        let global = global_with(Some(tmp.path().to_string_lossy().into_owned()));
        assert!(find_config(&global).is_err());
    }

    #[test]
    fn explicit_files_replace_config_sources() {
        let config = load_config_from_str(CONFIG).unwrap();
        let settings =
            resolve_settings(&["top.json".to_string()], Some((PathBuf::from("proj"), config)))
                .unwrap();
        assert_eq!(settings.sources, vec![PathBuf::from("top.json")]);
        assert_eq!(settings.arithmetic, Arithmetic::Checked);
    }

    #[test]
    fn defaults_without_config() {
        let settings = resolve_settings(&["a.json".to_string()], None).unwrap();
        assert_eq!(settings.arithmetic, Arithmetic::Wrapping);
        assert!(settings.parallel);
        assert_eq!(settings.format, OutputFormat::Text);
    }

    #[test]
    fn no_sources_is_an_error() {
        assert!(resolve_settings(&[], None).is_err());
    }

    #[test]
    fn load_and_elaborate_documents() {
        let tmp = tempfile::tempdir().unwrap();
        let single = tmp.path().join("and.json");
        let unit = tmp.path().join("unit.json");
        let broken = tmp.path().join("broken.json");
        fs::write(
            &single,
            r#"{"name": "and2", "params": [], "body": [
                {"Wire": {"name": "a", "io": "Input", "width": null, "init": null}},
                {"Wire": {"name": "y", "io": "Output", "width": null, "init": null}}
            ]}"#,
        )
        .unwrap();
        fs::write(
            &unit,
            r#"{"modules": [
                {"name": "leaf", "params": [], "body": []},
                {"name": "bad", "params": [], "body": [
                    {"Wire": {"name": "z", "io": "Tristate", "width": null, "init": null}}
                ]}
            ]}"#,
        )
        .unwrap();
        fs::write(&broken, "{ not json").unwrap();

        let sink = DiagnosticSink::new();
        let loaded = load_documents(&[single, unit, broken], &sink).unwrap();
        assert_eq!(loaded.source_db.len(), 3);
        assert_eq!(loaded.documents.len(), 2);

        let parse_errors = sink.take_all();
        assert_eq!(parse_errors.len(), 1);
        assert_eq!(parse_errors[0].code, E001);
        assert!(!parse_errors[0].notes.is_empty());

        let entries = loaded.entries();
        let origins: Vec<String> = entries.iter().map(|e| e.origin.path.to_string()).collect();
        assert_eq!(origins, vec!["<root>", "modules[0]", "modules[1]"]);

        let settings = resolve_settings(&["unused".to_string()], None).unwrap();
        let names = Interner::new();
        let design = elaborate_documents(&loaded, &settings, &names, &sink);
        assert_eq!(design.module_count(), 2);

        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        let loc = diags[0].location.as_ref().unwrap();
        let resolved = loaded.source_db.resolve(loc).unwrap();
        assert_eq!(
            resolved.file_path.strip_prefix(tmp.path()).unwrap(),
            Path::new("unit.json")
        );
        assert_eq!(resolved.node.to_string(), "modules[1].body[0].Wire.io");
    }

    #[test]
    fn missing_file_aborts() {
        let sink = DiagnosticSink::new();
        let res = load_documents(&[PathBuf::from("/nonexistent/dsir/doc.json")], &sink);
        assert!(res.is_err());
    }
}
