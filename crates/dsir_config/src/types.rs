//! Configuration types deserialized from `dsir.toml`.

use dsir_common::Arithmetic;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level project configuration parsed from `dsir.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata and the AST documents to elaborate.
    pub project: ProjectMeta,
    /// Elaboration settings.
    #[serde(default)]
    pub elaborate: ElaborateConfig,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Core project metadata required in every `dsir.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// AST documents, relative to the project directory.
    ///
    /// Accepts a single string or a list of strings.
    #[serde(default, deserialize_with = "string_or_vec")]
    pub sources: Vec<String>,
}

/// Settings controlling the elaborator.
#[derive(Debug, Deserialize)]
pub struct ElaborateConfig {
    /// Overflow policy for constant folding.
    #[serde(default)]
    pub arithmetic: Arithmetic,
    /// Whether the modules of a translation unit are elaborated in parallel.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ElaborateConfig {
    fn default() -> Self {
        Self {
            arithmetic: Arithmetic::default(),
            parallel: default_parallel(),
        }
    }
}

fn default_parallel() -> bool {
    true
}

/// Settings controlling how elaborated IR is printed.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// The rendering format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Rendering format for elaborated IR and diagnostics.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// One JSON document per run.
    Json,
}

/// Deserializes either a single string or a list of strings into a `Vec<String>`.
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
