//! Serialization of statement documents.
//!
//! A document is written in one of three forms:
//!
//! - **JSON** via [`to_json()`] / [`to_json_pretty()`] - the persisted form, loadable again
//! - **YAML** via [`to_yaml()`] - the persisted form, loadable again
//! - **Mapper XML** via [`to_mapper_xml()`] - the statements rendered as dynamic-SQL
//!   elements under a `<mapper>` root, for inspection or hand-copying
//!
//! # Examples
//!
//! ```
//! use mapgen::output::{to_json, to_mapper_xml};
//! use mapgen::translator::StatementDocument;
//!
//! let document = StatementDocument::new("com.example.PersonMapper");
//! assert_eq!(
//!     to_json(&document).unwrap(),
//!     r#"{"namespace":"com.example.PersonMapper","statements":[]}"#
//! );
//! assert!(to_mapper_xml(&document).contains("<mapper namespace=\"com.example.PersonMapper\">"));
//! ```

use std::str::FromStr;

use thiserror::Error;

use crate::translator::{StatementDocument, statement::escape_attr};

const GENERATED_MARKER: &str = "<!-- auto mapper generate -->";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Output form of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Xml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "xml" => Ok(OutputFormat::Xml),
            other => Err(format!("unknown output format `{}` (expected json, yaml or xml)", other)),
        }
    }
}

/// Compact JSON, one line.
pub fn to_json(document: &StatementDocument) -> Result<String, OutputError> {
    Ok(serde_json::to_string(document)?)
}

/// JSON with 2-space indentation.
pub fn to_json_pretty(document: &StatementDocument) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub fn to_yaml(document: &StatementDocument) -> Result<String, OutputError> {
    Ok(serde_yaml::to_string(document)?)
}

/// Statements as mapper elements, generated ones preceded by a marker comment.
pub fn to_mapper_xml(document: &StatementDocument) -> String {
    let mut out = format!("<mapper namespace=\"{}\">\n", escape_attr(&document.namespace));
    for statement in &document.statements {
        out.push('\n');
        if statement.generated {
            out.push_str("    ");
            out.push_str(GENERATED_MARKER);
            out.push('\n');
        }
        out.push_str("    ");
        out.push_str(&statement.render());
        out.push('\n');
    }
    out.push_str("</mapper>\n");
    out
}

/// Writes `document` in `format`; `pretty` only affects JSON.
pub fn render(
    document: &StatementDocument,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json if pretty => to_json_pretty(document),
        OutputFormat::Json => to_json(document),
        OutputFormat::Yaml => to_yaml(document),
        OutputFormat::Xml => Ok(to_mapper_xml(document)),
    }
}
