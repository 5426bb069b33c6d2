//! Command-line configuration

use crate::departments::DEFAULT_DEPARTMENTS_URL;
use crate::errors::RegistroError;
use crate::schema::{default_config, FormConfig};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "registro")]
#[command(version)]
#[command(about = "Employee registration form with records viewer and schema editor", long_about = None)]
pub struct Cli {
    /// Endpoint returning the department list
    #[arg(long, env = "REGISTRO_DEPARTMENTS_URL", default_value = DEFAULT_DEPARTMENTS_URL)]
    pub departments_url: String,

    /// Skip the department lookup entirely
    #[arg(long)]
    pub no_fetch: bool,

    /// Start from this schema (YAML or JSON) instead of the built-in one
    #[arg(long, env = "REGISTRO_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Directory where empleados.csv is written
    #[arg(long, env = "REGISTRO_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Log file; the terminal itself is taken by the UI
    #[arg(long, env = "REGISTRO_LOG_FILE", default_value = "registro.log")]
    pub log_file: PathBuf,
}

impl Cli {
    /// The schema to start with
    pub fn load_schema(&self) -> Result<FormConfig, RegistroError> {
        match &self.schema {
            Some(path) => load_schema_file(path),
            None => Ok(default_config()),
        }
    }
}

/// Parse a schema file; `.json` is read as JSON, anything else as YAML
pub fn load_schema_file(path: &Path) -> Result<FormConfig, RegistroError> {
    let content = fs::read_to_string(path).map_err(|source| RegistroError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str::<FormConfig>(&content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<FormConfig>(&content).map_err(|e| e.to_string())
    };

    let mut config = parsed.map_err(|message| RegistroError::SchemaParse {
        path: path.to_path_buf(),
        message,
    })?;

    if let Some(id) = config.duplicate_id() {
        return Err(RegistroError::SchemaParse {
            path: path.to_path_buf(),
            message: format!("duplicate field id '{}'", id),
        });
    }
    for field in &mut config.fields {
        field.sync_validations();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["registro"]);
        assert_eq!(cli.export_dir, PathBuf::from("."));
        assert!(!cli.no_fetch);
        assert!(cli.schema.is_none());
    }

    fn write_schema(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_yaml_schema_file() {
        let file = write_schema(
            ".yaml",
            "fields:\n  - id: telefono\n    label: Teléfono\n    type: tel\n    required: true\n",
        );
        let config = load_schema_file(file.path()).unwrap();
        assert_eq!(config.fields[0].field_type, FieldType::Tel);
        assert!(config.fields[0].required);
    }

    #[test]
    fn test_json_schema_file() {
        let file = write_schema(
            ".json",
            r#"{"fields":[{"id":"notas","label":"Notas","type":"textarea"}]}"#,
        );
        let config = load_schema_file(file.path()).unwrap();
        assert_eq!(config.fields[0].field_type, FieldType::Textarea);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let file = write_schema(
            ".yaml",
            "fields:\n  - id: nombres\n    label: Nombres\n    type: text\n  - id: nombres\n    label: Otro\n    type: tel\n",
        );
        match load_schema_file(file.path()) {
            Err(RegistroError::SchemaParse { message, .. }) => {
                assert!(message.contains("nombres"), "unexpected message: {}", message)
            }
            other => panic!("expected SchemaParse, got {:?}", other),
        }
    }

    #[test]
    fn test_loaded_validations_follow_flags() {
        let file = write_schema(
            ".yaml",
            "fields:\n  - id: codigo\n    label: Código\n    type: text\n    required: true\n    minLength: 4\n  - id: notas\n    label: Notas\n    type: textarea\n    minLength: 10\n",
        );
        let config = load_schema_file(file.path()).unwrap();

        let codigo = config.field("codigo").unwrap();
        assert!(codigo.validations.required);
        assert_eq!(codigo.validations.min_length, Some(4));

        let notas = config.field("notas").unwrap();
        assert_eq!(notas.min_length, Some(10));
        assert!(!notas.validations.required);
        assert_eq!(notas.validations.min_length, None);
    }

    #[test]
    fn test_missing_schema_file_is_io_error() {
        let err = load_schema_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, RegistroError::Io { .. }));
    }
}
