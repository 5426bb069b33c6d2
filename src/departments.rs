//! One-time department lookup
//!
//! The department list comes from a remote JSON endpoint returning
//! `[{ "id": 1, "name": "Ahuachapán" }, ...]`. It is fetched once at
//! startup; on failure the select simply keeps no options.

use crate::errors::RegistroError;
use crate::schema::{FormConfig, SelectOption, DEPARTMENT_FIELD_ID};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tokio::sync::oneshot;
use tracing::{error, info};

pub const DEFAULT_DEPARTMENTS_URL: &str =
    "https://my-json-server.typicode.com/joseolivares/elsalvador_states/deptos";

/// Ids arrive as numbers from the public endpoint but strings are accepted too
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DepartmentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartmentId::Number(n) => write!(f, "{}", n),
            DepartmentId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

impl From<Department> for SelectOption {
    fn from(dept: Department) -> Self {
        SelectOption::new(dept.id.to_string(), dept.name)
    }
}

/// Parse a department payload into select options
pub fn parse_departments(body: &str) -> Result<Vec<SelectOption>, serde_json::Error> {
    let departments: Vec<Department> = serde_json::from_str(body)?;
    Ok(departments.into_iter().map(SelectOption::from).collect())
}

/// GET the department list
pub async fn fetch_departments(client: &Client, url: &str) -> Result<Vec<SelectOption>, RegistroError> {
    let fetch_err = |message: String| RegistroError::Fetch {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    if !response.status().is_success() {
        return Err(fetch_err(format!("HTTP {}", response.status())));
    }
    let body = response.text().await.map_err(|e| fetch_err(e.to_string()))?;
    parse_departments(&body).map_err(|e| fetch_err(e.to_string()))
}

/// Install fetched departments as the options of the department field
pub fn apply_departments(config: &FormConfig, options: Vec<SelectOption>) -> FormConfig {
    config.with_options_for(DEPARTMENT_FIELD_ID, options)
}

/// Fetch on the runtime and deliver the outcome through a oneshot channel.
///
/// Failures are logged here; the receiver only ever sees a list of options
/// (empty on failure).
pub fn spawn_fetch(runtime: &tokio::runtime::Runtime, url: String) -> oneshot::Receiver<Vec<SelectOption>> {
    let (tx, rx) = oneshot::channel();
    runtime.spawn(async move {
        let client = Client::new();
        let options = match fetch_departments(&client, &url).await {
            Ok(options) => {
                info!(count = options.len(), "loaded departments");
                options
            }
            Err(e) => {
                error!("Error fetching departments: {}", e);
                Vec::new()
            }
        };
        // the UI may already have quit
        let _ = tx.send(options);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::default_config;

    #[test]
    fn test_parse_numeric_and_string_ids() {
        let body = r#"[{"id": 1, "name": "Ahuachapán"}, {"id": "2", "name": "Santa Ana"}]"#;
        let options = parse_departments(body).unwrap();
        assert_eq!(
            options,
            vec![
                SelectOption::new("1", "Ahuachapán"),
                SelectOption::new("2", "Santa Ana"),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_departments(r#"{"error": "nope"}"#).is_err());
    }

    #[test]
    fn test_apply_departments_replaces_options() {
        let config = default_config();
        let updated = apply_departments(&config, vec![SelectOption::new("6", "San Salvador")]);
        let field = updated.field(DEPARTMENT_FIELD_ID).unwrap();
        assert_eq!(field.option_label("6"), Some("San Salvador"));
    }
}
