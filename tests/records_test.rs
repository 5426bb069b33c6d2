// Integration tests for the records viewer derivations and CSV export

use registro::departments::apply_departments;
use registro::records::{
    cell_text, derive_fields, export_csv, field_label, search, write_export, Record, RecordBook,
    EXPORT_FILE_NAME,
};
use registro::schema::{default_config, FormConfig, SelectOption};
use std::fs;
use tempfile::tempdir;

fn config_with_departments() -> FormConfig {
    apply_departments(
        &default_config(),
        vec![
            SelectOption::new("1", "San Salvador"),
            SelectOption::new("2", "Santa Ana"),
        ],
    )
}

fn ana() -> Record {
    Record::new(
        1_700_000_000_000,
        "14/11/2023, 22:13:20",
        vec![
            ("nombres".to_string(), "Ana".to_string()),
            ("departamento".to_string(), "1".to_string()),
        ],
    )
}

#[test]
fn test_select_value_rendered_as_label() {
    let config = config_with_departments();
    assert_eq!(cell_text(&config, &ana(), "departamento"), "San Salvador");
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let records = vec![ana()];
    assert_eq!(search(&records, "ana").len(), 1);
    assert_eq!(search(&records, "ANA").len(), 1);
    assert!(search(&records, "zzz").is_empty());
    assert_eq!(search(&records, "").len(), 1);
}

#[test]
fn test_search_preserves_order() {
    let mut book = RecordBook::new();
    for name in ["Ana", "Luis", "Mariana", "Pedro"] {
        book.push(vec![("nombres".to_string(), name.to_string())]);
    }
    let found: Vec<&str> = search(book.records(), "ana")
        .iter()
        .map(|r| r.get("nombres").unwrap())
        .collect();
    assert_eq!(found, vec!["Ana", "Mariana"]);
}

#[test]
fn test_export_single_record_exact() {
    let config = default_config();
    let records = vec![Record::new(
        1,
        "t",
        vec![("nombres".to_string(), "Ana".to_string())],
    )];
    assert_eq!(
        export_csv(&config, &records).as_deref(),
        Some("\"Nombres\"\n\"Ana\"")
    );
}

#[test]
fn test_export_resolves_labels_and_blank_cells() {
    let config = config_with_departments();
    let records = vec![
        ana(),
        Record::new(
            2,
            "t",
            vec![
                ("nombres".to_string(), "Luis".to_string()),
                ("fechaIngreso".to_string(), "2024-01-01".to_string()),
            ],
        ),
    ];
    let csv = export_csv(&config, &records).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "\"Nombres\",\"Departamento\",\"Fecha Ingreso\"");
    assert_eq!(lines[1], "\"Ana\",\"San Salvador\",\"\"");
    assert_eq!(lines[2], "\"Luis\",\"\",\"2024-01-01\"");
}

#[test]
fn test_columns_and_fallback_labels() {
    let config = default_config();
    let records = vec![ana()];
    assert_eq!(derive_fields(&records), vec!["nombres", "departamento"]);
    assert_eq!(field_label(&config, "nombres"), "Nombres");
    assert_eq!(field_label(&config, "numeroEmpleado"), "Numero Empleado");
}

#[test]
fn test_write_export_creates_file() {
    let dir = tempdir().unwrap();

    let path = write_export(dir.path(), "\"Nombres\"\n\"Ana\"").expect("write failed");
    assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
    assert_eq!(fs::read_to_string(&path).unwrap(), "\"Nombres\"\n\"Ana\"");
}
