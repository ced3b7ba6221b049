//! Unit tests for table input and output

pub mod writer_tests;

use std::fs;
use std::path::{Path, PathBuf};

/// Header of a Madrid export with `H01..H24` / `V01..V24` columns
pub fn madrid_header() -> Vec<String> {
    let mut header: Vec<String> = ["PROVINCIA", "MUNICIPIO", "ESTACION", "MAGNITUD", "ANO", "MES", "DIA"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for hour in 1..=24 {
        header.push(format!("H{:02}", hour));
        header.push(format!("V{:02}", hour));
    }
    header
}

/// Madrid line whose hour h carries the value `h * scale` with the given flag
pub fn madrid_line(station: &str, magnitude: &str, day: u32, scale: f64, flag: &str) -> String {
    let mut fields = vec![
        "28".to_string(),
        "79".to_string(),
        station.to_string(),
        magnitude.to_string(),
        "2023".to_string(),
        "3".to_string(),
        day.to_string(),
    ];
    for hour in 1..=24 {
        fields.push(format!("{:.2}", hour as f64 * scale));
        fields.push(flag.to_string());
    }
    fields.join(";")
}

pub fn write_file(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}
