use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Outcome of one conversion run.
#[derive(Serialize, Debug)]
pub struct ConvertReport {
    pub out: String,
    pub converted: Vec<String>,
    pub failed: Vec<FailedFile>,
}

impl ConvertReport {
    pub fn new(out: &Path) -> Self {
        Self {
            out: out.display().to_string(),
            converted: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// One input that could not be converted (recorded in `--keep-going` mode).
#[derive(Serialize, Debug)]
pub struct FailedFile {
    pub file: String,
    pub error: String,
}
