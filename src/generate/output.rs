use crate::error::GenerateError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix inserted between a file's stem and its extension
pub const OUTPUT_SUFFIX: &str = "_getters";

/// `user.go` -> `user_getters.go`, next to the input file
pub fn output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.file_stem().unwrap_or_default());
    name.push(OUTPUT_SUFFIX);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

/// Write generated source, replacing any previous output
pub fn write_output(path: &Path, code: &str) -> Result<(), GenerateError> {
    fs::write(path, code).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}
