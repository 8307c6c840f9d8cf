//! Binary to generate/update .expected.go and .expected.err fixture files
//!
//! Usage:
//!   cargo run --bin accept_expected             # Update all
//!   cargo run --bin accept_expected -- shapes   # Update only fixtures matching "shapes"

use go_getters::Pipeline;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");

    let pipeline = match Pipeline::standard() {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Failed to build pipeline: {}", e);
            std::process::exit(1);
        }
    };

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixtures)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| is_fixture(e.path()))
    {
        let path = entry.path();

        if let Some(ref f) = filter {
            if !path.to_string_lossy().contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(&pipeline, path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

fn is_fixture(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go") && !path.to_string_lossy().ends_with(".expected.go")
}

fn process_file(pipeline: &Pipeline, path: &Path) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            return;
        }
    };

    let is_error_test = path.parent().and_then(|p| p.file_name()).is_some_and(|n| n == "errors");

    match pipeline.compile(&source) {
        Ok(Some(code)) if !is_error_test => write(&path.with_extension("expected.go"), &code),
        Ok(None) if !is_error_test => {
            eprintln!("ERROR: {} has no marked declarations", path.display());
        }
        Ok(_) => {
            eprintln!("ERROR: {} is in errors/ but generated successfully", path.display());
        }
        Err(e) if is_error_test => {
            // Only the first line; the tests compare by prefix
            let message = e.to_string();
            let first = message.lines().next().unwrap_or_default();
            write(&path.with_extension("expected.err"), &format!("{}\n", first));
        }
        Err(e) => {
            eprintln!("ERROR: {} failed to generate but is not in errors/: {}", path.display(), e);
        }
    }
}

fn write(path: &Path, content: &str) {
    if let Err(e) = fs::write(path, content) {
        eprintln!("Failed to write {}: {}", path.display(), e);
    } else {
        println!("  wrote {}", path.display());
    }
}
