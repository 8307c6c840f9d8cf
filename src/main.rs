use clap::Parser;
use go_getters::{CollisionPolicy, ErrorPolicy, FileError, FormatterKind, GenerateError, Options, Pipeline, export_title};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::Level;

#[derive(Parser)]
#[command(name = "getters", version)]
#[command(about = "Generate accessor methods for Go structs marked with //go:generate getters")]
struct Cli {
    /// Directory to scan recursively
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Keep going after a file fails and report every failure at the end
    #[arg(long)]
    keep_going: bool,

    /// Uppercase the first letter with Unicode case mapping instead of ASCII only
    #[arg(long)]
    title_case: bool,

    /// Allow accessor names that collide with each other or with a field
    #[arg(long)]
    allow_collisions: bool,

    /// Template file replacing the bundled template
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Format output with an external program (e.g. gofmt) instead of the built-in formatter
    #[arg(long, value_name = "PROGRAM")]
    gofmt: Option<PathBuf>,

    /// Read one Go file from stdin and print the generated source
    #[arg(long)]
    stdin: bool,

    /// With --stdin, print the accessor model as JSON
    #[arg(long, requires = "stdin")]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let options = match options(&cli) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::new(options) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if cli.stdin {
        generate_stdin(&pipeline, cli.json)
    } else {
        generate_directory(&pipeline, &cli.dir, cli.quiet)
    }
}

fn options(cli: &Cli) -> Result<Options, String> {
    let template = match &cli.template {
        Some(path) => Some(
            fs::read_to_string(path).map_err(|e| format!("cannot read template {}: {}", path.display(), e))?,
        ),
        None => None,
    };

    let mut options = Options {
        template,
        ..Options::default()
    };
    if cli.keep_going {
        options.on_error = ErrorPolicy::ContinueOnError;
    }
    if cli.title_case {
        options.export = export_title;
    }
    if cli.allow_collisions {
        options.collisions = CollisionPolicy::Allow;
    }
    if let Some(program) = &cli.gofmt {
        options.formatter = FormatterKind::External(program.clone());
    }
    Ok(options)
}

fn generate_stdin(pipeline: &Pipeline, json_output: bool) -> ExitCode {
    let mut source = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error: failed to read stdin: {}", err);
        return ExitCode::FAILURE;
    }

    let result = if json_output {
        pipeline.model(&source).and_then(|model| match model {
            Some(model) => Ok(Some(serde_json::to_string_pretty(&model).map_err(GenerateError::from)?)),
            None => Ok(None),
        })
    } else {
        pipeline.compile(&source)
    };

    match result {
        Ok(Some(output)) => {
            print!("{}", output);
            if json_output {
                println!();
            }
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", FileError::new("<stdin>", err));
            ExitCode::FAILURE
        }
    }
}

fn generate_directory(pipeline: &Pipeline, dir: &Path, quiet: bool) -> ExitCode {
    if !dir.is_dir() {
        eprintln!("Error: {} is not a directory", dir.display());
        return ExitCode::FAILURE;
    }

    let start = Instant::now();
    let result = pipeline.run_with(dir, |path| {
        if !quiet {
            print_generated(&path.display().to_string());
        }
    });

    let is_tty = io::stderr().is_terminal();
    match result {
        Ok(summary) => {
            for failure in &summary.failures {
                eprint!("{}", failure.render(is_tty));
            }
            if !quiet {
                print_summary(summary.generated.len(), start.elapsed());
            }
            if summary.failures.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprint!("{}", err.render(is_tty));
            ExitCode::FAILURE
        }
    }
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m generated getters: {}", path);
    } else {
        eprintln!("  ✓ generated getters: {}", path);
    }
}

fn print_summary(count: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if count == 1 { "file" } else { "files" };

    if is_tty {
        eprintln!("\n\x1b[1mGenerated {} {} in {}\x1b[0m", count, files_word, time_str);
    } else {
        eprintln!("\nGenerated {} {} in {}", count, files_word, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
