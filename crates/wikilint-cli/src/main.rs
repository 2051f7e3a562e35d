use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use wikilint_config::Config;
use wikilint_engine::{RopeModel, Severity, StructuralLinter, tokenize};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut show_tokens = false;
    let mut file: Option<PathBuf> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--tokens" => show_tokens = true,
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => {
                eprintln!("Usage: {} <file> [--tokens]", args[0]);
                process::exit(1);
            }
        }
    }

    let Some(file) = file else {
        eprintln!("Usage: {} <file> [--tokens]", args[0]);
        process::exit(1);
    };

    match run(&file, show_tokens) {
        Ok(error_count) => {
            if error_count > 0 {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

/// Analyzes one file, printing tokens and diagnostics. Returns the number of
/// Error-severity diagnostics.
fn run(file: &Path, show_tokens: bool) -> Result<usize> {
    let config = Config::load()
        .context("failed to load configuration")?
        .unwrap_or_default();

    let title = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let language = config.language_map.resolve(&title);

    let model = RopeModel::from_path(file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;

    if show_tokens {
        println!("document language: {language}");
        let text = model.text();
        for token in tokenize(&text) {
            let slice = &text[token.span.start..token.span.end];
            println!(
                "{:>5}..{:<5} {:?} {:?}",
                token.span.start, token.span.end, token.class, slice
            );
        }
    }

    let diagnostics = StructuralLinter::new(&model).validate();
    let mut error_count = 0;
    for d in &diagnostics {
        let severity = match d.severity {
            Severity::Error => {
                error_count += 1;
                "error"
            }
            Severity::Warning => "warning"
        };
        println!(
            "{}:{}:{}: {severity} {}: {}",
            file.display(),
            d.start_line,
            d.start_column,
            d.code,
            d.message
        );
    }
    if diagnostics.is_empty() {
        eprintln!("{}: no problems found", file.display());
    }

    Ok(error_count)
}
