use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use gmlc_core::project::Project;
use gmlc_core::render::render;

#[derive(Parser)]
#[command(name = "gmlc", about = "GML front-end: parse scripts or whole projects")]
struct Cli {
    /// Path to a `.yyp` project manifest or a script file.
    #[arg(long, conflicts_with = "stdin")]
    path: Option<PathBuf>,

    /// Read a single script from stdin.
    #[arg(long)]
    stdin: bool,
}

fn run_project(project: &mut Project) -> Result<()> {
    project.parse();

    for (path, ast) in project.parsed_units() {
        println!("=== {path}");
        print!("{}", render(ast));
    }

    let errors = project.all_errors();
    if !errors.is_empty() {
        for (path, error) in &errors {
            eprintln!("[error] {path}: {error}");
        }
        bail!("{} error(s)", errors.len());
    }
    Ok(())
}

fn cmd_path(path: &Path) -> Result<()> {
    let mut project = if path.extension().is_some_and(|e| e == "yyp") {
        eprintln!("[project] loading {}", path.display());
        Project::load(path).with_context(|| format!("failed to load {}", path.display()))?
    } else {
        Project::single_file(path)
    };
    run_project(&mut project)
}

fn cmd_stdin() -> Result<()> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    run_project(&mut Project::from_source("stdin", &text))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.path {
        return cmd_path(path);
    }
    if cli.stdin {
        return cmd_stdin();
    }
    bail!("nothing to do: pass --path <file> or --stdin (see --help)");
}
