use std::io::{self, IsTerminal, Read, Write};

use anyhow::{Result, anyhow};
use clap::Parser;
use magika::cli::Cli;
use magika::config::Config;
use magika::constants::MODEL_DIR_ENV;
use magika::content::ContentTypeTable;
use magika::io::paths::{self, Input};
use magika::ui::{OutputFormat, RenderOptions, render_all};
use magika::{Magika, MagikaResult};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let inputs = paths::expand_paths(cli.paths.clone())?;
    let inputs = paths::collect_inputs(inputs, cli.recursive);
    let root = std::env::current_dir()?;
    let inputs = paths::apply_excludes(inputs, &cli.exclude, &dunce::canonicalize(&root)?)?;

    let table = match &cli.content_types {
        Some(path) => ContentTypeTable::from_path(path)?,
        None => ContentTypeTable::builtin()?,
    };
    let magika = load(&cli, config, table)?;

    let results = identify_inputs(&magika, &inputs)?;

    let format = if cli.json {
        OutputFormat::Json
    } else if cli.jsonl {
        OutputFormat::JsonLines
    } else if cli.label {
        OutputFormat::Label
    } else {
        OutputFormat::Text
    };
    let json = matches!(format, OutputFormat::Json | OutputFormat::JsonLines);
    let colors = !json && (cli.colors || (!cli.no_colors && io::stdout().is_terminal()));
    let rendered = render_all(
        &results,
        RenderOptions {
            format,
            output_score: cli.output_score,
            colors,
        },
    )?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(feature = "onnx")]
fn load(
    cli: &Cli,
    config: Config,
    table: ContentTypeTable,
) -> Result<Magika> {
    use anyhow::Context;

    let model_dir = cli.model_dir.as_deref().ok_or_else(|| {
        anyhow!("no model directory given; pass --model-dir or set {MODEL_DIR_ENV}")
    })?;
    Magika::from_model_dir(config, model_dir, table)
        .with_context(|| format!("failed to load model from {}", model_dir.display()))
}

#[cfg(not(feature = "onnx"))]
fn load(
    _cli: &Cli,
    _config: Config,
    _table: ContentTypeTable,
) -> Result<Magika> {
    Err(anyhow!(
        "built without the `onnx` feature; no inference engine available ({MODEL_DIR_ENV} ignored)"
    ))
}

/// Identify inputs in order, reading stdin at most once.
fn identify_inputs(
    magika: &Magika,
    inputs: &[Input],
) -> Result<Vec<MagikaResult>> {
    let files: Vec<_> = inputs
        .iter()
        .filter_map(|i| match i {
            Input::Path(p) => Some(p.as_path()),
            Input::Stdin => None,
        })
        .collect();
    let mut file_results = magika.identify_many(&files)?.into_iter();

    let mut stdin_result = None;
    let mut results = Vec::with_capacity(inputs.len());
    for input in inputs {
        let result = match input {
            Input::Path(_) => file_results
                .next()
                .ok_or_else(|| anyhow!("missing result for input"))?,
            Input::Stdin => {
                if stdin_result.is_none() {
                    let mut buf = Vec::new();
                    io::stdin().lock().read_to_end(&mut buf)?;
                    stdin_result = Some(magika.identify_bytes(&buf)?);
                }
                stdin_result
                    .clone()
                    .ok_or_else(|| anyhow!("missing result for stdin"))?
            }
        };
        results.push(result);
    }
    Ok(results)
}
