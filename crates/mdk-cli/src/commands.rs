use std::time::Duration;

use anyhow::Result;
use comfy_table::Table;

use mdk_cli::config::RunConfig;
use mdk_cli::pipeline;
use mdk_cli::report::RunReport;
use mdk_fetch::MetadataClient;
use mdk_ingest::{LoadOptions, load_table, variable_plan};

use crate::cli::{RunArgs, VariablesArgs};
use crate::summary::apply_table_style;

pub fn run_submission(args: &RunArgs) -> Result<RunReport> {
    let config = run_config(args)?;
    let report = pipeline::run(&config)?;
    if let Some(path) = &config.report {
        report.write_json(path)?;
    }
    Ok(report)
}

fn run_config(args: &RunArgs) -> Result<RunConfig> {
    Ok(RunConfig {
        input: args.input.clone(),
        base_url: args.base_url.clone(),
        workdir: args.workdir.clone(),
        output_dir: args.output_dir.clone(),
        key_dir: args.key_dir.clone(),
        delimiter: RunConfig::delimiter_byte(&args.delimiter)?,
        encoding: args.encoding.clone(),
        excluded_columns: args.exclude.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
        report: args.report.clone(),
        dry_run: args.dry_run,
    })
}

/// Prints the processing plan for a table: every variable with its file
/// stem and metadata URL. Loads the table, touches nothing else.
pub fn run_variables(args: &VariablesArgs) -> Result<()> {
    let options = LoadOptions {
        delimiter: RunConfig::delimiter_byte(&args.delimiter)?,
        encoding: args.encoding.clone(),
    };
    let table = load_table(&args.input, &options)?;
    let plan = variable_plan(&table, &args.exclude)?;
    let client = MetadataClient::new(args.base_url.as_str(), mdk_fetch::DEFAULT_TIMEOUT)?;

    let mut out = Table::new();
    out.set_header(vec!["Variable", "File stem", "Metadata URL"]);
    apply_table_style(&mut out);
    for id in &plan {
        out.add_row(vec![id.to_string(), id.file_stem(), client.document_url(id)]);
    }
    println!("{out}");
    Ok(())
}
