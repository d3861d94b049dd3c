//! `vitae templates list` and `vitae templates show <id>`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use vitae_core::FieldType;

use super::GlobalArgs;

/// Inspect the available templates.
#[derive(Subcommand, Debug)]
pub enum TemplatesCommand {
    /// List every template id and display name.
    List(ListArgs),

    /// Print the full field schema of one template as JSON.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Template id (e.g. "classic").
    pub id: String,
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "fields")]
    fields: usize,
    #[tabled(rename = "repeatable")]
    repeatable: String,
}

pub fn run(cmd: TemplatesCommand, global: &GlobalArgs) -> Result<()> {
    match cmd {
        TemplatesCommand::List(args) => list(args, global),
        TemplatesCommand::Show(args) => show(args, global),
    }
}

fn list(args: ListArgs, global: &GlobalArgs) -> Result<()> {
    let compiler = global.artifact_compiler()?;
    let summaries = compiler.list();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("failed to serialize templates")?
        );
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No templates available.");
        return Ok(());
    }

    let mut rows = Vec::with_capacity(summaries.len());
    for summary in &summaries {
        let definition = compiler.schema(summary.id.as_str())?;
        let repeatable = definition
            .field_schema
            .iter()
            .filter(|f| f.field_type == FieldType::Repeatable)
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(TemplateRow {
            id: summary.id.to_string(),
            name: summary.name.clone(),
            fields: definition.field_schema.len(),
            repeatable,
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("{} template(s)", summaries.len().to_string().bold());
    Ok(())
}

fn show(args: ShowArgs, global: &GlobalArgs) -> Result<()> {
    let compiler = global.artifact_compiler()?;
    let definition = compiler.schema(&args.id)?;
    println!(
        "{}",
        serde_json::to_string_pretty(definition).context("failed to serialize template")?
    );
    Ok(())
}
