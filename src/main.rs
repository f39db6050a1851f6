//!
//! dtogen
//! Derives the data transfer objects of forms, pages and their tables from a
//! snapshot of the UI model. The snapshot is either a RON file written with the
//! `ModelBuilder` DSL (see `dtogen init`) or a JSON `ModelSnapshot`.
//!
//!  # Commands
//!
//!   * `generate` synthesizes the DTO graph of one root and prints it as RON or JSON
//!   * `print-tree` shows the nodes the generator visits and the command each resolves to
//!   * `init` writes a starter model next to the workspace
//!

mod cli;
mod report;

use anyhow::{Context, bail};
use ansi_term::Colour::{Green, Red, Yellow};
use ansi_term::Style;
use clap::Parser;
use cli::{DtogenCli, DtogenCommand, OutputFormat};
use dtogen_common::ModelSnapshot;
use dtogen_common::workspace::resolve_model_file;
use dtogen_config::runtime::names;
use dtogen_config::{DeclarationDsl, ModelBuilder, ModelTypeExt};
use dtogen_engine::DtoGenerator;
use ron::ser::PrettyConfig;
use std::env;
use std::fs;
use std::path::Path;
use std::process::exit;

pub fn main() {
    let cli = DtogenCli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        DtogenCommand::Generate {
            root,
            model,
            format,
            output,
        } => process_generate(&root, model.as_deref(), format, output.as_deref()),
        DtogenCommand::PrintTree { root, model } => process_print_tree(&root, model.as_deref()),
        DtogenCommand::Init { output } => process_init(&output),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", Red.bold().paint("Error:"), e);
        exit(1);
    }
}

fn process_generate(
    root: &str,
    model: Option<&Path>,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let generator = DtoGenerator::new(load_model(model)?);
    let Some(dto) = generator
        .generate(root)
        .context(format!("Failed to generate DTOs for {root}"))?
    else {
        eprintln!(
            "{}",
            Yellow.paint(format!("{root} reuses an existing DTO, nothing to generate"))
        );
        return Ok(());
    };

    let rendered = match format {
        OutputFormat::Ron => ron::ser::to_string_pretty(&dto, PrettyConfig::default())
            .context("Failed to serialize DTO graph as RON")?,
        OutputFormat::Json => serde_json::to_string_pretty(&dto)
            .context("Failed to serialize DTO graph as JSON")?,
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .context(format!("Failed to write output to: {}", path.display()))?;
            eprintln!("{}", report::summary(&dto));
            eprintln!("Wrote {}", Green.paint(path.display().to_string()));
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn process_print_tree(root: &str, model: Option<&Path>) -> anyhow::Result<()> {
    let generator = DtoGenerator::new(load_model(model)?);
    let entries = generator
        .walk(root)
        .context(format!("Failed to walk {root}"))?;
    println!("{}", Style::new().bold().underline().paint(root));
    print!("{}", report::walk_tree(&entries));
    Ok(())
}

fn process_init(output: &Path) -> anyhow::Result<()> {
    if output.exists() {
        bail!(
            "{} already exists. Remove it if you want to regenerate the model.",
            output.display()
        );
    }
    starter_model()
        .write_to_file(output)
        .context(format!("Failed to write model to: {}", output.display()))?;
    println!("Created {}", Green.paint(output.display().to_string()));
    println!(
        "Try {}",
        Green.paint(format!(
            "dtogen generate --root demo.PersonForm --model {}",
            output.display()
        ))
    );
    Ok(())
}

/// Loads a snapshot: JSON files as a serialized `ModelSnapshot`, anything
/// else as a `ModelBuilder` RON file
fn load_model(explicit: Option<&Path>) -> anyhow::Result<ModelSnapshot> {
    let current_dir = env::current_dir().context("Failed to read current directory")?;
    let Some(path) = resolve_model_file(explicit, &current_dir) else {
        bail!("No model found. Pass --model or run `dtogen init` first.");
    };
    log::debug!("loading model from {}", path.display());

    if is_json(&path) {
        return ModelSnapshot::load_from_file(&path);
    }
    ModelBuilder::load_snapshot(&path)
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// The runtime classpath plus a small form with a value field, a table and a property
fn starter_model() -> ModelBuilder {
    let mut builder = ModelBuilder::with_runtime();
    builder
        .model_type("demo.PersonForm")
        .extends(names::ABSTRACT_FORM)
        .property("personId", names::LONG)
        .nested("MainBox", |b| {
            b.extends(names::ABSTRACT_GROUP_BOX)
                .nested("NameField", |f| f.extends(names::ABSTRACT_STRING_FIELD))
                .nested("AddressesField", |f| {
                    f.extends(&format!(
                        "{}<demo.PersonForm.MainBox.AddressesField.Table>",
                        names::ABSTRACT_TABLE_FIELD
                    ))
                    .nested("Table", |t| {
                        t.extends(names::ABSTRACT_TABLE)
                            .nested("StreetColumn", |c| c.extends(names::ABSTRACT_STRING_COLUMN))
                            .nested("ZipColumn", |c| c.extends(names::ABSTRACT_INTEGER_COLUMN))
                    })
                })
                .nested("OkButton", |f| f.extends(names::ABSTRACT_BUTTON))
        })
        .build();
    builder
}
