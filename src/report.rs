use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;
use dtogen_config::GenerationCommand;
use dtogen_engine::{DtoType, WalkEntry};
use std::fmt::Write;

/// Renders the visited nodes as an indented tree, one line per node
pub fn walk_tree(entries: &[WalkEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let command = entry.command();
        let painted = match command {
            GenerationCommand::Create => Green.paint(command.to_string()),
            GenerationCommand::Use => Blue.paint(command.to_string()),
            GenerationCommand::Ignore => Red.paint(command.to_string()),
            GenerationCommand::None => Style::new().dimmed().paint(command.to_string()),
        };
        let _ = write!(
            out,
            "{}{} {} [{}]",
            "  ".repeat(entry.depth),
            Style::new().bold().paint(entry.model.simple_name()),
            Cyan.paint(entry.kind().to_string()),
            painted
        );
        if let Some(dto) = entry.dto_name() {
            let _ = write!(out, " -> {dto}");
        }
        if let Some(replaced) = &entry.descriptor.replaces {
            let _ = write!(out, " {}", Yellow.paint(format!("replaces {replaced}")));
        }
        out.push('\n');
    }
    out
}

/// One line summary of a generated graph
pub fn summary(dto: &DtoType) -> String {
    let mut count = 0usize;
    dto.walk(&mut |_| count += 1);
    format!(
        "{} {} ({} types)",
        Green.bold().paint("Generated"),
        Style::new().bold().paint(dto.name.as_str()),
        count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtogen_common::ModelSnapshot;
    use dtogen_config::runtime::names;
    use dtogen_config::{DeclarationDsl, ModelBuilder, ModelTypeExt};
    use dtogen_engine::DtoGenerator;

    fn generator() -> DtoGenerator<ModelSnapshot> {
        let mut builder = ModelBuilder::with_runtime();
        builder
            .model_type("pkg.NoteForm")
            .extends(names::ABSTRACT_FORM)
            .nested("MainBox", |b| {
                b.extends(names::ABSTRACT_GROUP_BOX)
                    .nested("TextField", |f| f.extends(names::ABSTRACT_STRING_FIELD))
            })
            .build();
        DtoGenerator::new(builder.snapshot().unwrap())
    }

    #[test]
    fn tree_indents_by_depth_and_names_dtos() {
        let entries = generator().walk("pkg.NoteForm").unwrap();
        let tree = walk_tree(&entries);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("NoteForm"));
        assert!(lines[0].contains("pkg.NoteFormData"));
        assert!(lines[2].starts_with("    "));
        assert!(lines[2].contains("TextField"));
    }

    #[test]
    fn summary_counts_nested_types() {
        let dto = generator().generate("pkg.NoteForm").unwrap().unwrap();
        let line = summary(&dto);
        assert!(line.contains("pkg.NoteFormData"));
        assert!(line.contains("(2 types)"));
    }
}
