use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::builders::reporter::{ConsoleReporter, Notifier};
use crate::core::config::{ConfigManager, ConfigProvider, ExportFormat, GeneratorConfig};
use crate::core::document::{Document, LineRange};
use crate::core::edits::EditBatch;
use crate::core::engine::{CommentEngine, ScanResult};

/// Options of the `generate` command.
#[derive(Debug, Default, Clone)]
pub struct GenerateOptions {
    /// `START:END`, 1-based and inclusive. `None` scans the whole file.
    pub lines: Option<String>,
    pub dry_run: bool,
    pub json: bool,
}

/// What a scan of one file produced.
#[derive(Debug)]
pub struct FileOutcome {
    pub result: ScanResult,
    pub batch: EditBatch,
    /// The file content with every edit applied.
    pub content: String,
}

/// Scans `content` and applies the resulting edits in memory.
pub fn document_source(
    path: &Path,
    content: &str,
    config: &GeneratorConfig,
    selection: Option<LineRange>,
) -> Result<FileOutcome> {
    let document = Document::for_path(path, content);
    let engine = CommentEngine::new(config.clone());
    let mut batch = EditBatch::new();

    let result = match selection {
        Some(range) => engine.generate_selected(&document, range, &mut batch)?,
        None => engine.generate_all(&document, &mut batch)?,
    };

    let content = batch
        .apply(&document)
        .with_context(|| format!("Failed to apply edits to {}", path.display()))?;

    Ok(FileOutcome {
        result,
        batch,
        content,
    })
}

pub fn config_manager(config_path: Option<PathBuf>) -> Result<ConfigManager> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => ConfigManager::new(),
    }
}

pub fn initialize_config(manager: &ConfigManager) -> Result<()> {
    if manager.initialize()? {
        println!(
            "✓ Wrote default configuration to {}",
            manager.get_config_path().display()
        );
    } else {
        println!(
            "Configuration already exists at {}",
            manager.get_config_path().display()
        );
    }
    Ok(())
}

/// Generates comments for one file and writes it back unless `dry_run`.
pub fn generate_file(
    manager: &ConfigManager,
    path: &Path,
    options: &GenerateOptions,
    verbose: bool,
) -> Result<ScanResult> {
    let config = manager.load_config()?;
    let selection = options
        .lines
        .as_deref()
        .map(LineRange::parse_selection)
        .transpose()?;

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let outcome = document_source(path, &content, &config, selection)?;

    let reporter = ConsoleReporter::new(verbose);
    if options.json {
        reporter.print_plan(outcome.batch.insertions())?;
    }

    if options.dry_run {
        debug!(edits = outcome.batch.len(), "dry run, not writing");
    } else if !outcome.batch.is_empty() {
        fs::write(path, &outcome.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    reporter.notify(&outcome.result)?;
    Ok(outcome.result)
}

/// Fails when the file still has undocumented declarations.
pub fn check_file(manager: &ConfigManager, path: &Path) -> Result<()> {
    let config = manager.load_config()?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let outcome = document_source(path, &content, &config, None)?;

    if outcome.result.generated > 0 {
        for insertion in outcome.batch.insertions() {
            if insertion.replaces_until.is_none() {
                println!(
                    "  - {}:{} is missing a comment",
                    path.display(),
                    insertion.position.line + 1
                );
            }
        }
        anyhow::bail!(
            "{} declaration(s) in {} have no YUIDoc comment",
            outcome.result.generated,
            path.display()
        );
    }

    println!("✓ {} is fully documented.", path.display());
    Ok(())
}

pub fn validate_config(manager: &ConfigManager) -> Result<()> {
    let issues = manager.validate_config()?;

    if issues.is_empty() {
        println!("✓ Configuration is valid.");
        Ok(())
    } else {
        println!("⚠️  Found issues in configuration:");
        for issue in issues {
            println!("  - {issue}");
        }
        anyhow::bail!("Configuration validation failed.");
    }
}

pub fn export_config(manager: &ConfigManager, file_path: &Path, format: &str) -> Result<()> {
    manager.export_config(file_path, ExportFormat::from_name(format))?;
    println!("✓ Exported configuration to {}", file_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_source_applies_edits() {
        let config = GeneratorConfig::default();
        let outcome = document_source(
            Path::new("math.js"),
            "function add(a, b) {\n  return a + b;\n}\n",
            &config,
            None,
        )
        .unwrap();

        assert_eq!(outcome.result.generated, 1);
        assert_eq!(
            outcome.content,
            "/**\n * Description\n *\n * @method add\n * @param {type} a - description\n * @param {type} b - description\n */\nfunction add(a, b) {\n  return a + b;\n}\n"
        );
    }

    #[test]
    fn test_inline_type_comment_keeps_surrounding_code() {
        let config = GeneratorConfig::default();
        let source = "class A {\n  /** @type {number} */ count = 0;\n\n  add(a) {\n    return a;\n  }\n}\n";
        let outcome = document_source(Path::new("a.js"), source, &config, None).unwrap();

        assert_eq!(outcome.result.generated, 2);
        assert_eq!(outcome.result.normalized, 0);
        assert!(outcome.content.contains("  /** @type {number} */ count = 0;\n\n  /**\n"));
        assert!(outcome.content.contains("   * @method add\n"));
        assert!(outcome.content.ends_with("  add(a) {\n    return a;\n  }\n}\n"));
    }

    #[test]
    fn test_mixed_line_endings_survive_generation() {
        let config = GeneratorConfig::default();
        let source = "a();\r\nb();\nfunction f() {\n}\n";
        let outcome = document_source(Path::new("mixed.js"), source, &config, None).unwrap();

        assert_eq!(
            outcome.content,
            "a();\r\nb();\n/**\n * Description\n *\n * @method f\n */\nfunction f() {\n}\n"
        );
    }

    #[test]
    fn test_document_source_rejects_unknown_language() {
        let config = GeneratorConfig::default();
        let result = document_source(Path::new("notes.txt"), "class A {", &config, None);
        assert!(result.is_err());
    }
}
