use anyhow::Result;
use tracing::debug;

use crate::builders::formatter::format_comment;
use crate::builders::patterns::{self, CommentTag};
use crate::core::config::{CONFIG_VERSION, GeneratorConfig, KNOWN_LANGUAGES};

/// An existing comment block after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedComment {
    /// The block re-indented for its target line, one `\n`-terminated line
    /// per captured line.
    pub text: String,
    /// The `@method`, `@param` and `@return` tags the block already carries.
    pub tags: Vec<CommentTag>,
}

/// Decides what to emit for a `/** ... */` block that is already present.
pub trait CommentValidator {
    /// Validates the trimmed lines of one block, opener and closer included.
    ///
    /// # Arguments
    /// * `lines`: The captured lines, in source order.
    /// * `indent`: The indent of the line that opened the block.
    fn validate_comment(&self, lines: &[String], indent: &str) -> ValidatedComment;
}

/// Checks a `GeneratorConfig` for values that would produce broken comments.
pub trait ConfigValidator {
    /// Validates the whole configuration.
    ///
    /// # Arguments
    /// * `config`: The `GeneratorConfig` to be validated.
    ///
    /// # Returns
    /// A `Result<Vec<String>>` where each string describes one issue. An empty
    /// vector means the configuration is usable.
    fn validate_config(&self, config: &GeneratorConfig) -> Result<Vec<String>>;
}

/// The default validator: existing comments keep their text and are only
/// re-indented; configuration is checked for values that would produce broken
/// comments.
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentValidator for StandardValidator {
    fn validate_comment(&self, lines: &[String], indent: &str) -> ValidatedComment {
        let mut tags = Vec::new();
        let mut blob = String::new();

        for (index, line) in lines.iter().enumerate() {
            for tag in patterns::find_comment_tags(line) {
                debug!(kind = ?tag.kind, value = %tag.value, "existing comment tag");
                tags.push(tag);
            }
            if index > 0 {
                blob.push('\n');
            }
            blob.push_str(line);
        }

        ValidatedComment {
            text: format_comment(&blob, indent),
            tags,
        }
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &GeneratorConfig) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        if config.version != CONFIG_VERSION {
            issues.push(format!("Unsupported config version: {}", config.version));
        }

        let template = &config.template;
        if template.description.trim().is_empty() {
            issues.push("Template description cannot be empty".to_string());
        }
        if template.param_type.trim().is_empty() {
            issues.push("Template param_type cannot be empty".to_string());
        }
        if template.param_description.trim().is_empty() {
            issues.push("Template param_description cannot be empty".to_string());
        }
        if template.param_type.contains(['{', '}']) {
            issues.push(format!(
                "Template param_type must not contain braces: {}",
                template.param_type
            ));
        }
        if [&template.description, &template.param_description]
            .iter()
            .any(|text| text.contains('\n'))
        {
            issues.push("Template text must fit on one line".to_string());
        }

        for language in &config.scan.languages {
            if !KNOWN_LANGUAGES.contains(&language.as_str()) {
                issues.push(format!("Unknown language id: {language}"));
            }
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::patterns::CommentTagKind;

    fn lines(list: &[&str]) -> Vec<String> {
        list.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_existing_comment_is_reindented() {
        let validator = StandardValidator::new();
        let block = lines(&[
            "/**",
            "* Adds two numbers.",
            "*",
            "* @method add",
            "* @param {Number} a - left",
            "* @return {Number}",
            "*/",
        ]);

        let validated = validator.validate_comment(&block, "  ");
        assert_eq!(
            validated.text,
            "  /**\n   * Adds two numbers.\n   *\n   * @method add\n   * @param {Number} a - left\n   * @return {Number}\n   */\n"
        );
        let kinds: Vec<CommentTagKind> = validated.tags.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![CommentTagKind::Method, CommentTagKind::Param, CommentTagKind::Return]
        );
    }

    #[test]
    fn test_single_line_block_keeps_its_content() {
        let validated = StandardValidator::new().validate_comment(&lines(&["/** foo */"]), "\t");
        assert_eq!(validated.text, "\t/** foo */\n");
        assert!(validated.tags.is_empty());
    }

    #[test]
    fn test_empty_block_does_not_fail() {
        let validated = StandardValidator::new().validate_comment(&[], "  ");
        assert_eq!(validated.text, "");
    }

    #[test]
    fn test_default_config_is_valid() {
        let issues = StandardValidator::new()
            .validate_config(&GeneratorConfig::default())
            .unwrap();
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn test_config_issues_are_reported() {
        let mut config = GeneratorConfig::default();
        config.version = "2.0".to_string();
        config.template.param_type = "{x}".to_string();
        config.template.description = "  ".to_string();
        config.scan.languages.push("cobol".to_string());

        let issues = StandardValidator::new().validate_config(&config).unwrap();
        assert_eq!(issues.len(), 4, "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("cobol")));
    }

    #[test]
    fn test_empty_param_description_is_reported() {
        let mut config = GeneratorConfig::default();
        config.template.param_description = String::new();

        let issues = StandardValidator::new().validate_config(&config).unwrap();
        assert_eq!(issues, vec!["Template param_description cannot be empty".to_string()]);
    }
}
