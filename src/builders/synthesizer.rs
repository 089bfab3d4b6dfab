use crate::builders::patterns::{DeclarationKind, DeclarationMatch};
use crate::core::config::TemplateSettings;

/// Builds the text of new YUIDoc comments.
///
/// The output is unindented; layout is left to
/// [`format_comment`](crate::builders::formatter::format_comment).
pub struct CommentSynthesizer<'a> {
    template: &'a TemplateSettings,
}

impl<'a> CommentSynthesizer<'a> {
    pub fn new(template: &'a TemplateSettings) -> Self {
        Self { template }
    }

    /// Picks the comment shape for a matched declaration.
    pub fn synthesize(&self, declaration: &DeclarationMatch) -> String {
        let name = declaration.name.as_deref();
        match declaration.kind {
            DeclarationKind::Class => self.class_comment(name),
            DeclarationKind::Function | DeclarationKind::Method | DeclarationKind::Arrow => {
                self.function_comment(name, &declaration.params)
            }
        }
    }

    /// A class block: description, blank tag line, `@class` and `@constructor`.
    pub fn class_comment(&self, name: Option<&str>) -> String {
        let name = name.unwrap_or_default();
        let summary = format!("{name} {}", self.template.param_description);
        format!(
            "/**\n* {}\n*\n* @class {name}\n* @constructor\n*/",
            summary.trim()
        )
    }

    /// A function block: description, blank line, `@method` and one `@param`
    /// per non-blank parameter in source order.
    pub fn function_comment(&self, name: Option<&str>, params: &[String]) -> String {
        let mut comment = format!(
            "/**\n* {}\n*\n* @method {}\n",
            self.template.description,
            name.unwrap_or_default()
        );

        for param in params.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
            comment.push_str(&format!(
                "* @param {{{}}} {} - {}\n",
                self.template.param_type, param, self.template.param_description
            ));
        }

        comment.push_str("*/");
        comment
    }
}
