use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Matches `class <Name> ... {`. The name is optional so anonymous class
/// expressions still match and get a placeholder name.
static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)class\b(?:\s+([A-Za-z_$][\w$]*))?[^{]*\{")
        .unwrap_or_else(|_| panic!("Invalid class regex"))
});

/// Matches `function <name>(<args>) {`, including generator functions.
static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w$.])function\b\s*\*?\s*([A-Za-z_$][\w$]*)\s*\(([^)]*)\)\s*\{")
        .unwrap_or_else(|_| panic!("Invalid function regex"))
});

/// Matches `<name>(<args>) {` with only method modifiers in front of it.
static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:static|async|get|set|public|private|protected|override)\s+)*\*?\s*([A-Za-z_$][\w$]*)\s*\(([^()]*)\)\s*\{",
    )
    .unwrap_or_else(|_| panic!("Invalid method regex"))
});

/// Matches `<target> = (<args>) => {`, optionally `async`.
static ARROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^=]*?)\s*=\s*(?:async\s*)?\(([^)]*)\)\s*=>\s*\{")
        .unwrap_or_else(|_| panic!("Invalid arrow function regex"))
});

/// Matches a YUIDoc tag inside an existing comment line.
static COMMENT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(method|param|returns?)\b\s*([^@]*)")
        .unwrap_or_else(|_| panic!("Invalid comment tag regex"))
});

/// Statements that look like `name(args) {` but are not declarations.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "function", "return", "else", "do",
];

/// Words that may precede a binding name on the left of an arrow assignment.
const BINDING_KEYWORDS: &[&str] = &[
    "export", "default", "const", "let", "var", "static", "public", "private", "protected",
    "readonly",
];

/// The closed set of declaration shapes the scanner recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    /// `class Name {`, also `export default class extends Base {`. The name
    /// is optional; `extends`/`implements` are never taken as the name.
    Class,
    /// A named `function` declaration, generators included. Anonymous
    /// callbacks do not match.
    Function,
    /// A method inside a class body: `name(args) {` behind optional
    /// modifiers such as `static` or `async`. Control statements like
    /// `if (...) {` are rejected.
    Method,
    /// An arrow function assigned to a binding or a member:
    /// `const name = (args) => {`.
    Arrow,
}

/// The order in which matchers are tried. The first kind that matches a line
/// wins, so the permissive method shape comes last.
pub const MATCH_PRIORITY: [DeclarationKind; 4] = [
    DeclarationKind::Class,
    DeclarationKind::Function,
    DeclarationKind::Arrow,
    DeclarationKind::Method,
];

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Class => write!(f, "class"),
            DeclarationKind::Function => write!(f, "function"),
            DeclarationKind::Method => write!(f, "method"),
            DeclarationKind::Arrow => write!(f, "arrow"),
        }
    }
}

/// The result of matching one trimmed line against a declaration shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationMatch {
    pub kind: DeclarationKind,
    /// `None` when the line matched but no usable name could be captured.
    pub name: Option<String>,
    /// Trimmed parameter tokens in source order. Empty tokens from stray
    /// commas are kept; synthesis skips them.
    pub params: Vec<String>,
}

/// A line-shape detector.
pub trait PatternMatcher {
    /// Matches a trimmed line against this shape.
    ///
    /// # Arguments
    /// * `line`: The line with surrounding whitespace removed.
    ///
    /// # Returns
    /// `Some(DeclarationMatch)` with the captured name and parameters when the
    /// shape is recognized, `None` otherwise.
    fn match_line(&self, line: &str) -> Option<DeclarationMatch>;
}

impl DeclarationKind {
    /// Each kind owns exactly one regex.
    fn regex(&self) -> &'static Regex {
        match self {
            DeclarationKind::Class => &*CLASS_RE,
            DeclarationKind::Function => &*FUNCTION_RE,
            DeclarationKind::Method => &*METHOD_RE,
            DeclarationKind::Arrow => &*ARROW_RE,
        }
    }

    fn build_match(&self, captures: &Captures<'_>) -> Option<DeclarationMatch> {
        let raw_name = captures.get(1).map(|m| m.as_str());
        let raw_args = captures.get(2).map(|m| m.as_str()).unwrap_or("");

        let name = match self {
            DeclarationKind::Class => raw_name
                .filter(|name| *name != "extends" && *name != "implements")
                .map(str::to_string),
            DeclarationKind::Function => raw_name.map(str::to_string),
            DeclarationKind::Method => {
                let name = raw_name?;
                if CONTROL_KEYWORDS.contains(&name) {
                    return None;
                }
                Some(name.to_string())
            }
            DeclarationKind::Arrow => raw_name.and_then(arrow_binding_name),
        };

        let params = match self {
            DeclarationKind::Class => Vec::new(),
            _ => split_params(raw_args),
        };

        Some(DeclarationMatch {
            kind: *self,
            name,
            params,
        })
    }
}

impl PatternMatcher for DeclarationKind {
    fn match_line(&self, line: &str) -> Option<DeclarationMatch> {
        let captures = self.regex().captures(line)?;
        self.build_match(&captures)
    }
}

/// Classifies a trimmed line by trying every matcher in `MATCH_PRIORITY`
/// order. At most one declaration is reported per line.
pub fn classify(line: &str) -> Option<DeclarationMatch> {
    // Every shape ends in an opening brace, so most lines bail out here
    // without touching a regex.
    if !line.contains('{') {
        return None;
    }
    MATCH_PRIORITY.iter().find_map(|kind| kind.match_line(line))
}

/// Splits a raw argument list on commas and trims each token. A blank list
/// yields no parameters at all.
pub fn split_params(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|param| param.trim().to_string()).collect()
}

/// Reduces the left side of an arrow assignment to the bound name:
/// `export const sum: Fn` becomes `sum`, `this.onClick` stays as is.
fn arrow_binding_name(left: &str) -> Option<String> {
    let without_type = left.split(':').next().unwrap_or(left);
    without_type
        .split_whitespace()
        .filter(|word| !BINDING_KEYWORDS.contains(word))
        .last()
        .map(str::to_string)
}

/// The YUIDoc tags recognized inside existing comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentTagKind {
    Method,
    Param,
    Return,
}

/// A tag found in an existing comment, with the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentTag {
    pub kind: CommentTagKind,
    /// The rest of the line after the tag, without a trailing `*/`.
    pub value: String,
}

/// Finds every `@method`, `@param` and `@return` tag on a comment line.
pub fn find_comment_tags(line: &str) -> Vec<CommentTag> {
    COMMENT_TAG_RE
        .captures_iter(line)
        .filter_map(|captures| {
            let kind = match captures.get(1)?.as_str() {
                "method" => CommentTagKind::Method,
                "param" => CommentTagKind::Param,
                _ => CommentTagKind::Return,
            };
            let value = captures
                .get(2)
                .map(|m| m.as_str().trim().trim_end_matches("*/").trim())
                .unwrap_or("")
                .to_string();
            Some(CommentTag { kind, value })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_class_matching() {
        let found = classify("class Widget {").unwrap();
        assert_eq!(found.kind, DeclarationKind::Class);
        assert_eq!(found.name.as_deref(), Some("Widget"));
        assert!(found.params.is_empty());

        let exported = classify("export default class Panel extends Base {").unwrap();
        assert_eq!(exported.name.as_deref(), Some("Panel"));

        let anonymous = classify("const Thing = class {").unwrap();
        assert_eq!(anonymous.kind, DeclarationKind::Class);
        assert_eq!(anonymous.name, None);
    }

    #[test]
    fn test_class_requires_keyword() {
        assert!(DeclarationKind::Class.match_line("const className = x; if (a) {").is_none());
        assert!(DeclarationKind::Class.match_line("el.class {").is_none());
    }

    #[test]
    fn test_function_matching() {
        let found = classify("function add(a, b) {").unwrap();
        assert_eq!(found.kind, DeclarationKind::Function);
        assert_eq!(found.name.as_deref(), Some("add"));
        assert_eq!(found.params, params(&["a", "b"]));

        let spaced = classify("export async function load ( url ,opts ) {").unwrap();
        assert_eq!(spaced.name.as_deref(), Some("load"));
        assert_eq!(spaced.params, params(&["url", "opts"]));

        let generator = classify("function* ids() {").unwrap();
        assert_eq!(generator.name.as_deref(), Some("ids"));
        assert!(generator.params.is_empty());
    }

    #[test]
    fn test_anonymous_callbacks_are_not_declarations() {
        assert!(classify("describe('x', function() {").is_none());
        assert!(classify("items.forEach(function (item) {").is_none());
        assert!(classify("it('works', () => {").is_none());
    }

    #[test]
    fn test_arrow_matching() {
        let found = classify("const sum = (x, y) => {").unwrap();
        assert_eq!(found.kind, DeclarationKind::Arrow);
        assert_eq!(found.name.as_deref(), Some("sum"));
        assert_eq!(found.params, params(&["x", "y"]));

        let field = classify("this.onClick = async (event) => {").unwrap();
        assert_eq!(field.name.as_deref(), Some("this.onClick"));

        let typed = classify("export const handler: Handler = () => {").unwrap();
        assert_eq!(typed.name.as_deref(), Some("handler"));
        assert!(typed.params.is_empty());

        let nameless = classify("= (a) => {").unwrap();
        assert_eq!(nameless.kind, DeclarationKind::Arrow);
        assert_eq!(nameless.name, None);
    }

    #[test]
    fn test_method_matching() {
        let found = classify("render(props, state) {").unwrap();
        assert_eq!(found.kind, DeclarationKind::Method);
        assert_eq!(found.name.as_deref(), Some("render"));
        assert_eq!(found.params, params(&["props", "state"]));

        let modified = classify("static async create() {").unwrap();
        assert_eq!(modified.name.as_deref(), Some("create"));
    }

    #[test]
    fn test_control_flow_is_not_a_method() {
        assert!(classify("if (ready) {").is_none());
        assert!(classify("for (let i = 0; i < n; i++) {").is_none());
        assert!(classify("while(true){").is_none());
        assert!(classify("switch (kind) {").is_none());
        assert!(classify("} catch (e) {").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        // Both the function and the method shapes fit; only one match is reported.
        let found = classify("function init() {").unwrap();
        assert_eq!(found.kind, DeclarationKind::Function);

        let arrow = classify("handler = (e) => {").unwrap();
        assert_eq!(arrow.kind, DeclarationKind::Arrow);
    }

    #[test]
    fn test_plain_lines_do_not_match() {
        assert!(classify("return a + b;").is_none());
        assert!(classify("doSomething(a, b);").is_none());
        assert!(classify("}").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_split_params() {
        assert!(split_params("").is_empty());
        assert!(split_params("   ").is_empty());
        assert_eq!(split_params(" a ,b"), params(&["a", "b"]));
        assert_eq!(split_params("a, , b,"), params(&["a", "", "b", ""]));
    }

    #[test]
    fn test_find_comment_tags() {
        let tags = find_comment_tags("* @param {Number} a - first operand");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].kind, CommentTagKind::Param);
        assert_eq!(tags[0].value, "{Number} a - first operand");

        let returns = find_comment_tags("* @return {Boolean} */");
        assert_eq!(returns[0].kind, CommentTagKind::Return);
        assert_eq!(returns[0].value, "{Boolean}");

        assert_eq!(find_comment_tags("* @method add")[0].kind, CommentTagKind::Method);
        assert!(find_comment_tags("* plain description").is_empty());
        assert!(find_comment_tags("* @constructor").is_empty());
    }
}
