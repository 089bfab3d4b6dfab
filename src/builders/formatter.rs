/// Re-indents a raw comment block.
///
/// Every line is trimmed and prefixed with `indent`. Lines starting with `*`
/// get one extra space so they line up under the `/**` opener; the opener
/// itself gets none. Blank lines stay blank, without the indent. Each emitted
/// line ends with `\n`, so the result can be inserted directly above a
/// declaration.
///
/// Formatting is idempotent: running an already formatted block through this
/// function with the same indent returns it unchanged. Empty input yields an
/// empty string.
pub fn format_comment(comment: &str, indent: &str) -> String {
    let mut output = String::with_capacity(comment.len() + indent.len() * 8);

    for line in comment.lines() {
        let line = line.trim();
        if line.is_empty() {
            output.push('\n');
            continue;
        }
        let spacer = if line.starts_with('*') { " " } else { "" };
        output.push_str(indent);
        output.push_str(spacer);
        output.push_str(line);
        output.push('\n');
    }

    output
}
