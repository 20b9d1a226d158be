use std::borrow::Cow;

/// Expand the two-character sequences `\n` and `\r` into LF and CR.
///
/// Every other character, including other backslash sequences and
/// back-references such as `$1` or `\1`, is left untouched. The input is
/// borrowed back when there is nothing to expand.
pub fn expand_escapes(replace: &str) -> Cow<'_, str> {
    if !replace.contains("\\n") && !replace.contains("\\r") {
        return Cow::Borrowed(replace);
    }

    let mut expanded = String::with_capacity(replace.len());
    let mut chars = replace.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n') => {
                    chars.next();
                    expanded.push('\n');
                    continue;
                }
                Some('r') => {
                    chars.next();
                    expanded.push('\r');
                    continue;
                }
                _ => {}
            }
        }
        expanded.push(c);
    }

    Cow::Owned(expanded)
}
