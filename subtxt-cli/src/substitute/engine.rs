use regex::{Captures, Regex, Replacer};
use std::borrow::Cow;

use super::MatchRecord;
use crate::core::error::SubtxtError;
use crate::patterns::{expand_escapes, PatternSet, Rule};

/// A rule with its find pattern compiled and its replacement prepared
#[derive(Debug, Clone)]
struct CompiledRule {
    index: usize,
    rule: Rule,
    regex: Regex,
    template: String,
}

/// Applies an ordered pattern set to documents.
///
/// Every find pattern is compiled once, when the substituter is built, and
/// reused for every document.
#[derive(Debug, Clone)]
pub struct Substituter {
    rules: Vec<CompiledRule>,
}

/// Transformed text plus one record per rule
#[derive(Debug, Clone)]
pub struct Substitution {
    pub text: String,
    pub records: Vec<MatchRecord>,
}

impl Substitution {
    /// True if any rule matched at least once
    pub fn changed(&self) -> bool {
        self.records.iter().any(MatchRecord::matched)
    }
}

/// Counts matches while expanding the replacement template
struct CountingReplacer<'a> {
    template: &'a str,
    count: usize,
}

impl Replacer for CountingReplacer<'_> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.count += 1;
        caps.expand(self.template, dst);
    }
}

impl Substituter {
    /// Compile every rule of `patterns`, failing on the first invalid find
    pub fn new(patterns: &PatternSet) -> Result<Self, SubtxtError> {
        let rules = patterns
            .rules()
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let regex = Regex::new(&rule.find).map_err(|source| {
                    SubtxtError::PatternCompile {
                        index: index + 1,
                        find: rule.find.clone(),
                        source,
                    }
                })?;

                Ok(CompiledRule {
                    index,
                    rule: rule.clone(),
                    template: prepare_template(&rule.replace, &regex),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, SubtxtError>>()?;

        Ok(Self { rules })
    }

    /// Apply every rule in order; each rule sees the output of the previous one.
    ///
    /// With `detail` set, each record also carries the annotated text.
    pub fn apply(&self, text: &str, detail: bool) -> Substitution {
        let mut current = text.to_string();
        let mut records = Vec::with_capacity(self.rules.len());

        for compiled in &self.rules {
            let annotated_text = detail.then(|| annotate(&compiled.regex, &current));

            let mut replacer = CountingReplacer {
                template: &compiled.template,
                count: 0,
            };
            let replaced = match compiled.regex.replace_all(&current, replacer.by_ref()) {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) => Some(s),
            };
            if let Some(s) = replaced {
                current = s;
            }

            records.push(MatchRecord {
                rule_index: compiled.index,
                find: compiled.rule.find.clone(),
                replace: compiled.rule.replace.clone(),
                match_count: replacer.count,
                annotated_text,
            });
        }

        Substitution {
            text: current,
            records,
        }
    }
}

/// Wrap every match of `regex` in hyphens
fn annotate(regex: &Regex, text: &str) -> String {
    regex.replace_all(text, "-${0}-").into_owned()
}

/// Build the template handed to `Captures::expand`.
///
/// Escapes are expanded first. `$N`, `${N}`, `$name`, `${name}` and `\N`
/// refer to a group only when `regex` has that group; anything else is kept
/// as literal text. `$$` and `\\` give a single `$` and `\`.
fn prepare_template(replace: &str, regex: &Regex) -> String {
    let expanded = expand_escapes(replace);
    let mut template = String::with_capacity(expanded.len());
    let mut rest: &str = &expanded;

    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];

        match c {
            '$' if after.starts_with('$') => {
                template.push_str("$$");
                rest = &after[1..];
            }
            '$' if after.starts_with('{') => match after.find('}') {
                Some(close) if has_group(regex, &after[1..close]) => {
                    template.push_str("${");
                    template.push_str(&after[1..close]);
                    template.push('}');
                    rest = &after[close + 1..];
                }
                _ => {
                    template.push_str("$$");
                    rest = after;
                }
            },
            '$' => {
                // digits alone name a group, so `$1st` is group 1 then "st"
                let len = if after.starts_with(|c: char| c.is_ascii_digit()) {
                    after.find(|c: char| !c.is_ascii_digit())
                } else {
                    after.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                }
                .unwrap_or(after.len());

                let name = &after[..len];
                if !name.is_empty() && has_group(regex, name) {
                    template.push_str("${");
                    template.push_str(name);
                    template.push('}');
                    rest = &after[len..];
                } else {
                    template.push_str("$$");
                    rest = after;
                }
            }
            '\\' if after.starts_with('\\') => {
                template.push('\\');
                rest = &after[1..];
            }
            '\\' if after.starts_with(|c: char| c.is_ascii_digit()) => {
                let name = &after[..1];
                if has_group(regex, name) {
                    template.push_str("${");
                    template.push_str(name);
                    template.push('}');
                } else {
                    template.push('\\');
                    template.push_str(name);
                }
                rest = &after[1..];
            }
            _ => {
                template.push(c);
                rest = after;
            }
        }
    }

    template
}

/// Whether `name` (a number or a group name) is a group of `regex`
fn has_group(regex: &Regex, name: &str) -> bool {
    match name.parse::<usize>() {
        Ok(index) => index < regex.captures_len(),
        Err(_) => regex.capture_names().flatten().any(|group| group == name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn substituter(rules: &[(&str, &str)]) -> Substituter {
        let set = PatternSet::new(rules.iter().map(|(f, r)| Rule::new(*f, *r)).collect());
        Substituter::new(&set).unwrap()
    }

    #[test]
    fn test_empty_set_is_identity() {
        let sub = substituter(&[]);
        let result = sub.apply("anything\r\nat all", true);
        assert_eq!(result.text, "anything\r\nat all");
        assert!(result.records.is_empty());
        assert!(!result.changed());
    }

    #[test]
    fn test_sequential_application() {
        let sub = substituter(&[("a", "b"), ("b", "c")]);
        let result = sub.apply("a", false);
        assert_eq!(result.text, "c");
        assert_eq!(result.records[0].match_count, 1);
        assert_eq!(result.records[1].match_count, 1);
    }

    #[test]
    fn test_no_matches_leave_text_untouched() {
        let sub = substituter(&[("zzz", "y"), ("\\d{4}", "year")]);
        let result = sub.apply("hello world", true);
        assert_eq!(result.text, "hello world");
        assert!(result.records.iter().all(|r| r.match_count == 0));
        assert!(!result.changed());
    }

    #[test]
    fn test_counts_use_text_before_each_rule() {
        let sub = substituter(&[("o", "oo"), ("o", "0")]);
        let result = sub.apply("foo", false);
        assert_eq!(result.text, "f0000");
        assert_eq!(result.records[0].match_count, 2);
        assert_eq!(result.records[1].match_count, 4);
    }

    #[test]
    fn test_escape_expansion_in_replacement() {
        let sub = substituter(&[("; ", "\\n"), ("!", "\\r\\n")]);
        let result = sub.apply("a; b!", false);
        assert_eq!(result.text, "a\nb\r\n");
        assert!(!result.text.contains("\\n"));
    }

    #[test]
    fn test_capture_group_references() {
        let sub = substituter(&[("(\\w+)-(\\w+)", "$2 $1")]);
        assert_eq!(sub.apply("left-right", false).text, "right left");

        let sub = substituter(&[("(\\w+)@(\\w+)", "\\2 at \\1")]);
        assert_eq!(sub.apply("user@host", false).text, "host at user");

        let sub = substituter(&[("(?P<word>cat)", "${word}s")]);
        assert_eq!(sub.apply("cat", false).text, "cats");
    }

    #[test]
    fn test_annotation_marks_matches_before_replacement() {
        let sub = substituter(&[("foo", "bar"), ("baz", "qux")]);
        let result = sub.apply("foo baz foo", true);

        assert_eq!(result.text, "bar qux bar");
        assert_eq!(
            result.records[0].annotated_text.as_deref(),
            Some("-foo- baz -foo-")
        );
        assert_eq!(
            result.records[1].annotated_text.as_deref(),
            Some("bar -baz- bar")
        );
    }

    #[test]
    fn test_annotation_only_with_detail() {
        let sub = substituter(&[("foo", "bar")]);
        let result = sub.apply("foo", false);
        assert_eq!(result.records[0].annotated_text, None);
        assert!(result.changed());
    }

    #[test]
    fn test_replacement_equal_to_match_still_counts() {
        let sub = substituter(&[("same", "same")]);
        let result = sub.apply("same old", false);
        assert_eq!(result.text, "same old");
        assert!(result.changed());
    }

    #[test]
    fn test_invalid_pattern_names_rule() {
        let set = PatternSet::new(vec![Rule::new("ok", "fine"), Rule::new("(unclosed", "x")]);
        let err = Substituter::new(&set).unwrap_err();
        match err {
            SubtxtError::PatternCompile { index, ref find, .. } => {
                assert_eq!(index, 2);
                assert_eq!(find, "(unclosed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prepare_template() {
        let two_groups = Regex::new("(a)(b)").unwrap();
        assert_eq!(prepare_template("\\1-\\2", &two_groups), "${1}-${2}");
        assert_eq!(prepare_template("$1\\n", &two_groups), "${1}\n");
        assert_eq!(prepare_template("\\t", &two_groups), "\\t");
        assert_eq!(prepare_template("$3 and \\3", &two_groups), "$$3 and \\3");
    }

    #[test]
    fn test_dollar_without_group_is_literal() {
        let sub = substituter(&[("PRICE", "$5 USD")]);
        assert_eq!(sub.apply("cost: PRICE", false).text, "cost: $5 USD");

        let sub = substituter(&[("VAR", "$HOME/bin")]);
        assert_eq!(sub.apply("path=VAR", false).text, "path=$HOME/bin");

        let sub = substituter(&[("TOTAL", "${amount} $$ $")]);
        assert_eq!(sub.apply("TOTAL", false).text, "${amount} $ $");
    }

    #[test]
    fn test_numbered_group_followed_by_letters() {
        let sub = substituter(&[("(\\d+)", "$1st")]);
        assert_eq!(sub.apply("1", false).text, "1st");

        let sub = substituter(&[("(?P<n>\\d+)", "#$n!")]);
        assert_eq!(sub.apply("42", false).text, "#42!");
    }

    #[test]
    fn test_escaped_backslash_before_digit() {
        let sub = substituter(&[("(x)", "a\\\\1b")]);
        assert_eq!(sub.apply("x", false).text, "a\\1b");

        let sub = substituter(&[("(x)", "a\\1b")]);
        assert_eq!(sub.apply("x", false).text, "axb");
    }
}
