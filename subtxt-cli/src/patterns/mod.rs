mod escape;
mod parser;

pub use escape::expand_escapes;
pub use parser::{load_patterns, parse_patterns};

use serde::Serialize;

/// Column where the `=>` arrow lines up in the pattern table
const DESCRIBE_WIDTH: usize = 90;

/// One find/replace rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Regex pattern, unanchored
    pub find: String,

    /// Raw replacement text (escapes not yet expanded)
    pub replace: String,
}

impl Rule {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

/// Ordered rules, concatenated across every pattern source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatternSet {
    rules: Vec<Rule>,
}

impl PatternSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append every rule of `other` after ours
    pub fn extend(&mut self, other: PatternSet) {
        self.rules.extend(other.rules);
    }

    /// Render the "find ....... => replace" table shown when a run starts
    pub fn describe(&self) -> String {
        let mut output = String::new();

        for rule in &self.rules {
            let gap = DESCRIBE_WIDTH.saturating_sub(rule.find.chars().count());
            output.push('\n');
            output.push_str(&rule.find);
            if gap > 5 {
                output.push_str("   ");
                output.push_str(&".".repeat(gap));
            } else {
                output.push(' ');
            }
            output.push_str("=> ");
            output.push_str(&rule.replace);
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_aligns_arrows() {
        let set = PatternSet::new(vec![Rule::new("foo", "bar"), Rule::new("a+b", "$1")]);
        let table = set.describe();
        let lines: Vec<&str> = table.lines().filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("foo   ...."));
        assert!(lines[0].ends_with("=> bar"));
        assert_eq!(lines[0].find("=>"), lines[1].find("=>"));
    }

    #[test]
    fn test_describe_long_find() {
        let long = "x".repeat(88);
        let set = PatternSet::new(vec![Rule::new(long.clone(), "y")]);
        assert_eq!(set.describe(), format!("\n{} => y", long));
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = PatternSet::new(vec![Rule::new("a", "b")]);
        first.extend(PatternSet::new(vec![Rule::new("c", "d")]));
        let finds: Vec<&str> = first.rules().iter().map(|r| r.find.as_str()).collect();
        assert_eq!(finds, vec!["a", "c"]);
    }
}
