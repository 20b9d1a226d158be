use std::fs;
use std::path::Path;
use tracing::debug;

use super::{PatternSet, Rule};
use crate::core::error::SubtxtError;

/// Line that ends a pattern source, compared case-insensitively
const TERMINATOR: &str = "EOF";

/// A rule being assembled line by line
#[derive(Debug, Default)]
struct PendingRule {
    find: Option<String>,
    replace: Option<String>,
}

impl PendingRule {
    fn is_complete(&self) -> bool {
        self.find.is_some() && self.replace.is_some()
    }

    fn take_rule(&mut self) -> Option<Rule> {
        match (self.find.take(), self.replace.take()) {
            (Some(find), Some(replace)) => Some(Rule { find, replace }),
            _ => None,
        }
    }
}

/// Parse the text of one pattern source.
///
/// Lines are read as `find`, `replace`, then an optional separator. A blank
/// separator is consumed; a non-blank one starts the next rule. Parsing stops
/// at an `EOF` line. A trailing `find` without its `replace` is dropped.
pub fn parse_patterns(text: &str) -> Vec<Rule> {
    let mut rules = Vec::new();
    let mut pending = PendingRule::default();

    for raw in text.split_inclusive('\n') {
        let line = strip_terminator(raw);

        if line.eq_ignore_ascii_case(TERMINATOR) {
            break;
        }

        if pending.is_complete() {
            rules.extend(pending.take_rule());
            if line.is_empty() {
                continue;
            }
        }

        if pending.find.is_none() {
            // stray blank lines between records
            if !line.is_empty() {
                pending.find = Some(line.to_string());
            }
        } else {
            pending.replace = Some(line.to_string());
        }
    }

    rules.extend(pending.take_rule());
    rules
}

/// Load and concatenate pattern sources in the order given
pub fn load_patterns<P: AsRef<Path>>(sources: &[P]) -> Result<PatternSet, SubtxtError> {
    let mut set = PatternSet::default();

    for source in sources {
        let path = source.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SubtxtError::from_io(path, e))?;
        let rules = parse_patterns(&text);
        debug!("Loaded {} rule(s) from {}", rules.len(), path.display());
        set.extend(PatternSet::new(rules));
    }

    Ok(set)
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
