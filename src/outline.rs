//! Indented outline text: one node per line, children indented deeper than
//! their parent. Blank lines and `#` comment lines are ignored; a tab counts
//! as four spaces.

use std::fmt::Display;
use std::path::Path;

use tracing::{debug, instrument};

use crate::config::TreeSettings;
use crate::errors::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::tree::Tree;

const TAB_WIDTH: usize = 4;

fn indent_of(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

pub fn parse_outline(text: &str) -> TreeResult<Tree<String>> {
    parse_outline_with(text, TreeSettings::default())
}

/// Parses `text` into a tree that uses `settings`.
#[instrument(level = "debug", skip(text))]
pub fn parse_outline_with(text: &str, settings: TreeSettings) -> TreeResult<Tree<String>> {
    let mut tree = Tree::with_settings(settings);
    let mut stack: Vec<(usize, NodeId)> = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let indent = indent_of(line);

        let mut popped = None;
        while let Some(&(level, _)) = stack.last() {
            if level < indent {
                break;
            }
            popped = stack.pop();
        }
        if let Some((level, _)) = popped {
            if level != indent {
                return Err(TreeError::Outline {
                    line: number + 1,
                    reason: format!("indent {indent} matches no enclosing level (siblings at {level})"),
                });
            }
        }

        let id = match stack.last() {
            Some(&(_, parent)) => tree.append_child(parent, content.to_string()),
            None => tree.push_root(content.to_string()),
        };
        stack.push((indent, id));
    }

    debug!(size = tree.size(), "parsed outline");
    Ok(tree)
}

pub fn read_outline(path: &Path, settings: TreeSettings) -> TreeResult<Tree<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_outline_with(&text, settings)
}

/// Writes `tree` as an outline indented by two spaces per level.
pub fn to_outline<T: Display>(tree: &Tree<T>) -> String {
    tree.iter()
        .map(|(id, value)| format!("{:width$}{value}\n", "", width = 2 * tree.depth(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let tree = parse_outline("a\n  b\n    c\n  d\ne\n").unwrap();
        let values: Vec<&str> = tree.values().map(String::as_str).collect();
        assert_eq!(values, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(tree.roots().count(), 2);
        let d = tree.iter().find(|(_, v)| *v == "d").map(|(id, _)| id).unwrap();
        assert_eq!(tree.depth(d), 1);
    }

    #[test]
    fn test_comments_blank_lines_and_tabs() {
        let tree = parse_outline("# header\nroot\n\n\tchild\n    sibling\n").unwrap();
        let root = tree.first_root().unwrap();
        assert_eq!(tree.number_of_children(root), 2);
    }

    #[test]
    fn test_inconsistent_dedent() {
        let err = parse_outline("a\n    b\n  c\n").unwrap_err();
        assert!(matches!(err, TreeError::Outline { line: 3, .. }));
    }

    #[test]
    fn test_outline_round_trip() {
        let text = "a\n  b\n    c\n  d\ne\n";
        let tree = parse_outline(text).unwrap();
        assert_eq!(to_outline(&tree), text);
    }
}
