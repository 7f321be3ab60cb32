// src/parser/assembler.rs
use super::annotator::{CommentIndex, HELP_MARKER};
use super::classifier::ClassifiedTarget;
use crate::core::Target;

/// Help text of a raw comment: the trimmed text after its last `##`
pub fn help_text(raw: &str) -> String {
    raw.rsplit(HELP_MARKER).next().unwrap_or_default().trim().to_string()
}

/// Join classified targets with their comments by name, keeping dump order
pub fn assemble(classified: Vec<ClassifiedTarget>, comments: &CommentIndex) -> Vec<Target> {
    classified
        .into_iter()
        .map(|target| {
            let help = comments.get(&target.name).map(help_text).unwrap_or_default();
            Target {
                name: target.name,
                help,
                is_phony: target.is_phony,
                updated: target.last_update,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(name: &str, is_phony: bool) -> ClassifiedTarget {
        ClassifiedTarget {
            name: name.to_string(),
            is_phony,
            last_update: None,
        }
    }

    #[test]
    fn test_help_text_is_trimmed() {
        assert_eq!(help_text(" ## build stuff "), "build stuff");
    }

    #[test]
    fn test_help_text_takes_last_segment() {
        assert_eq!(help_text(" deps ## first ## second"), "second");
        assert_eq!(help_text(" ## ##"), "");
    }

    #[test]
    fn test_assemble_left_joins_on_name() {
        let comments = CommentIndex::from_reader("foo: ## build stuff\n".as_bytes()).unwrap();
        let targets = assemble(
            vec![classified("bar", true), classified("foo", false), classified("bar", false)],
            &comments,
        );

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].name, "bar");
        assert_eq!(targets[0].help, "");
        assert!(targets[0].is_phony);
        assert_eq!(targets[1].name, "foo");
        assert_eq!(targets[1].help, "build stuff");
        assert!(!targets[2].is_phony);
    }
}
