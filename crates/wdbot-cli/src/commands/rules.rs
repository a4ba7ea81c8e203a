//! List the constraints each kind of item is checked against

use super::{load_constraints, Global};
use anyhow::Result;
use wdbot_constraint::ConstraintSet;
use wdbot_model::EntityKind;

pub fn run(global: &Global, kind: Option<EntityKind>) -> Result<()> {
    let config = global.load_config()?;
    let constraints = load_constraints(&config)?;
    print!("{}", render(&constraints, kind));
    Ok(())
}

pub fn render(constraints: &ConstraintSet, only: Option<EntityKind>) -> String {
    let mut out = String::new();
    for kind in EntityKind::ALL {
        if only.is_some_and(|k| k != kind) {
            continue;
        }
        let list = constraints.constraints(kind);
        out.push_str(&format!("{} ({} constraints)\n", kind, list.len()));
        for constraint in list {
            let marker = match (constraint.has_fixer(), constraint.requires_confirmation()) {
                (true, true) => " [fixable, confirm]",
                (true, false) => " [fixable]",
                (false, _) => "",
            };
            out.push_str(&format!("  {}{}\n", constraint.name(), marker));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wdbot_constraint::{ConstraintRegistry, SourceCatalog};

    fn constraints() -> ConstraintSet {
        let mut registry = ConstraintRegistry::new();
        registry
            .load_string(
                r#"
[[rule]]
applies_to = ["episode", "season"]

[rule.kind]
type = "has_property"
properties = ["P57"]

[[rule]]
applies_to = ["episode"]

[rule.kind]
type = "has_english_label"
"#,
            )
            .unwrap();
        registry.build(&SourceCatalog::new())
    }

    #[test]
    fn test_render_single_kind() {
        let text = render(&constraints(), Some(EntityKind::Episode));
        assert_eq!(
            text,
            "episode (2 constraints)\n  has_property(director)\n  has_english_label() [fixable, confirm]\n"
        );
    }

    #[test]
    fn test_render_all_kinds() {
        let text = render(&constraints(), None);
        assert!(text.contains("season (1 constraints)\n"));
        assert!(text.contains("board_game (0 constraints)\n"));
    }
}
