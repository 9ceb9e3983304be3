//! Schema boundary over the closed category → action mapping.

use lumen_core::errors::SchemaError;
use lumen_core::{Action, Category, Event, RawEvent};

/// Whether `action` belongs to `category`.
///
/// Ownership is defined by [`Action::category`], an exhaustive match, so a
/// new action without a category does not compile.
pub fn is_valid(category: Category, action: Action) -> bool {
    action.category() == category
}

/// Validate an untyped pair of strings.
pub fn parse(category: &str, action: &str) -> Result<(Category, Action), SchemaError> {
    let parsed_category: Category = category.parse()?;
    let parsed_action: Action = action.parse()?;
    if !is_valid(parsed_category, parsed_action) {
        return Err(SchemaError::ActionMismatch {
            category: category.to_string(),
            action: action.to_string(),
        });
    }
    Ok((parsed_category, parsed_action))
}

/// Convert a host record into a typed event.
pub fn parse_raw(raw: RawEvent) -> Result<Event, SchemaError> {
    Event::try_from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_owned_actions() {
        for action in Action::ALL {
            assert!(is_valid(action.category(), action));
        }
    }

    #[test]
    fn rejects_cross_category_pairs() {
        assert!(!is_valid(Category::Perf, Action::CtaClick));
        assert!(!is_valid(Category::Heartbeat, Action::Exception));
    }

    #[test]
    fn parse_reports_each_failure() {
        assert!(matches!(
            parse("telemetry", "tick"),
            Err(SchemaError::UnknownCategory { .. })
        ));
        assert!(matches!(
            parse("perf", "warp_speed"),
            Err(SchemaError::UnknownAction { .. })
        ));
        assert!(matches!(
            parse("perf", "cta_click"),
            Err(SchemaError::ActionMismatch { .. })
        ));
        assert_eq!(
            parse("perf", "hero_paint").unwrap(),
            (Category::Perf, Action::HeroPaint)
        );
    }
}
