//! Plan modifiers
//!
//! Plan modifiers adjust the value Terraform proposes for a single attribute.
//! Resources apply them from `modify_plan` to fill defaults for empty
//! optional attributes and to carry known computed values over from state.

use crate::types::{Diagnostic, Dynamic};

#[derive(Debug, Clone)]
pub struct PlanModifyRequest {
    pub state: Dynamic,
    pub plan: Dynamic,
    pub config: Dynamic,
    pub attribute_path: String,
}

#[derive(Debug, Clone)]
pub struct PlanModifyResponse {
    pub plan_value: Dynamic,
    pub requires_replace: bool,
    pub diagnostics: Vec<Diagnostic>,
}

pub trait PlanModifier: Send + Sync {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse;
}

/// Uses the current state value when the planned value is unknown.
///
/// Computed attributes keep their value during planning when Terraform does
/// not know what the new value will be. Handles Null as well as Unknown
/// since msgpack decoding can collapse unknown markers to null.
pub struct UseStateForUnknown;

impl PlanModifier for UseStateForUnknown {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let plan_value = match &request.plan {
            Dynamic::Unknown | Dynamic::Null => match &request.state {
                Dynamic::Null => request.plan,
                _ => request.state.clone(),
            },
            _ => request.plan,
        };

        PlanModifyResponse {
            plan_value,
            requires_replace: false,
            diagnostics: Vec::new(),
        }
    }
}

/// Substitutes a fixed default when the configured value is null or an empty
/// string, so the stored state matches what the remote API will report back.
pub struct StaticDefaultWhenEmpty {
    default: String,
}

impl StaticDefaultWhenEmpty {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
        }
    }
}

impl PlanModifier for StaticDefaultWhenEmpty {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let plan_value = match &request.plan {
            Dynamic::Null => Dynamic::String(self.default.clone()),
            Dynamic::String(s) if s.is_empty() => Dynamic::String(self.default.clone()),
            _ => request.plan,
        };

        PlanModifyResponse {
            plan_value,
            requires_replace: false,
            diagnostics: Vec::new(),
        }
    }
}

/// Marks an attribute as requiring replacement when its value changes.
pub struct RequiresReplaceIfChanged;

impl PlanModifier for RequiresReplaceIfChanged {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let requires_replace = !matches!(
            (&request.state, &request.plan),
            (Dynamic::Null, Dynamic::Null) | (Dynamic::Unknown, _) | (_, Dynamic::Unknown)
        ) && request.state != request.plan;

        PlanModifyResponse {
            plan_value: request.plan,
            requires_replace,
            diagnostics: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_state_for_unknown_preserves_state_when_unknown() {
        let response = UseStateForUnknown.modify_plan(PlanModifyRequest {
            state: Dynamic::String("2163549237569".to_string()),
            plan: Dynamic::Unknown,
            config: Dynamic::Null,
            attribute_path: "id".to_string(),
        });

        assert_eq!(
            response.plan_value,
            Dynamic::String("2163549237569".to_string())
        );
        assert!(!response.requires_replace);
    }

    #[test]
    fn use_state_for_unknown_keeps_known_plan_value() {
        let response = UseStateForUnknown.modify_plan(PlanModifyRequest {
            state: Dynamic::String("old".to_string()),
            plan: Dynamic::String("new".to_string()),
            config: Dynamic::String("new".to_string()),
            attribute_path: "user_name".to_string(),
        });

        assert_eq!(response.plan_value, Dynamic::String("new".to_string()));
    }

    #[test]
    fn use_state_for_unknown_leaves_unknown_when_no_state() {
        let response = UseStateForUnknown.modify_plan(PlanModifyRequest {
            state: Dynamic::Null,
            plan: Dynamic::Unknown,
            config: Dynamic::Null,
            attribute_path: "id".to_string(),
        });

        assert_eq!(response.plan_value, Dynamic::Unknown);
    }

    #[test]
    fn static_default_fills_null_and_empty() {
        let modifier = StaticDefaultWhenEmpty::new("GENDER_UNSPECIFIED");

        let response = modifier.modify_plan(PlanModifyRequest {
            state: Dynamic::Null,
            plan: Dynamic::Null,
            config: Dynamic::Null,
            attribute_path: "gender".to_string(),
        });
        assert_eq!(
            response.plan_value,
            Dynamic::String("GENDER_UNSPECIFIED".to_string())
        );

        let response = modifier.modify_plan(PlanModifyRequest {
            state: Dynamic::Null,
            plan: Dynamic::String(String::new()),
            config: Dynamic::String(String::new()),
            attribute_path: "gender".to_string(),
        });
        assert_eq!(
            response.plan_value,
            Dynamic::String("GENDER_UNSPECIFIED".to_string())
        );
    }

    #[test]
    fn static_default_keeps_configured_value() {
        let modifier = StaticDefaultWhenEmpty::new("und");

        let response = modifier.modify_plan(PlanModifyRequest {
            state: Dynamic::Null,
            plan: Dynamic::String("de".to_string()),
            config: Dynamic::String("de".to_string()),
            attribute_path: "preferred_language".to_string(),
        });

        assert_eq!(response.plan_value, Dynamic::String("de".to_string()));
    }

    #[test]
    fn requires_replace_ignores_unknown_and_null_pairs() {
        let response = RequiresReplaceIfChanged.modify_plan(PlanModifyRequest {
            state: Dynamic::Unknown,
            plan: Dynamic::String("value".to_string()),
            config: Dynamic::String("value".to_string()),
            attribute_path: "field".to_string(),
        });
        assert!(!response.requires_replace);

        let response = RequiresReplaceIfChanged.modify_plan(PlanModifyRequest {
            state: Dynamic::String("a".to_string()),
            plan: Dynamic::String("b".to_string()),
            config: Dynamic::String("b".to_string()),
            attribute_path: "field".to_string(),
        });
        assert!(response.requires_replace);
    }
}
