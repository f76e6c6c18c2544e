use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::condition::{Condition, ConditionField, ConditionOperator};
use crate::domain::price_rule::{
    ActionMode, ActionOperator, MatchType, NewPriceRule, PriceRule, RuleStatus, UpdatePriceRule,
};

/// Maximum allowed length for a rule name.
const NAME_MAX_LEN: usize = 255;

/// Result type returned by the price rule form helpers.
pub type PriceRuleFormResult<T> = Result<T, PriceRuleFormError>;

/// Errors that can occur while processing price rule forms.
#[derive(Debug, Error)]
pub enum PriceRuleFormError {
    /// The draft failed validation; the message lists the failing fields.
    #[error("rule form is invalid: {0}")]
    Invalid(String),
}

/// Generate a fresh client-side condition identifier.
///
/// Time-based with a random suffix so two conditions added within the same
/// millisecond still get distinct ids.
fn fresh_condition_id() -> String {
    format!(
        "cond-{}-{:04x}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u16>()
    )
}

fn default_condition() -> Condition {
    Condition::new(fresh_condition_id())
}

/// Partial update applied to a single condition row.
#[derive(Debug, Default, Clone)]
pub struct ConditionPatch {
    pub field: Option<ConditionField>,
    pub operator: Option<ConditionOperator>,
    pub value: Option<String>,
}

impl ConditionPatch {
    pub fn field(field: ConditionField) -> Self {
        Self {
            field: Some(field),
            ..Self::default()
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn operator(operator: ConditionOperator) -> Self {
        Self {
            operator: Some(operator),
            ..Self::default()
        }
    }
}

/// Partial update applied to the top-level rule fields.
#[derive(Debug, Default, Clone)]
pub struct RuleFormPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<RuleStatus>,
    pub match_type: Option<MatchType>,
    /// `Some(None)` clears the action value, `None` leaves it untouched.
    pub action_value: Option<Option<f64>>,
    pub action_operator: Option<ActionOperator>,
    pub action_mode: Option<ActionMode>,
}

/// In-memory draft of a price rule as edited by an operator.
///
/// Owns the condition list and the field-level error map. All mutating
/// operations are synchronous and atomic; validation only runs when
/// [`PriceRuleForm::validate`] is called explicitly.
#[derive(Debug, Clone)]
pub struct PriceRuleForm {
    /// Present when editing a stored rule; never mutated by the form.
    pub id: Option<i32>,
    pub name: String,
    pub description: String,
    pub status: RuleStatus,
    pub match_type: MatchType,
    pub conditions: Vec<Condition>,
    pub action_value: Option<f64>,
    pub action_operator: ActionOperator,
    /// Unset until the operator picks a mode; required at submit time.
    pub action_mode: Option<ActionMode>,
    /// Field-level validation errors, keyed by field name or
    /// `condition.<id>` for condition rows.
    pub errors: HashMap<String, String>,
}

impl Default for PriceRuleForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceRuleForm {
    /// A fresh draft with one default condition.
    pub fn new() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            status: RuleStatus::default(),
            match_type: MatchType::default(),
            conditions: vec![default_condition()],
            action_value: None,
            action_operator: ActionOperator::default(),
            action_mode: None,
            errors: HashMap::new(),
        }
    }

    /// Hydrate a draft from a stored rule for editing.
    ///
    /// A rule loaded with zero conditions receives the single default
    /// condition; a draft never has an empty condition list. Operators that
    /// are no longer legal for their field are normalized on entry.
    pub fn from_rule(rule: &PriceRule) -> Self {
        let conditions = if rule.conditions.is_empty() {
            vec![default_condition()]
        } else {
            rule.conditions.clone()
        };

        let mut form = Self {
            id: Some(rule.id),
            name: rule.name.clone(),
            description: rule.description.clone().unwrap_or_default(),
            status: rule.status,
            match_type: rule.match_type,
            conditions,
            action_value: rule.action_value,
            action_operator: rule.action_operator,
            action_mode: Some(rule.action_mode),
            errors: HashMap::new(),
        };
        form.normalize_conditions();
        form
    }

    /// Append a new condition row with the default field and operator.
    pub fn add_condition(&mut self) {
        self.conditions.push(default_condition());
    }

    /// Remove a condition row. Refuses to remove the last remaining row;
    /// returns whether anything was removed.
    pub fn delete_condition(&mut self, id: &str) -> bool {
        if self.conditions.len() <= 1 {
            return false;
        }
        let before = self.conditions.len();
        self.conditions.retain(|condition| condition.id != id);
        self.conditions.len() < before
    }

    /// Merge a patch into the matching condition row.
    ///
    /// Changing the field forces the operator back to the new field's
    /// default and clears the value, because operator legality and value
    /// semantics are field-dependent. Returns whether a row matched.
    pub fn edit_condition(&mut self, id: &str, patch: ConditionPatch) -> bool {
        let Some(condition) = self.conditions.iter_mut().find(|c| c.id == id) else {
            return false;
        };

        if let Some(field) = patch.field
            && field != condition.field
        {
            condition.field = field;
            condition.operator = field.default_operator();
            condition.value.clear();
            // An explicit operator in the same patch still applies below,
            // provided it is legal for the new field.
        }

        if let Some(operator) = patch.operator
            && condition.field.allows(operator)
        {
            condition.operator = operator;
        }

        if let Some(value) = patch.value {
            condition.value = value;
        }

        true
    }

    /// Reset any condition whose operator is illegal for its field to that
    /// field's default operator. Runs once on hydration; idempotent, and
    /// never touches conditions that are already valid.
    pub fn normalize_conditions(&mut self) {
        for condition in &mut self.conditions {
            if !condition.is_operator_legal() {
                condition.operator = condition.field.default_operator();
            }
        }
    }

    /// Shallow merge of top-level rule fields. Does not validate.
    pub fn update(&mut self, patch: RuleFormPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(match_type) = patch.match_type {
            self.match_type = match_type;
        }
        if let Some(action_value) = patch.action_value {
            self.action_value = action_value;
        }
        if let Some(action_operator) = patch.action_operator {
            self.action_operator = action_operator;
        }
        if let Some(action_mode) = patch.action_mode {
            self.action_mode = Some(action_mode);
        }
    }

    /// Validate the draft for submission.
    ///
    /// Sets the error map and returns `false` on any violation; never
    /// panics. Callers must not submit when this returns `false`.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();

        let name = self.name.trim();
        if name.is_empty() {
            self.errors
                .insert("name".to_string(), "Name is required".to_string());
        } else if name.len() > NAME_MAX_LEN {
            self.errors
                .insert("name".to_string(), "Name is too long".to_string());
        }

        match self.action_value {
            Some(value) if value > 0.0 => {}
            _ => {
                self.errors.insert(
                    "action_value".to_string(),
                    "Action value must be greater than zero".to_string(),
                );
            }
        }

        if self.action_mode.is_none() {
            self.errors.insert(
                "action_mode".to_string(),
                "Choose percentage or absolute".to_string(),
            );
        }

        for condition in &self.conditions {
            if condition.value.trim().is_empty() {
                self.errors.insert(
                    format!("condition.{}", condition.id),
                    "Condition value is required".to_string(),
                );
            }
        }

        self.errors.is_empty()
    }

    /// Whether the draft is too incomplete for a meaningful preview: the
    /// first condition has no value or the action value is missing. This is
    /// a soft warning only; the preview still runs (see the preview
    /// service).
    pub fn is_incomplete_for_preview(&self) -> bool {
        let first_empty = self
            .conditions
            .first()
            .map(|condition| condition.value.trim().is_empty())
            .unwrap_or(true);
        first_empty || self.action_value.is_none()
    }

    /// Materialize the draft as an unsaved rule for evaluation.
    pub fn as_draft_rule(&self, hub_id: i32) -> PriceRule {
        let now = chrono::Local::now().naive_utc();
        PriceRule {
            id: self.id.unwrap_or_default(),
            hub_id,
            name: self.name.clone(),
            description: none_if_empty(&self.description),
            status: self.status,
            match_type: self.match_type,
            conditions: self.conditions.clone(),
            action_value: self.action_value,
            action_operator: self.action_operator,
            action_mode: self.action_mode.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate and convert into an insert payload.
    pub fn into_new_rule(mut self, hub_id: i32) -> PriceRuleFormResult<NewPriceRule> {
        if !self.validate() {
            return Err(PriceRuleFormError::Invalid(summarize_errors(&self.errors)));
        }

        let now = chrono::Local::now().naive_utc();
        Ok(NewPriceRule {
            hub_id,
            name: self.name.trim().to_string(),
            description: none_if_empty(&self.description),
            status: self.status,
            match_type: self.match_type,
            conditions: self.conditions,
            action_value: self.action_value,
            action_operator: self.action_operator,
            action_mode: self.action_mode.unwrap_or_default(),
            updated_at: now,
        })
    }

    /// Validate and convert into an update payload.
    pub fn into_update_rule(mut self) -> PriceRuleFormResult<UpdatePriceRule> {
        if !self.validate() {
            return Err(PriceRuleFormError::Invalid(summarize_errors(&self.errors)));
        }

        let now = chrono::Local::now().naive_utc();
        Ok(UpdatePriceRule {
            name: self.name.trim().to_string(),
            description: none_if_empty(&self.description),
            status: self.status,
            match_type: self.match_type,
            conditions: self.conditions,
            action_value: self.action_value,
            action_operator: self.action_operator,
            action_mode: self.action_mode.unwrap_or_default(),
            updated_at: now,
        })
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn summarize_errors(errors: &HashMap<String, String>) -> String {
    let mut fields: Vec<&str> = errors.keys().map(String::as_str).collect();
    fields.sort_unstable();
    fields.join(", ")
}

/// Wire payload posted by the rule editor.
///
/// Condition rows arrive as parallel repeated keys
/// (`condition_id`, `condition_field`, ...), which `serde_html_form`
/// collects into vectors.
#[derive(Debug, Deserialize)]
pub struct SavePriceRuleForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default)]
    pub action_value: Option<String>,
    #[serde(default)]
    pub action_operator: Option<String>,
    #[serde(default)]
    pub action_mode: Option<String>,
    #[serde(default)]
    pub condition_id: Vec<String>,
    #[serde(default)]
    pub condition_field: Vec<String>,
    #[serde(default)]
    pub condition_operator: Vec<String>,
    #[serde(default)]
    pub condition_value: Vec<String>,
}

impl SavePriceRuleForm {
    /// Assemble the posted payload into a draft form.
    ///
    /// Unknown field or operator names fall back to the row's defaults, and
    /// hydration normalization fixes any operator that is illegal for its
    /// field. A payload with no condition rows yields the default single
    /// condition.
    pub fn into_form(self) -> PriceRuleForm {
        let mut conditions = Vec::with_capacity(self.condition_id.len());
        for (index, id) in self.condition_id.iter().enumerate() {
            let field = self
                .condition_field
                .get(index)
                .and_then(|raw| ConditionField::parse(raw))
                .unwrap_or_default();
            let operator = self
                .condition_operator
                .get(index)
                .and_then(|raw| ConditionOperator::parse(raw))
                .unwrap_or_else(|| field.default_operator());
            let value = self.condition_value.get(index).cloned().unwrap_or_default();
            let id = if id.trim().is_empty() {
                fresh_condition_id()
            } else {
                id.clone()
            };
            conditions.push(Condition {
                id,
                field,
                operator,
                value,
            });
        }

        if conditions.is_empty() {
            conditions.push(default_condition());
        }

        let action_value = self
            .action_value
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse::<f64>().ok());

        let mut form = PriceRuleForm {
            id: None,
            name: self.name,
            description: self.description,
            status: self
                .status
                .as_deref()
                .and_then(RuleStatus::parse)
                .unwrap_or_default(),
            match_type: self
                .match_type
                .as_deref()
                .and_then(MatchType::parse)
                .unwrap_or_default(),
            conditions,
            action_value,
            action_operator: self
                .action_operator
                .as_deref()
                .and_then(ActionOperator::parse)
                .unwrap_or_default(),
            action_mode: self.action_mode.as_deref().and_then(ActionMode::parse),
            errors: HashMap::new(),
        };
        form.normalize_conditions();
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_starts_with_one_name_condition() {
        let form = PriceRuleForm::new();

        assert_eq!(form.conditions.len(), 1);
        assert_eq!(form.conditions[0].field, ConditionField::Name);
        assert_eq!(form.conditions[0].operator, ConditionOperator::Eq);
        assert!(form.conditions[0].value.is_empty());
    }

    #[test]
    fn field_change_resets_operator_and_value() {
        let mut form = PriceRuleForm::new();
        let id = form.conditions[0].id.clone();
        form.edit_condition(&id, ConditionPatch::value("gift"));
        form.edit_condition(&id, ConditionPatch::operator(ConditionOperator::Contains));

        assert!(form.edit_condition(&id, ConditionPatch::field(ConditionField::SellingPrice)));

        let condition = &form.conditions[0];
        assert_eq!(condition.field, ConditionField::SellingPrice);
        assert_eq!(condition.operator, ConditionOperator::Eq);
        assert!(ConditionField::SellingPrice.allows(condition.operator));
        assert_eq!(condition.value, "");
    }

    #[test]
    fn same_field_edit_keeps_operator_and_value() {
        let mut form = PriceRuleForm::new();
        let id = form.conditions[0].id.clone();
        form.edit_condition(&id, ConditionPatch::operator(ConditionOperator::Contains));
        form.edit_condition(&id, ConditionPatch::value("gift"));

        form.edit_condition(&id, ConditionPatch::field(ConditionField::Name));

        let condition = &form.conditions[0];
        assert_eq!(condition.operator, ConditionOperator::Contains);
        assert_eq!(condition.value, "gift");
    }

    #[test]
    fn illegal_operator_in_patch_is_ignored() {
        let mut form = PriceRuleForm::new();
        let id = form.conditions[0].id.clone();
        form.edit_condition(&id, ConditionPatch::field(ConditionField::Regions));

        form.edit_condition(&id, ConditionPatch::operator(ConditionOperator::Gt));

        assert_eq!(form.conditions[0].operator, ConditionOperator::Contains);
    }

    #[test]
    fn delete_condition_refuses_last_row() {
        let mut form = PriceRuleForm::new();
        let id = form.conditions[0].id.clone();

        assert!(!form.delete_condition(&id));
        assert_eq!(form.conditions.len(), 1);
    }

    #[test]
    fn delete_condition_removes_matching_row() {
        let mut form = PriceRuleForm::new();
        form.add_condition();
        form.add_condition();
        let target = form.conditions[1].id.clone();

        assert!(form.delete_condition(&target));
        assert_eq!(form.conditions.len(), 2);
        assert!(form.conditions.iter().all(|c| c.id != target));
    }

    #[test]
    fn normalization_fixes_illegal_operators_and_is_idempotent() {
        let mut form = PriceRuleForm::new();
        // Simulate a rule stored before the regions operator set was narrowed.
        form.conditions[0].field = ConditionField::Regions;
        form.conditions[0].operator = ConditionOperator::Gt;
        form.conditions[0].value = "US".to_string();

        form.normalize_conditions();
        let once = form.conditions.clone();
        form.normalize_conditions();

        assert_eq!(form.conditions, once);
        assert_eq!(form.conditions[0].operator, ConditionOperator::Contains);
        assert_eq!(form.conditions[0].value, "US");
    }

    #[test]
    fn normalization_never_touches_valid_conditions() {
        let mut form = PriceRuleForm::new();
        form.conditions[0].operator = ConditionOperator::Contains;
        form.conditions[0].value = "card".to_string();
        let before = form.conditions.clone();

        form.normalize_conditions();

        assert_eq!(form.conditions, before);
    }

    #[test]
    fn validate_rejects_missing_or_non_positive_action_value() {
        for action_value in [None, Some(0.0), Some(-3.0)] {
            let mut form = PriceRuleForm::new();
            form.name = "Summer markdown".to_string();
            form.action_mode = Some(ActionMode::Percentage);
            form.action_value = action_value;
            let id = form.conditions[0].id.clone();
            form.edit_condition(&id, ConditionPatch::value("gift"));

            assert!(!form.validate(), "expected failure for {action_value:?}");
            assert!(form.errors.contains_key("action_value"));
        }
    }

    #[test]
    fn validate_rejects_blank_condition_values() {
        let mut form = PriceRuleForm::new();
        form.name = "Rule".to_string();
        form.action_value = Some(5.0);
        form.action_mode = Some(ActionMode::Absolute);
        form.conditions[0].value = "   ".to_string();

        assert!(!form.validate());
        let key = format!("condition.{}", form.conditions[0].id);
        assert!(form.errors.contains_key(&key));
    }

    #[test]
    fn default_rule_scenario_validates_after_edits() {
        // Mirrors the editor flow: switch the default condition to a price
        // comparison, fill it in, then set the action.
        let mut form = PriceRuleForm::new();
        assert_eq!(form.match_type, MatchType::All);
        let id = form.conditions[0].id.clone();

        form.edit_condition(&id, ConditionPatch::field(ConditionField::SellingPrice));
        assert_eq!(form.conditions[0].operator, ConditionOperator::Eq);
        assert_eq!(form.conditions[0].value, "");

        form.edit_condition(&id, ConditionPatch::value("10"));
        form.name = "Tenner".to_string();
        form.update(RuleFormPatch {
            action_value: Some(Some(5.0)),
            action_mode: Some(ActionMode::Percentage),
            action_operator: Some(ActionOperator::Add),
            ..RuleFormPatch::default()
        });

        assert!(form.validate());
        assert!(form.errors.is_empty());
    }

    #[test]
    fn hydrating_rule_without_conditions_substitutes_default() {
        let rule = PriceRuleForm::new().as_draft_rule(1);
        let empty = PriceRule {
            conditions: Vec::new(),
            ..rule
        };

        let form = PriceRuleForm::from_rule(&empty);

        assert_eq!(form.conditions.len(), 1);
        assert_eq!(form.conditions[0].field, ConditionField::Name);
    }

    #[test]
    fn save_form_zips_condition_rows() {
        let payload = SavePriceRuleForm {
            name: "Bulk rule".to_string(),
            description: String::new(),
            status: Some("in_active".to_string()),
            match_type: Some("any".to_string()),
            action_value: Some("2.5".to_string()),
            action_operator: Some("-".to_string()),
            action_mode: Some("absolute".to_string()),
            condition_id: vec!["c1".to_string(), "c2".to_string()],
            condition_field: vec!["brand_name".to_string(), "regions".to_string()],
            condition_operator: vec!["!=".to_string(), ">".to_string()],
            condition_value: vec!["Acme".to_string(), "US".to_string()],
        };

        let form = payload.into_form();

        assert_eq!(form.status, RuleStatus::InActive);
        assert_eq!(form.match_type, MatchType::Any);
        assert_eq!(form.action_value, Some(2.5));
        assert_eq!(form.action_operator, ActionOperator::Subtract);
        assert_eq!(form.action_mode, Some(ActionMode::Absolute));
        assert_eq!(form.conditions.len(), 2);
        assert_eq!(form.conditions[0].operator, ConditionOperator::Ne);
        // ">" is illegal for regions and is normalized to the default.
        assert_eq!(form.conditions[1].operator, ConditionOperator::Contains);
    }

    #[test]
    fn save_form_parses_repeated_keys() {
        let body = "name=Rule&status=active&match_type=all&action_value=5&action_operator=%2B\
                    &action_mode=percentage&condition_id=c1&condition_field=name\
                    &condition_operator=contains&condition_value=gift";

        let payload: SavePriceRuleForm =
            serde_html_form::from_str(body).expect("form should parse");
        let form = payload.into_form();

        assert_eq!(form.conditions.len(), 1);
        assert_eq!(form.conditions[0].operator, ConditionOperator::Contains);
        assert_eq!(form.action_value, Some(5.0));
        assert_eq!(form.action_operator, ActionOperator::Add);
    }
}
