use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::condition::{Condition, ConditionField, ConditionOperator};
use crate::domain::digital_product::DigitalProduct;
use crate::pagination::Pagination;

/// Whether a rule is considered by the evaluator.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Active,
    InActive,
}

impl RuleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleStatus::Active => "active",
            RuleStatus::InActive => "in_active",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(RuleStatus::Active),
            "in_active" => Some(RuleStatus::InActive),
            _ => None,
        }
    }
}

impl Default for RuleStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Combinator across a rule's conditions.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Every condition must hold (AND).
    All,
    /// At least one condition must hold (OR).
    Any,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::All => "all",
            MatchType::Any => "any",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(MatchType::All),
            "any" => Some(MatchType::Any),
            _ => None,
        }
    }
}

impl Default for MatchType {
    fn default() -> Self {
        Self::All
    }
}

/// Whether the action value is a percentage of the face value or an
/// absolute amount in major currency units.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    Percentage,
    Absolute,
}

impl ActionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionMode::Percentage => "percentage",
            ActionMode::Absolute => "absolute",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percentage" => Some(ActionMode::Percentage),
            "absolute" => Some(ActionMode::Absolute),
            _ => None,
        }
    }
}

impl Default for ActionMode {
    fn default() -> Self {
        Self::Percentage
    }
}

/// Whether the price delta is added to or subtracted from the face value.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ActionOperator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
}

impl ActionOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionOperator::Add => "+",
            ActionOperator::Subtract => "-",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "+" => Some(ActionOperator::Add),
            "-" => Some(ActionOperator::Subtract),
            _ => None,
        }
    }
}

impl Default for ActionOperator {
    fn default() -> Self {
        Self::Add
    }
}

/// Domain representation of a price automation rule owned by a hub.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PriceRule {
    /// Unique identifier of the rule, assigned by the store.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the rule.
    pub name: String,
    /// Optional longer description shown to operators.
    pub description: Option<String>,
    /// Whether the rule participates in evaluation.
    pub status: RuleStatus,
    /// AND/OR combinator across the conditions.
    pub match_type: MatchType,
    /// Conditions a product must satisfy for the rule to apply.
    pub conditions: Vec<Condition>,
    /// Magnitude of the price adjustment; must be positive to submit.
    pub action_value: Option<f64>,
    /// Whether the delta is added or subtracted.
    pub action_operator: ActionOperator,
    /// Whether the delta is a percentage or an absolute amount.
    pub action_mode: ActionMode,
    /// Timestamp for when the rule record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the rule record.
    pub updated_at: NaiveDateTime,
}

impl PriceRule {
    /// Whether this rule applies to the given digital product.
    pub fn matches(&self, product: &DigitalProduct) -> bool {
        match self.match_type {
            MatchType::All => self
                .conditions
                .iter()
                .all(|condition| condition_matches(condition, product)),
            MatchType::Any => self
                .conditions
                .iter()
                .any(|condition| condition_matches(condition, product)),
        }
    }

    /// Compute the new selling price in cents for a product with the given
    /// face value. Returns the face value unchanged when no action value is
    /// set. The result never goes below zero.
    pub fn apply_action(&self, face_value_cents: i64) -> i64 {
        let Some(value) = self.action_value else {
            return face_value_cents;
        };

        let delta = match self.action_mode {
            ActionMode::Percentage => face_value_cents as f64 * value / 100.0,
            ActionMode::Absolute => value * 100.0,
        };

        let adjusted = match self.action_operator {
            ActionOperator::Add => face_value_cents as f64 + delta,
            ActionOperator::Subtract => face_value_cents as f64 - delta,
        };

        (adjusted.round() as i64).max(0)
    }
}

fn condition_matches(condition: &Condition, product: &DigitalProduct) -> bool {
    match condition.field {
        ConditionField::SellingPrice => {
            let Ok(value) = condition.value.trim().parse::<f64>() else {
                return false;
            };
            let threshold_cents = (value * 100.0).round() as i64;
            let price = product.selling_price_cents;
            match condition.operator {
                ConditionOperator::Eq => price == threshold_cents,
                ConditionOperator::Ne => price != threshold_cents,
                ConditionOperator::Gt => price > threshold_cents,
                ConditionOperator::Ge => price >= threshold_cents,
                ConditionOperator::Lt => price < threshold_cents,
                ConditionOperator::Le => price <= threshold_cents,
                ConditionOperator::Contains => false,
            }
        }
        ConditionField::Name => {
            text_matches(&product.name, condition.operator, &condition.value)
        }
        ConditionField::BrandName => {
            let brand = product.brand.as_deref().unwrap_or("");
            match condition.operator {
                ConditionOperator::Eq => brand.eq_ignore_ascii_case(condition.value.trim()),
                ConditionOperator::Ne => !brand.eq_ignore_ascii_case(condition.value.trim()),
                _ => false,
            }
        }
        ConditionField::Regions => match condition.operator {
            ConditionOperator::Contains => product
                .regions
                .iter()
                .any(|region| region.eq_ignore_ascii_case(condition.value.trim())),
            _ => false,
        },
    }
}

fn text_matches(actual: &str, operator: ConditionOperator, expected: &str) -> bool {
    let expected = expected.trim();
    match operator {
        ConditionOperator::Eq => actual.eq_ignore_ascii_case(expected),
        ConditionOperator::Ne => !actual.eq_ignore_ascii_case(expected),
        ConditionOperator::Contains => actual
            .to_ascii_lowercase()
            .contains(&expected.to_ascii_lowercase()),
        _ => false,
    }
}

/// Payload required to insert a new price rule for a hub.
#[derive(Debug, Clone)]
pub struct NewPriceRule {
    /// Owning hub identifier.
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: RuleStatus,
    pub match_type: MatchType,
    pub conditions: Vec<Condition>,
    pub action_value: Option<f64>,
    pub action_operator: ActionOperator,
    pub action_mode: ActionMode,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewPriceRule {
    /// Build a new rule payload with the supplied name and defaults.
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            name: name.into(),
            description: None,
            status: RuleStatus::default(),
            match_type: MatchType::default(),
            conditions: Vec::new(),
            action_value: None,
            action_operator: ActionOperator::default(),
            action_mode: ActionMode::default(),
            updated_at: now,
        }
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_action(mut self, value: f64, operator: ActionOperator, mode: ActionMode) -> Self {
        self.action_value = Some(value);
        self.action_operator = operator;
        self.action_mode = mode;
        self
    }
}

/// Full replacement applied when saving an edited rule.
#[derive(Debug, Clone)]
pub struct UpdatePriceRule {
    pub name: String,
    pub description: Option<String>,
    pub status: RuleStatus,
    pub match_type: MatchType,
    pub conditions: Vec<Condition>,
    pub action_value: Option<f64>,
    pub action_operator: ActionOperator,
    pub action_mode: ActionMode,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list price rules for a hub.
#[derive(Debug, Clone)]
pub struct PriceRuleListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Optional status filter.
    pub status: Option<RuleStatus>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl PriceRuleListQuery {
    /// Construct a query that targets all rules belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            status: None,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results by rule status.
    pub fn status(mut self, status: RuleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::digital_product::DigitalProductStatus;

    fn fixed_datetime() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn sample_product(name: &str, brand: Option<&str>, selling_cents: i64) -> DigitalProduct {
        DigitalProduct {
            id: 1,
            hub_id: 1,
            supplier_id: 1,
            name: name.to_string(),
            sku: "SKU-1".to_string(),
            brand: brand.map(str::to_string),
            description: None,
            tags: Vec::new(),
            image: None,
            cost_price_cents: 800,
            face_value_cents: 1000,
            selling_price_cents: selling_cents,
            status: DigitalProductStatus::Active,
            regions: vec!["US".to_string(), "CA".to_string()],
            metadata: None,
            currency: "USD".to_string(),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn rule_with(match_type: MatchType, conditions: Vec<Condition>) -> PriceRule {
        PriceRule {
            id: 1,
            hub_id: 1,
            name: "Rule".to_string(),
            description: None,
            status: RuleStatus::Active,
            match_type,
            conditions,
            action_value: Some(10.0),
            action_operator: ActionOperator::Add,
            action_mode: ActionMode::Percentage,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn condition(field: ConditionField, operator: ConditionOperator, value: &str) -> Condition {
        Condition {
            id: format!("c-{}", value),
            field,
            operator,
            value: value.to_string(),
        }
    }

    #[test]
    fn match_all_requires_every_condition() {
        let rule = rule_with(
            MatchType::All,
            vec![
                condition(ConditionField::Name, ConditionOperator::Contains, "gift"),
                condition(ConditionField::SellingPrice, ConditionOperator::Gt, "5"),
            ],
        );

        assert!(rule.matches(&sample_product("Gift Card", None, 900)));
        assert!(!rule.matches(&sample_product("Gift Card", None, 400)));
        assert!(!rule.matches(&sample_product("Game Key", None, 900)));
    }

    #[test]
    fn match_any_requires_one_condition() {
        let rule = rule_with(
            MatchType::Any,
            vec![
                condition(ConditionField::BrandName, ConditionOperator::Eq, "Acme"),
                condition(ConditionField::Regions, ConditionOperator::Contains, "ca"),
            ],
        );

        assert!(rule.matches(&sample_product("Card", Some("Other"), 900)));
        assert!(rule.matches(&sample_product("Card", Some("acme"), 900)));
    }

    #[test]
    fn selling_price_compares_in_cents() {
        let rule = rule_with(
            MatchType::All,
            vec![condition(
                ConditionField::SellingPrice,
                ConditionOperator::Le,
                "9.50",
            )],
        );

        assert!(rule.matches(&sample_product("Card", None, 950)));
        assert!(!rule.matches(&sample_product("Card", None, 951)));
    }

    #[test]
    fn unparseable_numeric_value_never_matches() {
        let rule = rule_with(
            MatchType::All,
            vec![condition(
                ConditionField::SellingPrice,
                ConditionOperator::Gt,
                "",
            )],
        );

        assert!(!rule.matches(&sample_product("Card", None, 900)));
    }

    #[test]
    fn apply_action_percentage_and_absolute() {
        let mut rule = rule_with(MatchType::All, Vec::new());

        rule.action_value = Some(5.0);
        rule.action_mode = ActionMode::Percentage;
        rule.action_operator = ActionOperator::Add;
        assert_eq!(rule.apply_action(1000), 1050);

        rule.action_operator = ActionOperator::Subtract;
        assert_eq!(rule.apply_action(1000), 950);

        rule.action_mode = ActionMode::Absolute;
        rule.action_value = Some(2.50);
        assert_eq!(rule.apply_action(1000), 750);

        rule.action_operator = ActionOperator::Add;
        assert_eq!(rule.apply_action(1000), 1250);
    }

    #[test]
    fn apply_action_floors_at_zero_and_defaults_to_face_value() {
        let mut rule = rule_with(MatchType::All, Vec::new());

        rule.action_mode = ActionMode::Absolute;
        rule.action_operator = ActionOperator::Subtract;
        rule.action_value = Some(50.0);
        assert_eq!(rule.apply_action(1000), 0);

        rule.action_value = None;
        assert_eq!(rule.apply_action(1000), 1000);
    }
}
