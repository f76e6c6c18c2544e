use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::condition::Condition;
use crate::domain::price_rule::{
    ActionMode, ActionOperator, MatchType, NewPriceRule as DomainNewPriceRule,
    PriceRule as DomainPriceRule, RuleStatus, UpdatePriceRule as DomainUpdatePriceRule,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::price_rules)]
pub struct PriceRule {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub match_type: String,
    /// Conditions serialized as a JSON array.
    pub conditions: String,
    pub action_value: Option<f64>,
    pub action_operator: String,
    pub action_mode: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::price_rules)]
pub struct NewPriceRule {
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub match_type: String,
    pub conditions: String,
    pub action_value: Option<f64>,
    pub action_operator: String,
    pub action_mode: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::price_rules)]
#[diesel(treat_none_as_null = true)]
pub struct UpdatePriceRule {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub match_type: String,
    pub conditions: String,
    pub action_value: Option<f64>,
    pub action_operator: String,
    pub action_mode: String,
    pub updated_at: NaiveDateTime,
}

impl PriceRule {
    /// Convert the stored row into its domain form. Fails when the stored
    /// conditions column does not hold valid JSON.
    pub fn into_domain(self) -> Result<DomainPriceRule, serde_json::Error> {
        let conditions: Vec<Condition> = serde_json::from_str(&self.conditions)?;
        Ok(DomainPriceRule {
            id: self.id,
            hub_id: self.hub_id,
            name: self.name,
            description: self.description,
            status: RuleStatus::parse(&self.status).unwrap_or_default(),
            match_type: MatchType::parse(&self.match_type).unwrap_or_default(),
            conditions,
            action_value: self.action_value,
            action_operator: ActionOperator::parse(&self.action_operator).unwrap_or_default(),
            action_mode: ActionMode::parse(&self.action_mode).unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn encode_conditions(conditions: &[Condition]) -> String {
    serde_json::to_string(conditions).unwrap_or_else(|_| "[]".to_string())
}

impl From<&DomainNewPriceRule> for NewPriceRule {
    fn from(value: &DomainNewPriceRule) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.clone(),
            description: value.description.clone(),
            status: value.status.as_str().to_string(),
            match_type: value.match_type.as_str().to_string(),
            conditions: encode_conditions(&value.conditions),
            action_value: value.action_value,
            action_operator: value.action_operator.as_str().to_string(),
            action_mode: value.action_mode.as_str().to_string(),
        }
    }
}

impl From<&DomainUpdatePriceRule> for UpdatePriceRule {
    fn from(value: &DomainUpdatePriceRule) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            status: value.status.as_str().to_string(),
            match_type: value.match_type.as_str().to_string(),
            conditions: encode_conditions(&value.conditions),
            action_value: value.action_value,
            action_operator: value.action_operator.as_str().to_string(),
            action_mode: value.action_mode.as_str().to_string(),
            updated_at: value.updated_at,
        }
    }
}
