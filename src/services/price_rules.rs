use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::digital_product::{DigitalProduct, DigitalProductListQuery};
use crate::domain::price_rule::{PriceRule, PriceRuleListQuery, RuleStatus};
use crate::forms::price_rules::PriceRuleForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{DigitalProductReader, PriceRuleReader, PriceRuleWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the price rules index page.
#[derive(Debug, Default, Deserialize)]
pub struct RulesQuery {
    /// Optional name search string entered by the user.
    pub search: Option<String>,
    /// Optional status filter (`active` / `in_active`).
    pub status: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the price rules index template.
pub struct RulesPageData {
    pub rules: Paginated<PriceRule>,
    pub search: Option<String>,
    pub status: Option<RuleStatus>,
}

/// Loads the price rules overview page.
pub fn load_rules_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: RulesQuery,
) -> ServiceResult<RulesPageData>
where
    R: PriceRuleReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let RulesQuery {
        search,
        status,
        page,
    } = query;

    let page = page.unwrap_or(1);
    let status = status.as_deref().and_then(RuleStatus::parse);

    let mut list_query =
        PriceRuleListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, items) = repo.list_price_rules(list_query)?;
    let rules = Paginated::new(items, page, DEFAULT_ITEMS_PER_PAGE, total);

    Ok(RulesPageData {
        rules,
        search,
        status,
    })
}

/// Loads a stored rule into an editor draft.
///
/// Conditions with operators that are no longer legal for their field are
/// corrected during hydration, so the editor never shows an invalid
/// field/operator pair.
pub fn load_rule_editor<R>(
    repo: &R,
    user: &AuthenticatedUser,
    rule_id: i32,
) -> ServiceResult<PriceRuleForm>
where
    R: PriceRuleReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let rule = repo
        .get_price_rule_by_id(rule_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(PriceRuleForm::from_rule(&rule))
}

/// Creates a new price rule for the authenticated user's hub.
pub fn create_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PriceRuleForm,
) -> ServiceResult<PriceRule>
where
    R: PriceRuleWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_rule(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_price_rule(&payload)?)
}

/// Replaces a stored rule with the submitted draft.
pub fn update_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    rule_id: i32,
    form: PriceRuleForm,
) -> ServiceResult<PriceRule>
where
    R: PriceRuleWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_update_rule()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.update_price_rule(rule_id, user.hub_id, &payload)?)
}

/// Deletes a stored rule.
pub fn delete_rule<R>(repo: &R, user: &AuthenticatedUser, rule_id: i32) -> ServiceResult<()>
where
    R: PriceRuleWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.delete_price_rule(rule_id, user.hub_id)?)
}

/// A stock item matched by a previewed rule, with the price the rule
/// would produce.
#[derive(Debug, Serialize)]
pub struct PreviewItem {
    pub digital_product: DigitalProduct,
    /// Price after the rule's action, in the smallest currency unit.
    pub adjusted_price_cents: i64,
}

/// Result of a rule preview.
#[derive(Debug, Serialize)]
pub struct RulePreview {
    /// Soft warning shown when the draft is too incomplete for a
    /// meaningful preview. The evaluation below still ran.
    pub warning: Option<String>,
    pub items: Vec<PreviewItem>,
}

/// Evaluates a draft rule against the hub's digital stock without saving
/// anything.
///
/// An incomplete draft (blank first condition value or missing action
/// value) produces a warning but does not block the evaluation, so
/// operators can still see what a partially filled rule would match.
pub fn preview_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &PriceRuleForm,
) -> ServiceResult<RulePreview>
where
    R: DigitalProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let warning = form.is_incomplete_for_preview().then(|| {
        "Fill in the rule form to preview affected products".to_string()
    });

    let rule = form.as_draft_rule(user.hub_id);
    let (_, products) = repo.list_digital_products(DigitalProductListQuery::new(user.hub_id))?;

    let items = products
        .into_iter()
        .filter(|product| rule.matches(product))
        .map(|product| {
            let adjusted_price_cents = rule.apply_action(product.face_value_cents);
            PreviewItem {
                digital_product: product,
                adjusted_price_cents,
            }
        })
        .collect();

    Ok(RulePreview { warning, items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::condition::{Condition, ConditionField, ConditionOperator};
    use crate::domain::digital_product::DigitalProductStatus;
    use crate::domain::price_rule::{ActionMode, ActionOperator, MatchType};
    use crate::forms::price_rules::{ConditionPatch, RuleFormPatch};
    use crate::repository::mock::{
        MockDigitalProductReader, MockPriceRuleReader, MockPriceRuleWriter,
    };

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn user_with_role(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user".to_string(),
            email: "user@example.com".to_string(),
            hub_id: 11,
            name: "User".to_string(),
            roles: vec![role.to_string()],
            exp: 0,
        }
    }

    fn sample_product(id: i32, name: &str, face_value_cents: i64) -> DigitalProduct {
        DigitalProduct {
            id,
            hub_id: 11,
            supplier_id: 1,
            name: name.to_string(),
            sku: format!("SKU-{id}"),
            brand: Some("Acme".to_string()),
            description: None,
            tags: Vec::new(),
            image: None,
            cost_price_cents: 800,
            face_value_cents,
            selling_price_cents: face_value_cents,
            status: DigitalProductStatus::Active,
            regions: vec!["US".to_string()],
            metadata: None,
            currency: "USD".to_string(),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn sample_rule(id: i32) -> PriceRule {
        PriceRule {
            id,
            hub_id: 11,
            name: "Markdown".to_string(),
            description: None,
            status: RuleStatus::Active,
            match_type: MatchType::All,
            conditions: vec![Condition {
                id: "c1".to_string(),
                field: ConditionField::BrandName,
                operator: ConditionOperator::Eq,
                value: "Acme".to_string(),
            }],
            action_value: Some(10.0),
            action_operator: ActionOperator::Subtract,
            action_mode: ActionMode::Percentage,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    #[test]
    fn load_rules_page_requires_role() {
        let repo = MockPriceRuleReader::new();
        let user = user_with_role("viewer");

        let result = load_rules_page(&repo, &user, RulesQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_rules_page_paginates() {
        let mut repo = MockPriceRuleReader::new();
        repo.expect_list_price_rules()
            .returning(|_| Ok((1, vec![sample_rule(1)])));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        let data = load_rules_page(&repo, &user, RulesQuery::default()).expect("page loads");

        assert_eq!(data.rules.items.len(), 1);
        assert_eq!(data.rules.meta.current_page, 1);
        assert_eq!(data.rules.meta.total, 1);
    }

    #[test]
    fn load_rule_editor_normalizes_stored_operator() {
        let mut repo = MockPriceRuleReader::new();
        repo.expect_get_price_rule_by_id().returning(|id, _| {
            let mut rule = sample_rule(id);
            // Stored before the regions operator set was narrowed.
            rule.conditions[0].field = ConditionField::Regions;
            rule.conditions[0].operator = ConditionOperator::Gt;
            Ok(Some(rule))
        });
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        let form = load_rule_editor(&repo, &user, 7).expect("editor loads");

        assert_eq!(form.conditions[0].operator, ConditionOperator::Contains);
    }

    #[test]
    fn load_rule_editor_missing_rule_is_not_found() {
        let mut repo = MockPriceRuleReader::new();
        repo.expect_get_price_rule_by_id().returning(|_, _| Ok(None));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        assert!(matches!(
            load_rule_editor(&repo, &user, 7),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn create_rule_rejects_invalid_draft() {
        let repo = MockPriceRuleWriter::new();
        let user = user_with_role(SERVICE_ACCESS_ROLE);
        let form = PriceRuleForm::new();

        assert!(matches!(
            create_rule(&repo, &user, form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn create_rule_persists_valid_draft() {
        let mut repo = MockPriceRuleWriter::new();
        repo.expect_create_price_rule()
            .withf(|payload| payload.hub_id == 11 && payload.name == "Tenner")
            .returning(|_| Ok(sample_rule(1)));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        let mut form = PriceRuleForm::new();
        let id = form.conditions[0].id.clone();
        form.name = "Tenner".to_string();
        form.edit_condition(&id, ConditionPatch::value("gift"));
        form.update(RuleFormPatch {
            action_value: Some(Some(5.0)),
            action_mode: Some(ActionMode::Percentage),
            ..RuleFormPatch::default()
        });

        assert!(create_rule(&repo, &user, form).is_ok());
    }

    #[test]
    fn preview_incomplete_draft_warns_but_still_evaluates() {
        let mut repo = MockDigitalProductReader::new();
        repo.expect_list_digital_products()
            .returning(|_| Ok((2, vec![sample_product(1, "Card A", 1000), sample_product(2, "Card B", 2000)])));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        // Brand condition filled, but no action value: incomplete.
        let mut form = PriceRuleForm::new();
        let id = form.conditions[0].id.clone();
        form.edit_condition(&id, ConditionPatch::field(ConditionField::BrandName));
        form.edit_condition(&id, ConditionPatch::value("Acme"));

        let preview = preview_rule(&repo, &user, &form).expect("preview runs");

        assert!(preview.warning.is_some());
        assert_eq!(preview.items.len(), 2);
        // Without an action value the face value passes through unchanged.
        assert_eq!(preview.items[0].adjusted_price_cents, 1000);
    }

    #[test]
    fn preview_applies_action_to_matches() {
        let mut repo = MockDigitalProductReader::new();
        repo.expect_list_digital_products()
            .returning(|_| Ok((2, vec![sample_product(1, "Card A", 1000), sample_product(2, "Other", 2000)])));
        let user = user_with_role(SERVICE_ACCESS_ROLE);

        let mut form = PriceRuleForm::new();
        let id = form.conditions[0].id.clone();
        form.edit_condition(&id, ConditionPatch::operator(ConditionOperator::Contains));
        form.edit_condition(&id, ConditionPatch::value("Card A"));
        form.update(RuleFormPatch {
            action_value: Some(Some(10.0)),
            action_mode: Some(ActionMode::Percentage),
            action_operator: Some(ActionOperator::Subtract),
            ..RuleFormPatch::default()
        });

        let preview = preview_rule(&repo, &user, &form).expect("preview runs");

        assert!(preview.warning.is_none());
        assert_eq!(preview.items.len(), 1);
        assert_eq!(preview.items[0].adjusted_price_cents, 900);
    }

    #[test]
    fn delete_rule_requires_role() {
        let repo = MockPriceRuleWriter::new();
        let user = user_with_role("viewer");

        assert!(matches!(
            delete_rule(&repo, &user, 3),
            Err(ServiceError::Unauthorized)
        ));
    }
}
