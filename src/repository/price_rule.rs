use diesel::prelude::*;

use crate::domain::price_rule::{
    NewPriceRule as DomainNewPriceRule, PriceRule as DomainPriceRule, PriceRuleListQuery,
    UpdatePriceRule as DomainUpdatePriceRule,
};
use crate::models::price_rule::{
    NewPriceRule as DbNewPriceRule, PriceRule as DbPriceRule, UpdatePriceRule as DbUpdatePriceRule,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PriceRuleReader, PriceRuleWriter};

impl PriceRuleReader for DieselRepository {
    fn get_price_rule_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainPriceRule>> {
        use crate::schema::price_rules;

        let mut conn = self.conn()?;
        let rule = price_rules::table
            .filter(price_rules::id.eq(id))
            .filter(price_rules::hub_id.eq(hub_id))
            .first::<DbPriceRule>(&mut conn)
            .optional()?;

        match rule {
            Some(db_rule) => Ok(Some(db_rule.into_domain()?)),
            None => Ok(None),
        }
    }

    fn list_price_rules(
        &self,
        query: PriceRuleListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainPriceRule>)> {
        use crate::schema::price_rules;

        let mut conn = self.conn()?;

        let mut count_query = price_rules::table
            .filter(price_rules::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                price_rules::name
                    .like(pattern.clone())
                    .or(price_rules::description.like(pattern)),
            );
        }

        if let Some(status) = query.status {
            count_query = count_query.filter(price_rules::status.eq(status.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = price_rules::table
            .filter(price_rules::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                price_rules::name
                    .like(pattern.clone())
                    .or(price_rules::description.like(pattern)),
            );
        }

        if let Some(status) = query.status {
            items = items.filter(price_rules::status.eq(status.as_str()));
        }

        items = items.order(price_rules::created_at.desc());

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let db_rules = items.load::<DbPriceRule>(&mut conn)?;

        let mut rules = Vec::with_capacity(db_rules.len());
        for db_rule in db_rules {
            rules.push(db_rule.into_domain()?);
        }

        Ok((total, rules))
    }
}

impl PriceRuleWriter for DieselRepository {
    fn create_price_rule(&self, new_rule: &DomainNewPriceRule) -> RepositoryResult<DomainPriceRule> {
        use crate::schema::price_rules;

        let mut conn = self.conn()?;
        let db_new = DbNewPriceRule::from(new_rule);

        let created = diesel::insert_into(price_rules::table)
            .values(&db_new)
            .get_result::<DbPriceRule>(&mut conn)?;

        Ok(created.into_domain()?)
    }

    fn update_price_rule(
        &self,
        rule_id: i32,
        hub_id: i32,
        updates: &DomainUpdatePriceRule,
    ) -> RepositoryResult<DomainPriceRule> {
        use crate::schema::price_rules;

        let mut conn = self.conn()?;
        let db_updates = DbUpdatePriceRule::from(updates);

        let target = price_rules::table
            .filter(price_rules::id.eq(rule_id))
            .filter(price_rules::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbPriceRule>(&mut conn)?;

        Ok(updated.into_domain()?)
    }

    fn delete_price_rule(&self, rule_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::price_rules;

        let mut conn = self.conn()?;

        let target = price_rules::table
            .filter(price_rules::id.eq(rule_id))
            .filter(price_rules::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
