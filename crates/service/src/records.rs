use std::cmp::Ordering;

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::instrument;
use uuid::Uuid;

use models::income_record::{self, Column, Entity as IncomeRecord, NewIncomeRecord};

use crate::errors::ServiceError;
use crate::query::{Cmp, Filter, ListParams, SortField};

/// Validate and persist a new record. Field defaults (date, category) are
/// applied by the model layer.
#[instrument(skip(db, input), fields(amount = input.amount))]
pub async fn create_record(
    db: &DatabaseConnection,
    input: NewIncomeRecord,
) -> Result<income_record::Model, ServiceError> {
    Ok(income_record::create(db, input).await?)
}

/// One page of the filtered, sorted collection.
#[derive(Debug)]
pub struct RecordPage {
    pub records: Vec<income_record::Model>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Run the list query. Filtering, ordering and the page window are all
/// delegated to the store.
pub async fn list_records(
    db: &DatabaseConnection,
    params: &ListParams,
) -> Result<RecordPage, ServiceError> {
    let (page_idx, per_page) = params.page.normalize();

    let mut query = IncomeRecord::find().filter(build_condition(&params.filters));
    for key in &params.sort {
        let order = if key.descending { Order::Desc } else { Order::Asc };
        query = query.order_by(sort_column(key.field), order);
    }

    let paginator = query.paginate(db, per_page);
    let total = paginator
        .num_items()
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let records = paginator
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    Ok(RecordPage {
        records,
        total,
        total_pages: total.div_ceil(per_page),
        current_page: page_idx + 1,
    })
}

/// Delete by id. `Ok(true)` exactly once per id; a repeat delete sees
/// `Ok(false)` and maps to not-found at the HTTP layer.
pub async fn delete_record(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    Ok(income_record::hard_delete(db, id).await?)
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub total: f64,
    pub count: u64,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_amount: f64,
    pub count: u64,
    pub average: f64,
    pub categories: Vec<CategoryStats>,
}

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    category: String,
    total: Option<f64>,
    count: i64,
}

/// Aggregate the whole collection in one grouped query; overall totals are
/// derived from the per-category rows.
pub async fn collection_stats(db: &DatabaseConnection) -> Result<Stats, ServiceError> {
    let rows = IncomeRecord::find()
        .select_only()
        .column(Column::Category)
        .column_as(Column::Amount.sum(), "total")
        .column_as(Column::Id.count(), "count")
        .group_by(Column::Category)
        .into_model::<CategoryRow>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut categories: Vec<CategoryStats> = rows
        .into_iter()
        .map(|r| CategoryStats {
            category: r.category,
            total: r.total.unwrap_or(0.0),
            count: r.count.max(0) as u64,
        })
        .collect();
    sort_categories(&mut categories);

    let count: u64 = categories.iter().map(|c| c.count).sum();
    let total_amount: f64 = categories.iter().map(|c| c.total).sum();
    let average = if count == 0 { 0.0 } else { round2(total_amount / count as f64) };
    Ok(Stats { total_amount, count, average, categories })
}

/// Descending by summed amount, ties broken by category name ascending.
fn sort_categories(categories: &mut [CategoryStats]) {
    categories.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn build_condition(filters: &[Filter]) -> Condition {
    let mut cond = Condition::all();
    for f in filters {
        cond = cond.add(filter_expr(f));
    }
    cond
}

fn filter_expr(filter: &Filter) -> SimpleExpr {
    match filter {
        Filter::Description(v) => Column::Description.eq(v.clone()),
        Filter::Category(v) => Column::Category.eq(v.clone()),
        Filter::Amount(cmp, v) => cmp_expr(Column::Amount, *cmp, *v),
        Filter::Date(cmp, v) => cmp_expr(Column::Date, *cmp, *v),
        // WHERE FALSE: an unknown field matches no stored record
        Filter::Unmatchable(_) => Expr::value(false),
    }
}

fn cmp_expr<V>(col: Column, cmp: Cmp, value: V) -> SimpleExpr
where
    V: Into<sea_orm::Value>,
{
    match cmp {
        Cmp::Eq => col.eq(value),
        Cmp::Gte => col.gte(value),
        Cmp::Gt => col.gt(value),
        Cmp::Lte => col.lte(value),
        Cmp::Lt => col.lt(value),
    }
}

fn sort_column(field: SortField) -> Column {
    match field {
        SortField::Date => Column::Date,
        SortField::Amount => Column::Amount,
        SortField::Description => Column::Description,
        SortField::Category => Column::Category,
        SortField::CreatedAt => Column::CreatedAt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn unmatchable_filter_renders_where_false() {
        let cond = build_condition(&[Filter::Unmatchable("colour".into())]);
        let sql = IncomeRecord::find()
            .filter(cond)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("FALSE"), "sql: {}", sql);
    }

    #[test]
    fn typed_filters_render_as_sql_comparisons() {
        let cond = build_condition(&[
            Filter::Amount(Cmp::Gte, 100.0),
            Filter::Category("Salary".into()),
        ]);
        let sql = IncomeRecord::find()
            .filter(cond)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""amount" >= 100"#), "sql: {}", sql);
        assert!(sql.contains(r#""category" = 'Salary'"#), "sql: {}", sql);
    }

    #[test]
    fn rounding_is_two_decimal_places() {
        assert_eq!(round2(83.333333), 83.33);
        assert_eq!(round2(83.335), 83.34);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn category_sort_is_deterministic() {
        let mut cats = vec![
            CategoryStats { category: "Salary".into(), total: 100.0, count: 1 },
            CategoryStats { category: "Other".into(), total: 250.0, count: 2 },
            CategoryStats { category: "Freelance".into(), total: 100.0, count: 1 },
        ];
        sort_categories(&mut cats);
        let names: Vec<_> = cats.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Other", "Freelance", "Salary"]);
    }
}
