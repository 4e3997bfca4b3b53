use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const MAX_DESCRIPTION_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "income_record")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: DateTimeWithTimeZone,
    pub category: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Closed category set. Stored by its display string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Category {
    Salary,
    Freelance,
    Investment,
    GiftBonus,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::GiftBonus,
        Category::Other,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Salary" => Some(Category::Salary),
            "Freelance" => Some(Category::Freelance),
            "Investment" => Some(Category::Investment),
            "Gift/Bonus" => Some(Category::GiftBonus),
            "Other" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investment => "Investment",
            Category::GiftBonus => "Gift/Bonus",
            Category::Other => "Other",
        }
    }
}

pub fn validate_description(description: &str) -> Result<(), ModelError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation("description is required".into()));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ModelError::Validation(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<(), ModelError> {
    if !amount.is_finite() {
        return Err(ModelError::Validation("amount must be a number".into()));
    }
    if amount < 0.0 {
        return Err(ModelError::Validation("amount must be >= 0".into()));
    }
    Ok(())
}

/// Absent category defaults to `Other`; a provided but unknown value is
/// rejected rather than silently normalized.
pub fn parse_category(raw: Option<&str>) -> Result<Category, ModelError> {
    match raw {
        None => Ok(Category::default()),
        Some(s) => Category::parse(s).ok_or_else(|| {
            ModelError::Validation(format!(
                "category must be one of: {}",
                Category::ALL.map(Category::as_str).join(", ")
            ))
        }),
    }
}

/// Create input. `date` defaults to now, `category` to `Other`.
#[derive(Debug, Clone)]
pub struct NewIncomeRecord {
    pub description: String,
    pub amount: f64,
    pub date: Option<DateTimeWithTimeZone>,
    pub category: Option<String>,
}

pub async fn create(db: &DatabaseConnection, input: NewIncomeRecord) -> Result<Model, ModelError> {
    validate_description(&input.description)?;
    validate_amount(input.amount)?;
    let category = parse_category(input.category.as_deref())?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        description: Set(input.description.trim().to_string()),
        amount: Set(input.amount),
        date: Set(input.date.unwrap_or(now)),
        category: Set(category.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Remove by id. Returns whether a row was actually deleted, so callers can
/// distinguish the first delete (true) from a repeat (false).
pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
