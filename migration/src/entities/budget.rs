use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub amount: f64,
    /// "weekly" | "monthly" | "yearly"
    pub period: String,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub alerts_enabled: bool,
    pub alert_threshold: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
