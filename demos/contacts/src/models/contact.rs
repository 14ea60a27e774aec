use sea_orm::ActiveValue::Set;
use sea_orm::IntoActiveModel;
use sea_orm::entity::prelude::*;
use serde::Deserialize;
use validator::Validate;

/// Contact entity stored in the `contacts` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, chopin_jsonable::Model)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub email: String,

    pub phone: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ─── Form ──────────────────────────────────────────────────────

/// Submitted by the "new contact" page or by `fetch()`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(required, length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(required, email)]
    pub email: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

impl IntoActiveModel<ActiveModel> for ContactForm {
    fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            name: Set(self.name.unwrap_or_default()),
            email: Set(self.email.unwrap_or_default()),
            phone: Set(self.phone.filter(|phone| !phone.is_empty())),
            ..Default::default()
        }
    }
}
