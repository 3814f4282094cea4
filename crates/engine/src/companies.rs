//! Company directory entries.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, entity::prelude::*};
use uuid::Uuid;

use crate::{Engine, EngineError, ResultEngine};

/// A company in the directory. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    /// Unique address companies are reachable under.
    pub email: String,
    pub wallet_address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub wallet_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Company> for ActiveModel {
    fn from(company: &Company) -> Self {
        Self {
            id: ActiveValue::Set(company.id.to_string()),
            name: ActiveValue::Set(company.name.clone()),
            email: ActiveValue::Set(company.email.clone()),
            wallet_address: ActiveValue::Set(company.wallet_address.clone()),
        }
    }
}

impl TryFrom<Model> for Company {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("company not exists".to_string()))?,
            name: model.name,
            email: model.email,
            wallet_address: model.wallet_address,
        })
    }
}

impl Engine {
    /// Adds a company to the directory. Emails are unique.
    pub async fn new_company(
        &self,
        name: &str,
        email: &str,
        wallet_address: Option<String>,
    ) -> ResultEngine<Uuid> {
        if self.company_by_email(email).await?.is_some() {
            return Err(EngineError::ExistingKey(email.to_string()));
        }

        let company = Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            wallet_address,
        };
        ActiveModel::from(&company).insert(&self.database).await?;
        Ok(company.id)
    }

    /// Lists every company in the directory.
    pub async fn companies(&self) -> ResultEngine<Vec<Company>> {
        let models = Entity::find()
            .order_by_asc(Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Company::try_from).collect()
    }

    /// Returns a company by id.
    pub async fn company(&self, company_id: &str) -> ResultEngine<Company> {
        let model = Entity::find_by_id(company_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("company not exists".to_string()))?;
        Company::try_from(model)
    }

    /// Returns the company registered under an email, if any.
    pub async fn company_by_email(&self, email: &str) -> ResultEngine<Option<Company>> {
        let model = Entity::find()
            .filter(Column::Email.eq(email))
            .one(&self.database)
            .await?;
        model.map(Company::try_from).transpose()
    }

    /// Looks up a company by email, creating a directory stub when the email
    /// is unknown. Payments and requests can target addresses that have not
    /// onboarded yet.
    pub(crate) async fn ensure_company_by_email(
        &self,
        email: &str,
        display_name: Option<&str>,
    ) -> ResultEngine<Company> {
        if let Some(company) = self.company_by_email(email).await? {
            return Ok(company);
        }

        let company = Company {
            id: Uuid::new_v4(),
            name: display_name.unwrap_or("New Company").to_string(),
            email: email.to_string(),
            wallet_address: None,
        };
        ActiveModel::from(&company).insert(&self.database).await?;
        Ok(company)
    }
}
