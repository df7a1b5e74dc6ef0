use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, Category};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, Repositories};

pub const DUPLICATE_CATEGORY: &str = "Category with this name already exists";

/// Category administration. Reads are public, writes are admin-only.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

fn require_admin(actor: &Actor) -> Result<(), DomainError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}

fn category_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("Please provide a category name".into()));
    }
    Ok(name.to_string())
}

// The unique index on the name is the only duplicate check; its violation
// is the signal.
fn duplicate_as_validation(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Validation(DUPLICATE_CATEGORY.into()),
        e => e.into(),
    }
}

impl CategoryService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            categories: repos.categories.clone(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub async fn create(&self, actor: &Actor, name: &str) -> Result<Category, DomainError> {
        require_admin(actor)?;
        let category = self
            .categories
            .insert(Category::new(category_name(name)?))
            .await
            .map_err(duplicate_as_validation)?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn rename(&self, actor: &Actor, id: Uuid, name: &str) -> Result<Category, DomainError> {
        require_admin(actor)?;
        let name = category_name(name)?;
        let current = self.get(id).await?;
        if current.name == name {
            return Ok(current);
        }

        let category = self
            .categories
            .rename(id, name)
            .await
            .map_err(duplicate_as_validation)?
            .ok_or_else(|| DomainError::not_found("Category", id))?;

        tracing::info!(category_id = %id, name = %category.name, "Category renamed");
        Ok(category)
    }

    /// Delete a category. Fails while posts still reference it.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), DomainError> {
        require_admin(actor)?;
        self.categories.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Category", id),
            RepoError::Constraint(_) => {
                DomainError::Validation("Category is still assigned to posts".into())
            }
            e => e.into(),
        })?;

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
