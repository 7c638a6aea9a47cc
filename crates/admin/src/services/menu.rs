//! Dish and category maintenance.
//!
//! Every operation validates its form first, then issues exactly one store
//! request. Nothing is cached or patched here: the lists shown by the panel
//! come from the collection sync and pick up the change from the next pushed
//! snapshot.

use std::sync::Arc;

use buffet_simone_core::catalog::{CategoryForm, DishForm};
use buffet_simone_core::types::{CategoryId, DishId};
use buffet_simone_core::validation::FieldErrors;
use buffet_simone_store::document::to_fields;
use buffet_simone_store::{Collection, DocumentStore, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Answer to the "are you sure?" prompt before a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Anything but an explicit yes declines.
    #[must_use]
    pub const fn from_flag(confirm: Option<bool>) -> Self {
        match confirm {
            Some(true) => Self::Confirmed,
            _ => Self::Declined,
        }
    }
}

/// What a delete call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    /// Declined at the prompt; no request was sent.
    Cancelled,
}

/// Errors from menu maintenance.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for MenuError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Writes dishes and categories to the document store.
#[derive(Clone)]
pub struct MenuController {
    documents: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for MenuController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuController")
            .field("backend", &self.documents.backend_name())
            .finish()
    }
}

impl MenuController {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Create a dish.
    ///
    /// # Errors
    ///
    /// `Validation` with every rejected field, or `Store` if the write fails.
    pub async fn add_dish(&self, form: &DishForm) -> Result<DishId, MenuError> {
        let dish = form.validate()?;
        let id = self
            .documents
            .create(Collection::Dishes, to_fields(&dish)?)
            .await?;
        tracing::info!(dish_id = %id, name = %dish.name, "Dish added");
        // Ids minted by the store are never blank.
        DishId::parse(&id)
            .map_err(|_| StoreError::Encode(format!("store returned blank id {id:?}")).into())
    }

    /// Replace every field of a dish.
    ///
    /// # Errors
    ///
    /// `Validation`, or `Store` (including `NotFound` for an unknown id).
    pub async fn edit_dish(&self, id: &DishId, form: &DishForm) -> Result<(), MenuError> {
        let dish = form.validate()?;
        self.documents
            .update(Collection::Dishes, id.as_str(), to_fields(&dish)?)
            .await?;
        tracing::info!(dish_id = %id, name = %dish.name, "Dish edited");
        Ok(())
    }

    /// Delete a dish once confirmed.
    ///
    /// # Errors
    ///
    /// `Store` if the delete fails.
    pub async fn delete_dish(
        &self,
        id: &DishId,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, MenuError> {
        self.delete(Collection::Dishes, id.as_str(), confirmation).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name or description, `Store` on write failure.
    pub async fn add_category(&self, form: &CategoryForm) -> Result<CategoryId, MenuError> {
        let category = form.validate()?;
        let id = self
            .documents
            .create(Collection::Categories, to_fields(&category)?)
            .await?;
        tracing::info!(category_id = %id, name = %category.name, "Category added");
        CategoryId::parse(&id)
            .map_err(|_| StoreError::Encode(format!("store returned blank id {id:?}")).into())
    }

    /// Replace the name and description of a category.
    ///
    /// # Errors
    ///
    /// `Validation` or `Store`.
    pub async fn edit_category(
        &self,
        id: &CategoryId,
        form: &CategoryForm,
    ) -> Result<(), MenuError> {
        let category = form.validate()?;
        self.documents
            .update(Collection::Categories, id.as_str(), to_fields(&category)?)
            .await?;
        tracing::info!(category_id = %id, name = %category.name, "Category edited");
        Ok(())
    }

    /// Delete a category once confirmed. Its dishes keep the dangling id.
    ///
    /// # Errors
    ///
    /// `Store` if the delete fails.
    pub async fn delete_category(
        &self,
        id: &CategoryId,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, MenuError> {
        self.delete(Collection::Categories, id.as_str(), confirmation).await
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &str,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, MenuError> {
        if confirmation == Confirmation::Declined {
            tracing::debug!(%collection, id, "Delete declined");
            return Ok(DeleteOutcome::Cancelled);
        }
        self.documents.delete(collection, id).await?;
        tracing::info!(%collection, id, "Document deleted");
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use buffet_simone_core::catalog::{Category, Dish};
    use buffet_simone_core::types::Price;
    use buffet_simone_store::InMemoryDocumentStore;

    use super::*;

    fn controller() -> (MenuController, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        (MenuController::new(Arc::clone(&store) as Arc<dyn DocumentStore>), store)
    }

    fn dish_form(name: &str, price: &str, category: &str) -> DishForm {
        DishForm {
            name: name.into(),
            price: price.into(),
            category_id: category.into(),
            ..DishForm::default()
        }
    }

    async fn dishes(store: &InMemoryDocumentStore) -> Vec<Dish> {
        store
            .list(Collection::Dishes)
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.into_record().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_add_and_edit_dish() {
        let (menu, store) = controller();
        let id = menu.add_dish(&dish_form("Coxinha", "4,50", "c1")).await.unwrap();

        let listed = dishes(&store).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].price, Price::from_cents(450));

        menu.edit_dish(&id, &dish_form("Coxinha de frango", "5", "c2"))
            .await
            .unwrap();
        let listed = dishes(&store).await;
        assert_eq!(listed[0].name, "Coxinha de frango");
        assert_eq!(listed[0].category_id.as_ref().unwrap().as_str(), "c2");

        let featured = DishForm {
            description: "Frango desfiado com catupiry".into(),
            popular: true,
            ..dish_form("Coxinha de frango", "5", "c2")
        };
        menu.edit_dish(&id, &featured).await.unwrap();
        let listed = dishes(&store).await;
        assert_eq!(listed[0].description, "Frango desfiado com catupiry");
        assert!(listed[0].popular);
    }

    #[tokio::test]
    async fn test_invalid_dish_reports_every_field_and_writes_nothing() {
        let (menu, store) = controller();
        let err = menu.add_dish(&dish_form("", "abc", "")).await.unwrap_err();
        let MenuError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 3);
        assert!(errors.get("preco").is_some());
        assert!(dishes(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let (menu, store) = controller();
        let id = menu.add_dish(&dish_form("Pastel", "6", "c1")).await.unwrap();

        let outcome = menu.delete_dish(&id, Confirmation::Declined).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(dishes(&store).await.len(), 1);

        let outcome = menu.delete_dish(&id, Confirmation::Confirmed).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(dishes(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_category_lifecycle() {
        let (menu, store) = controller();
        let form = CategoryForm {
            name: "Doces".into(),
            description: "Para a sobremesa".into(),
        };
        let id = menu.add_category(&form).await.unwrap();

        let edited = CategoryForm {
            name: "Doces finos".into(),
            description: "Brigadeiros e afins".into(),
        };
        menu.edit_category(&id, &edited).await.unwrap();
        let docs = store.list(Collection::Categories).await.unwrap();
        let category: Category = docs[0].clone().into_record().unwrap();
        assert_eq!(category.name, "Doces finos");

        menu.delete_category(&id, Confirmation::Confirmed).await.unwrap();
        assert!(store.list(Collection::Categories).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let (menu, store) = controller();
        store.set_reject_writes(true);
        let err = menu.add_dish(&dish_form("Quibe", "3", "c1")).await.unwrap_err();
        assert!(matches!(err, MenuError::Store(StoreError::Unavailable(_))));

        store.set_reject_writes(false);
        let missing = DishId::parse("missing").unwrap();
        let err = menu
            .edit_dish(&missing, &dish_form("Quibe", "3", "c1"))
            .await
            .unwrap_err();
        assert!(matches!(err, MenuError::Store(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_confirmation_from_flag() {
        assert_eq!(Confirmation::from_flag(Some(true)), Confirmation::Confirmed);
        assert_eq!(Confirmation::from_flag(Some(false)), Confirmation::Declined);
        assert_eq!(Confirmation::from_flag(None), Confirmation::Declined);
    }
}
