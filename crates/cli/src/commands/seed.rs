//! Seed the document store with the menu.
//!
//! This command reads dish categories and their dishes from a YAML file,
//! checks every entry with the same form validators the admin panel uses,
//! and only then writes the `categorias` and `pratos` documents.
//!
//! ```yaml
//! categories:
//!   - name: Salgados
//!     description: Deliciosos salgados para sua festa
//!     dishes:
//!       - name: Coxinhas Premium
//!         description: Coxinha de frango desfiado com catupiry
//!         price: "4,50"
//!         popular: true
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use buffet_simone_core::catalog::{CategoryForm, DishForm, NewCategory, NewDish};
use buffet_simone_core::types::CategoryId;
use buffet_simone_store::document::to_fields;
use buffet_simone_store::{
    Collection, DocumentStore, PgDocumentStore, StoreError, StoreResult, create_pool,
};

use super::migrate::database_url;

/// Menu as written in the seed file.
#[derive(Debug, Deserialize)]
pub struct MenuSeed {
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dishes: Vec<SeedDish>,
}

#[derive(Debug, Deserialize)]
pub struct SeedDish {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Same formats the admin form accepts (`"4,50"`, `"R$ 4,50"`, `"30"`).
    pub price: String,
    #[serde(default)]
    pub popular: bool,
}

/// A category that passed validation, with its dishes.
///
/// The dishes' `category_id` holds the category name until the category is
/// written and gets its real id.
#[derive(Debug)]
pub struct PlannedCategory {
    pub category: NewCategory,
    pub dishes: Vec<NewDish>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub dishes: usize,
    pub cleared: usize,
}

/// Check every category and dish.
///
/// # Errors
///
/// Returns one message per rejected entry; nothing is partially accepted.
pub fn validate_menu(seed: &MenuSeed) -> Result<Vec<PlannedCategory>, Vec<String>> {
    let mut errors = Vec::new();
    let mut planned = Vec::with_capacity(seed.categories.len());
    let mut seen = HashSet::new();

    if seed.categories.is_empty() {
        errors.push("no categories in file".to_owned());
    }

    for entry in &seed.categories {
        let form = CategoryForm {
            name: entry.name.clone(),
            description: entry.description.clone(),
        };
        let category = match form.validate() {
            Ok(category) => category,
            Err(e) => {
                errors.push(format!("category {:?}: {e}", entry.name));
                continue;
            }
        };
        if !seen.insert(category.name.to_lowercase()) {
            errors.push(format!("category {:?}: listed twice", category.name));
            continue;
        }

        let mut dishes = Vec::with_capacity(entry.dishes.len());
        for dish in &entry.dishes {
            // The category id is assigned on write; its name stands in here.
            let form = DishForm {
                name: dish.name.clone(),
                description: dish.description.clone(),
                price: dish.price.clone(),
                popular: dish.popular,
                category_id: category.name.clone(),
            };
            match form.validate() {
                Ok(new_dish) => dishes.push(new_dish),
                Err(e) => errors.push(format!("{} / {:?}: {e}", category.name, dish.name)),
            }
        }

        planned.push(PlannedCategory { category, dishes });
    }

    if errors.is_empty() {
        Ok(planned)
    } else {
        Err(errors)
    }
}

/// Delete every dish, then every category. Returns how many documents went.
///
/// # Errors
///
/// Returns the first store error; documents deleted before it stay deleted.
pub async fn clear_menu(store: &dyn DocumentStore) -> StoreResult<usize> {
    let mut removed = 0;
    for collection in [Collection::Dishes, Collection::Categories] {
        for doc in store.list(collection).await? {
            store.delete(collection, &doc.id).await?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Create the planned categories and their dishes.
///
/// # Errors
///
/// Returns the first store error. There is no transaction; documents written
/// before the failure remain.
pub async fn write_menu(
    store: &dyn DocumentStore,
    planned: Vec<PlannedCategory>,
) -> StoreResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for PlannedCategory { category, dishes } in planned {
        let id = store
            .create(Collection::Categories, to_fields(&category)?)
            .await?;
        let category_id = CategoryId::parse(&id)
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        info!(
            category = %category.name,
            id = %category_id,
            dishes = dishes.len(),
            "Category created"
        );
        summary.categories += 1;

        for dish in dishes {
            let dish = NewDish {
                category_id: category_id.clone(),
                ..dish
            };
            store.create(Collection::Dishes, to_fields(&dish)?).await?;
            summary.dishes += 1;
        }
    }

    Ok(summary)
}

/// Seed the menu from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML menu file
/// * `clear_existing` - If true, delete existing dishes and categories first
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry fails
/// validation, or a database operation fails.
pub async fn menu(
    file_path: &Path,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;

    if !file_path.exists() {
        return Err(format!("File not found: {}", file_path.display()).into());
    }

    info!(path = %file_path.display(), "Loading menu from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(file_path).await?;
    let seed: MenuSeed = serde_yaml::from_str(&content)?;

    info!(categories = seed.categories.len(), "Parsed menu");

    let planned = match validate_menu(&seed) {
        Ok(planned) => planned,
        Err(errors) => {
            error!("Menu validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    info!("Menu validated successfully");

    let pool = create_pool(&database_url).await?;
    info!("Connected to database");
    let store = PgDocumentStore::new(pool);

    let cleared = if clear_existing {
        let removed = clear_menu(&store).await?;
        info!(removed, "Existing menu cleared");
        removed
    } else {
        0
    };

    let summary = SeedSummary {
        cleared,
        ..write_menu(&store, planned).await?
    };

    info!(
        categories = summary.categories,
        dishes = summary.dishes,
        cleared = summary.cleared,
        "Seeding complete"
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use buffet_simone_core::catalog::{Category, Dish};
    use buffet_simone_store::InMemoryDocumentStore;

    use super::*;

    const BUNDLED: &str = include_str!("../../seed/menu.yaml");

    fn parse(yaml: &str) -> MenuSeed {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_bundled_menu_is_valid() {
        let planned = validate_menu(&parse(BUNDLED)).unwrap();
        let names: Vec<_> = planned.iter().map(|p| p.category.name.as_str()).collect();
        assert_eq!(names, ["Salgados", "Doces", "Pratos Principais", "Bebidas"]);
        assert!(planned.iter().all(|p| p.dishes.len() == 6));

        let coxinha = &planned[0].dishes[0];
        assert_eq!(coxinha.name, "Coxinhas Premium");
        assert_eq!(coxinha.description, "Coxinha de frango desfiado com catupiry");
        assert_eq!(coxinha.price.to_string(), "R$ 4,50");
        assert!(coxinha.popular);

        let popular = planned.iter().flat_map(|p| &p.dishes).filter(|d| d.popular);
        assert_eq!(popular.count(), 8);
    }

    #[test]
    fn test_every_error_is_reported() {
        let seed = parse(
            r#"
categories:
  - name: Doces
    description: ""
  - name: Bebidas
    description: Refrescantes
    dishes:
      - name: Suco
        price: "abc"
      - name: ""
        price: "5,00"
"#,
        );
        let errors = validate_menu(&seed).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("category \"Doces\""));
        assert!(errors[1].contains("Preço inválido."));
        assert!(errors[2].contains("nome"));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let seed = parse(
            r"
categories:
  - name: Doces
    description: Sobremesas
  - name: doces
    description: Outra vez
",
        );
        let errors = validate_menu(&seed).unwrap_err();
        assert_eq!(errors, ["category \"doces\": listed twice"]);
    }

    #[test]
    fn test_empty_menu_rejected() {
        let errors = validate_menu(&parse("categories: []")).unwrap_err();
        assert_eq!(errors, ["no categories in file"]);
    }

    #[tokio::test]
    async fn test_write_links_dishes_to_new_categories() {
        let store = InMemoryDocumentStore::new();
        let planned = validate_menu(&parse(BUNDLED)).unwrap();

        let summary = write_menu(&store, planned).await.unwrap();
        assert_eq!(summary.categories, 4);
        assert_eq!(summary.dishes, 24);

        let categories: Vec<Category> = store
            .list(Collection::Categories)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.into_record().unwrap())
            .collect();
        let dishes: Vec<Dish> = store
            .list(Collection::Dishes)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.into_record().unwrap())
            .collect();

        let bebidas = categories.iter().find(|c| c.name == "Bebidas").unwrap();
        let cafe = dishes.iter().find(|d| d.name == "Café Expresso").unwrap();
        assert_eq!(cafe.category_id.as_ref(), Some(&bebidas.id));
        assert_eq!(cafe.price.to_string(), "R$ 4,00");
        assert_eq!(cafe.description, "Blend especial da casa");
        assert!(!cafe.popular);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = InMemoryDocumentStore::new();
        let planned = validate_menu(&parse(BUNDLED)).unwrap();
        write_menu(&store, planned).await.unwrap();

        assert_eq!(clear_menu(&store).await.unwrap(), 28);
        assert!(store.list(Collection::Dishes).await.unwrap().is_empty());
        assert!(store.list(Collection::Categories).await.unwrap().is_empty());
    }
}
