//! Catalog entities: dishes and their categories (remote store), photos and
//! photo categories (local store).
//!
//! Dish and category records keep the Portuguese field names of the remote
//! collections on the wire (`nome`, `preco`, `categoriaId`, `descricao`).

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{CategoryId, DishId, PhotoId, Price, PriceError};
use crate::validation::{FieldErrors, ValidationError, validate_required};

/// Label of the gallery filter that shows every photo.
pub const ALL_PHOTOS_LABEL: &str = "Todas";

/// A menu item stored in the `pratos` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "preco")]
    pub price: Price,
    /// Shown with a "Popular" badge on the menu.
    #[serde(default)]
    pub popular: bool,
    #[serde(
        rename = "categoriaId",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<CategoryId>,
}

/// A dish grouping stored in the `categorias` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
}

/// Body of a `pratos` document, as written by the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDish {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "preco")]
    pub price: Price,
    pub popular: bool,
    #[serde(rename = "categoriaId")]
    pub category_id: CategoryId,
}

/// Body of a `categorias` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
}

/// Raw dish form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishForm {
    #[serde(default)]
    pub name: String,
    /// Optional short text under the dish name.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub category_id: String,
}

impl DishForm {
    /// Check every field and build the document body.
    ///
    /// # Errors
    ///
    /// Returns all field errors: blank name, blank, unparseable or too high
    /// price, blank category.
    pub fn validate(&self) -> Result<NewDish, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("nome", validate_required(&self.name));

        let price = if self.price.trim().is_empty() {
            errors.insert("preco", ValidationError::Required);
            None
        } else {
            Price::parse(&self.price)
                .map_err(|e| {
                    let error = match e {
                        PriceError::TooLarge => ValidationError::PriceTooHigh,
                        _ => ValidationError::InvalidPrice,
                    };
                    errors.insert("preco", error);
                })
                .ok()
        };

        let category_id = CategoryId::parse(&self.category_id)
            .map_err(|_| errors.insert("categoriaId", ValidationError::Required))
            .ok();

        match (price, category_id) {
            (Some(price), Some(category_id)) if errors.is_empty() => Ok(NewDish {
                name: self.name.trim().to_owned(),
                description: self.description.trim().to_owned(),
                price,
                popular: self.popular,
                category_id,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw category form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryForm {
    /// Check both fields and build the document body.
    ///
    /// # Errors
    ///
    /// Returns an error for each blank field.
    pub fn validate(&self) -> Result<NewCategory, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("nome", validate_required(&self.name));
        errors.check("descricao", validate_required(&self.description));
        errors.into_result()?;

        Ok(NewCategory {
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
        })
    }
}

/// Name of the category a dish belongs to.
///
/// `None` when the dish has no category or references one that no longer
/// exists; such dishes are shown without a badge.
#[must_use]
pub fn category_name_for<'a>(dish: &Dish, categories: &'a [Category]) -> Option<&'a str> {
    let id = dish.category_id.as_ref()?;
    categories
        .iter()
        .find(|category| &category.id == id)
        .map(|category| category.name.as_str())
}

/// A gallery picture kept in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Label of a [`PhotoCategory`]; not enforced as a reference.
    pub category: String,
    /// `data:<mime>;base64,<payload>` URL.
    pub image: String,
}

/// Icons available to photo categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconLabel {
    UtensilsCrossed,
    #[default]
    Cake,
    Cookie,
    Pizza,
    TruckIcon,
    PartyPopper,
}

impl IconLabel {
    pub const ALL: [Self; 6] = [
        Self::UtensilsCrossed,
        Self::Cake,
        Self::Cookie,
        Self::Pizza,
        Self::TruckIcon,
        Self::PartyPopper,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UtensilsCrossed => "UtensilsCrossed",
            Self::Cake => "Cake",
            Self::Cookie => "Cookie",
            Self::Pizza => "Pizza",
            Self::TruckIcon => "TruckIcon",
            Self::PartyPopper => "PartyPopper",
        }
    }

    /// Exact lookup of a known icon label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.as_str() == label)
    }

    /// Lookup that falls back to the default icon for unknown labels.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }
}

impl fmt::Display for IconLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for IconLabel {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<IconLabel> for String {
    fn from(icon: IconLabel) -> Self {
        icon.as_str().to_owned()
    }
}

/// A gallery grouping label with its icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoCategory {
    pub label: String,
    #[serde(rename = "iconLabel", default)]
    pub icon_label: IconLabel,
}

/// Gallery filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryFilter {
    #[default]
    All,
    Category(String),
}

impl GalleryFilter {
    /// Interpret a chip label; absent, blank or `"Todas"` selects every photo.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("" | ALL_PHOTOS_LABEL) => Self::All,
            Some(other) => Self::Category(other.to_owned()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_PHOTOS_LABEL,
            Self::Category(label) => label,
        }
    }

    /// Exact, case-sensitive label match.
    #[must_use]
    pub fn matches(&self, photo: &Photo) -> bool {
        match self {
            Self::All => true,
            Self::Category(label) => &photo.category == label,
        }
    }
}

/// Photos selected by `filter`, in stored order.
#[must_use]
pub fn filter_photos<'a>(photos: &'a [Photo], filter: &GalleryFilter) -> Vec<&'a Photo> {
    photos.iter().filter(|photo| filter.matches(photo)).collect()
}

/// A filter chip of the public gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryChip {
    pub label: String,
    /// `None` for the "all photos" chip.
    pub icon: Option<IconLabel>,
    pub active: bool,
}

/// The "Todas" chip followed by one chip per photo category.
#[must_use]
pub fn gallery_chips(categories: &[PhotoCategory], active: &GalleryFilter) -> Vec<GalleryChip> {
    let all = GalleryChip {
        label: ALL_PHOTOS_LABEL.to_owned(),
        icon: None,
        active: *active == GalleryFilter::All,
    };
    std::iter::once(all)
        .chain(categories.iter().map(|category| GalleryChip {
            label: category.label.clone(),
            icon: Some(category.icon_label),
            active: active.label() == category.label && *active != GalleryFilter::All,
        }))
        .collect()
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| CategoryId::parse(&value).ok()))
}
