//! Taxonomy
//!
//! The single, compiled-in table of categories, product types and subtypes shared by every
//! surface that reads or edits the catalog.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Error returned when a string is not a registered category slug.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Top-level catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryKey {
    /// Towels and bath line products
    #[serde(rename = "towels")]
    Towels,

    /// Cow dung cakes and related organic products
    #[serde(rename = "cow-dung")]
    CowDung,
}

impl CategoryKey {
    /// Every registered category, in display order.
    pub const ALL: [CategoryKey; 2] = [CategoryKey::Towels, CategoryKey::CowDung];

    /// Machine-stable key used for filtering and persistence.
    pub fn slug(self) -> &'static str {
        match self {
            CategoryKey::Towels => "towels",
            CategoryKey::CowDung => "cow-dung",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        self.definition().label
    }

    /// Glyph shown when a product of this category has no image.
    pub fn emoji(self) -> &'static str {
        self.definition().emoji
    }

    /// Full registry entry for this category.
    pub fn definition(self) -> &'static CategoryDefinition {
        match self {
            CategoryKey::Towels => &TOWELS,
            CategoryKey::CowDung => &COW_DUNG,
        }
    }

    /// Look up a category by its slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.slug() == slug)
    }

    /// Look up a category by its label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();

        Self::ALL
            .into_iter()
            .find(|key| key.label().eq_ignore_ascii_case(label))
    }
}

impl Display for CategoryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.slug())
    }
}

impl FromStr for CategoryKey {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Registry entry for a category.
#[derive(Debug)]
pub struct CategoryDefinition {
    /// Category key
    pub key: CategoryKey,

    /// Display label
    pub label: &'static str,

    /// Fallback glyph
    pub emoji: &'static str,

    /// Short blurb shown on the category picker
    pub description: &'static str,

    /// Banner image for the category picker
    pub banner_image: &'static str,

    /// Product types offered under this category, in display order
    pub product_types: &'static [TypeDefinition],
}

/// Registry entry for a product type.
#[derive(Debug)]
pub struct TypeDefinition {
    /// Display label, also the value stored on products
    pub label: &'static str,

    /// Subtypes offered under this type, in display order
    pub subtypes: &'static [&'static str],

    /// Representative image used when a product has none of its own
    pub default_image: Option<&'static str>,
}

static TOWELS: CategoryDefinition = CategoryDefinition {
    key: CategoryKey::Towels,
    label: "Towels",
    emoji: "🧺",
    description: "Premium export-quality cotton towels",
    banner_image: "/towel/Towelmain/banner.jpg",
    product_types: &[
        TypeDefinition {
            label: "Bathrobe",
            subtypes: &["Terry Bathrobe", "Waffle Bathrobe"],
            default_image: Some("/towel/bathrobe/bathrobe (1).jpg"),
        },
        TypeDefinition {
            label: "Bath Towel",
            subtypes: &["Thick Terry Cotton"],
            default_image: Some("/towel/bathtowel/bathtowel (1).jpg"),
        },
        TypeDefinition {
            label: "Beach Towel",
            subtypes: &["Soft Terry Fabric"],
            default_image: Some("/towel/beach towel/beach towel (1).jpg"),
        },
        TypeDefinition {
            label: "Face Towel",
            subtypes: &["Skin-Friendly"],
            default_image: Some("/towel/face towel/face towel (1).jpg"),
        },
        TypeDefinition {
            label: "Kitchen Towel",
            subtypes: &["Durable Cotton"],
            default_image: Some("/towel/kitchn towel/kitchn towel (1).jpg"),
        },
        TypeDefinition {
            label: "Napkin",
            subtypes: &["Cotton Napkin", "Blended Fabric Napkin"],
            default_image: Some("/towel/napkin/hand towel (1).jpg"),
        },
        TypeDefinition {
            label: "Terry Kitchen Towel",
            subtypes: &["Thick Terry"],
            default_image: Some("/towel/terry kitchen towel/terry kitchen towel (1).jpg"),
        },
    ],
};

static COW_DUNG: CategoryDefinition = CategoryDefinition {
    key: CategoryKey::CowDung,
    label: "Cow Dung Products",
    emoji: "🌿",
    description: "Organic cow dung cakes & dhoop",
    banner_image: "/cow dung/cowbanner/banner.jpg",
    product_types: &[
        TypeDefinition {
            label: "Fertilizer Use",
            subtypes: &["Cake & Powdered Form", "Compost Booster", "Organic Pesticide"],
            default_image: Some("/hero/dungfertili.avif"),
        },
        TypeDefinition {
            label: "Spiritual Use",
            subtypes: &["Traditional & Ritual", "Havan & Pooja", "Dhoop Sticks"],
            default_image: Some("/hero/dungspritual.avif"),
        },
    ],
};

/// Every registered category definition, in display order.
pub fn categories() -> impl Iterator<Item = &'static CategoryDefinition> {
    CategoryKey::ALL.into_iter().map(CategoryKey::definition)
}

fn types() -> impl Iterator<Item = &'static TypeDefinition> {
    categories().flat_map(|category| category.product_types.iter())
}

/// Finds the registry entry for a product type label (exact match).
pub fn product_type(label: &str) -> Option<&'static TypeDefinition> {
    types().find(|definition| definition.label == label)
}

/// Product type labels registered under the category with the given slug.
///
/// Unknown slugs have no selectable types, so an empty list is returned.
pub fn types_for_category(category_slug: &str) -> SmallVec<[&'static str; 8]> {
    CategoryKey::from_slug(category_slug)
        .map(|key| {
            key.definition()
                .product_types
                .iter()
                .map(|definition| definition.label)
                .collect()
        })
        .unwrap_or_default()
}

/// Subtypes registered for a product type; empty for unknown or unset types.
pub fn subtypes_for_type(type_label: &str) -> &'static [&'static str] {
    product_type(type_label).map_or(&[], |definition| definition.subtypes)
}

/// Representative image for a product type, looked up case-insensitively.
pub fn default_image_for(type_label: &str) -> Option<&'static str> {
    let type_label = type_label.trim();

    if type_label.is_empty() {
        return None;
    }

    types()
        .find(|definition| definition.label.eq_ignore_ascii_case(type_label))
        .and_then(|definition| definition.default_image)
}

/// The category a product type is registered under.
pub fn category_for_type(type_label: &str) -> Option<CategoryKey> {
    categories()
        .find(|category| {
            category
                .product_types
                .iter()
                .any(|definition| definition.label == type_label)
        })
        .map(|category| category.key)
}

/// Whether `subtype` is registered for `type_label`.
pub fn is_valid_subtype(type_label: &str, subtype: &str) -> bool {
    subtypes_for_type(type_label).contains(&subtype)
}
