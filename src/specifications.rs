//! Product Specifications
//!
//! Reference sheets shown in the product detail view.

/// A product specification sheet. Every section is optional.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Specification {
    /// Material
    pub material: Option<&'static str>,
    /// Features
    pub features: &'static [&'static str],
    /// Intended uses
    pub uses: &'static [&'static str],
    /// Available sizes
    pub sizes: &'static [&'static str],
    /// Dimensions
    pub dimensions: Option<&'static str>,
    /// Garment length
    pub length: Option<&'static str>,
    /// Applications
    pub applications: &'static [&'static str],
    /// Benefits
    pub benefits: &'static [&'static str],
    /// Longer description
    pub description: Option<&'static str>,
}

impl Specification {
    /// Display lines such as `"Material: Thick terry cotton"`, in a fixed section order.
    /// Empty sections are skipped and the description is not included.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(material) = self.material {
            lines.push(format!("Material: {material}"));
        }

        push_list(&mut lines, "Features", self.features);
        push_list(&mut lines, "Use", self.uses);
        push_list(&mut lines, "Sizes", self.sizes);

        if let Some(dimensions) = self.dimensions {
            lines.push(format!("Dimensions: {dimensions}"));
        }

        if let Some(length) = self.length {
            lines.push(format!("Length: {length}"));
        }

        push_list(&mut lines, "Applications", self.applications);
        push_list(&mut lines, "Benefits", self.benefits);

        lines
    }
}

fn push_list(lines: &mut Vec<String>, label: &str, values: &[&str]) {
    if !values.is_empty() {
        lines.push(format!("{label}: {}", values.join(", ")));
    }
}

const EMPTY: Specification = Specification {
    material: None,
    features: &[],
    uses: &[],
    sizes: &[],
    dimensions: None,
    length: None,
    applications: &[],
    benefits: &[],
    description: None,
};

static BATH_LINE: [(&str, Specification); 7] = [
    (
        "Bathrobe",
        Specification {
            material: Some("Terry or waffle fabric"),
            features: &["Soft", "Premium", "Highly absorbent", "Quick-dry"],
            uses: &["Hotels", "Spas", "Home"],
            sizes: &["S", "M", "L", "XL"],
            length: Some("~105–125 cm"),
            ..EMPTY
        },
    ),
    (
        "Bath Towel",
        Specification {
            material: Some("Thick terry cotton"),
            features: &["Plush", "Durable", "High absorbency"],
            dimensions: Some("70 × 140 cm (Optional: 75 × 150 cm)"),
            ..EMPTY
        },
    ),
    (
        "Beach Towel",
        Specification {
            material: Some("Soft terry fabric"),
            features: &["Large", "Fast-drying", "Stylish prints"],
            dimensions: Some("80 × 160 cm (Optional: 90 × 180 cm)"),
            ..EMPTY
        },
    ),
    (
        "Face Towel",
        Specification {
            features: &["Gentle", "Skin-friendly"],
            uses: &["Facial care", "Skincare routines"],
            dimensions: Some("30 × 30 cm (Optional: 33 × 33 cm)"),
            ..EMPTY
        },
    ),
    (
        "Kitchen Towel",
        Specification {
            material: Some("Durable cotton"),
            uses: &["Utensils", "Surfaces", "Dish handling"],
            dimensions: Some("40 × 60 cm (Optional: 45 × 70 cm)"),
            ..EMPTY
        },
    ),
    (
        "Napkin",
        Specification {
            material: Some("Cotton or blended fabric"),
            uses: &["Home dining", "Restaurants", "Events"],
            sizes: &["30 × 30 cm", "40 × 40 cm"],
            ..EMPTY
        },
    ),
    (
        "Terry Kitchen Towel",
        Specification {
            features: &["Thick", "Extra-absorbent", "Durable"],
            uses: &["Dish drying", "Spill soaking", "Cleaning"],
            dimensions: Some("40 × 60 cm (Optional: 38 × 63 cm)"),
            ..EMPTY
        },
    ),
];

static COW_DUNG_CAKE: Specification = Specification {
    description: Some(
        "Natural, sun-dried discs made from pure cow manure with organic residue. \
         Eco-friendly and widely used in agriculture, spiritual practices, and rural households.",
    ),
    applications: &[
        "Organic fertilizer (slow-release, improves soil, adds NPK)",
        "Compost booster",
        "Organic pesticide preparation",
        "Fuel source",
        "Religious & cultural rituals (Havan, Pooja)",
        "Natural mosquito repellent",
        "Construction & insulation (mud houses)",
    ],
    benefits: &[
        "100% natural and eco-friendly",
        "Improves soil fertility",
        "Cost-effective and sustainable",
        "Suitable for organic farming exporters",
        "Long shelf life when dried properly",
    ],
    ..EMPTY
};

const COW_DUNG_KEYWORDS: [&str; 4] = ["cow dung", "fertilizer", "dhoop", "incense"];

/// Specification sheet for a product type.
///
/// Bath line types match exactly. Anything mentioning cow dung, fertilizer, dhoop or incense
/// gets the generic cow dung cake sheet.
pub fn specifications_for(product_type: &str) -> Option<&'static Specification> {
    if let Some((_, specification)) = BATH_LINE.iter().find(|(name, _)| *name == product_type) {
        return Some(specification);
    }

    let lowered = product_type.to_lowercase();

    COW_DUNG_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
        .then_some(&COW_DUNG_CAKE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bath_towel_lines() {
        let lines = specifications_for("Bath Towel").map(Specification::lines);

        assert_eq!(
            lines,
            Some(vec![
                "Material: Thick terry cotton".to_string(),
                "Features: Plush, Durable, High absorbency".to_string(),
                "Dimensions: 70 × 140 cm (Optional: 75 × 150 cm)".to_string(),
            ])
        );
    }

    #[test]
    fn bathrobe_lists_sizes_before_length() {
        let lines = specifications_for("Bathrobe")
            .map(Specification::lines)
            .unwrap_or_default();

        assert_eq!(lines.get(3).map(String::as_str), Some("Sizes: S, M, L, XL"));
        assert_eq!(lines.get(4).map(String::as_str), Some("Length: ~105–125 cm"));
    }

    #[test]
    fn cow_dung_keywords_resolve_to_cake_sheet() {
        assert_eq!(specifications_for("Fertilizer Use"), Some(&COW_DUNG_CAKE));
        assert_eq!(specifications_for("Herbal Dhoop"), Some(&COW_DUNG_CAKE));
        assert_eq!(specifications_for("Spiritual Use"), None);
    }

    #[test]
    fn bath_line_lookup_is_exact() {
        assert_eq!(specifications_for("bath towel"), None);
    }

    #[test]
    fn empty_sheet_has_no_lines() {
        assert!(Specification::default().lines().is_empty());
    }
}
