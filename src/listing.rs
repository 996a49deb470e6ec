//! Listing

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use crate::products::Product;

const PRICE_COLUMN: usize = 5;

/// Writes `products` as a table, one row per product in the order given.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_table<'p>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'p Product>,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["", "Name", "Category", "Type", "Subtype", "Price", "Highlight"]);

    let mut rows = 0_usize;

    for product in products {
        builder.push_record([
            product.image_emoji.as_str(),
            product.name.as_str(),
            product.category.as_str(),
            product.product_type.as_str(),
            product.product_subtype.as_str(),
            product.price.as_str(),
            product.highlight.as_deref().unwrap_or_default(),
        ]);

        rows += 1;
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(PRICE_COLUMN..PRICE_COLUMN + 1), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "{rows} product(s)")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{fixtures::demo_catalog, normalize::Normalizer};

    #[test]
    fn renders_one_row_per_product() -> TestResult {
        let fixture = demo_catalog(&Normalizer::default())?;
        let mut out = Vec::new();

        write_table(&mut out, fixture.products())?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Premium Bathrobe"));
        assert!(output.contains("Cow Dung Cake - Spiritual Use"));
        assert!(output.contains("Traditional & Ritual"));
        assert!(output.ends_with("9 product(s)\n"));

        Ok(())
    }

    #[test]
    fn empty_listing_still_has_header() -> TestResult {
        let mut out = Vec::new();

        write_table(&mut out, std::iter::empty::<&Product>())?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Subtype"));
        assert!(output.ends_with("0 product(s)\n"));

        Ok(())
    }
}
