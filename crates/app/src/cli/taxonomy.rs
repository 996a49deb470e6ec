//! `taxonomy` subcommand.

use std::io::{self, Write};

use catalog::{
    specifications::{Specification, specifications_for},
    taxonomy::categories,
};

pub fn run() -> Result<(), String> {
    write_tree(io::stdout().lock()).map_err(|error| format!("failed to write taxonomy: {error}"))
}

fn write_tree(mut out: impl Write) -> io::Result<()> {
    for category in categories() {
        writeln!(out, "{} {} ({})", category.emoji, category.label, category.key)?;

        for product_type in category.product_types {
            writeln!(out, "  {}", product_type.label)?;

            for subtype in product_type.subtypes {
                writeln!(out, "    - {subtype}")?;
            }

            for line in specifications_for(product_type.label)
                .map(Specification::lines)
                .unwrap_or_default()
            {
                writeln!(out, "      {line}")?;
            }
        }
    }

    Ok(())
}
