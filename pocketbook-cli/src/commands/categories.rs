//! Categories command - show the static category table

use anyhow::Result;

use pocketbook_core::domain::category;
use pocketbook_core::TransactionKind;

use crate::output;

pub fn run(kind: Option<String>, json: bool) -> Result<()> {
    let kind_filter = kind.as_deref().map(TransactionKind::parse).transpose()?;

    let categories: Vec<_> = category::CATEGORIES
        .iter()
        .filter(|c| kind_filter.map_or(true, |k| c.kind == k))
        .collect();

    if json {
        let rows: Vec<_> = categories
            .iter()
            .map(|c| {
                serde_json::json!({
                    "key": c.key,
                    "label": c.label,
                    "kind": c.kind.as_str(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Key", "Label", "Kind"]);
    for c in categories {
        table.add_row(vec![c.key, c.label, c.kind.as_str()]);
    }
    println!("{}", table);

    Ok(())
}
