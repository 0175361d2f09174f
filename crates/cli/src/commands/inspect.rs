use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use merkle_persistence::{HashLogHeader, HashLogReader};
use std::path::Path;

use crate::engine::ForensicTree;

pub fn run(log_path: &Path) -> anyhow::Result<()> {
    println!("\nHash Log Report");
    println!("---------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    table.add_row(vec!["Path".to_string(), log_path.display().to_string()]);

    if !log_path.exists() {
        table.add_row(vec!["Status", "MISSING"]);
        println!("{table}\n");
        anyhow::bail!("No hash log at {}", log_path.display());
    }

    // header check first so a bad magic is reported as such
    if let Err(e) = HashLogReader::open(log_path) {
        table.add_row(vec!["Status".to_string(), format!("CORRUPT ({e})")]);
        println!("{table}\n");
        return Err(e.into());
    }

    match ForensicTree::load(log_path) {
        Ok(forensic) => {
            let size = std::fs::metadata(log_path)?.len();
            table.add_row(vec!["Status".to_string(), "OK".to_string()]);
            table.add_row(vec!["Size".to_string(), format!("{size} bytes")]);
            table.add_row(vec![
                "Format".to_string(),
                format!("V{}", HashLogHeader::default().version),
            ]);
            table.add_row(vec!["Leaves".to_string(), forensic.len().to_string()]);
            table.add_row(vec![
                "Levels".to_string(),
                forensic.tree.levels().height().to_string(),
            ]);
            let root = match forensic.tree.root() {
                Ok(root) => root.to_string(),
                Err(_) => "(empty)".to_string(),
            };
            table.add_row(vec!["Root".to_string(), root]);
            println!("{table}\n");
            Ok(())
        }
        Err(e) => {
            table.add_row(vec!["Status".to_string(), format!("CORRUPT ({e:#})")]);
            println!("{table}\n");
            Err(e)
        }
    }
}
