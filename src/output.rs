//! CSV persistence for card tables and visited URLs

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::catalog::CardRecord;
use crate::error::ScraperError;

pub const URL_COLUMN: &str = "scrapped_url";

/// Union of all record keys, in first-seen order.
pub fn table_columns(records: &[CardRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in records.iter().flat_map(|r| r.keys()) {
        if !columns.iter().any(|c| c == key) {
            columns.push(key.to_string());
        }
    }
    columns
}

/// Row-per-card table; cells for attributes a card lacks stay empty.
pub fn write_card_table<W: Write>(writer: W, records: &[CardRecord]) -> Result<(), ScraperError> {
    let columns = table_columns(records);
    let mut wtr = csv::Writer::from_writer(writer);

    // csv refuses zero-width records; nothing scraped means a blank file
    if !columns.is_empty() {
        wtr.write_record(&columns)?;
        for record in records {
            wtr.write_record(columns.iter().map(|c| record.get(c).unwrap_or("")))?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_url_list<W: Write>(writer: W, urls: &[String]) -> Result<(), ScraperError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([URL_COLUMN])?;
    for url in urls {
        wtr.write_record([url])?;
    }
    wtr.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<fs::File, ScraperError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(fs::File::create(path)?)
}

/// Overwrites `path` with the card table.
pub fn save_card_table(path: &Path, records: &[CardRecord]) -> Result<(), ScraperError> {
    write_card_table(create(path)?, records)?;
    info!("Data written to {} ({} cards)", path.display(), records.len());
    Ok(())
}

/// Overwrites `path` with the URL list.
pub fn save_url_list(path: &Path, urls: &[String]) -> Result<(), ScraperError> {
    write_url_list(create(path)?, urls)?;
    info!("URLs written to {} ({} urls)", path.display(), urls.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> CardRecord {
        let mut r = CardRecord::new();
        for (k, v) in pairs {
            r.insert(*k, *v);
        }
        r
    }

    fn render(records: &[CardRecord]) -> String {
        let mut buf = Vec::new();
        write_card_table(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_columns_are_union_in_first_seen_order() {
        let records = vec![
            record(&[("Page Found", "0"), ("Card Name", "Kuriboh"), ("Level", "1")]),
            record(&[("Page Found", "0"), ("Card Name", "Pot of Greed"), ("Property", "Normal")]),
        ];
        assert_eq!(
            table_columns(&records),
            vec!["Page Found", "Card Name", "Level", "Property"]
        );
    }

    #[test]
    fn test_missing_attributes_are_empty_cells() {
        let records = vec![
            record(&[("Card Name", "Kuriboh"), ("Level", "1")]),
            CardRecord::new(),
            record(&[("Card Name", "Pot of Greed"), ("Property", "Normal")]),
        ];
        assert_eq!(
            render(&records),
            "Card Name,Level,Property\nKuriboh,1,\n,,\nPot of Greed,,Normal\n"
        );
    }

    #[test]
    fn test_fields_needing_quotes() {
        let records = vec![record(&[
            ("Card Name", "Ojama Green"),
            ("Card Description", "\"Ojama\" card,\nline two"),
        ])];
        assert_eq!(
            render(&records),
            "Card Name,Card Description\nOjama Green,\"\"\"Ojama\"\" card,\nline two\"\n"
        );
    }

    #[test]
    fn test_no_records_writes_blank_table() {
        assert_eq!(render(&[]), "");
        assert_eq!(render(&[CardRecord::new()]), "");
    }

    #[test]
    fn test_url_list() {
        let mut buf = Vec::new();
        let urls = vec![
            "https://ygoprodeck.com/card/a".to_string(),
            "https://ygoprodeck.com/card/b".to_string(),
        ];
        write_url_list(&mut buf, &urls).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "scrapped_url\nhttps://ygoprodeck.com/card/a\nhttps://ygoprodeck.com/card/b\n"
        );
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = std::env::temp_dir().join(format!("card-output-{}", std::process::id()));
        let path = dir.join("nested").join("cards.csv");

        save_card_table(&path, &[record(&[("Card Name", "Kuriboh")])]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Card Name\nKuriboh\n");

        let _ = fs::remove_dir_all(&dir);
    }
}
