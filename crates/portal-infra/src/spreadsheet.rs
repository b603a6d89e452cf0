//! CSV import of team equipment lists
//!
//! Handles UTF-8 (with or without BOM) and EUC-KR/CP949 encoded files, the
//! latter being what Excel writes for "CSV" on Korean Windows.

use std::fs;
use std::path::Path;

use encoding_rs::EUC_KR;
use serde::Serialize;

use portal_domain::model::{EquipmentItem, ItemStatus};
use portal_domain::service::ImportRow;
use portal_types::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Column headers of the inventory sheet, in export order
pub const INVENTORY_HEADERS: [&str; 5] = ["팀명", "용품명", "카테고리", "수량", "상태"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Team,
    Name,
    Category,
    Quantity,
    Status,
}

impl Column {
    fn from_header(header: &str) -> Option<Self> {
        let header = header.trim().trim_start_matches('\u{feff}').to_lowercase();
        match header.as_str() {
            "팀명" | "팀" | "team" => Some(Column::Team),
            "용품명" | "품명" | "품목" | "name" | "item" => Some(Column::Name),
            "카테고리" | "분류" | "category" => Some(Column::Category),
            "수량" | "quantity" | "qty" => Some(Column::Quantity),
            "상태" | "status" => Some(Column::Status),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Column::Team => "팀명",
            Column::Name => "용품명",
            Column::Category => "카테고리",
            Column::Quantity => "수량",
            Column::Status => "상태",
        }
    }
}

/// Positions of the known columns in the header row
#[derive(Debug, Default)]
struct ColumnMap {
    team: Option<usize>,
    name: Option<usize>,
    category: Option<usize>,
    quantity: Option<usize>,
    status: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let mut map = ColumnMap::default();
        for (idx, header) in headers.iter().enumerate() {
            let slot = match Column::from_header(header) {
                Some(Column::Team) => &mut map.team,
                Some(Column::Name) => &mut map.name,
                Some(Column::Category) => &mut map.category,
                Some(Column::Quantity) => &mut map.quantity,
                Some(Column::Status) => &mut map.status,
                None => continue,
            };
            slot.get_or_insert(idx);
        }

        for (column, position) in [
            (Column::Team, map.team),
            (Column::Name, map.name),
            (Column::Quantity, map.quantity),
        ] {
            if position.is_none() {
                return Err(Error::Import(format!("missing required column: {}", column.label())));
            }
        }
        Ok(map)
    }
}

/// A row that could not be imported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    /// 1-based line number, header included
    pub row: usize,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.message)
    }
}

/// Rows read from a sheet plus the rows that were rejected
#[derive(Debug, Default)]
pub struct ParsedSheet {
    pub rows: Vec<ImportRow>,
    pub errors: Vec<RowError>,
}

/// Decode raw CSV bytes to text
pub fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = EUC_KR.decode(bytes);
            if had_errors {
                tracing::warn!("some characters could not be decoded from EUC-KR");
            }
            decoded.into_owned()
        }
    }
}

/// Load an equipment sheet from a file
pub fn load_equipment_csv<P: AsRef<Path>>(path: P) -> Result<ParsedSheet> {
    let bytes = fs::read(path)?;
    parse_equipment_csv(&bytes)
}

/// Parse an equipment sheet. Fails only when the header row is unusable;
/// bad data rows are collected in `ParsedSheet::errors`.
pub fn parse_equipment_csv(bytes: &[u8]) -> Result<ParsedSheet> {
    let text = decode(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Import(format!("failed to read header row: {e}")))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut sheet = ParsedSheet::default();
    for (row_idx, result) in reader.records().enumerate() {
        let row_num = row_idx + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                sheet.errors.push(RowError {
                    row: row_num,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        match parse_record(&record, &columns) {
            Ok(row) => sheet.rows.push(row),
            Err(message) => sheet.errors.push(RowError { row: row_num, message }),
        }
    }

    tracing::debug!(rows = sheet.rows.len(), errors = sheet.errors.len(), "equipment sheet parsed");
    Ok(sheet)
}

fn field(record: &csv::StringRecord, position: Option<usize>) -> &str {
    position.and_then(|idx| record.get(idx)).unwrap_or("")
}

fn parse_record(record: &csv::StringRecord, columns: &ColumnMap) -> std::result::Result<ImportRow, String> {
    let team = field(record, columns.team);
    if team.is_empty() {
        return Err("team name is empty".to_string());
    }
    let name = field(record, columns.name);
    if name.is_empty() {
        return Err("item name is empty".to_string());
    }
    let quantity = parse_quantity(field(record, columns.quantity))?;
    let category = field(record, columns.category);
    let status = match field(record, columns.status) {
        "" => ItemStatus::Registered,
        raw => ItemStatus::parse(raw),
    };

    Ok(ImportRow {
        team: team.to_string(),
        item: EquipmentItem::new(name, quantity, category, status),
    })
}

fn parse_quantity(s: &str) -> std::result::Result<u32, String> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return Ok(0);
    }
    if let Ok(value) = cleaned.parse::<i64>() {
        if value < 0 {
            return Err(format!("negative quantity: {s}"));
        }
        return u32::try_from(value).map_err(|_| format!("quantity too large: {s}"));
    }
    Err(format!("invalid quantity: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_korean_headers() {
        let csv = "팀명,용품명,카테고리,수량,상태\n동대구운용팀,안전모,머리보호,10,양호\n동대구운용팀,절연장갑,,3,불량\n";
        let sheet = parse_equipment_csv(csv.as_bytes()).unwrap();
        assert!(sheet.errors.is_empty());
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].item.status, ItemStatus::Good);
        assert_eq!(sheet.rows[1].item.category, "기타");
        assert_eq!(sheet.rows[1].item.status, ItemStatus::Bad);
    }

    #[test]
    fn test_english_headers_any_order() {
        let csv = "Qty,Item,Team,Status\n5,Helmet,서대구운용팀,GOOD\n2,Boots,서대구운용팀,\n";
        let sheet = parse_equipment_csv(csv.as_bytes()).unwrap();
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].team, "서대구운용팀");
        assert_eq!(sheet.rows[0].item.name, "Helmet");
        assert_eq!(sheet.rows[0].item.quantity, 5);
        assert_eq!(sheet.rows[0].item.status, ItemStatus::Good);
        assert_eq!(sheet.rows[1].item.status, ItemStatus::Registered);
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("팀명,용품명,수량\n포항운용팀,안전화,\"1,200\"\n".as_bytes());
        let sheet = parse_equipment_csv(&bytes).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].item.quantity, 1200);
    }

    #[test]
    fn test_euc_kr_input() {
        let text = "팀명,용품명,수량,상태\n구미운용팀,방진마스크,20,양호\n";
        let (encoded, _, _) = EUC_KR.encode(text);
        assert!(std::str::from_utf8(&encoded).is_err());
        let sheet = parse_equipment_csv(&encoded).unwrap();
        assert_eq!(sheet.rows[0].team, "구미운용팀");
        assert_eq!(sheet.rows[0].item.name, "방진마스크");
    }

    #[test]
    fn test_row_errors_do_not_stop_parsing() {
        let csv = "팀명,용품명,수량\n안동운용팀,안전대,-2\n,안전모,1\n안동운용팀,,1\n안동운용팀,안전화,많음\n,,\n안동운용팀,안전모,4\n";
        let sheet = parse_equipment_csv(csv.as_bytes()).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        let rows: Vec<_> = sheet.errors.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![2, 3, 4, 5]);
        assert!(sheet.errors[0].to_string().contains("negative"));
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse_equipment_csv("팀명,카테고리\n동대구운용팀,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Import(ref msg) if msg.contains("용품명")));
    }
}
