//! Excel export of inventories and the team scoreboard

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use portal_domain::service::{ItemSummary, ScoreboardEntry, TeamRecord};
use portal_types::{Error, Result};

use crate::spreadsheet::INVENTORY_HEADERS;

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Workbook with an "Inventory" sheet (one row per team and item, same
/// columns as the import format) and a "Summary" sheet of aggregated counts
pub fn inventory_workbook(records: &[TeamRecord], summaries: &[ItemSummary]) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    let inventory_sheet = workbook.add_worksheet();
    write_inventory_sheet(inventory_sheet, records)?;

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, summaries)?;

    Ok(workbook)
}

/// Export inventories to an .xlsx file
pub fn export_inventory(records: &[TeamRecord], summaries: &[ItemSummary], output_path: &Path) -> Result<()> {
    let mut workbook = inventory_workbook(records, summaries)?;
    workbook.save(output_path).map_err(excel_err)?;
    Ok(())
}

/// Inventory workbook as bytes, for downloads
pub fn inventory_xlsx_bytes(records: &[TeamRecord], summaries: &[ItemSummary]) -> Result<Vec<u8>> {
    let mut workbook = inventory_workbook(records, summaries)?;
    workbook.save_to_buffer().map_err(excel_err)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }
    Ok(())
}

fn write_inventory_sheet(sheet: &mut Worksheet, records: &[TeamRecord]) -> Result<()> {
    sheet.set_name("Inventory").map_err(excel_err)?;
    write_headers(sheet, &INVENTORY_HEADERS)?;

    let mut row = 1u32;
    for record in records {
        for item in &record.data.items {
            sheet.write_string(row, 0, &record.data.team).map_err(excel_err)?;
            sheet.write_string(row, 1, &item.name).map_err(excel_err)?;
            sheet.write_string(row, 2, &item.category).map_err(excel_err)?;
            sheet.write_number(row, 3, item.quantity).map_err(excel_err)?;
            sheet.write_string(row, 4, item.status.label()).map_err(excel_err)?;
            row += 1;
        }
    }

    sheet.set_column_width(0, 16).map_err(excel_err)?;
    sheet.set_column_width(1, 20).map_err(excel_err)?;
    sheet.set_column_width(2, 14).map_err(excel_err)?;
    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, summaries: &[ItemSummary]) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;
    write_headers(sheet, &["카테고리", "용품명", "등록", "양호", "불량", "보유팀"])?;

    for (idx, summary) in summaries.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, &summary.category).map_err(excel_err)?;
        sheet.write_string(row, 1, &summary.name).map_err(excel_err)?;
        sheet.write_number(row, 2, summary.registered as f64).map_err(excel_err)?;
        sheet.write_number(row, 3, summary.good as f64).map_err(excel_err)?;
        sheet.write_number(row, 4, summary.bad as f64).map_err(excel_err)?;
        sheet
            .write_string(row, 5, summary.teams.join(", "))
            .map_err(excel_err)?;
    }

    sheet.set_column_width(1, 20).map_err(excel_err)?;
    sheet.set_column_width(5, 40).map_err(excel_err)?;
    Ok(())
}

/// Workbook with a single "Scoreboard" sheet
pub fn scoreboard_workbook(entries: &[ScoreboardEntry]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Scoreboard").map_err(excel_err)?;
    write_headers(
        sheet,
        &[
            "순위", "팀명", "총점", "등급", "차량수", "산업재해", "차량사고", "과속", "신호위반", "차선위반",
            "점검누락", "제안", "활동",
        ],
    )?;

    for entry in entries {
        let row = entry.rank as u32;
        let team = &entry.team;
        sheet.write_number(row, 0, entry.rank as f64).map_err(excel_err)?;
        sheet.write_string(row, 1, &team.name).map_err(excel_err)?;
        sheet.write_number(row, 2, team.total_score).map_err(excel_err)?;
        sheet.write_string(row, 3, entry.grade.to_string()).map_err(excel_err)?;
        let counters = [
            team.vehicle_count,
            team.work_accident,
            entry.vehicle_accident_total,
            team.fine_speed,
            team.fine_signal,
            team.fine_lane,
            team.inspection_miss,
            team.suggestion,
            team.activity,
        ];
        for (offset, value) in counters.into_iter().enumerate() {
            sheet
                .write_number(row, 4 + offset as u16, value)
                .map_err(excel_err)?;
        }
    }

    sheet.set_column_width(1, 16).map_err(excel_err)?;
    Ok(workbook)
}

pub fn export_scoreboard(entries: &[ScoreboardEntry], output_path: &Path) -> Result<()> {
    let mut workbook = scoreboard_workbook(entries)?;
    workbook.save(output_path).map_err(excel_err)?;
    Ok(())
}

pub fn scoreboard_xlsx_bytes(entries: &[ScoreboardEntry]) -> Result<Vec<u8>> {
    let mut workbook = scoreboard_workbook(entries)?;
    workbook.save_to_buffer().map_err(excel_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portal_domain::model::{EquipmentItem, ItemStatus, TeamData};
    use portal_domain::service::aggregate_items;
    use tempfile::tempdir;

    #[test]
    fn test_inventory_export_writes_xlsx() {
        let records = vec![TeamRecord {
            notice_id: 1,
            data: TeamData::new(
                "동대구운용팀",
                vec![EquipmentItem::new("안전모", 4, "머리보호", ItemStatus::Good)],
                Utc::now(),
            ),
        }];
        let summaries = aggregate_items(&records, None);

        let bytes = inventory_xlsx_bytes(&records, &summaries).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.xlsx");
        export_inventory(&records, &summaries, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_scoreboard_exports() {
        let bytes = scoreboard_xlsx_bytes(&[]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
