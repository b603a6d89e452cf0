//! File-backed repositories, sheet loading and workbook export on disk

use chrono::Utc;
use tempfile::tempdir;

use portal_domain::model::TeamData;
use portal_domain::repository::{ConversationRepository, NoticeRepository, SettingsRepository, TeamRepository};
use portal_domain::service::{aggregate_items, collect_team_records, group_rows};
use portal_infra::excel::export_inventory;
use portal_infra::spreadsheet::load_equipment_csv;
use portal_infra::{FileConversationRepository, FileNoticeRepository, FileSettingsRepository, FileTeamRepository};
use portal_types::{ChatRole, NewNotice, NewTeam, NoticeCategory};

#[test]
fn test_sheet_to_records_to_workbook() {
    let dir = tempdir().unwrap();
    let sheet_path = dir.path().join("inventory.csv");
    std::fs::write(
        &sheet_path,
        "\u{feff}팀명,용품명,카테고리,수량,상태\n구미운용팀,안전모,머리보호,4,양호\n구미운용팀,검전기,전기안전,1,불량\n",
    )
    .unwrap();
    let sheet = load_equipment_csv(&sheet_path).unwrap();
    assert!(sheet.errors.is_empty());

    let notices = FileNoticeRepository::open(dir.path()).unwrap();
    for (team, items) in group_rows(sheet.rows) {
        let data = TeamData::new(team.clone(), items, Utc::now());
        notices
            .create(NewNotice::new(NoticeCategory::EquipStatus, format!("{team} 보호구 현황"), data.to_content()))
            .unwrap();
    }

    let reopened = FileNoticeRepository::open(dir.path()).unwrap();
    let records = collect_team_records(&reopened.find_by_category(NoticeCategory::EquipStatus).unwrap());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data.items.len(), 2);

    let output = dir.path().join("out").join("inventory.xlsx");
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();
    export_inventory(&records, &aggregate_items(&records, None), &output).unwrap();
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn test_teams_conversations_and_settings_persist() {
    let dir = tempdir().unwrap();
    {
        let teams = FileTeamRepository::open(dir.path()).unwrap();
        let team = teams
            .create(
                NewTeam {
                    name: "문경운용팀".to_string(),
                    year: 2025,
                    vehicle_count: 3,
                },
                100,
            )
            .unwrap();
        assert_eq!(team.total_score, 100);

        let conversations = FileConversationRepository::open(dir.path()).unwrap();
        let conversation = conversations.create("새 대화").unwrap();
        conversations
            .append_message(conversation.id, ChatRole::User, "절연장갑 점검 주기는?")
            .unwrap();

        FileSettingsRepository::open(dir.path()).unwrap().set_locked(true).unwrap();
    }

    let teams = FileTeamRepository::open(dir.path()).unwrap();
    assert!(teams.find_by_name("문경운용팀", 2025).unwrap().is_some());
    assert!(teams.find_by_name("문경운용팀", 2024).unwrap().is_none());

    let conversations = FileConversationRepository::open(dir.path()).unwrap();
    let all = conversations.find_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(conversations.messages(all[0].id).unwrap().len(), 1);
    assert!(conversations.delete(all[0].id).unwrap());
    assert!(conversations.messages(all[0].id).unwrap().is_empty());

    assert!(FileSettingsRepository::open(dir.path()).unwrap().load().unwrap().is_locked);
}
