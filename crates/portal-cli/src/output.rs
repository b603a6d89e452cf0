//! Output formatting module

use serde::Serialize;

use portal_app::services::EquipmentSummary;
use portal_domain::service::{BatchReport, FaqBook, ScoreboardEntry, Slide, SlideDeck};
use portal_types::{Notice, OutputFormat, Result, Settings, Team};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First line of `text`, shortened to `max` characters
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max {
        format!("{}…", line.chars().take(max).collect::<String>())
    } else {
        line.to_string()
    }
}

pub fn output_notices(format: OutputFormat, notices: &[Notice]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(notices);
    }
    if notices.is_empty() {
        println!("No notices.");
        return Ok(());
    }
    println!("{:>5}  {:<14} {:<17} Title", "ID", "Category", "Created");
    println!("{}", "-".repeat(70));
    for notice in notices {
        println!(
            "{:>5}  {:<14} {:<17} {}",
            notice.id,
            notice.category.as_str(),
            notice.created_at.format("%Y-%m-%d %H:%M"),
            preview(&notice.title, 40)
        );
    }
    println!("\n{} notice(s)", notices.len());
    Ok(())
}

pub fn output_notice(format: OutputFormat, notice: &Notice) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(notice);
    }
    println!("Notice #{} [{}] {}", notice.id, notice.category.label(), notice.title);
    if !notice.content.is_empty() {
        println!("{}", notice.content);
    }
    Ok(())
}

pub fn output_scoreboard(format: OutputFormat, year: i32, entries: &[ScoreboardEntry]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(entries);
    }
    println!("\nSafety Scoreboard {}", year);
    println!("=====================");
    if entries.is_empty() {
        println!("No teams registered. Run `safety-portal teams seed` first.");
        return Ok(());
    }
    println!(
        "{:>4}  {:>4}  {:<14} {:>6}  {:<9} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4}",
        "Rank", "ID", "Team", "Score", "Grade", "Acc", "Veh", "Spd", "Sig", "Lane", "Sugg", "Act"
    );
    println!("{}", "-".repeat(92));
    for entry in entries {
        let team = &entry.team;
        println!(
            "{:>4}  {:>4}  {:<14} {:>6}  {:<9} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4}",
            entry.rank,
            team.id,
            team.name,
            team.total_score,
            entry.grade.to_string(),
            team.work_accident,
            entry.vehicle_accident_total,
            team.fine_speed,
            team.fine_signal,
            team.fine_lane,
            team.suggestion,
            team.activity
        );
    }
    Ok(())
}

pub fn output_team(format: OutputFormat, team: &Team) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(team);
    }
    println!("{} ({}): total score {}", team.name, team.year, team.total_score);
    Ok(())
}

pub fn output_teams_created(format: OutputFormat, year: i32, teams: &[Team]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(teams);
    }
    if teams.is_empty() {
        println!("All roster teams already registered for {}.", year);
    } else {
        for team in teams {
            println!("Registered {} for {} (score {})", team.name, year, team.total_score);
        }
    }
    Ok(())
}

pub fn output_summary(format: OutputFormat, summary: &EquipmentSummary) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(summary);
    }
    match summary.team {
        Some(ref team) => println!("\nEquipment Summary: {}", team),
        None => println!("\nEquipment Summary"),
    }
    println!("=================");

    if summary.items.is_empty() {
        println!("No equipment registered.");
    } else {
        println!("{:<12} {:<16} {:>6} {:>6} {:>6}  Teams", "Category", "Item", "Total", "Good", "Bad");
        println!("{}", "-".repeat(70));
        for item in &summary.items {
            println!(
                "{:<12} {:<16} {:>6} {:>6} {:>6}  {}",
                item.category,
                item.name,
                item.registered,
                item.good,
                item.bad,
                item.teams.len()
            );
        }

        println!("\n--- By Category ---");
        for category in &summary.categories {
            println!(
                "{:<12} {:>3} kinds  {:>6} total  {:>6} bad",
                category.category, category.kinds, category.registered, category.bad
            );
        }
    }

    let totals = &summary.totals;
    println!("\nKinds:           {}", totals.kinds);
    println!("Registered:      {}", totals.registered);
    println!("Good:            {}", totals.good);
    println!("Bad:             {}", totals.bad);
    println!("Teams reporting: {}", totals.teams_reporting);

    println!("\n--- Teams ---");
    for team in &summary.teams {
        let updated = team
            .last_updated
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<14} {:<8} {:>3} kinds {:>6} total {:>4} bad  {}",
            team.team,
            team.status.label(),
            team.item_kinds,
            team.total_quantity,
            team.bad_count,
            updated
        );
    }
    Ok(())
}

pub fn output_report(format: OutputFormat, title: &str, report: &BatchReport) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(report);
    }
    println!("\n{}", title);
    println!("Succeeded: {}", report.succeeded);
    println!("Failed:    {}", report.failed);
    println!("Skipped:   {}", report.skipped);
    if !report.errors.is_empty() {
        println!("\nErrors:");
        for error in &report.errors {
            println!("  - {}", error);
        }
    }
    Ok(())
}

pub fn output_slides(format: OutputFormat, deck: &SlideDeck) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(deck.slides());
    }
    if deck.is_empty() {
        println!("No slides on the digital board.");
        return Ok(());
    }
    for (i, slide) in deck.slides().iter().enumerate() {
        let image = if slide.image_url.is_some() { " [image]" } else { "" };
        println!("{:>3}. #{} {}{}", i, slide.notice_id, slide.title, image);
    }
    Ok(())
}

pub fn output_slide(format: OutputFormat, slide: &Slide, index: usize, len: usize) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(slide);
    }
    println!("\n[{}/{}] {}", index + 1, len, slide.title);
    println!("{}", "=".repeat(40));
    if !slide.text.is_empty() {
        println!("{}", slide.text);
    }
    if let Some(ref url) = slide.image_url {
        println!("Image: {}", url);
    }
    Ok(())
}

pub fn output_faq(format: OutputFormat, book: &FaqBook, question: Option<&str>) -> Result<()> {
    match question {
        Some(question) => {
            let answer = book.find_answer(question);
            if format == OutputFormat::Json {
                return print_json(&serde_json::json!({
                    "question": question,
                    "answer": answer,
                    "matched": book.lookup(question).is_some(),
                }));
            }
            println!("{}", answer);
        }
        None => {
            if format == OutputFormat::Json {
                return print_json(&serde_json::json!({ "suggested": book.suggested_questions() }));
            }
            println!("Suggested questions:");
            for q in book.suggested_questions() {
                println!("  - {}", q);
            }
        }
    }
    Ok(())
}

pub fn output_lock(format: OutputFormat, settings: &Settings) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(settings);
    }
    println!("Portal is {}", if settings.is_locked { "locked" } else { "unlocked" });
    Ok(())
}
