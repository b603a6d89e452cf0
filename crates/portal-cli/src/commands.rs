//! Command handlers

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};

use portal_ai::prompts::conversation_title;
use portal_ai::{ChatEvent, ChatStreamClient, FALLBACK_REPLY};
use portal_app::services::current_year;
use portal_app::{Config, Portal};
use portal_domain::model::{EquipmentItem, ItemStatus};
use portal_domain::service::{FaqBook, SlideDeck, AUTOPLAY_INTERVAL};
use portal_types::{Error, NewNotice, NoticeCategory, OutputFormat, Result, TeamUpdate};

use crate::cli::{BoardCommand, Cli, Commands, EquipmentCommand, NoticeCommand, RequestCommand, TeamCommand};
use crate::output::{
    output_faq, output_lock, output_notice, output_notices, output_report, output_scoreboard, output_slide,
    output_slides, output_summary, output_team, output_teams_created, print_json,
};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if let Commands::Config {
        show,
        ref set_bind,
        ref set_data_dir,
        ref set_ai_model,
        ref set_ai_base_url,
        set_output,
        reset,
    } = cli.command
    {
        return cmd_config(ConfigChanges {
            show,
            set_bind: set_bind.clone(),
            set_data_dir: set_data_dir.clone(),
            set_ai_model: set_ai_model.clone(),
            set_ai_base_url: set_ai_base_url.clone(),
            set_output,
            reset,
        });
    }

    let mut config = Config::load()?;
    config.apply_env();
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            cmd_serve(&config)
        }
        Commands::Config { .. } => Ok(()),
        Commands::Notices(command) => cmd_notices(&Portal::open(&config)?, format, command),
        Commands::Teams(command) => cmd_teams(&Portal::open(&config)?, format, command),
        Commands::Equipment(command) => cmd_equipment(&Portal::open(&config)?, format, command),
        Commands::Requests(RequestCommand::SetStatus { id, status }) => {
            let portal = Portal::open(&config)?;
            let notice = portal.notices.set_request_status(id, status)?;
            if format == OutputFormat::Json {
                return print_json(&notice);
            }
            println!("Request #{} is now {}", id, status.label());
            Ok(())
        }
        Commands::Board(command) => cmd_board(&Portal::open(&config)?, format, command),
        Commands::Lock { on, off } => {
            let portal = Portal::open(&config)?;
            let settings = match (on, off) {
                (true, _) => portal.settings.set_locked(true)?,
                (_, true) => portal.settings.set_locked(false)?,
                _ => portal.settings.settings()?,
            };
            output_lock(format, &settings)
        }
        Commands::Faq { question } => output_faq(format, FaqBook::builtin(), question.as_deref()),
        Commands::Chat {
            message,
            conversation,
            server,
            offline,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            if offline {
                let portal = Portal::open(&config)?;
                runtime.block_on(cmd_chat_offline(&portal, format, conversation, &message))
            } else {
                let server = server.unwrap_or_else(|| server_url(&config.bind_addr));
                runtime.block_on(cmd_chat(&server, format, conversation, &message))
            }
        }
    }
}

fn cmd_serve(config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(portal_server::serve(config))
}

struct ConfigChanges {
    show: bool,
    set_bind: Option<String>,
    set_data_dir: Option<PathBuf>,
    set_ai_model: Option<String>,
    set_ai_base_url: Option<String>,
    set_output: Option<OutputFormat>,
    reset: bool,
}

fn cmd_config(changes: ConfigChanges) -> Result<()> {
    let mut config = if changes.reset {
        println!("Configuration reset to defaults");
        Config::default()
    } else {
        Config::load()?
    };
    let mut modified = changes.reset;

    if let Some(bind) = changes.set_bind {
        config.bind_addr = bind;
        modified = true;
    }
    if let Some(dir) = changes.set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }
    if let Some(model) = changes.set_ai_model {
        config.ai.model = model;
        modified = true;
    }
    if let Some(url) = changes.set_ai_base_url {
        config.ai.base_url = url;
        modified = true;
    }
    if let Some(format) = changes.set_output {
        config.output_format = format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration saved");
    }
    if changes.show || !modified {
        print!("{}", config);
    }
    Ok(())
}

fn cmd_notices(portal: &Portal, format: OutputFormat, command: NoticeCommand) -> Result<()> {
    match command {
        NoticeCommand::List { category } => output_notices(format, &portal.notices.list(category)?),
        NoticeCommand::Add {
            category,
            title,
            content,
            image_url,
        } => {
            let mut notice = NewNotice::new(category, title, content);
            if let Some(url) = image_url {
                notice = notice.with_image(url);
            }
            output_notice(format, &portal.notices.create(notice)?)
        }
        NoticeCommand::Remove { id } => {
            portal.notices.delete(id)?;
            println!("Deleted notice #{}", id);
            Ok(())
        }
    }
}

fn parse_vehicle_accidents(raw: &[String]) -> Result<Option<BTreeMap<String, u32>>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let mut accidents = BTreeMap::new();
    for entry in raw {
        let (plate, count) = entry
            .split_once('=')
            .ok_or_else(|| Error::validation(format!("expected PLATE=COUNT, got '{entry}'")))?;
        let count: u32 = count
            .trim()
            .parse()
            .map_err(|_| Error::validation(format!("invalid accident count in '{entry}'")))?;
        accidents.insert(plate.trim().to_string(), count);
    }
    Ok(Some(accidents))
}

fn cmd_teams(portal: &Portal, format: OutputFormat, command: TeamCommand) -> Result<()> {
    match command {
        TeamCommand::Board { year, output } => {
            let year = year.unwrap_or_else(current_year);
            output_scoreboard(format, year, &portal.teams.scoreboard(year)?)?;
            if let Some(path) = output {
                portal.teams.export_scoreboard(year, &path)?;
                eprintln!("Exported scoreboard to: {}", path.display());
            }
            Ok(())
        }
        TeamCommand::Seed { year } => {
            let year = year.unwrap_or_else(current_year);
            output_teams_created(format, year, &portal.teams.seed(year)?)
        }
        TeamCommand::Set {
            id,
            vehicles,
            work_accident,
            fine_speed,
            fine_signal,
            fine_lane,
            inspection_miss,
            suggestion,
            activity,
            vehicle_accidents,
            total,
        } => {
            let update = TeamUpdate {
                vehicle_count: vehicles,
                total_score: total,
                work_accident,
                fine_speed,
                fine_signal,
                fine_lane,
                inspection_miss,
                suggestion,
                activity,
                vehicle_accidents: parse_vehicle_accidents(&vehicle_accidents)?,
            };
            output_team(format, &portal.teams.update(id, update)?)
        }
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

fn cmd_equipment(portal: &Portal, format: OutputFormat, command: EquipmentCommand) -> Result<()> {
    match command {
        EquipmentCommand::Summary { team } => output_summary(format, &portal.equipment.summary(team.as_deref())?),
        EquipmentCommand::Import { file } => {
            let bytes = std::fs::read(&file)?;
            let pb = progress_bar();
            pb.set_message("importing");
            let report = portal.equipment.import_csv_with_progress(&bytes, |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            })?;
            pb.finish_and_clear();
            output_report(format, &format!("Imported {}", file.display()), &report)
        }
        EquipmentCommand::Export { output } => {
            portal.equipment.export_to(&output)?;
            println!("Exported inventory to: {}", output.display());
            Ok(())
        }
        EquipmentCommand::BulkAdd {
            name,
            quantity,
            category,
            status,
        } => {
            let item = EquipmentItem::new(name, quantity, category, ItemStatus::parse(&status));
            let title = format!("Added {} to team inventories", item.name);
            let pb = progress_bar();
            let report = portal.equipment.bulk_add_with_progress(item, |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            })?;
            pb.finish_and_clear();
            output_report(format, &title, &report)
        }
    }
}

fn cmd_board(portal: &Portal, format: OutputFormat, command: BoardCommand) -> Result<()> {
    let mut deck = SlideDeck::from_notices(&portal.notices.list(Some(NoticeCategory::DigitalBoard))?);
    match command {
        BoardCommand::List => output_slides(format, &deck),
        BoardCommand::Show { index, play } => {
            if deck.is_empty() {
                println!("No slides on the digital board.");
                return Ok(());
            }
            if !deck.select(index) {
                return Err(Error::validation(format!(
                    "slide index {} out of range (0..{})",
                    index,
                    deck.len()
                )));
            }
            let rounds = if play { deck.len() } else { 1 };
            for round in 0..rounds {
                if round > 0 {
                    std::thread::sleep(AUTOPLAY_INTERVAL);
                    deck.tick();
                }
                if let Some(slide) = deck.current() {
                    output_slide(format, slide, deck.index(), deck.len())?;
                }
            }
            Ok(())
        }
    }
}

/// URL of the local server listening on `bind_addr`
fn server_url(bind_addr: &str) -> String {
    let addr = bind_addr.replace("0.0.0.0", "127.0.0.1");
    format!("http://{}", addr)
}

fn print_delta(delta: &str) {
    print!("{}", delta);
    let _ = std::io::stdout().flush();
}

async fn cmd_chat(server: &str, format: OutputFormat, conversation: Option<i64>, message: &str) -> Result<()> {
    let client = ChatStreamClient::new(server);
    let conversation_id = match conversation {
        Some(id) => Some(id),
        None => match client.create_conversation(&conversation_title(message)).await {
            Ok(conversation) => Some(conversation.id),
            Err(e) => {
                tracing::warn!(error = %e, "could not open a conversation");
                None
            }
        },
    };

    let streaming = format == OutputFormat::Table;
    let reply = match conversation_id {
        Some(id) => {
            client
                .send_message(id, message, |delta| {
                    if streaming {
                        print_delta(delta);
                    }
                })
                .await
        }
        None => FALLBACK_REPLY.to_string(),
    };
    print_reply(format, conversation_id, &reply, streaming && conversation_id.is_some() && reply != FALLBACK_REPLY)
}

async fn cmd_chat_offline(portal: &Portal, format: OutputFormat, conversation: Option<i64>, message: &str) -> Result<()> {
    let conversation = portal.chat.ensure_conversation(conversation, message)?;
    let mut events = portal.chat.reply_events(conversation.id, message)?;
    let streaming = format == OutputFormat::Table;
    let mut reply = String::new();
    while let Some(event) = events.next().await {
        match event {
            ChatEvent::Content(delta) => {
                if streaming {
                    print_delta(&delta);
                }
                reply.push_str(&delta);
            }
            ChatEvent::Done => break,
            ChatEvent::Error(e) => return Err(Error::Chat(e)),
        }
    }
    print_reply(format, Some(conversation.id), &reply, streaming)
}

fn print_reply(format: OutputFormat, conversation_id: Option<i64>, reply: &str, already_printed: bool) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "conversationId": conversation_id,
            "reply": reply,
        }));
    }
    if already_printed {
        println!();
    } else {
        println!("{}", reply);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_accidents_parsing() {
        let raw = vec!["12가3456=2".to_string(), " 34나5678 = 1".to_string()];
        let parsed = parse_vehicle_accidents(&raw).unwrap().unwrap();
        assert_eq!(parsed.get("12가3456"), Some(&2));
        assert_eq!(parsed.get("34나5678"), Some(&1));
        assert!(parse_vehicle_accidents(&[]).unwrap().is_none());
        assert!(parse_vehicle_accidents(&["12가3456".to_string()]).is_err());
        assert!(parse_vehicle_accidents(&["12가3456=x".to_string()]).is_err());
    }

    #[test]
    fn test_server_url_uses_loopback() {
        assert_eq!(server_url("0.0.0.0:5000"), "http://127.0.0.1:5000");
        assert_eq!(server_url("10.0.0.5:8080"), "http://10.0.0.5:8080");
    }
}
