use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use forms_client::{ApiClient, Session};
use forms_engine::{FieldPatch, FormEngine, LocalFile, UiControl};
use forms_protocol::PartKind;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;

use crate::backend::HttpBackend;

pub const MATURITY_LEVELS: [&str; 5] =
    ["Inicial", "Repetido", "Definido", "Gerenciado", "Otimizado"];

#[derive(Clone, Copy)]
enum Action {
    SetPolicy,
    SetPractice,
    EditInfo,
    Attach,
    Next,
    Prev,
    Jump,
    Review,
    Submit,
    Quit,
}

/// Interactive questionnaire loop. Every prompt interaction feeds the idle
/// clock; once it elapses the wizard exits and credentials are dropped.
pub async fn run(
    api: ApiClient,
    session: &mut Session,
    client_id: i64,
    template_slug: &str,
) -> Result<()> {
    let tokens = api.tokens().clone();
    let theme = ColorfulTheme::default();

    let spinner = ProgressBar::new_spinner().with_message("Loading form");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let booted = FormEngine::boot(HttpBackend::new(api), client_id, template_slug).await;
    spinner.finish_and_clear();
    let mut engine = booted?;

    loop {
        if session.expire_if_idle(&tokens) {
            println!(
                "{}",
                style("Session expired after inactivity; sign in again.").yellow()
            );
            return Ok(());
        }

        render(&engine);

        let (labels, actions) = menu(&engine);
        let picked = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;
        session.touch();
        let control_id = engine.current_control().map(|control| control.id);

        match actions[picked] {
            Action::SetPolicy => {
                let Some(id) = control_id else { continue };
                let current = engine.state(id).and_then(|state| state.policy.clone());
                if let Some(level) = pick_level(&theme, "Policy maturity", current.as_deref())? {
                    session.touch();
                    report(engine.save_field(id, FieldPatch::policy(level)).await);
                }
            }
            Action::SetPractice => {
                let Some(id) = control_id else { continue };
                let current = engine.state(id).and_then(|state| state.practice.clone());
                if let Some(level) = pick_level(&theme, "Practice maturity", current.as_deref())? {
                    session.touch();
                    report(engine.save_field(id, FieldPatch::practice(level)).await);
                }
            }
            Action::EditInfo => {
                let Some(id) = control_id else { continue };
                let current = engine
                    .state(id)
                    .and_then(|state| state.info.clone())
                    .unwrap_or_default();
                let text: String = Input::with_theme(&theme)
                    .with_prompt("Notes")
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()?;
                session.touch();
                report(engine.save_field(id, FieldPatch::info(text)).await);
            }
            Action::Attach => {
                let Some(id) = control_id else { continue };
                let path: String = Input::with_theme(&theme)
                    .with_prompt("File path")
                    .interact_text()?;
                session.touch();
                match tokio::fs::read(&path).await {
                    Ok(bytes) => {
                        let name = Path::new(&path)
                            .file_name()
                            .and_then(|name| name.to_str())
                            .unwrap_or("attachment")
                            .to_string();
                        report(engine.add_files(id, vec![LocalFile::new(name, bytes)]).await);
                    }
                    Err(err) => println!("{} {err}", style("cannot read file:").red()),
                }
            }
            Action::Next => engine.next(),
            Action::Prev => engine.prev(),
            Action::Jump => {
                let sections: Vec<String> = engine
                    .sections()
                    .iter()
                    .map(|section| {
                        format!("{} {}", done_marker(engine.is_section_done(section)), section.title)
                    })
                    .collect();
                let Some(section_idx) = Select::with_theme(&theme)
                    .with_prompt("Section")
                    .items(&sections)
                    .interact_opt()?
                else {
                    continue;
                };
                let controls: Vec<String> = engine.sections()[section_idx]
                    .controls
                    .iter()
                    .map(|control| {
                        format!("{} {}", done_marker(engine.is_control_done(control)), control.code)
                    })
                    .collect();
                if let Some(control_idx) = Select::with_theme(&theme)
                    .with_prompt("Control")
                    .items(&controls)
                    .interact_opt()?
                {
                    engine.goto(section_idx, control_idx);
                }
                session.touch();
            }
            Action::Review => {
                if Confirm::with_theme(&theme)
                    .with_prompt("Send for review? Editing locks afterwards.")
                    .default(false)
                    .interact()?
                {
                    session.touch();
                    match engine.start_review().await {
                        Ok(updated) => {
                            println!("Submission is now {}", style(updated.status).cyan())
                        }
                        Err(err) => println!("{} {err}", style("action failed:").red()),
                    }
                }
            }
            Action::Submit => {
                if Confirm::with_theme(&theme)
                    .with_prompt("Submit the assessment? This is final.")
                    .default(false)
                    .interact()?
                {
                    session.touch();
                    match engine.submit().await {
                        Ok(updated) => {
                            println!("Submission is now {}", style(updated.status).cyan())
                        }
                        Err(err) => println!("{} {err}", style("action failed:").red()),
                    }
                }
            }
            Action::Quit => return Ok(()),
        }
    }
}

fn menu(engine: &FormEngine<HttpBackend>) -> (Vec<&'static str>, Vec<Action>) {
    menu_items(
        engine.is_read_only(),
        engine.current_control(),
        !engine.sections().is_empty(),
    )
}

fn menu_items(
    read_only: bool,
    control: Option<&UiControl>,
    has_sections: bool,
) -> (Vec<&'static str>, Vec<Action>) {
    let mut labels = Vec::new();
    let mut actions = Vec::new();

    if !read_only {
        if let Some(control) = control {
            if control.parts.get(PartKind::Policy).is_some() {
                labels.push("Set policy maturity");
                actions.push(Action::SetPolicy);
            }
            if control.parts.get(PartKind::Practice).is_some() {
                labels.push("Set practice maturity");
                actions.push(Action::SetPractice);
            }
            if control.parts.get(PartKind::Info).is_some() {
                labels.push("Edit notes");
                actions.push(Action::EditInfo);
            }
            if control.parts.get(PartKind::Attachment).is_some() {
                labels.push("Attach a file");
                actions.push(Action::Attach);
            }
        }
    }

    if has_sections {
        labels.push("Next control");
        actions.push(Action::Next);
        labels.push("Previous control");
        actions.push(Action::Prev);
        labels.push("Jump to section");
        actions.push(Action::Jump);
    }

    if !read_only {
        labels.push("Send for review");
        actions.push(Action::Review);
        labels.push("Submit assessment");
        actions.push(Action::Submit);
    }

    labels.push("Quit");
    actions.push(Action::Quit);
    (labels, actions)
}

fn render(engine: &FormEngine<HttpBackend>) {
    let submission = engine.submission();
    let progress = engine.progress();

    println!();
    println!(
        "{}  {}",
        style(&submission.template.name).bold(),
        style(format!("[{}]", submission.status)).cyan()
    );
    println!("{}", progress_line(progress.done, progress.total, progress.pct));
    if engine.is_read_only() {
        println!(
            "{}",
            style("Read-only: this submission has left the editing stage.").yellow()
        );
    }

    let Some(section) = engine.current_section() else {
        println!("{}", style("This form has no answerable controls.").yellow());
        return;
    };
    let Some(control) = engine.current_control() else {
        return;
    };

    println!();
    println!("{}", style(&section.title).underlined());
    println!("{}  {}", style(&control.code).green().bold(), control.prompt);

    let state = engine.state(control.id);
    if control.parts.get(PartKind::Policy).is_some() {
        println!("  policy:    {}", field_value(state.and_then(|s| s.policy.as_deref())));
    }
    if control.parts.get(PartKind::Practice).is_some() {
        println!("  practice:  {}", field_value(state.and_then(|s| s.practice.as_deref())));
    }
    if control.parts.get(PartKind::Info).is_some() {
        println!("  notes:     {}", field_value(state.and_then(|s| s.info.as_deref())));
    }
    if control.parts.get(PartKind::Attachment).is_some() {
        let listed = state
            .map(|s| {
                s.attachments
                    .iter()
                    .map(|thumb| {
                        if thumb.pending {
                            format!("{} (uploading)", thumb.name)
                        } else {
                            thumb.name.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!("  evidence:  {}", field_value(Some(listed.as_str())));
    }
}

fn pick_level(theme: &ColorfulTheme, prompt: &str, current: Option<&str>) -> Result<Option<String>> {
    let mut items: Vec<&str> = MATURITY_LEVELS.to_vec();
    items.push("(clear)");
    let default = current
        .and_then(|value| MATURITY_LEVELS.iter().position(|level| *level == value))
        .unwrap_or(0);

    let picked = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact_opt()?;
    Ok(picked.map(|idx| {
        if idx == MATURITY_LEVELS.len() {
            String::new()
        } else {
            items[idx].to_string()
        }
    }))
}

fn report<T>(outcome: forms_engine::Result<T>) {
    if let Err(err) = outcome {
        println!("{} {err}", style("save failed:").red());
    }
}

fn done_marker(done: bool) -> String {
    if done {
        style("✓").green().to_string()
    } else {
        " ".to_string()
    }
}

fn field_value(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => style("(unanswered)").dim().to_string(),
    }
}

fn progress_line(done: usize, total: usize, pct: u8) -> String {
    const WIDTH: usize = 30;
    let filled = WIDTH * pct as usize / 100;
    format!(
        "{}{} {pct:>3}%  ({done}/{total} controls)",
        style("█".repeat(filled)).green(),
        style("░".repeat(WIDTH - filled)).dim(),
    )
}
