//! Prompt Studio TUI - actor-based prompt workbench
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Engine Layer (Tokio) - simulated catalog loading and inference

mod app;
mod constants;
mod engine;
mod export;
mod messages;
mod models;
mod storage;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use app::{AppActor, AppState};
use constants::APP_NAME;
use engine::EngineActor;
use messages::ui_events::{key_to_ui_event, InputMode, Panel};
use messages::{EngineCommand, EngineResponse, RenderState, UiEvent};
use models::ParameterKey;
use storage::Storage;
use ui::{format_timestamp, format_tokens, palette, speaker_label, Palette};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "prompt-studio.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (engine_cmd_tx, engine_cmd_rx) = mpsc::unbounded_channel::<EngineCommand>();
    let (engine_resp_tx, engine_resp_rx) = mpsc::unbounded_channel::<EngineResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn engine actor
    let engine_actor = EngineActor::new(engine_resp_tx);
    tokio::spawn(engine_actor.run(engine_cmd_rx));

    // Spawn app actor (loads the persisted theme before first render)
    let app_actor = AppActor::new(AppState::new(Storage::new()), engine_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, engine_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.show_templates,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let colors = palette(state.theme);
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, &colors, main_chunks[0]);

    // Sidebar (models + parameters) on the left, composer + transcript right
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(40)])
        .split(main_chunks[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(7)])
        .split(content[0]);

    draw_models_panel(f, state, &colors, sidebar[0]);
    draw_parameters_panel(f, state, &colors, sidebar[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(content[1]);

    draw_prompt_panel(f, state, &colors, right[0]);
    draw_transcript_panel(f, state, &colors, right[1]);

    draw_status_bar(f, state, &colors, main_chunks[2]);

    if state.show_templates {
        draw_templates_popup(f, state, &colors, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, colors: &Palette, area: Rect) {
    let theme_label = match state.theme {
        models::Theme::Light => " light ",
        models::Theme::Dark => " dark ",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {APP_NAME} "),
            Style::default().fg(colors.accent).bold(),
        ),
        Span::styled(
            "craft, test, and tune prompts",
            Style::default().fg(colors.text_secondary),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[t]{theme_label}"),
            Style::default().fg(colors.text_secondary),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn panel_border(state: &RenderState, colors: &Palette, panel: Panel) -> Style {
    if state.active_panel == panel && state.input_mode == InputMode::Editing {
        Style::default().fg(colors.border_editing)
    } else if state.active_panel == panel {
        Style::default().fg(colors.border_focused)
    } else {
        Style::default().fg(colors.border)
    }
}

fn draw_models_panel(f: &mut Frame, state: &RenderState, colors: &Palette, area: Rect) {
    let is_focused = state.active_panel == Panel::Models;

    let title = if state.is_loading {
        String::from(" Model (loading...) ")
    } else if state.models.is_empty() {
        String::from(" Model (unavailable) ")
    } else {
        String::from(" Model (Enter:select) ")
    };

    let items: Vec<ListItem> = state
        .models
        .iter()
        .map(|model| {
            let selected = state.selected_model.as_ref().map(|m| m.id.as_str())
                == Some(model.id.as_str());
            let marker = if selected { "* " } else { "  " };
            let name_style = if selected {
                Style::default().fg(colors.accent).bold()
            } else {
                Style::default().fg(colors.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}{}", model.name), name_style),
                Span::styled(
                    format!(
                        "  {} / {} tok",
                        model.provider,
                        format_tokens(model.max_tokens)
                    ),
                    Style::default().fg(colors.text_secondary),
                ),
            ]))
        })
        .collect();

    let highlight_style = if is_focused {
        Style::default().fg(colors.border_editing).bold()
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(state, colors, Panel::Models))
                .title(title),
        )
        .highlight_style(highlight_style);

    let mut list_state = ListState::default();
    if !state.models.is_empty() {
        list_state.select(Some(state.model_cursor));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_parameters_panel(f: &mut Frame, state: &RenderState, colors: &Palette, area: Rect) {
    let is_focused = state.active_panel == Panel::Parameters;

    let mut lines: Vec<Line> = Vec::new();
    for (i, key) in ParameterKey::ALL.iter().enumerate() {
        let value = state.parameters.get(*key);

        // The max-tokens bound follows the selected model at render time only
        let max = match key {
            ParameterKey::MaxTokens => state
                .selected_model
                .as_ref()
                .map(|m| m.max_tokens as f64)
                .unwrap_or_else(|| key.max()),
            _ => key.max(),
        };

        let display = match key {
            ParameterKey::MaxTokens => format_tokens(value as u32),
            _ => format!("{value:.2}"),
        };

        let label_style = if is_focused && i == state.selected_parameter {
            Style::default().fg(colors.border_editing).bold()
        } else {
            Style::default().fg(colors.text)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", key.label()), label_style),
            Span::styled(display, Style::default().fg(colors.text_secondary)),
        ]));
        lines.push(Line::from(Span::styled(
            slider_bar(value, key.min(), max, 24),
            Style::default().fg(if is_focused && i == state.selected_parameter {
                colors.accent
            } else {
                colors.border
            }),
        )));
    }

    if is_focused {
        let key = ParameterKey::ALL[state.selected_parameter];
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            key.description(),
            Style::default().fg(colors.text_secondary),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(state, colors, Panel::Parameters))
        .title(" Parameters (←/→ adjust) ");

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Fixed-width slider: [=====|----]
fn slider_bar(value: f64, min: f64, max: f64, width: usize) -> String {
    let span = (max - min).max(f64::EPSILON);
    let ratio = ((value - min) / span).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for i in 0..width {
        bar.push(if i < filled { '=' } else { '-' });
    }
    bar.push(']');
    bar
}

fn draw_prompt_panel(f: &mut Frame, state: &RenderState, colors: &Palette, area: Rect) {
    let is_focused = state.active_panel == Panel::Prompt;
    let editing = is_focused && state.input_mode == InputMode::Editing;

    let char_count = state.prompt.chars().count();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(state, colors, Panel::Prompt))
        .title(" Prompt (e:edit s:send l:templates w:save) ")
        .title_bottom(Line::from(format!(" {char_count} characters ")).right_aligned());

    let content: &str = if state.prompt.is_empty() && !editing {
        "Enter your prompt here... ('e' to edit, 's' to send)"
    } else {
        state.prompt.as_str()
    };
    let style = if state.prompt.is_empty() && !editing {
        Style::default().fg(colors.text_secondary)
    } else {
        Style::default().fg(colors.text)
    };

    let paragraph = Paragraph::new(content)
        .style(style)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);

    if editing {
        // Naive cursor placement: line/column of the byte cursor, unwrapped
        let before = &state.prompt[..state.cursor_position.min(state.prompt.len())];
        let row = before.matches('\n').count() as u16;
        let col = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0) as u16;

        let max_x = area.x + area.width.saturating_sub(2);
        let max_y = area.y + area.height.saturating_sub(2);
        let cursor_x = (area.x + 1 + col).min(max_x);
        let cursor_y = (area.y + 1 + row).min(max_y);
        f.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_transcript_panel(f: &mut Frame, state: &RenderState, colors: &Palette, area: Rect) {
    let is_focused = state.active_panel == Panel::Transcript;

    let title = format!(
        " Conversation ({} messages, j/k:select y:copy x:export c:clear) ",
        state.messages.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(state, colors, Panel::Transcript))
        .title(title);

    let mut lines: Vec<Line> = Vec::new();
    for (i, message) in state.messages.iter().enumerate() {
        let speaker_color = match message.role {
            models::Role::User => colors.user,
            models::Role::Assistant => colors.assistant,
        };
        let highlighted = is_focused && i == state.message_cursor;
        let marker = if highlighted { "> " } else { "" };
        let mut speaker_style = Style::default().fg(speaker_color).bold();
        if highlighted {
            speaker_style = speaker_style.underlined();
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}", speaker_label(message)), speaker_style),
            Span::styled(
                format!("  {}", format_timestamp(message.timestamp)),
                Style::default().fg(colors.text_secondary),
            ),
        ]));
        for text_line in message.content.lines() {
            lines.push(Line::from(Span::styled(
                format!("  {text_line}"),
                Style::default().fg(colors.text),
            )));
        }
        lines.push(Line::raw(""));
    }

    if state.pending_generations > 0 {
        lines.push(Line::from(Span::styled(
            "  ...thinking",
            Style::default().fg(colors.text_secondary).italic(),
        )));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No messages yet. Send a prompt to get started!",
            Style::default().fg(colors.text_secondary),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.transcript_scroll, 0));
    f.render_widget(paragraph, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, colors: &Palette, area: Rect) {
    let status = if let Some(notice) = &state.notice {
        format!(" {notice} ")
    } else if state.input_mode == InputMode::Editing {
        String::from(" ESC:stop editing | Enter:newline | arrows:move ")
    } else if state.pending_generations > 0 {
        String::from(" Generating... (Ctrl+X to cancel) ")
    } else {
        String::from(" Tab:panel | e:edit | s:send | t:theme | x:export | ?:help | q:quit ")
    };

    let bar = Paragraph::new(status).style(Style::default().fg(colors.text_secondary));
    f.render_widget(bar, area);
}

fn draw_templates_popup(f: &mut Frame, state: &RenderState, colors: &Palette, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let items: Vec<ListItem> = state
        .templates
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::styled(t.name.clone(), Style::default().fg(colors.text)),
                Span::styled(
                    format!("  [{}]", t.category),
                    Style::default().fg(colors.text_secondary),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Templates (Enter:load, Esc:close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .highlight_style(Style::default().fg(colors.border_editing).bold());

    let mut list_state = ListState::default();
    if !state.templates.is_empty() {
        list_state.select(Some(state.template_cursor));
    }

    f.render_widget(Clear, popup_area);
    f.render_stateful_widget(list, popup_area, &mut list_state);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 PROMPT STUDIO - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   ↑ / ↓              Navigate models/parameters, scroll transcript

 PROMPT
   e / Enter          Edit prompt (Esc to stop)
   s                  Send prompt
   Ctrl+X             Cancel pending generation
   l                  Browse templates
   w                  Save prompt as template

 MODELS & PARAMETERS
   Enter              Select highlighted model
   ← / →              Adjust highlighted parameter

 TRANSCRIPT
   j / k              Select next/previous message
   y                  Copy selected message to clipboard
   x                  Export conversation as JSON
   c                  Clear conversation

 GENERAL
   t                  Toggle light/dark theme
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
