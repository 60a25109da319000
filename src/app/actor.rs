//! App actor - message loop processing UI events and engine responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{EngineCommand, EngineResponse, RenderState, UiEvent};

/// App actor that processes UI events and engine responses
pub struct AppActor {
    state: AppState,
    engine_tx: mpsc::UnboundedSender<EngineCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        engine_tx: mpsc::UnboundedSender<EngineCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            engine_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut engine_rx: mpsc::UnboundedReceiver<EngineResponse>,
    ) {
        // Kick off the simulated catalog load, then render the loading state
        let _ = self.engine_tx.send(EngineCommand::LoadCatalog);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.engine_tx.send(EngineCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = engine_rx.recv() => {
                    self.state.handle_engine_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        // Any keystroke clears the previous transient notice
        self.state.notice = None;

        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Prompt editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::NewLine => self.state.new_line(),

            // Prompt actions
            UiEvent::SendPrompt => {
                if let Some(cmd) = self.state.send_prompt() {
                    let _ = self.engine_tx.send(cmd);
                }
            }
            UiEvent::CancelGeneration => {
                if let Some(cmd) = self.state.cancel_generation() {
                    let _ = self.engine_tx.send(cmd);
                }
            }

            // Model picker
            UiEvent::NextModel => self.state.next_model(),
            UiEvent::PrevModel => self.state.prev_model(),
            UiEvent::SelectModel => self.state.select_model(),

            // Parameters
            UiEvent::NextParameter => self.state.next_parameter(),
            UiEvent::PrevParameter => self.state.prev_parameter(),
            UiEvent::IncrementParameter => self.state.increment_parameter(),
            UiEvent::DecrementParameter => self.state.decrement_parameter(),

            // Transcript
            UiEvent::NextMessage => self.state.next_message(),
            UiEvent::PrevMessage => self.state.prev_message(),
            UiEvent::CopyMessage => self.state.copy_message(),
            UiEvent::ClearTranscript => self.state.clear_messages(),
            UiEvent::ExportTranscript => self.state.export_transcript(),

            // Templates
            UiEvent::OpenTemplates => self.state.open_templates(),
            UiEvent::CloseTemplates => self.state.close_templates(),
            UiEvent::NextTemplate => self.state.next_template(),
            UiEvent::PrevTemplate => self.state.prev_template(),
            UiEvent::LoadTemplate => self.state.load_template(),
            UiEvent::SaveTemplate => self.state.save_template(),

            // Theme
            UiEvent::ToggleTheme => {
                self.state.toggle_theme();
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineActor;
    use crate::models::Role;
    use crate::storage::Storage;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_actor_requests_catalog_and_renders() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(Storage::with_dir(dir.path().to_path_buf()));

        let (engine_tx, mut engine_cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_engine_resp_tx, engine_resp_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(state, engine_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, engine_resp_rx));

        // Startup issues a LoadCatalog command and an initial render
        assert!(matches!(
            engine_cmd_rx.recv().await,
            Some(EngineCommand::LoadCatalog)
        ));
        let initial = render_rx.recv().await.unwrap();
        assert!(initial.is_loading);

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(
            engine_cmd_rx.recv().await,
            Some(EngineCommand::Shutdown)
        ));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_end_to_end_send_produces_one_reply() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(Storage::with_dir(dir.path().to_path_buf()));

        let (engine_cmd_tx, engine_cmd_rx) = mpsc::unbounded_channel();
        let (engine_resp_tx, engine_resp_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();

        let engine = EngineActor::with_delays(
            engine_resp_tx,
            Duration::from_millis(1),
            Duration::from_millis(1),
        );
        tokio::spawn(engine.run(engine_cmd_rx));

        let actor = AppActor::new(state, engine_cmd_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, engine_resp_rx));

        // Wait for the catalog to land: 4 models, first one selected
        let catalog_state = loop {
            let state = render_rx.recv().await.unwrap();
            if !state.is_loading {
                break state;
            }
        };
        assert_eq!(catalog_state.models.len(), 4);
        assert_eq!(
            catalog_state.selected_model.as_ref().map(|m| m.id.as_str()),
            Some("gpt-4")
        );

        // Compose and send "Hello"
        ui_tx.send(UiEvent::StartEditing).unwrap();
        for c in "Hello".chars() {
            ui_tx.send(UiEvent::CharInput(c)).unwrap();
        }
        ui_tx.send(UiEvent::StopEditing).unwrap();
        ui_tx.send(UiEvent::SendPrompt).unwrap();

        // The user message lands immediately, the reply after the delay
        let final_state = loop {
            let state = render_rx.recv().await.unwrap();
            if state.messages.len() == 2 {
                break state;
            }
            assert!(state.messages.len() < 2);
            if let Some(first) = state.messages.first() {
                assert_eq!(first.role, Role::User);
                assert_eq!(first.content, "Hello");
            }
        };

        assert_eq!(final_state.messages[0].role, Role::User);
        assert_eq!(final_state.messages[1].role, Role::Assistant);
        assert_eq!(final_state.messages[1].model.as_deref(), Some("gpt-4"));
        assert_eq!(final_state.pending_generations, 0);

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
    }
}
