//! Engine actor - simulates catalog loading and inference in the Tokio runtime
//!
//! Replies arrive after a fixed delay, never immediately; pending work can be
//! cancelled but a discarded session simply drops it.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::constants::{CATALOG_LOAD_DELAY, GENERATION_DELAY};
use crate::engine::mock;
use crate::messages::{EngineCommand, EngineResponse};

/// Tracks a pending generation for cancellation
struct ActiveGeneration {
    cancel_tx: oneshot::Sender<()>,
}

/// Engine actor that processes catalog and generation commands
pub struct EngineActor {
    response_tx: mpsc::UnboundedSender<EngineResponse>,
    tasks: JoinSet<()>,
    cancel_handles: HashMap<u64, ActiveGeneration>,
    catalog_delay: Duration,
    generation_delay: Duration,
}

impl EngineActor {
    pub fn new(response_tx: mpsc::UnboundedSender<EngineResponse>) -> Self {
        Self::with_delays(response_tx, CATALOG_LOAD_DELAY, GENERATION_DELAY)
    }

    /// Engine with explicit delays (tests use near-zero ones)
    pub fn with_delays(
        response_tx: mpsc::UnboundedSender<EngineResponse>,
        catalog_delay: Duration,
        generation_delay: Duration,
    ) -> Self {
        EngineActor {
            response_tx,
            tasks: JoinSet::new(),
            cancel_handles: HashMap::new(),
            catalog_delay,
            generation_delay,
        }
    }

    /// Run the engine actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if self.handle_command(cmd) {
                                break;
                            }
                        }
                        None => break,
                    }
                }

                // Reap finished tasks and the cancel handles they leave behind
                Some(_result) = self.tasks.join_next() => {
                    self.prune_finished();
                }
            }
        }
    }

    /// Process one command. Returns true when the actor should shut down.
    fn handle_command(&mut self, cmd: EngineCommand) -> bool {
        match cmd {
            EngineCommand::LoadCatalog => {
                let response_tx = self.response_tx.clone();
                let delay = self.catalog_delay;

                self.tasks.spawn(async move {
                    tracing::info!("Loading model and template catalogs");
                    tokio::time::sleep(delay).await;
                    let _ = response_tx.send(EngineResponse::CatalogLoaded {
                        models: mock::model_catalog(),
                        templates: mock::template_catalog(),
                    });
                });
                false
            }

            EngineCommand::Generate { id, model, parameters } => {
                let (cancel_tx, cancel_rx) = oneshot::channel();
                self.cancel_handles.insert(id, ActiveGeneration { cancel_tx });

                let response_tx = self.response_tx.clone();
                let delay = self.generation_delay;

                self.tasks.spawn(async move {
                    tracing::info!(id, model = %model, "Generating mock completion");
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {
                            let _ = response_tx.send(EngineResponse::Completion {
                                id,
                                model,
                                parameters,
                                content: mock::pick_response(),
                            });
                        }
                        _ = cancel_rx => {
                            tracing::info!(id, "Generation cancelled");
                            let _ = response_tx.send(EngineResponse::Cancelled { id });
                        }
                    }
                });
                false
            }

            EngineCommand::CancelGeneration(id) => {
                if let Some(active) = self.cancel_handles.remove(&id) {
                    let _ = active.cancel_tx.send(());
                }
                false
            }

            EngineCommand::Shutdown => {
                for (_, active) in self.cancel_handles.drain() {
                    let _ = active.cancel_tx.send(());
                }
                true
            }
        }
    }

    /// Drop cancel handles whose generation already resolved. A finished
    /// task drops its receiver, which closes the sender we kept.
    fn prune_finished(&mut self) {
        self.cancel_handles
            .retain(|_, active| !active.cancel_tx.is_closed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromptParameters;

    fn fast_engine() -> (
        mpsc::UnboundedSender<EngineCommand>,
        mpsc::UnboundedReceiver<EngineResponse>,
        tokio::task::JoinHandle<()>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let engine = EngineActor::with_delays(
            resp_tx,
            Duration::from_millis(1),
            Duration::from_millis(1),
        );
        let handle = tokio::spawn(engine.run(cmd_rx));
        (cmd_tx, resp_rx, handle)
    }

    #[tokio::test]
    async fn test_load_catalog_populates_four_models() {
        let (cmd_tx, mut resp_rx, handle) = fast_engine();
        cmd_tx.send(EngineCommand::LoadCatalog).unwrap();

        match resp_rx.recv().await.unwrap() {
            EngineResponse::CatalogLoaded { models, templates } => {
                assert_eq!(models.len(), 4);
                assert_eq!(templates.len(), 4);
            }
            other => panic!("unexpected response: {other:?}"),
        }

        cmd_tx.send(EngineCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_generate_yields_exactly_one_completion() {
        let (cmd_tx, mut resp_rx, handle) = fast_engine();
        cmd_tx
            .send(EngineCommand::Generate {
                id: 7,
                model: String::from("gpt-4"),
                parameters: PromptParameters::default(),
            })
            .unwrap();

        match resp_rx.recv().await.unwrap() {
            EngineResponse::Completion {
                id,
                model,
                content,
                ..
            } => {
                assert_eq!(id, 7);
                assert_eq!(model, "gpt-4");
                assert!(mock::MOCK_RESPONSES.contains(&content.as_str()));
            }
            other => panic!("unexpected response: {other:?}"),
        }

        cmd_tx.send(EngineCommand::Shutdown).unwrap();
        handle.await.unwrap();
        // No stray second completion for the same send
        assert!(resp_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_finished_generation_drops_its_cancel_handle() {
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let mut engine = EngineActor::with_delays(
            resp_tx,
            Duration::from_millis(1),
            Duration::from_millis(1),
        );

        engine.handle_command(EngineCommand::Generate {
            id: 3,
            model: String::from("gpt-4"),
            parameters: PromptParameters::default(),
        });
        assert_eq!(engine.cancel_handles.len(), 1);

        // Let the spawned generation run to completion, then reap it
        engine.tasks.join_next().await.unwrap().unwrap();
        engine.prune_finished();
        assert!(engine.cancel_handles.is_empty());

        assert!(matches!(
            resp_rx.recv().await,
            Some(EngineResponse::Completion { id: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_generation() {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let engine = EngineActor::with_delays(
            resp_tx,
            Duration::from_millis(1),
            Duration::from_secs(60),
        );
        let handle = tokio::spawn(engine.run(cmd_rx));

        cmd_tx
            .send(EngineCommand::Generate {
                id: 1,
                model: String::from("claude-2"),
                parameters: PromptParameters::default(),
            })
            .unwrap();
        cmd_tx.send(EngineCommand::CancelGeneration(1)).unwrap();

        match resp_rx.recv().await.unwrap() {
            EngineResponse::Cancelled { id } => assert_eq!(id, 1),
            other => panic!("unexpected response: {other:?}"),
        }

        cmd_tx.send(EngineCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
