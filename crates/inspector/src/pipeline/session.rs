// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Last-writer-wins decoding for hosts with overlapping triggers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use super::{Pipeline, PipelineError, PipelineOutput};

/// What a host should currently display.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Ready {
        ticket: u64,
        output: Arc<PipelineOutput>,
    },
    Failed {
        ticket: u64,
        message: String,
        internal: bool,
    },
}

/// Runs the pipeline for each trigger and publishes only the outcome of the
/// most recently issued trigger, whatever order runs finish in.
pub struct DecodeSession {
    pipeline: Arc<Pipeline>,
    latest: AtomicU64,
    state: watch::Sender<SessionState>,
}

impl DecodeSession {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            pipeline,
            latest: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Issue a ticket for a new trigger, superseding every earlier one.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish the result for `ticket` if it is still the latest. Returns
    /// whether it was published.
    pub fn complete(&self, ticket: u64, result: Result<PipelineOutput, PipelineError>) -> bool {
        let next = match result {
            Ok(output) => SessionState::Ready {
                ticket,
                output: Arc::new(output),
            },
            Err(e) => SessionState::Failed {
                ticket,
                message: e.to_string(),
                internal: e.is_internal(),
            },
        };

        let published = self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *state = next;
            true
        });
        if !published {
            tracing::debug!(ticket, "Discarding stale decode result");
        }
        published
    }

    /// Decode `input` on the blocking pool and publish the outcome if no
    /// newer trigger arrived in the meantime.
    pub async fn submit(&self, input: String) -> bool {
        let ticket = self.begin();
        let pipeline = self.pipeline.clone();
        let result = tokio::task::spawn_blocking(move || pipeline.run(&input)).await;

        match result {
            Ok(result) => self.complete(ticket, result),
            Err(e) => {
                tracing::error!(ticket, error = %e, "Decode task failed");
                self.state.send_if_modified(|state| {
                    if self.latest.load(Ordering::SeqCst) != ticket {
                        return false;
                    }
                    *state = SessionState::Failed {
                        ticket,
                        message: format!("Decode task failed: {}", e),
                        internal: true,
                    };
                    true
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{Schema, StrategyDecoder};
    use crate::pipeline::InputFormatError;

    fn session() -> DecodeSession {
        let decoder = Arc::new(StrategyDecoder::standard(Schema::builtin().unwrap()));
        DecodeSession::new(Arc::new(Pipeline::new(decoder)))
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let session = session();
        let first = session.begin();
        let second = session.begin();

        let newer = session.pipeline.run("te6cckEBAQEAAgAAAEysuc0=");
        assert!(session.complete(second, newer));
        assert!(!session.complete(first, Err(InputFormatError::Empty.into())));

        assert!(matches!(session.state(), SessionState::Ready { ticket, .. } if ticket == second));
    }

    #[test]
    fn test_failure_replaces_output() {
        let session = session();
        let ticket = session.begin();
        assert!(session.complete(ticket, Err(InputFormatError::Empty.into())));
        assert_eq!(
            session.state(),
            SessionState::Failed {
                ticket,
                message: "Input is empty".to_string(),
                internal: false,
            }
        );
    }

    #[tokio::test]
    async fn test_submit_publishes() {
        let session = session();
        let mut updates = session.subscribe();
        assert_eq!(session.state(), SessionState::Idle);

        assert!(session.submit("te6cckEBAQEAAgAAAEysuc0=".to_string()).await);
        updates.changed().await.unwrap();
        match &*updates.borrow() {
            SessionState::Ready { output, .. } => assert_eq!(output.strategy, None),
            other => panic!("unexpected state {:?}", other),
        }
    }
}
