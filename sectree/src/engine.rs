use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

use flume::{Receiver, Sender};
use log::{debug, error, warn};

use crate::change::ChangeDescriptor;
use crate::element::TreeElement;
use crate::error::{Result, TreeError};
use crate::guard::{BusyTicket, ToggleGuard};
use crate::section::Section;
use crate::settings::EngineSettings;
use crate::tree::{SectionTree, Toggled};

type Snapshot<E> = Arc<RwLock<Arc<Vec<Section<E>>>>>;

enum Request {
    Toggle {
        index: usize,
        reply: Sender<Result<Toggled>>,
        ticket: BusyTicket,
    },
    Shutdown,
}

/// Asynchronous handle around a [`SectionTree`] owned by a worker thread.
///
/// Toggles are executed one at a time on the worker. While a toggle is in
/// flight further toggle requests are dropped and resolve immediately with
/// [`ChangeDescriptor::None`].
///
/// The latest section list is published before a toggle completes, so a
/// caller reading [`TreeEngine::sections`] after awaiting
/// [`TreeEngine::toggle`] always observes the toggled layout.
pub struct TreeEngine<E> {
    requests: Sender<Request>,
    snapshot: Snapshot<E>,
    guard: ToggleGuard,
    settings: EngineSettings,
    worker: Option<JoinHandle<()>>,
}

impl<E> TreeEngine<E>
where
    E: TreeElement + Send + Sync + 'static,
{
    /// Build the tree from `elements` and start the worker thread.
    ///
    /// # Errors
    /// Construction errors of [`crate::build`] and [`TreeError::Spawn`] when
    /// the worker thread cannot be started.
    pub fn spawn(elements: Vec<E>, settings: EngineSettings) -> Result<Self> {
        let tree = SectionTree::new(elements)?;
        Self::with_tree(tree, settings)
    }

    /// Start the worker around an existing tree.
    pub fn with_tree(
        tree: SectionTree<E>,
        settings: EngineSettings,
    ) -> Result<Self> {
        let snapshot: Snapshot<E> =
            Arc::new(RwLock::new(Arc::new(tree.sections().to_vec())));
        let (requests, inbox) = flume::unbounded();

        let worker_snapshot = Arc::clone(&snapshot);
        let worker = thread::Builder::new()
            .name(settings.worker_name.clone())
            .spawn(move || run_worker(tree, inbox, worker_snapshot))
            .map_err(TreeError::Spawn)?;

        debug!("started tree engine worker {:?}", settings.worker_name);

        Ok(Self {
            requests,
            snapshot,
            guard: ToggleGuard::new(),
            settings,
            worker: Some(worker),
        })
    }

    /// Latest published section list.
    pub fn sections(&self) -> Arc<Vec<Section<E>>> {
        let snapshot =
            self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&snapshot)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Whether a toggle is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Toggle section `index` on the worker and wait for the change.
    ///
    /// # Errors
    /// - [`TreeError::SectionOutOfRange`] when `index` is not a section of
    ///   the current snapshot;
    /// - [`TreeError::NodeNotFound`] on an internal inconsistency;
    /// - [`TreeError::EngineClosed`] once the worker has stopped.
    pub async fn toggle(&self, index: usize) -> Result<Toggled> {
        let current = {
            let sections = self.sections();
            let Some(section) = sections.get(index) else {
                return Err(TreeError::SectionOutOfRange {
                    index,
                    len: sections.len(),
                });
            };
            section.state
        };

        let Some(ticket) = self.guard.try_acquire() else {
            debug!("dropped toggle of section {index}: another one in flight");
            return Ok(Toggled {
                change: ChangeDescriptor::None,
                state: current,
            });
        };

        let (reply, completion) = flume::bounded(1);
        self.requests
            .send(Request::Toggle {
                index,
                reply,
                ticket,
            })
            .map_err(|_| TreeError::EngineClosed)?;

        completion
            .recv_async()
            .await
            .map_err(|_| TreeError::EngineClosed)?
    }
}

impl<E> TreeEngine<E> {
    /// Stop the worker and wait for it to exit.
    ///
    /// Later toggles fail with [`TreeError::EngineClosed`].
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        if self.requests.send(Request::Shutdown).is_err() {
            warn!("tree engine worker exited before shutdown");
        }
        if worker.join().is_err() {
            error!("tree engine worker panicked");
        }
    }
}

impl<E> Drop for TreeEngine<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker<E: TreeElement>(
    mut tree: SectionTree<E>,
    inbox: Receiver<Request>,
    snapshot: Snapshot<E>,
) {
    while let Ok(request) = inbox.recv() {
        match request {
            Request::Toggle {
                index,
                reply,
                ticket,
            } => {
                let result = tree.toggle(index);
                match &result {
                    Ok(_) => publish(&snapshot, tree.sections()),
                    Err(err) => {
                        error!("toggle of section {index} failed: {err}")
                    },
                }

                drop(ticket);
                if reply.send(result).is_err() {
                    debug!("caller left before toggle of {index} finished");
                }
            },
            Request::Shutdown => break,
        }
    }

    debug!("tree engine worker stopped");
}

fn publish<E: Clone>(snapshot: &Snapshot<E>, sections: &[Section<E>]) {
    let sections = Arc::new(sections.to_vec());
    let mut current = snapshot.write().unwrap_or_else(PoisonError::into_inner);
    *current = sections;
}

#[cfg(test)]
mod tests {
    use super::TreeEngine;
    use crate::change::ChangeDescriptor;
    use crate::element::BranchState;
    use crate::element::testing::{Item, nested_items};
    use crate::error::TreeError;
    use crate::settings::EngineSettings;

    fn engine() -> TreeEngine<Item> {
        TreeEngine::spawn(nested_items(), EngineSettings::default())
            .expect("engine starts")
    }

    #[tokio::test]
    async fn given_engine_when_toggled_then_snapshot_is_published() {
        let engine = engine();
        assert_eq!(engine.sections().len(), 5);

        let toggled = engine.toggle(1).await.expect("toggle succeeds");

        assert_eq!(toggled.state, BranchState::Collapsed);
        let batch = toggled.change.edit().expect("visible change");
        assert_eq!(batch.remove_sections, vec![2]);
        let sections = engine.sections();
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[1].state, BranchState::Collapsed);
        assert!(!engine.is_busy());
    }

    #[tokio::test]
    async fn given_toggle_in_flight_when_toggled_then_request_is_dropped() {
        let engine = engine();
        let ticket = engine.guard.try_acquire().expect("idle guard");

        let toggled = engine.toggle(2).await.expect("resolves immediately");

        assert_eq!(toggled.change, ChangeDescriptor::None);
        assert_eq!(toggled.state, BranchState::Expanded);
        assert_eq!(engine.sections()[2].state, BranchState::Expanded);

        drop(ticket);
        let toggled = engine.toggle(2).await.expect("toggle succeeds");
        assert_eq!(toggled.state, BranchState::Collapsed);
    }

    #[tokio::test]
    async fn given_concurrent_toggles_when_joined_then_each_resolves_once() {
        let engine = engine();

        let results = tokio::join!(
            engine.toggle(1),
            engine.toggle(1),
            engine.toggle(1),
            engine.toggle(1),
            engine.toggle(1),
            engine.toggle(1),
        );
        let results = [
            results.0, results.1, results.2, results.3, results.4, results.5,
        ];

        let executed = results
            .iter()
            .map(|result| result.as_ref().expect("toggle resolves"))
            .filter(|toggled| !toggled.change.is_none())
            .count();
        assert!(executed >= 1);
        let expected = if executed % 2 == 0 {
            BranchState::Expanded
        } else {
            BranchState::Collapsed
        };
        assert_eq!(engine.sections()[1].state, expected);
    }

    #[tokio::test]
    async fn given_toggles_in_sequence_then_layout_round_trips() {
        let engine = engine();
        let initial = engine.sections();

        engine.toggle(0).await.expect("collapse");
        assert_eq!(engine.sections().len(), 1);
        engine.toggle(0).await.expect("expand");

        assert_eq!(*engine.sections(), *initial);
    }

    #[tokio::test]
    async fn given_out_of_range_index_when_toggled_then_error_is_returned() {
        let engine = engine();

        let err = engine.toggle(9).await.expect_err("index rejected");

        assert!(matches!(
            err,
            TreeError::SectionOutOfRange { index: 9, len: 5 }
        ));
        assert!(!engine.is_busy());
    }

    #[tokio::test]
    async fn given_stopped_engine_when_toggled_then_engine_is_closed() {
        let mut engine = engine();

        engine.shutdown();
        let err = engine.toggle(0).await.expect_err("worker stopped");

        assert!(matches!(err, TreeError::EngineClosed));
        assert!(!engine.is_busy());
    }

    #[test]
    fn given_invalid_elements_when_spawned_then_build_error_is_returned() {
        let items = vec![Item::new(0, None, 0), Item::new(1, Some(7), 0)];

        let result = TreeEngine::spawn(items, EngineSettings::default());

        assert!(matches!(result, Err(TreeError::DanglingParent { .. })));
    }

    #[test]
    fn given_worker_name_when_spawned_then_settings_are_kept() {
        let settings = EngineSettings::default().with_worker_name("outline");

        let engine = TreeEngine::spawn(nested_items(), settings)
            .expect("engine starts");

        assert_eq!(engine.settings().worker_name, "outline");
    }
}
