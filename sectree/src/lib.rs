//! Hierarchical section lists with incremental expand/collapse.
//!
//! A flat list of parent-referencing elements is turned into a tree, and the
//! tree is presented as an ordered list of [`Section`]s: a branch header
//! followed by the leaf rows displayed under it. Toggling a section flips the
//! branch's expansion state and yields a [`ChangeDescriptor`] with the row
//! and section insertions/removals a list widget needs to animate the move.
//!
//! The crate is split into two layers:
//! - model helpers ([`build`], [`flatten`], [`Node`]) that are pure values;
//! - [`SectionTree`], the synchronous toggle/diff core, and [`TreeEngine`],
//!   an async handle that runs toggles one at a time on a worker thread.
//!
//! Display layers consume [`Section`] snapshots, implement
//! [`ItemRenderer`] for their payload and feed activations through a
//! [`SelectionSink`].
//!
//! # Quick Example
//!
//! ```
//! use sectree::{BranchState, SectionTree, TreeElement};
//!
//! #[derive(Clone)]
//! struct Entry {
//!     id: u32,
//!     parent: Option<u32>,
//! }
//!
//! impl TreeElement for Entry {
//!     type Id = u32;
//!
//!     fn id(&self) -> &u32 {
//!         &self.id
//!     }
//!
//!     fn parent_id(&self) -> Option<&u32> {
//!         self.parent.as_ref()
//!     }
//!
//!     fn rank(&self) -> i64 {
//!         i64::from(self.id)
//!     }
//!
//!     fn initial_state(&self) -> BranchState {
//!         BranchState::Expanded
//!     }
//!
//!     fn root_element() -> Self {
//!         Entry { id: 0, parent: None }
//!     }
//! }
//!
//! let entries = vec![
//!     Entry { id: 1, parent: None },
//!     Entry { id: 2, parent: Some(1) },
//!     Entry { id: 3, parent: Some(2) },
//! ];
//! let mut tree = SectionTree::new(entries).unwrap();
//! assert_eq!(tree.len(), 2);
//!
//! let toggled = tree.toggle(1).unwrap();
//! assert_eq!(toggled.state, BranchState::Collapsed);
//! assert!(tree.sections()[1].rows.is_empty());
//! ```

mod builder;
mod change;
mod element;
mod engine;
mod error;
mod flatten;
mod guard;
mod item;
mod node;
mod section;
mod settings;
mod tree;

pub use builder::build;
pub use change::{ChangeDescriptor, EditBatch, IndexPath};
pub use element::{BranchState, TreeElement};
pub use engine::TreeEngine;
pub use error::{Result, TreeError};
pub use flatten::{flatten, root_sections};
pub use guard::{BusyTicket, ToggleGuard};
pub use item::{ItemRenderer, ListItem, SelectionSink};
pub use node::{Node, NodeRef};
pub use section::Section;
pub use settings::EngineSettings;
pub use tree::{SectionTree, Toggled};
