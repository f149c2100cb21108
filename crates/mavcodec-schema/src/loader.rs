//! Schema Loader (component A): turns definition documents into a
//! [`MessageCatalog`] and notifies subscribers exactly once when it's ready.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::{
    compiler::compile_message,
    document::{DefinitionProvider, Definitions},
    error::SchemaError,
    types::{EnumDescriptor, MessageCatalog, MessageDescriptor},
};

/// Default document identifiers loaded when a caller doesn't override them.
pub const DEFAULT_DEFINITIONS: &[&str] = &["common", "ardupilotmega"];

/// Load and compile a set of schema documents into a [`MessageCatalog`].
///
/// Documents are retrieved concurrently through `provider` (the order of
/// retrieval is unobservable to callers); once every document has
/// been fetched, messages are compiled by [`compile_message`] and merged
/// into a single catalog, checked for id/name collisions across the whole
/// definition set.
///
/// # Errors
///
/// Returns [`SchemaError::Io`] if any identifier fails to resolve,
/// [`SchemaError::UnknownType`] if a field uses an unrecognized type token,
/// or [`SchemaError::DuplicateId`] / [`SchemaError::DuplicateName`] if two
/// messages across the combined document set collide.
pub async fn load<P>(provider: Arc<P>, definitions: &[String]) -> Result<MessageCatalog, SchemaError>
where
    P: DefinitionProvider + 'static,
{
    let mut joins = JoinSet::new();
    for identifier in definitions {
        let provider = Arc::clone(&provider);
        let identifier = identifier.clone();
        joins.spawn(async move {
            let result = provider.resolve(&identifier).await;
            (identifier, result)
        });
    }

    let mut documents = Vec::with_capacity(definitions.len());
    while let Some(joined) = joins.join_next().await {
        // A panicking resolver is a bug in the provider, not a schema error;
        // propagate it rather than swallowing it into a generic Io variant.
        let (identifier, result) = joined.expect("definition resolution task panicked");
        let parsed = result.map_err(|err| SchemaError::Io {
            identifier: identifier.clone(),
            reason: err.to_string(),
        })?;
        documents.push(parsed);
    }

    compile_catalog(documents)
}

fn compile_catalog(documents: Vec<Definitions>) -> Result<MessageCatalog, SchemaError> {
    let mut descriptors: Vec<MessageDescriptor> = Vec::new();
    let mut seen_ids: HashMap<u8, String> = HashMap::new();
    let mut seen_names: HashMap<String, ()> = HashMap::new();
    let mut enums = Vec::new();

    for document in documents {
        for raw_enum in document.enums {
            enums.push(EnumDescriptor { name: raw_enum.name, entries: raw_enum.entries });
        }
        for raw_message in document.messages {
            if let Some(existing) = seen_ids.get(&raw_message.id) {
                return Err(SchemaError::DuplicateId {
                    id: raw_message.id,
                    existing: existing.clone(),
                    incoming: raw_message.name.clone(),
                });
            }
            if seen_names.contains_key(&raw_message.name) {
                return Err(SchemaError::DuplicateName { name: raw_message.name.clone() });
            }

            let descriptor = compile_message(&raw_message)?;
            seen_ids.insert(raw_message.id, raw_message.name.clone());
            seen_names.insert(raw_message.name.clone(), ());
            descriptors.push(descriptor);
        }
    }

    tracing::info!(message_count = descriptors.len(), "schema catalog compiled");
    Ok(MessageCatalog::from_descriptors(descriptors, enums))
}

/// Broadcasts a [`MessageCatalog`] to subscribers exactly once, delivering
/// immediately to subscribers that register after the catalog is ready.
///
/// Backed by [`tokio::sync::watch`]: a fresh receiver always observes the
/// channel's current value, so a subscriber registered before `ready()` and
/// one registered after both see the same `Some(catalog)` with no replay
/// buffer needed.
#[derive(Debug, Clone)]
pub struct CatalogReady {
    sender: Arc<watch::Sender<Option<Arc<MessageCatalog>>>>,
}

impl CatalogReady {
    /// Create a not-yet-ready handle.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self { sender: Arc::new(sender) }
    }

    /// Publish the compiled catalog. Only the first call has any effect;
    /// subsequent calls are no-ops, preserving the "fires at most once"
    /// guarantee even if a caller invokes this more than once by mistake.
    pub fn publish(&self, catalog: Arc<MessageCatalog>) {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(catalog);
            true
        });
    }

    /// Subscribe to the `ready` signal.
    ///
    /// If the catalog is already ready, the returned receiver's current
    /// value is immediately `Some(catalog)`. Otherwise, await
    /// [`watch::Receiver::changed`] to block until `publish` is called.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<MessageCatalog>>> {
        self.sender.subscribe()
    }

    /// Whether the catalog has already been published.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.sender.borrow().is_some()
    }
}

impl Default for CatalogReady {
    fn default() -> Self {
        Self::new()
    }
}
