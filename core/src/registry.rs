//! Model Registry
//!
//! Keeps the list of selectable classifier variants and the current
//! selection. The list starts as a single built-in descriptor and is
//! replaced wholesale once the service answers with a non-empty list.
//!
//! A failed or empty fetch is not an error for the user: the registry logs
//! it and keeps (or restores) the built-in descriptor.

use crate::backend::{BackendError, ClassifierBackend, ModelDescriptor};

/// Id of the built-in descriptor
pub const FALLBACK_MODEL_ID: &str = "default";

/// The descriptor used until (or unless) the service provides a list
#[must_use]
pub fn fallback_model() -> ModelDescriptor {
    ModelDescriptor::new(
        FALLBACK_MODEL_ID,
        "Default Model",
        "Built-in spam classifier",
    )
}

/// Selectable models plus the active selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelRegistry {
    models: Vec<ModelDescriptor>,
    selected: usize,
    fallback: bool,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self {
            models: vec![fallback_model()],
            selected: 0,
            fallback: true,
        }
    }
}

impl ModelRegistry {
    /// Registry holding only the built-in descriptor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the model list and apply it
    ///
    /// Never fails; see [`apply_fetch`](Self::apply_fetch).
    pub async fn refresh<B: ClassifierBackend + ?Sized>(&mut self, backend: &B) {
        let result = backend.list_models().await;
        self.apply_fetch(result);
    }

    /// Apply the outcome of a registry fetch
    ///
    /// A non-empty list replaces the current one and selects its first
    /// entry. Anything else leaves the registry on the built-in descriptor.
    /// Returns `true` when the service list was adopted.
    pub fn apply_fetch(&mut self, result: Result<Vec<ModelDescriptor>, BackendError>) -> bool {
        match result {
            Ok(models) if !models.is_empty() => {
                let models = dedup_by_id(models);
                tracing::info!(
                    count = models.len(),
                    default = %models[0].id,
                    "Loaded model registry"
                );
                self.models = models;
                self.selected = 0;
                self.fallback = false;
                true
            }
            Ok(_) => {
                tracing::warn!("Model registry is empty, using built-in model");
                *self = Self::default();
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model registry fetch failed, using built-in model");
                *self = Self::default();
                false
            }
        }
    }

    /// All selectable models, in service order
    #[must_use]
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// The active model
    #[must_use]
    pub fn selected(&self) -> &ModelDescriptor {
        &self.models[self.selected]
    }

    /// Id of the active model
    #[must_use]
    pub fn selected_id(&self) -> &str {
        &self.selected().id
    }

    /// Position of the active model in [`models`](Self::models)
    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Whether the registry is still on the built-in descriptor
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Select a model by id. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        match self.models.iter().position(|m| m.id == id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => {
                tracing::debug!(model = %id, "Ignoring unknown model id");
                false
            }
        }
    }

    /// Select a model by position. Out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.models.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Look up a model by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }
}

/// Keep the first descriptor for each id
fn dedup_by_id(models: Vec<ModelDescriptor>) -> Vec<ModelDescriptor> {
    let mut seen = std::collections::HashSet::new();
    models
        .into_iter()
        .filter(|m| seen.insert(m.id.clone()))
        .collect()
}
