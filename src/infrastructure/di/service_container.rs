//! Service container for dependency injection
//!
//! Wires up all services with their dependencies. Each container is an
//! isolated session: nothing is shared between containers.

use std::sync::Arc;

use crate::application::services::{SplitForm, SplitService};
use crate::config::{IdStyle, Settings};
use crate::infrastructure::traits::{Clock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};

/// Container holding the session's settings and boundary implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Calendar source
    pub clock: Arc<dyn Clock>,

    /// Identifier source shared by the form and the split model
    pub ids: Arc<dyn IdGenerator>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let ids: Arc<dyn IdGenerator> = match settings.id_style {
            IdStyle::Sequential => Arc::new(SequentialIds::new()),
            IdStyle::Uuid => Arc::new(UuidGenerator),
        };
        Self::with_deps(settings, Arc::new(SystemClock), ids)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            clock,
            ids,
        }
    }

    /// Fresh, empty split model.
    pub fn split_service(&self) -> SplitService {
        SplitService::new(self.settings.clone(), self.clock.clone(), self.ids.clone())
    }

    /// Fresh create-split form.
    pub fn split_form(&self) -> SplitForm {
        SplitForm::new(self.settings.clone(), self.clock.clone(), self.ids.clone())
    }
}
