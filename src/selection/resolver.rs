//! Dependency Resolver
//!
//! Reacts to a change at one level: invalidates everything downstream,
//! records the new value, then fetches the next level's options for the
//! new upstream context.
//!
//! Handlers suspend at the gateway call and other handlers may run in the
//! meantime. Each fetch is keyed by the generation of the level that
//! triggered it; a result that comes back after that level moved on is
//! dropped without touching options or the error slot.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::options::to_options;
use super::{SelectOption, SelectionCache, SelectionLevel};
use crate::enrollment::MeritMaster;
use crate::gateway::{ClassDetails, EnrollmentGateway};

/// What a handler invocation ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Options for `level` were committed.
    Loaded { level: SelectionLevel, count: usize },
    /// The value was cleared; nothing fetched.
    Deselected,
    /// Medium was picked; nothing downstream.
    Terminal,
    /// A newer selection superseded this one before the fetch returned.
    Stale,
    /// The fetch failed; the message is also in the error slot.
    Failed(String),
}

/// Upstream values captured when a fetch is issued.
#[derive(Debug, Clone, Default)]
struct Upstream {
    taluka: String,
    ccode: String,
    section_id: String,
    course_id: String,
    class_id: String,
}

impl Upstream {
    fn capture(cache: &SelectionCache) -> Self {
        let get = |level| cache.value(level).unwrap_or_default().to_string();
        Self {
            taluka: get(SelectionLevel::Taluka),
            ccode: get(SelectionLevel::Institute),
            section_id: get(SelectionLevel::Section),
            course_id: get(SelectionLevel::Course),
            class_id: get(SelectionLevel::Class),
        }
    }
}

enum Fetched {
    Options(Vec<SelectOption>),
    Class(ClassDetails),
}

pub struct DependencyResolver {
    gateway: Arc<dyn EnrollmentGateway>,
    cache: Arc<RwLock<SelectionCache>>,
    merit: Arc<RwLock<Option<MeritMaster>>>,
    error: Arc<RwLock<Option<String>>>,
    role_id: String,
}

impl DependencyResolver {
    pub fn new(
        gateway: Arc<dyn EnrollmentGateway>,
        cache: Arc<RwLock<SelectionCache>>,
        merit: Arc<RwLock<Option<MeritMaster>>>,
        role_id: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            cache,
            merit,
            error: Arc::new(RwLock::new(None)),
            role_id: role_id.into(),
        }
    }

    /// Last fetch failure, if the most recent action failed.
    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }

    pub async fn clear_error(&self) {
        *self.error.write().await = None;
    }

    /// Populate the Taluka dropdown. Taluka options depend on nothing upstream.
    pub async fn load_talukas(&self) -> Resolution {
        self.cache.write().await.set_loading(SelectionLevel::Taluka, true);

        match self.gateway.list_talukas().await {
            Ok(rows) => {
                let options = to_options(rows);
                let count = options.len();
                self.cache.write().await.set_options(SelectionLevel::Taluka, options);
                info!("Loaded {} talukas", count);
                Resolution::Loaded { level: SelectionLevel::Taluka, count }
            }
            Err(e) => {
                self.cache.write().await.set_loading(SelectionLevel::Taluka, false);
                self.fail(e.user_message()).await
            }
        }
    }

    pub async fn on_taluka_change(&self, taluka: &str) -> Resolution {
        self.on_change(SelectionLevel::Taluka, taluka).await
    }

    pub async fn on_institute_change(&self, ccode: &str) -> Resolution {
        self.on_change(SelectionLevel::Institute, ccode).await
    }

    pub async fn on_section_change(&self, section_id: &str) -> Resolution {
        self.on_change(SelectionLevel::Section, section_id).await
    }

    pub async fn on_course_change(&self, course_id: &str) -> Resolution {
        self.on_change(SelectionLevel::Course, course_id).await
    }

    pub async fn on_class_change(&self, class_id: &str) -> Resolution {
        self.on_change(SelectionLevel::Class, class_id).await
    }

    pub async fn on_medium_change(&self, medium_id: &str) -> Resolution {
        self.on_change(SelectionLevel::Medium, medium_id).await
    }

    /// Handle a new value at `level`.
    pub async fn on_change(&self, level: SelectionLevel, value: &str) -> Resolution {
        let value = value.trim();
        info!("{} changed to '{}'", level, value);
        self.clear_error().await;

        let Some(next) = level.next() else {
            self.cache.write().await.set_value(level, Some(value.to_string()));
            if value.is_empty() {
                return Resolution::Deselected;
            }
            return Resolution::Terminal;
        };

        let (generation, upstream) = {
            let mut cache = self.cache.write().await;
            cache.clear_from(next);
            if level == SelectionLevel::Class {
                // Admission mode belongs to the class being replaced.
                cache.set_class_is_direct(None);
            }
            let generation = cache.set_value(level, Some(value.to_string()));
            if value.is_empty() {
                return Resolution::Deselected;
            }
            cache.set_loading(next, true);
            (generation, Upstream::capture(&cache))
        };

        let fetched = self.fetch(level, &upstream).await;

        let mut cache = self.cache.write().await;
        if cache.generation(level) != generation {
            debug!("Discarding stale {} response for {} '{}'", next, level, value);
            return Resolution::Stale;
        }

        match fetched {
            Ok(Fetched::Options(options)) => {
                let count = options.len();
                if count == 0 {
                    warn!("No {} options for {} '{}'", next, level, value);
                }
                cache.set_options(next, options);
                Resolution::Loaded { level: next, count }
            }
            Ok(Fetched::Class(details)) => {
                let count = details.mediums.len();
                cache.set_class_is_direct(Some(details.class_is_direct));
                if cache.set_options(next, to_options(details.mediums)) {
                    debug!("Auto-selected medium {:?}", cache.value(next));
                }
                Resolution::Loaded { level: next, count }
            }
            Err(message) => {
                cache.set_loading(next, false);
                drop(cache);
                self.fail(message).await
            }
        }
    }

    async fn fetch(&self, level: SelectionLevel, up: &Upstream) -> Result<Fetched, String> {
        let gateway = &self.gateway;
        let result = match level {
            SelectionLevel::Taluka => gateway.list_institutes(&up.taluka).await.map(to_options),
            SelectionLevel::Institute => gateway.list_sections(&up.ccode).await.map(to_options),
            SelectionLevel::Section => gateway
                .list_courses(&up.section_id, &up.ccode)
                .await
                .map(to_options),
            SelectionLevel::Course => gateway
                .list_classes(&up.course_id, &up.ccode, &self.role_id)
                .await
                .map(to_options),
            SelectionLevel::Class => {
                let info_id = self
                    .merit
                    .read()
                    .await
                    .as_ref()
                    .map(|m| m.merit_student_info_id)
                    .ok_or_else(|| "Student merit record is not loaded".to_string())?;
                return gateway
                    .class_details(&up.class_id, &up.ccode, info_id)
                    .await
                    .map(Fetched::Class)
                    .map_err(|e| e.user_message());
            }
            SelectionLevel::Medium => return Ok(Fetched::Options(Vec::new())),
        };
        result.map(Fetched::Options).map_err(|e| e.user_message())
    }

    async fn fail(&self, message: String) -> Resolution {
        warn!("Selection fetch failed: {}", message);
        *self.error.write().await = Some(message.clone());
        Resolution::Failed(message)
    }
}
