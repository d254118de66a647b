//! The project modal: what it shows and whether it is open.
//!
//! [`ModalState`] holds the logic; a [`ModalView`] mirrors it somewhere the
//! user can see it. On the web that is the page's modal markup (see
//! [`crate::dom::DomModal`]), natively the contents are logged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub link: Option<String>,
}

pub trait ModalView {
    fn present(&mut self, project: &ProjectInfo);

    fn dismiss(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalState {
    open: Option<String>,
    project: Option<ProjectInfo>,
}

impl ModalState {
    /// Opens the modal for project `id`. Unknown ids are ignored and return
    /// `false`. Showing while already open replaces the contents.
    pub fn show(
        &mut self,
        id: &str,
        registry: &BTreeMap<String, ProjectInfo>,
        view: &mut dyn ModalView,
    ) -> bool {
        let Some(project) = registry.get(id) else {
            log::debug!("No modal content registered for {}.", id);
            return false;
        };
        view.present(project);
        self.open = Some(id.to_string());
        self.project = Some(project.clone());
        true
    }

    /// Closes the modal. Closing a closed modal does nothing.
    pub fn hide(&mut self, view: &mut dyn ModalView) {
        if self.open.take().is_some() {
            self.project = None;
            view.dismiss();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Id of the project currently shown.
    pub fn current(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.project.as_ref().map(|p| p.title.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.project.as_ref().map(|p| p.content.as_str())
    }

    /// Whether the "visit" button is shown: only for projects with a link.
    pub fn visit_link(&self) -> Option<&str> {
        self.project.as_ref().and_then(|p| p.link.as_deref())
    }
}

/// Native stand-in for the page modal.
#[derive(Debug, Default)]
pub struct LogModal;

impl ModalView for LogModal {
    fn present(&mut self, project: &ProjectInfo) {
        match &project.link {
            Some(link) => log::info!("[{}] {} ({})", project.title, project.content, link),
            None => log::info!("[{}] {}", project.title, project.content),
        }
    }

    fn dismiss(&mut self) {
        log::info!("Modal closed.");
    }
}
