//! View Scheduler
//!
//! Ordered list of views with one active. Navigation wraps; an empty list is
//! valid and every operation on it is a no-op.

use super::{View, ViewContent, ViewContext};
use crate::cache::CacheCategory;
use crate::config::{DisplayConfig, TabsConfig};

/// Ordered views and the index of the active one
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewScheduler {
    views: Vec<View>,
    active: usize,
}

impl ViewScheduler {
    /// Schedule `views` with the first one active
    pub fn new(views: Vec<View>) -> Self {
        Self { views, active: 0 }
    }

    /// Build the view list from tab configuration
    ///
    /// With tabs disabled only the standard view exists. Otherwise views
    /// follow `order`, keeping those listed in `visible`; unknown and
    /// repeated ids are skipped. `default` picks the initial view by id and
    /// falls back to the first one.
    pub fn from_config(tabs: &TabsConfig) -> Self {
        if !tabs.enabled {
            return Self::new(vec![View::Standard]);
        }

        let mut views: Vec<View> = Vec::new();
        for id in &tabs.order {
            let Some(view) = View::from_id(id) else {
                tracing::warn!(tab = %id, "Ignoring unknown tab in order");
                continue;
            };
            let visible = tabs.visible.iter().any(|v| v.eq_ignore_ascii_case(view.id()));
            if visible && !views.iter().any(|v| v.id() == view.id()) {
                views.push(view);
            }
        }
        for id in &tabs.visible {
            if View::from_id(id).is_none() {
                tracing::warn!(tab = %id, "Ignoring unknown tab in visible list");
            }
        }

        let mut scheduler = Self::new(views);
        if let Some(index) = scheduler
            .views
            .iter()
            .position(|v| v.id().eq_ignore_ascii_case(tabs.default.trim()))
        {
            scheduler.active = index;
        } else if !scheduler.is_empty() {
            tracing::debug!(default = %tabs.default, "Default tab not shown, starting on the first");
        }

        tracing::debug!(
            tabs = ?scheduler.views.iter().map(View::id).collect::<Vec<_>>(),
            active = scheduler.active,
            "Views configured"
        );
        scheduler
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Index of the active view (0 when empty)
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&View> {
        self.views.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut View> {
        self.views.get_mut(self.active)
    }

    /// Activate the next view, wrapping to the first
    pub fn next(&mut self) {
        if !self.views.is_empty() {
            self.active = (self.active + 1) % self.views.len();
        }
    }

    /// Activate the previous view, wrapping to the last
    pub fn prev(&mut self) {
        if !self.views.is_empty() {
            self.active = (self.active + self.views.len() - 1) % self.views.len();
        }
    }

    /// Activate view `index`; returns false and changes nothing when out of range
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.views.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Move the active view's cursor up; false if it has none
    pub fn cursor_up(&mut self) -> bool {
        match self.active_mut().and_then(View::list_cursor_mut) {
            Some(cursor) => {
                cursor.up();
                true
            }
            None => false,
        }
    }

    /// Move the active view's cursor down within `len` entries; false if it has none
    pub fn cursor_down(&mut self, len: usize) -> bool {
        match self.active_mut().and_then(View::list_cursor_mut) {
            Some(cursor) => {
                cursor.down(len);
                true
            }
            None => false,
        }
    }

    /// Clamp every view's cursor to a list of `len` entries
    pub fn clamp_cursors(&mut self, len: usize) {
        for cursor in self.views.iter_mut().filter_map(View::list_cursor_mut) {
            cursor.clamp(len);
        }
    }

    /// Cache categories any scheduled view reads, in slot order
    pub fn categories(&self, display: &DisplayConfig) -> Vec<CacheCategory> {
        CacheCategory::ALL
            .into_iter()
            .filter(|c| self.views.iter().any(|v| v.categories(display).contains(c)))
            .collect()
    }

    /// Render the active view; empty content when there are no views
    pub fn render(&self, ctx: &ViewContext<'_>) -> ViewContent {
        self.active()
            .map(|view| view.render(ctx))
            .unwrap_or_default()
    }
}
