use std::sync::Arc;
use tracing::{debug, warn};

use crate::{Credential, Entry, Reduce, Scope, Snapshot};

/// The two rankings shown side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct Rankings {
    /// Scope the second ranking was computed over.
    pub scope: Scope,
    /// Over every record.
    pub global: Vec<Entry>,
    /// Over the records of `scope` only.
    pub scoped: Vec<Entry>,
}

/// What one viewer sees. Rankings are only recomputed when the snapshot or
/// the effective scope changes.
pub struct Dashboard {
    viewer: Credential,
    selected: Scope,
    reduce: Reduce,
    cache: Option<(u64, Arc<Rankings>)>,
}

impl Dashboard {
    pub fn new(viewer: Credential, reduce: Reduce) -> Dashboard {
        Dashboard {
            viewer,
            selected: Scope::Global,
            reduce,
            cache: None,
        }
    }

    pub fn viewer(&self) -> &Credential {
        &self.viewer
    }

    /// Changes the client an admin is looking at. Other viewers are pinned
    /// to their own records so the selection is ignored for them.
    pub fn select(&mut self, scope: Scope) {
        if self.viewer.is_admin() {
            self.selected = scope;
        } else {
            warn!(viewer = self.viewer.name(), scope = %scope, "only admins can change the scope");
        }
    }

    pub fn scope(&self) -> Scope {
        Scope::effective(&self.viewer, &self.selected)
    }

    /// Label for the scoped ranking.
    pub fn title(&self) -> String {
        if self.viewer.is_admin() {
            self.selected.label().to_string()
        } else {
            self.viewer.name().to_string()
        }
    }

    pub fn rankings(&mut self, snapshot: &Snapshot) -> Arc<Rankings> {
        let scope = self.scope();

        if let Some((generation, ref rankings)) = self.cache {
            if generation == snapshot.generation && rankings.scope == scope {
                return Arc::clone(rankings);
            }
        }

        debug!(generation = snapshot.generation, scope = %scope, "computing rankings");

        let rankings = Arc::new(Rankings {
            global: self.reduce.rank(&snapshot.records),
            scoped: self.reduce.rank(scope.filter(&snapshot.records)),
            scope,
        });

        self.cache = Some((snapshot.generation, Arc::clone(&rankings)));

        rankings
    }
}
