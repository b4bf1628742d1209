use crate::api::types::BodyId;
use crate::assets::model::CelestialBody;
use crate::error::UnknownBodyError;

/// Orbital order picked when a body set first becomes available.
const DEFAULT_ORDER: u32 = 3;

/// Payload delivered to observers after every successful selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<BodyId>,
    pub current: BodyId,
}

/// Receives selection changes. Observers get a copy of the change and no
/// handle to the coordinator, so they cannot write the selection back.
pub trait SelectionObserver {
    fn selection_changed(&mut self, change: SelectionChange);
}

impl<F: FnMut(SelectionChange)> SelectionObserver for F {
    fn selection_changed(&mut self, change: SelectionChange) {
        self(change)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct KnownBody {
    id: BodyId,
    order: u32,
    name: String,
}

/// Single owner of the selected body id.
///
/// Scene clicks, thumbnail clicks and deep links all funnel through
/// [`SelectionCoordinator::select`].
#[derive(Default)]
pub struct SelectionCoordinator {
    bodies: Vec<KnownBody>,
    selected: Option<BodyId>,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Observers are called in subscription order.
    pub fn subscribe(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    /// Currently selected body, `None` until a body set is loaded.
    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    /// True once a non-empty body set has been installed.
    pub fn is_loaded(&self) -> bool {
        !self.bodies.is_empty()
    }

    /// Whether `id` is part of the loaded body set.
    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.iter().any(|b| b.id == id)
    }

    /// Select a body by id. Unknown ids leave the selection untouched.
    /// Observers are notified before this returns.
    pub fn select(&mut self, id: BodyId) -> Result<(), UnknownBodyError> {
        if !self.contains(id) {
            log::debug!("Rejected selection of unknown body {}", id);
            return Err(UnknownBodyError::Id(id));
        }
        let previous = self.selected.replace(id);
        log::debug!("Selected body {} (was {:?})", id, previous);

        let change = SelectionChange { previous, current: id };
        for observer in &mut self.observers {
            observer.selection_changed(change);
        }
        Ok(())
    }

    /// Deep-link variant of [`select`](Self::select); names match case-insensitively.
    pub fn select_by_name(&mut self, name: &str) -> Result<(), UnknownBodyError> {
        let id = self
            .bodies
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .map(|b| b.id)
            .ok_or_else(|| UnknownBodyError::Name(name.to_string()))?;
        self.select(id)
    }

    /// Install a body set and apply the default selection on the
    /// empty to non-empty transition. Returns the id chosen by default, if any.
    ///
    /// When a set replaces another and the selected body is gone, the default
    /// rule runs again; the selection is never cleared while a set is loaded.
    pub fn default_on_load(&mut self, bodies: &[CelestialBody]) -> Option<BodyId> {
        let was_empty = self.bodies.is_empty();
        self.bodies = bodies
            .iter()
            .map(|b| KnownBody { id: b.id, order: b.order_from_sun, name: b.name.clone() })
            .collect();

        if self.bodies.is_empty() {
            return None;
        }

        let needs_default = match self.selected {
            None => was_empty,
            Some(id) => !self.contains(id),
        };
        if !needs_default {
            return None;
        }

        let pick = self
            .bodies
            .iter()
            .find(|b| b.order == DEFAULT_ORDER)
            .or_else(|| self.bodies.iter().min_by_key(|b| b.order))
            .map(|b| b.id)?;
        // `pick` is in the set, so this cannot fail.
        self.select(pick).ok()?;
        Some(pick)
    }
}
