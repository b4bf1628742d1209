use std::cell::RefCell;
use std::rc::Rc;

use orrery_core::{
    respond, AdvanceOutcome, AnimationClock, AnswerOutcome, BodyId, BodyInstance, Camera3D,
    Catalog, ConfigurationError, ExplorerConfig, ExplorerEvent, FrameBuffer, FrameLayout,
    MemCatalog, OptionId, OrbitalScene, PointerAction, PointerEvent, PointerTracker, QuizEngine,
    QuizView, Route, SelectionChange, SelectionCoordinator, SelectionObserver,
    UnavailableCatalog,
};

/// Events waiting for the UI, shared with the selection observer.
#[derive(Clone)]
struct EventSink {
    events: Rc<RefCell<Vec<ExplorerEvent>>>,
    max: usize,
}

impl EventSink {
    fn new(max: usize) -> Self {
        Self { events: Rc::new(RefCell::new(Vec::with_capacity(max))), max }
    }

    fn push(&self, event: ExplorerEvent) {
        let mut events = self.events.borrow_mut();
        if events.len() >= self.max {
            log::warn!("Event buffer full, dropping event kind {}", event.kind);
            return;
        }
        events.push(event);
    }

    /// Move pending events into `out`. Both buffers keep their capacity.
    fn drain_into(&self, out: &mut Vec<ExplorerEvent>) {
        out.clear();
        out.extend(self.events.borrow_mut().drain(..));
    }

    fn take(&self) -> Vec<ExplorerEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl SelectionObserver for EventSink {
    fn selection_changed(&mut self, change: SelectionChange) {
        self.push(ExplorerEvent::selection_changed(change.current, change.previous));
    }
}

/// Everything acquired when the scene view mounts. Dropping it releases the
/// scene and its snapshot buffer.
struct MountedScene {
    scene: OrbitalScene,
    instances: Vec<BodyInstance>,
}

/// Owns every engine for one page session.
///
/// The WASM exports in `lib.rs` hold a single runner in a `thread_local!`
/// and forward to these methods. Nothing here depends on wasm-bindgen, so
/// the whole flow runs in native tests.
pub struct ExplorerRunner {
    config: ExplorerConfig,
    catalog: Box<dyn Catalog>,
    selection: SelectionCoordinator,
    quiz: QuizEngine,
    camera: Camera3D,
    clock: AnimationClock,
    pointer: PointerTracker,
    scene: Option<MountedScene>,
    route: Route,
    sink: EventSink,
    /// Per-frame copy of the sink, reused every tick.
    frame_events: Vec<ExplorerEvent>,
    frame: FrameBuffer,
    last_error: Option<String>,
}

impl ExplorerRunner {
    pub fn new(config: ExplorerConfig) -> Self {
        let sink = EventSink::new(config.max_events);
        let mut selection = SelectionCoordinator::new();
        selection.subscribe(Box::new(sink.clone()));

        Self {
            catalog: Box::new(UnavailableCatalog::new("catalog not loaded")),
            selection,
            quiz: QuizEngine::new(
                config.quiz_seed.unwrap_or(config.scene.session_seed ^ 0x9E37_79B9_7F4A_7C15),
            ),
            camera: Camera3D::from_config(&config.camera),
            clock: AnimationClock::new(config.max_frame_dt),
            pointer: PointerTracker::new(config.drag_threshold),
            scene: None,
            route: Route::NotFound,
            frame: FrameBuffer::new(FrameLayout::new(1, config.max_events)),
            frame_events: Vec::with_capacity(config.max_events),
            sink,
            last_error: None,
            config,
        }
    }

    /// Build from the UI's config document. `fallback_seed` seeds the quiz
    /// shuffle unless the document pins `quiz_seed`.
    pub fn from_json(config_json: &str, fallback_seed: u64) -> Result<Self, ConfigurationError> {
        let mut config = if config_json.trim().is_empty() {
            ExplorerConfig::default()
        } else {
            ExplorerConfig::from_json(config_json)?
        };
        config.quiz_seed.get_or_insert(fallback_seed);
        Ok(Self::new(config))
    }

    // ---- Data ----

    /// Install a validated catalog and apply the default selection.
    pub fn load_catalog(&mut self, catalog: MemCatalog) {
        let bodies = catalog.bodies().map(<[_]>::to_vec).unwrap_or_default();
        self.frame = FrameBuffer::new(FrameLayout::new(bodies.len() + 1, self.config.max_events));
        self.catalog = Box::new(catalog);
        self.last_error = None;
        self.selection.default_on_load(&bodies);

        // A deep link that arrived before the data wins over the default.
        if let Route::Planet(id) = self.route {
            if self.selection.contains(id) && self.selection.selected() != Some(id) {
                self.select(id);
            }
        }

        // A scene built from the previous set is stale.
        if self.route.shows_scene() {
            self.unmount_scene();
            self.mount_scene();
        }
    }

    /// Parse and install a catalog snapshot document. A rejected document
    /// leaves the previous catalog, selection and scene in place.
    pub fn load_json(&mut self, json: &str) -> Result<(), ConfigurationError> {
        match MemCatalog::from_json(json) {
            Ok(catalog) => {
                self.load_catalog(catalog);
                Ok(())
            }
            Err(err) => {
                self.record_error(format!("invalid catalog: {}", err));
                Err(err)
            }
        }
    }

    pub fn load_seeded(&mut self) -> Result<(), ConfigurationError> {
        let catalog = MemCatalog::seeded()?;
        self.load_catalog(catalog);
        Ok(())
    }

    /// The upstream fetch failed; every view shows an error until data arrives.
    pub fn data_unavailable(&mut self, reason: &str) {
        self.catalog = Box::new(UnavailableCatalog::new(reason));
        self.unmount_scene();
        self.quiz.exit();
        self.record_error(format!("data unavailable: {}", reason));
    }

    fn record_error(&mut self, message: String) {
        log::warn!("{}", message);
        self.last_error = Some(message);
        self.sink.push(ExplorerEvent::data_error());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ---- Navigation ----

    pub fn route(&self) -> Route {
        self.route
    }

    /// Apply a location change: mounts or drops the scene, starts or ends the
    /// quiz, and routes planet deep links through `select`.
    pub fn navigate(&mut self, path: &str) -> Route {
        let next = Route::parse(path);
        let prev = self.route;
        self.route = next;

        if prev == Route::Quiz && next != Route::Quiz {
            self.quiz.exit();
        }
        if prev.shows_scene() && !next.shows_scene() {
            self.unmount_scene();
        }

        match next {
            Route::Home if !prev.shows_scene() => {
                self.mount_scene();
            }
            Route::Planet(id) => {
                self.select(id);
            }
            Route::Quiz if prev != Route::Quiz => {
                self.quiz_start();
            }
            _ => {}
        }
        next
    }

    // ---- Scene lifecycle ----

    pub fn is_scene_mounted(&self) -> bool {
        self.scene.is_some()
    }

    /// Build the scene from the current catalog. On failure nothing stays mounted.
    pub fn mount_scene(&mut self) -> bool {
        let bodies = match self.catalog.bodies() {
            Ok(bodies) => bodies,
            Err(err) => {
                let message = err.to_string();
                self.record_error(message);
                return false;
            }
        };
        match OrbitalScene::initialize(bodies, &self.config.scene) {
            Ok(scene) => {
                let instances = Vec::with_capacity(scene.len() + 1);
                self.scene = Some(MountedScene { scene, instances });
                self.clock = AnimationClock::new(self.config.max_frame_dt);
                self.camera.reset();
                true
            }
            Err(err) => {
                self.record_error(format!("scene initialization failed: {}", err));
                false
            }
        }
    }

    pub fn unmount_scene(&mut self) {
        if self.scene.take().is_some() {
            self.pointer.handle(PointerEvent::Cancel);
            log::info!("Scene unmounted");
        }
    }

    /// Advance one display frame. Returns false when no scene is mounted,
    /// telling the UI to stop requesting frames.
    pub fn tick(&mut self, frame_dt: f64) -> bool {
        let Some(mounted) = self.scene.as_mut() else {
            return false;
        };

        let dt = self.clock.tick(frame_dt);
        mounted.scene.advance(dt);
        mounted
            .scene
            .snapshot(&self.camera, self.selection.selected(), &mut mounted.instances);

        self.sink.drain_into(&mut self.frame_events);
        self.frame.write(
            &mounted.instances,
            &self.frame_events,
            self.selection.selected().map(|id| id.0),
            true,
        );
        true
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused {
            self.clock.pause();
        } else {
            self.clock.resume();
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.clock.set_speed(speed);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_screen_size(width, height);
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn scene(&self) -> Option<&OrbitalScene> {
        self.scene.as_ref().map(|m| &m.scene)
    }

    // ---- Input ----

    /// Feed a raw pointer event. Clicks are hit-tested immediately.
    pub fn pointer(&mut self, event: PointerEvent) {
        match self.pointer.handle(event) {
            Some(PointerAction::Click(pos)) => {
                let candidate = self
                    .scene
                    .as_ref()
                    .and_then(|m| m.scene.confirm_click(pos, &self.camera));
                if let Some(candidate) = candidate {
                    self.sink.push(ExplorerEvent::selection_candidate(candidate.body_id));
                    self.select(candidate.body_id);
                }
            }
            Some(PointerAction::Drag(delta)) => self.camera.orbit(delta.x, delta.y),
            Some(PointerAction::Zoom(delta)) => self.camera.zoom(delta),
            None => {}
        }
    }

    // ---- Selection ----

    pub fn selected(&self) -> Option<BodyId> {
        self.selection.selected()
    }

    /// Thumbnail or deep-link selection. Unknown ids keep the current one.
    pub fn select(&mut self, id: BodyId) -> bool {
        match self.selection.select(id) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{}", err);
                self.last_error = Some(err.to_string());
                false
            }
        }
    }

    // ---- Quiz ----

    pub fn quiz_start(&mut self) -> bool {
        let result = match self.catalog.questions() {
            Ok(questions) => self.quiz.start(questions).map_err(|e| e.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match result {
            Ok(()) => true,
            Err(message) => {
                self.record_error(message);
                false
            }
        }
    }

    pub fn quiz_restart(&mut self) -> bool {
        self.quiz_start()
    }

    /// Record an answer; accepted answers raise a quiz-answered event.
    pub fn quiz_answer(&mut self, option: OptionId) -> AnswerOutcome {
        let outcome = self.quiz.answer(option);
        if let AnswerOutcome::Correct | AnswerOutcome::Incorrect = outcome {
            let score = self.quiz.session().map(|s| s.score()).unwrap_or(0);
            self.sink.push(ExplorerEvent::quiz_answered(
                option,
                outcome == AnswerOutcome::Correct,
                score,
            ));
        }
        outcome
    }

    pub fn quiz_advance(&mut self) -> AdvanceOutcome {
        let outcome = self.quiz.advance();
        if let AdvanceOutcome::Completed { score, total } = outcome {
            let percentage = self.quiz.session().map(|s| s.completion_percentage()).unwrap_or(0);
            self.sink.push(ExplorerEvent::quiz_completed(score, total, percentage));
        }
        outcome
    }

    pub fn quiz_retreat(&mut self) -> bool {
        self.quiz.retreat()
    }

    pub fn quiz_view(&self) -> QuizView {
        self.quiz.view()
    }

    // ---- API + buffers ----

    /// `GET` against the current catalog, encoded as `{ status, body }`.
    pub fn api_get(&self, path: &str) -> String {
        let response = respond(self.catalog.as_ref(), path);
        serde_json::to_string(&response).unwrap_or_else(|err| {
            log::warn!("Failed to encode API response: {}", err);
            r#"{"status":500,"body":{"message":"Failed to encode response"}}"#.to_string()
        })
    }

    /// Drain pending events without a frame (pages without a scene).
    pub fn take_events(&mut self) -> Vec<ExplorerEvent> {
        self.sink.take()
    }

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.frame.layout().buffer_total_floats as u32
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}
