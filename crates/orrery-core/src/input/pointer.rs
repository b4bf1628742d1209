use glam::Vec2;

/// Raw pointer input from the UI, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    /// Wheel ticks, positive = zoom in.
    Wheel { delta: f32 },
    /// Pointer left the canvas or the gesture was interrupted.
    Cancel,
}

/// What a raw event means for the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Released without travelling past the drag threshold.
    Click(Vec2),
    /// Incremental drag since the previous move.
    Drag(Vec2),
    Zoom(f32),
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start: Vec2,
    last: Vec2,
    dragging: bool,
}

/// Separates clicks from drags. Hover (move without press) does nothing.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    threshold: f32,
    press: Option<Press>,
}

impl PointerTracker {
    pub fn new(drag_threshold: f32) -> Self {
        Self { threshold: drag_threshold.max(0.0), press: None }
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Feed one raw event. `Up` yields `Click` only if the press never
    /// travelled past the threshold; `Cancel` drops the press silently.
    pub fn handle(&mut self, event: PointerEvent) -> Option<PointerAction> {
        match event {
            PointerEvent::Down { x, y } => {
                let pos = Vec2::new(x, y);
                self.press = Some(Press { start: pos, last: pos, dragging: false });
                None
            }
            PointerEvent::Move { x, y } => {
                let press = self.press.as_mut()?;
                let pos = Vec2::new(x, y);
                if !press.dragging && pos.distance(press.start) > self.threshold {
                    press.dragging = true;
                }
                let delta = pos - press.last;
                press.last = pos;
                press.dragging.then_some(PointerAction::Drag(delta))
            }
            PointerEvent::Up { x, y } => {
                let press = self.press.take()?;
                let pos = Vec2::new(x, y);
                let moved = press.dragging || pos.distance(press.start) > self.threshold;
                (!moved).then_some(PointerAction::Click(pos))
            }
            PointerEvent::Wheel { delta } => {
                (delta.is_finite() && delta != 0.0).then_some(PointerAction::Zoom(delta))
            }
            PointerEvent::Cancel => {
                self.press = None;
                None
            }
        }
    }
}
