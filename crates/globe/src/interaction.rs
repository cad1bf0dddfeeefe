//! Pointer input: raw commands queued by the host, turned into gestures once
//! per frame.

use serde::{Deserialize, Serialize};

/// Pointer event as delivered by the host, in canvas px.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerCommand {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Leave,
}

impl PointerCommand {
    pub fn is_move(&self) -> bool {
        matches!(self, PointerCommand::Move { .. })
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Gesture {
    /// The pointer moved past the drag threshold with the button held.
    DragStart,
    Drag { dx: f64, dy: f64 },
    DragEnd,
    Click { x: f64, y: f64 },
    Hover { x: f64, y: f64 },
    Leave,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Press {
    origin: [f64; 2],
    last: [f64; 2],
    dragging: bool,
}

/// Press/move/release state machine separating clicks from drags.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    threshold_px: f64,
    press: Option<Press>,
    position: Option<[f64; 2]>,
}

impl PointerTracker {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            press: None,
            position: None,
        }
    }

    /// Last known pointer position over the canvas.
    pub fn position(&self) -> Option<[f64; 2]> {
        self.position
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    pub fn handle(&mut self, cmd: PointerCommand) -> Vec<Gesture> {
        let finite = |x: f64, y: f64| x.is_finite() && y.is_finite();
        match cmd {
            PointerCommand::Down { x, y } if finite(x, y) => {
                self.position = Some([x, y]);
                self.press = Some(Press {
                    origin: [x, y],
                    last: [x, y],
                    dragging: false,
                });
                Vec::new()
            }
            PointerCommand::Move { x, y } if finite(x, y) => {
                self.position = Some([x, y]);
                let Some(press) = &mut self.press else {
                    return vec![Gesture::Hover { x, y }];
                };
                let mut out = Vec::new();
                if !press.dragging {
                    let moved =
                        ((x - press.origin[0]).powi(2) + (y - press.origin[1]).powi(2)).sqrt();
                    if moved < self.threshold_px {
                        return out;
                    }
                    press.dragging = true;
                    out.push(Gesture::DragStart);
                }
                out.push(Gesture::Drag {
                    dx: x - press.last[0],
                    dy: y - press.last[1],
                });
                press.last = [x, y];
                out
            }
            PointerCommand::Up { x, y } if finite(x, y) => {
                self.position = Some([x, y]);
                match self.press.take() {
                    Some(p) if p.dragging => vec![Gesture::DragEnd],
                    Some(p) => {
                        let moved = ((x - p.origin[0]).powi(2) + (y - p.origin[1]).powi(2)).sqrt();
                        if moved < self.threshold_px {
                            vec![Gesture::Click { x, y }]
                        } else {
                            // Released far away without any move events in between.
                            Vec::new()
                        }
                    }
                    None => Vec::new(),
                }
            }
            PointerCommand::Leave => {
                self.position = None;
                let ended = self.press.take().is_some_and(|p| p.dragging);
                let mut out = Vec::new();
                if ended {
                    out.push(Gesture::DragEnd);
                }
                out.push(Gesture::Leave);
                out
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Gesture, PointerCommand, PointerTracker};

    #[test]
    fn small_motion_is_a_click() {
        let mut t = PointerTracker::new(4.0);
        assert!(t.handle(PointerCommand::Down { x: 10.0, y: 10.0 }).is_empty());
        assert!(t.handle(PointerCommand::Move { x: 12.0, y: 11.0 }).is_empty());
        assert!(t.is_pressed() && !t.is_dragging());
        assert_eq!(
            t.handle(PointerCommand::Up { x: 12.0, y: 11.0 }),
            vec![Gesture::Click { x: 12.0, y: 11.0 }]
        );
        assert!(!t.is_pressed());
    }

    #[test]
    fn motion_past_threshold_drags() {
        let mut t = PointerTracker::new(4.0);
        t.handle(PointerCommand::Down { x: 0.0, y: 0.0 });
        assert_eq!(
            t.handle(PointerCommand::Move { x: 10.0, y: 0.0 }),
            vec![Gesture::DragStart, Gesture::Drag { dx: 10.0, dy: 0.0 }]
        );
        assert!(t.is_dragging());
        assert_eq!(
            t.handle(PointerCommand::Move { x: 15.0, y: -2.0 }),
            vec![Gesture::Drag { dx: 5.0, dy: -2.0 }]
        );
        assert_eq!(
            t.handle(PointerCommand::Up { x: 15.0, y: -2.0 }),
            vec![Gesture::DragEnd]
        );
        assert!(!t.is_dragging());
    }

    #[test]
    fn hover_without_press_and_leave() {
        let mut t = PointerTracker::new(4.0);
        assert_eq!(
            t.handle(PointerCommand::Move { x: 3.0, y: 4.0 }),
            vec![Gesture::Hover { x: 3.0, y: 4.0 }]
        );
        assert_eq!(t.position(), Some([3.0, 4.0]));
        assert_eq!(t.handle(PointerCommand::Leave), vec![Gesture::Leave]);
        assert_eq!(t.position(), None);
    }

    #[test]
    fn non_finite_input_is_dropped() {
        let mut t = PointerTracker::new(4.0);
        assert!(t.handle(PointerCommand::Down { x: f64::NAN, y: 0.0 }).is_empty());
        assert!(t.handle(PointerCommand::Up { x: 0.0, y: 0.0 }).is_empty());
    }
}
