use super::TileInspectorApp;
use eframe::egui::{self, Event, Key, PointerButton, TouchPhase};
use tile_inspector::{InputEvent, Point};

/// Mouse pointer id. Touch ids are shifted by one so they never collide.
const MOUSE_POINTER: u64 = 0;

/// Actions collected while the input lock is held, applied afterwards.
#[derive(Default)]
struct KeyActions {
    reset: bool,
    toggle_seams: bool,
    toggle_preview: bool,
    open: bool,
    rotate: f32,
    tiles: Option<u32>,
}

const TILE_KEYS: [(Key, u32); 9] = [
    (Key::Num1, 1),
    (Key::Num2, 2),
    (Key::Num3, 3),
    (Key::Num4, 4),
    (Key::Num5, 5),
    (Key::Num6, 6),
    (Key::Num7, 7),
    (Key::Num8, 8),
    (Key::Num9, 9),
];

impl TileInspectorApp {
    /// Feeds raw pointer, touch and wheel events over `rect` to the inspector.
    /// Positions are converted to physical canvas pixels.
    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, rect: egui::Rect, hovered: bool) {
        let ppp = ctx.pixels_per_point();
        let to_canvas = |pos: egui::Pos2| Point::new((pos.x - rect.min.x) * ppp, (pos.y - rect.min.y) * ppp);

        let events = ctx.input(|i| i.events.clone());
        for event in events {
            let translated = match event {
                Event::Touch { id, phase, pos, .. } => {
                    let pointer = id.0.wrapping_add(1);
                    match phase {
                        TouchPhase::Start if rect.contains(pos) => {
                            self.active_touches.push(pointer);
                            Some(InputEvent::PointerDown { id: pointer, pos: to_canvas(pos) })
                        }
                        TouchPhase::Start => None,
                        TouchPhase::Move => Some(InputEvent::PointerMove { id: pointer, pos: to_canvas(pos) }),
                        TouchPhase::End | TouchPhase::Cancel => {
                            self.active_touches.retain(|&t| t != pointer);
                            Some(InputEvent::PointerUp { id: pointer })
                        }
                    }
                }
                Event::WindowFocused(false) => {
                    self.active_touches.clear();
                    self.mouse_down = false;
                    self.inspector.cancel_gestures();
                    None
                }
                _ if !self.active_touches.is_empty() => None,
                Event::PointerButton { pos, button: PointerButton::Primary, pressed, .. } => {
                    if pressed && rect.contains(pos) {
                        self.mouse_down = true;
                        Some(InputEvent::PointerDown { id: MOUSE_POINTER, pos: to_canvas(pos) })
                    } else if !pressed && self.mouse_down {
                        self.mouse_down = false;
                        Some(InputEvent::PointerUp { id: MOUSE_POINTER })
                    } else {
                        None
                    }
                }
                Event::PointerMoved(pos) if self.mouse_down => {
                    Some(InputEvent::PointerMove { id: MOUSE_POINTER, pos: to_canvas(pos) })
                }
                Event::PointerGone if self.mouse_down => {
                    self.mouse_down = false;
                    Some(InputEvent::PointerUp { id: MOUSE_POINTER })
                }
                // egui reports "scroll up" as positive; the router expects the opposite
                Event::MouseWheel { delta, .. } if hovered && delta.y != 0.0 => {
                    Some(InputEvent::Wheel { delta_y: -delta.y })
                }
                _ => None,
            };

            if let Some(event) = translated {
                self.inspector.handle_input(&event);
            }
        }
    }

    pub fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let mut actions = KeyActions::default();
        ctx.input(|i| {
            if i.modifiers.ctrl || i.modifiers.alt || i.modifiers.command {
                return;
            }
            actions.reset = i.key_pressed(Key::R);
            actions.toggle_seams = i.key_pressed(Key::E);
            actions.toggle_preview = i.key_pressed(Key::P);
            actions.open = i.key_pressed(Key::O);
            if i.key_pressed(Key::Comma) {
                actions.rotate -= 1.0;
            }
            if i.key_pressed(Key::Period) {
                actions.rotate += 1.0;
            }
            actions.tiles = TILE_KEYS.iter().find(|(key, _)| i.key_pressed(*key)).map(|&(_, n)| n);
        });

        self.apply_key_actions(actions);
    }

    fn apply_key_actions(&mut self, actions: KeyActions) {
        if actions.reset {
            self.inspector.reset_view();
        }
        if actions.toggle_seams {
            self.inspector.toggle_seams();
        }
        if actions.toggle_preview {
            self.inspector.toggle_preview();
        }
        if actions.rotate != 0.0 {
            self.inspector.rotate_step(actions.rotate);
        }
        if let Some(tiles) = actions.tiles {
            if let Err(e) = self.inspector.set_tiles(tiles) {
                self.set_status_message(e.user_message());
            }
        }
        if actions.open {
            self.open_file_dialog();
        }
    }
}
