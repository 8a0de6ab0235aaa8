use eframe::egui;
use render::{CameraMove, FlyCamera};

const MOVE_KEYS: [(egui::Key, CameraMove); 6] = [
    (egui::Key::W, CameraMove::Forward),
    (egui::Key::S, CameraMove::Backward),
    (egui::Key::A, CameraMove::Left),
    (egui::Key::D, CameraMove::Right),
    (egui::Key::Q, CameraMove::Up),
    (egui::Key::E, CameraMove::Down),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct KeyActions {
    pub(crate) toggle_projection: bool,
    pub(crate) quit: bool,
    pub(crate) moved: bool,
}

pub(crate) fn key_move(key: egui::Key) -> Option<CameraMove> {
    MOVE_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, movement)| *movement)
}

/// Reads the keyboard for this frame. Held movement keys move the camera
/// by `speed * dt`; P and Escape are edge-triggered.
pub(crate) fn handle_keyboard(ctx: &egui::Context, camera: &mut FlyCamera) -> KeyActions {
    if ctx.wants_keyboard_input() {
        return KeyActions::default();
    }

    ctx.input(|i| {
        let dt = i.stable_dt.min(0.1);
        let mut actions = KeyActions {
            toggle_projection: i.key_pressed(egui::Key::P),
            quit: i.key_pressed(egui::Key::Escape),
            moved: false,
        };
        for movement in i.keys_down.iter().filter_map(|key| key_move(*key)) {
            camera.process_move(movement, dt);
            actions.moved = true;
        }
        actions
    })
}

/// Screen drag (y down) to look offsets (y up).
pub(crate) fn drag_to_look(delta: egui::Vec2) -> (f32, f32) {
    (delta.x, -delta.y)
}

pub(crate) fn handle_viewport_input(response: &egui::Response, camera: &mut FlyCamera) {
    if response.dragged_by(egui::PointerButton::Primary) {
        let (dx, dy) = drag_to_look(response.drag_motion());
        camera.process_look(dx, dy);
    }

    if !response.hovered() {
        return;
    }

    let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta.y);
    if scroll_delta.abs() > 0.0 {
        // One wheel notch is roughly 50 points.
        camera.process_scroll(scroll_delta / 50.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_directions() {
        assert_eq!(key_move(egui::Key::W), Some(CameraMove::Forward));
        assert_eq!(key_move(egui::Key::S), Some(CameraMove::Backward));
        assert_eq!(key_move(egui::Key::A), Some(CameraMove::Left));
        assert_eq!(key_move(egui::Key::D), Some(CameraMove::Right));
        assert_eq!(key_move(egui::Key::Q), Some(CameraMove::Up));
        assert_eq!(key_move(egui::Key::E), Some(CameraMove::Down));
        assert_eq!(key_move(egui::Key::P), None);
    }

    #[test]
    fn dragging_up_pitches_up() {
        let (dx, dy) = drag_to_look(egui::vec2(4.0, -10.0));
        assert_eq!(dx, 4.0);
        assert_eq!(dy, 10.0);
        let mut camera = FlyCamera::default();
        camera.process_look(dx, dy);
        assert!(camera.pitch > 0.0);
    }

    #[test]
    fn idle_frame_has_no_actions() {
        let ctx = egui::Context::default();
        let mut camera = FlyCamera::default();
        let mut actions = KeyActions::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = handle_keyboard(ctx, &mut camera);
        });
        assert_eq!(actions, KeyActions::default());
        assert_eq!(camera, FlyCamera::default());
    }

    #[test]
    fn pressing_p_toggles_projection() {
        let ctx = egui::Context::default();
        let mut camera = FlyCamera::default();
        let mut actions = KeyActions::default();
        let input = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::P,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            actions = handle_keyboard(ctx, &mut camera);
        });
        assert!(actions.toggle_projection);
        assert!(!actions.quit);
    }

    #[test]
    fn holding_q_raises_the_camera() {
        let ctx = egui::Context::default();
        let mut camera = FlyCamera::default();
        let mut actions = KeyActions::default();
        let input = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Q,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            actions = handle_keyboard(ctx, &mut camera);
        });
        assert!(actions.moved);
        assert!(camera.position.y > FlyCamera::default().position.y);
    }
}
