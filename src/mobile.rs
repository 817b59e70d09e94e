//! Touch Support
//!
//! Input mode selection. The auto-scroll loop runs only while a touch drag
//! is active and is owned by `BoardDnd`.

use board_dragdrop::web::is_touch_device;
use board_dragdrop::InputMode;

/// Chosen once when the board mounts, never per event
pub fn detect_input_mode() -> InputMode {
    let mode = InputMode::detect(is_touch_device());
    log::info!("[DND] input mode: {:?}", mode);
    mode
}
