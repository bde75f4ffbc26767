use native_dialog::{DialogBuilder, MessageLevel};
use std::error::Error;

/// Show an error dialog for an error that stops droptty from starting
pub fn show_error(error: &dyn Error) {
    let message = error.to_string();
    let _ = DialogBuilder::message()
        .set_level(MessageLevel::Error)
        .set_title("droptty Error")
        .set_text(&message)
        .alert()
        .show();
}
