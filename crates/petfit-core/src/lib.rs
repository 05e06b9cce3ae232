pub mod config;
pub mod doctor;
pub mod page;
pub mod pet_panel;
pub mod progress;
pub mod request;
pub mod response;
pub mod size_picker;
pub mod time;
pub mod transport;
