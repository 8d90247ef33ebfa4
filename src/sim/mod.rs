pub mod audio;
pub mod event;
pub mod timer;
pub mod view;
