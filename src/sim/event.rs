/// Events emitted by the view as it changes.
/// The frame loop consumes these for logging.

#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    Accepted,
    NoDodged { hover_count: u32 },
    NoClicked { attempts: u32, message: &'static str },
    BackgroundChanged { index: usize },
    CountdownFinished,
}
