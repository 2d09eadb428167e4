use super::FrameInputSnapshot;

/// World state advanced once per visible frame.
pub trait Simulation {
    fn simulate(&mut self, input: &FrameInputSnapshot, time_step_ms: f32);
}

/// Draws the current state of `S`. The renderer only ever sees the state by
/// shared reference.
pub trait Renderer<S: ?Sized> {
    fn render(&mut self, state: &S);
}
