use super::{Cell, Engine};

/// Remembers where everything was before the most recent tick so that frames
/// drawn between ticks can show the snake and camera partway through their
/// movement
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Smooth {
    previous: Vec<Cell>,
    camera: f64,
}

impl Smooth {
    /// Take note of the engine's current state.  Call this right before
    /// every tick, and after starting a session.
    pub(crate) fn record<R>(&mut self, engine: &Engine<R>) {
        self.previous.clear();
        self.previous.extend(engine.snake());
        self.camera = engine.camera();
    }

    /// Positions of the snake's segments, head first, `alpha` of the way
    /// from their positions before the last tick to their current ones.
    /// A segment added by growth on the last tick has no earlier position and
    /// is placed where it is now.
    pub(crate) fn segments<'a, R>(
        &'a self,
        engine: &'a Engine<R>,
        alpha: f64,
    ) -> impl Iterator<Item = (f64, f64)> + 'a {
        let alpha = alpha.clamp(0.0, 1.0);
        engine.snake().enumerate().map(move |(i, now)| {
            let before = self.previous.get(i).copied().unwrap_or(now);
            (
                lerp(before.x.into(), now.x.into(), alpha),
                lerp(before.y.into(), now.y.into(), alpha),
            )
        })
    }

    /// The camera offset `alpha` of the way through the last tick
    pub(crate) fn camera<R>(&self, engine: &Engine<R>, alpha: f64) -> f64 {
        if self.previous.is_empty() {
            engine.camera()
        } else {
            lerp(self.camera, engine.camera(), alpha.clamp(0.0, 1.0))
        }
    }
}

fn lerp(from: f64, to: f64, alpha: f64) -> f64 {
    (to - from).mul_add(alpha, from)
}
