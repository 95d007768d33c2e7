//! Drawing surfaces the render loop presents scenes to

use super::scene::Scene;
use crate::errors::SurfaceError;
use std::cell::RefCell;
use std::rc::Rc;

/// An immediate-mode 2D surface. Receives one complete scene per frame.
pub trait DrawSurface {
    fn present(&mut self, scene: Scene) -> Result<(), SurfaceError>;
}

#[derive(Debug, Default)]
struct BufferState {
    latest: Option<Scene>,
    presented: u64,
    detached: bool,
}

/// Keeps the most recently presented scene for the terminal canvas to draw.
///
/// Cloning shares the buffer: the lab's render loop writes through one
/// clone while the UI reads through another.
#[derive(Debug, Clone, Default)]
pub struct SceneBuffer {
    state: Rc<RefCell<BufferState>>,
}

impl SceneBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the latest scene, if any frame has been presented
    pub fn with_latest<R>(&self, f: impl FnOnce(Option<&Scene>) -> R) -> R {
        f(self.state.borrow().latest.as_ref())
    }

    /// Frames accepted so far
    pub fn presented(&self) -> u64 {
        self.state.borrow().presented
    }

    /// Refuse further scenes (the canvas has been torn down)
    pub fn detach(&self) {
        let mut state = self.state.borrow_mut();
        state.detached = true;
        state.latest = None;
    }
}

impl DrawSurface for SceneBuffer {
    fn present(&mut self, scene: Scene) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        if state.detached {
            return Err(SurfaceError::Detached);
        }
        if let Some(index) = scene.first_non_finite() {
            return Err(SurfaceError::NonFinite { index });
        }
        state.latest = Some(scene);
        state.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::{Point, Rgb};

    #[test]
    fn test_rejected_scene_keeps_previous() {
        let buffer = SceneBuffer::new();
        let mut writer = buffer.clone();

        let mut good = Scene::new(10.0, 10.0);
        good.text(Point::new(1.0, 1.0), "ok", Rgb::WHITE);
        writer.present(good).unwrap();

        let mut bad = Scene::new(10.0, 10.0);
        bad.line(Point::new(0.0, 0.0), Point::new(f64::INFINITY, 1.0), Rgb::WHITE);
        assert_eq!(
            writer.present(bad).unwrap_err(),
            SurfaceError::NonFinite { index: 0 }
        );

        assert_eq!(buffer.presented(), 1);
        buffer.with_latest(|scene| assert_eq!(scene.map(Scene::len), Some(1)));
    }

    #[test]
    fn test_detached_buffer_refuses() {
        let buffer = SceneBuffer::new();
        buffer.detach();
        let mut writer = buffer.clone();
        assert_eq!(
            writer.present(Scene::new(1.0, 1.0)).unwrap_err(),
            SurfaceError::Detached
        );
    }
}
