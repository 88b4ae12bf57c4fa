use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Something that can run a callback once on the next frame. Dropping the
/// returned handle must cancel the callback if it has not run yet.
pub trait FrameScheduler {
    type Handle;

    fn schedule(&self, callback: Box<dyn FnOnce()>) -> Self::Handle;
}

struct LoopState<S: FrameScheduler> {
    scheduler: S,
    running: Cell<bool>,
    frames: Cell<u64>,
    pending: RefCell<Option<S::Handle>>,
    tick: RefCell<Box<dyn FnMut()>>,
}

pub struct AnimationLoop<S: FrameScheduler + 'static> {
    state: Rc<LoopState<S>>,
}

impl<S: FrameScheduler + 'static> AnimationLoop<S> {
    pub fn start(scheduler: S, tick: impl FnMut() + 'static) -> Self {
        let state = Rc::new(LoopState {
            scheduler,
            running: Cell::new(true),
            frames: Cell::new(0),
            pending: RefCell::new(None),
            tick: RefCell::new(Box::new(tick)),
        });
        schedule_next(&state);
        Self { state }
    }

    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }

    pub fn stop(&self) {
        self.state.running.set(false);
        self.state.pending.borrow_mut().take();
    }
}

impl<S: FrameScheduler + 'static> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule_next<S: FrameScheduler + 'static>(state: &Rc<LoopState<S>>) {
    if !state.running.get() {
        return;
    }

    let weak: Weak<LoopState<S>> = Rc::downgrade(state);
    let handle = state.scheduler.schedule(Box::new(move || {
        if let Some(state) = weak.upgrade() {
            run_frame(&state);
        }
    }));
    *state.pending.borrow_mut() = Some(handle);
}

fn run_frame<S: FrameScheduler + 'static>(state: &Rc<LoopState<S>>) {
    state.pending.borrow_mut().take();
    if !state.running.get() {
        return;
    }

    {
        let mut tick = state.tick.borrow_mut();
        (*tick)();
    }
    state.frames.set(state.frames.get() + 1);
    schedule_next(state);
}

#[cfg(target_arch = "wasm32")]
pub struct BrowserFrames;

#[cfg(target_arch = "wasm32")]
impl FrameScheduler for BrowserFrames {
    type Handle = gloo::render::AnimationFrame;

    fn schedule(&self, callback: Box<dyn FnOnce()>) -> Self::Handle {
        gloo::render::request_animation_frame(move |_timestamp| callback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    type Queue = Rc<RefCell<VecDeque<(Rc<Cell<bool>>, Box<dyn FnOnce()>)>>>;

    struct Cancel(Rc<Cell<bool>>);

    impl Drop for Cancel {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[derive(Clone, Default)]
    struct ManualFrames {
        queue: Queue,
    }

    impl ManualFrames {
        fn fire(&self) -> bool {
            loop {
                let next = self.queue.borrow_mut().pop_front();
                match next {
                    Some((cancelled, _)) if cancelled.get() => continue,
                    Some((_, callback)) => {
                        callback();
                        return true;
                    }
                    None => return false,
                }
            }
        }

        fn live(&self) -> usize {
            self.queue
                .borrow()
                .iter()
                .filter(|(cancelled, _)| !cancelled.get())
                .count()
        }
    }

    impl FrameScheduler for ManualFrames {
        type Handle = Cancel;

        fn schedule(&self, callback: Box<dyn FnOnce()>) -> Cancel {
            let cancelled = Rc::new(Cell::new(false));
            self.queue
                .borrow_mut()
                .push_back((cancelled.clone(), callback));
            Cancel(cancelled)
        }
    }

    #[test]
    fn each_frame_runs_tick_and_schedules_exactly_one_more() {
        let frames = ManualFrames::default();
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        let animation = AnimationLoop::start(frames.clone(), move || counter.set(counter.get() + 1));

        for _ in 0..3 {
            assert_eq!(frames.live(), 1);
            assert!(frames.fire());
        }

        assert_eq!(ticks.get(), 3);
        assert_eq!(animation.frames(), 3);
        assert!(animation.state.running.get());
    }

    #[test]
    fn frame_count_stops_after_stop() {
        let frames = ManualFrames::default();
        let animation = AnimationLoop::start(frames.clone(), || ());
        frames.fire();
        frames.fire();

        animation.stop();

        assert_eq!(frames.live(), 0);
        assert!(!frames.fire());
        assert_eq!(animation.frames(), 2);
        assert!(!animation.state.running.get());
    }

    #[test]
    fn dropping_the_loop_cancels_the_pending_frame() {
        let frames = ManualFrames::default();
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();

        for _ in 0..5 {
            let animation = AnimationLoop::start(frames.clone(), {
                let counter = counter.clone();
                move || counter.set(counter.get() + 1)
            });
            drop(animation);
        }

        assert_eq!(frames.live(), 0);
        assert!(!frames.fire());
        assert_eq!(ticks.get(), 0);
    }
}
