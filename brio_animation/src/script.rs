//! The animation script: drives a `Timeline` from the node update phase
//! and multicasts its lifecycle as events.

use crate::timeline::Timeline;
use brio_events::EventCaller;
use brio_ids::ScriptKey;
use brio_nodes::{Script, ScriptCtx};
use std::any::Any;

/// Payload for timeline events. `progress` is only meaningful on
/// `updated`; the other events carry the default value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationArgs {
    pub progress: f64,
}

/// One `EventCaller` per timeline phase. The sender is the timeline
/// itself, so handlers can pause, reset or re-target it mid-run.
#[derive(Debug, Default)]
pub struct AnimationEvents {
    /// Fires every tick spent inside the delay phase.
    pub delaying: EventCaller<Timeline, AnimationArgs>,
    /// Fires once per run, on the tick that crosses the delay.
    pub started: EventCaller<Timeline, AnimationArgs>,
    /// Fires every tick past the delay, with clamped progress.
    pub updated: EventCaller<Timeline, AnimationArgs>,
    /// Fires once when the run overshoots its duration.
    pub stopped: EventCaller<Timeline, AnimationArgs>,
}

/// Attach to a node and call `timeline.play()`; every update the script
/// accumulates the frame dt and fires the matching events. A finished run
/// halts and rewinds (unless `reset_on_finish` is cleared), and re-arms
/// for another pass when `repeated` is set.
#[derive(Debug, Default)]
pub struct AnimationScript {
    pub timeline: Timeline,
    pub events: AnimationEvents,
}

impl AnimationScript {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            events: AnimationEvents::default(),
        }
    }

    /// Advance one frame. No-op while the timeline is paused.
    pub fn tick(&mut self, dt: f64) {
        if !self.timeline.is_playing() {
            return;
        }
        let crossed_delay = self.timeline.advance(dt);
        if self.timeline.is_delaying() {
            self.events.delaying.call(&mut self.timeline, None);
            return;
        }
        if crossed_delay {
            self.events.started.call(&mut self.timeline, None);
        }

        let mut args = AnimationArgs {
            progress: self.timeline.progress(),
        };
        self.events.updated.call(&mut self.timeline, Some(&mut args));

        if self.timeline.is_finished() {
            self.timeline.pause();
            self.events.stopped.call(&mut self.timeline, None);
            if self.timeline.reset_on_finish || self.timeline.repeated {
                self.timeline.reset();
            }
            if self.timeline.repeated {
                self.timeline.play();
            }
        }
    }
}

impl Script for AnimationScript {
    fn key() -> ScriptKey {
        ScriptKey::from_name("AnimationScript")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_update(&mut self, ctx: &mut ScriptCtx<'_>) {
        self.tick(ctx.dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brio_nodes::{Node, NodeArena};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn traced_script(timeline: Timeline) -> (AnimationScript, Log) {
        let mut script = AnimationScript::new(timeline);
        let log: Log = Rc::default();
        for (name, caller) in [
            ("delaying", &mut script.events.delaying),
            ("started", &mut script.events.started),
            ("stopped", &mut script.events.stopped),
        ] {
            let log = Rc::clone(&log);
            caller.register(move |_, _| log.borrow_mut().push(name.into()));
        }
        let updates = Rc::clone(&log);
        script
            .events
            .updated
            .register(move |_, args| updates.borrow_mut().push(format!("p={}", args.progress)));
        (script, log)
    }

    #[test]
    fn a_full_run_fires_the_phases_in_order() {
        // Delay 0.5s, run 1.0s, ticked in exact quarter seconds.
        let (mut script, log) = traced_script(Timeline::new(1.0, 0.5));
        script.timeline.play();
        for _ in 0..8 {
            script.tick(0.25);
        }
        assert_eq!(
            *log.borrow(),
            [
                "delaying", // 0.25
                "started",  // 0.50 crosses the delay
                "p=0",
                "p=0.25", // 0.75
                "p=0.5",  // 1.00
                "p=0.75", // 1.25
                "p=1",    // 1.50, exactly delay + duration: not finished yet
                "p=1",    // 1.75 overshoots
                "stopped",
            ]
        );
        assert!(!script.timeline.is_playing());
        // Rewound by the default reset_on_finish, armed for a fresh run.
        assert_eq!(script.timeline.elapsed(), 0.0);
        assert!(!script.timeline.is_started());
    }

    #[test]
    fn stopped_fires_exactly_once_without_repeat() {
        let (mut script, log) = traced_script(Timeline::new(0.5, 0.0));
        script.timeline.play();
        for _ in 0..10 {
            script.tick(0.25);
        }
        let stops = log.borrow().iter().filter(|e| *e == "stopped").count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn pause_freezes_and_play_resumes_in_place() {
        let (mut script, log) = traced_script(Timeline::new(1.0, 0.0));
        script.timeline.play();
        script.tick(0.25);
        script.timeline.pause();
        script.tick(5.0);
        assert_eq!(script.timeline.elapsed(), 0.25);
        script.timeline.play();
        script.tick(0.25);
        assert_eq!(*log.borrow(), ["started", "p=0.25", "p=0.5"]);
    }

    #[test]
    fn repeated_runs_re_arm_themselves() {
        let (mut script, log) = traced_script(Timeline::new(0.5, 0.0));
        script.timeline.repeated = true;
        script.timeline.play();
        // Two complete runs: each needs 0.75s to overshoot 0.5s.
        for _ in 0..6 {
            script.tick(0.25);
        }
        let stops = log.borrow().iter().filter(|e| *e == "stopped").count();
        assert_eq!(stops, 2);
        assert!(script.timeline.is_playing());
        assert_eq!(script.timeline.elapsed(), 0.0);
    }

    #[test]
    fn clearing_reset_on_finish_halts_in_place() {
        let (mut script, _) = traced_script(Timeline::new(0.5, 0.0));
        script.timeline.reset_on_finish = false;
        script.timeline.play();
        for _ in 0..3 {
            script.tick(0.25);
        }
        assert!(!script.timeline.is_playing());
        // Elapsed and progress stay readable after the run.
        assert!(script.timeline.elapsed() > 0.5);
        assert_eq!(script.timeline.progress(), 1.0);
        assert!(script.timeline.is_started());
    }

    #[test]
    fn accumulated_float_ticks_stop_on_the_overshooting_tick() {
        let mut script = AnimationScript::new(Timeline::new(1.0, 0.2));
        script.timeline.reset_on_finish = false;
        let progresses: Rc<RefCell<Vec<f64>>> = Rc::default();
        let stops: Rc<RefCell<u32>> = Rc::default();
        let seen = Rc::clone(&progresses);
        script
            .events
            .updated
            .register(move |_, args| seen.borrow_mut().push(args.progress));
        let counted = Rc::clone(&stops);
        script
            .events
            .stopped
            .register(move |_, _| *counted.borrow_mut() += 1);
        script.timeline.play();

        // Ten 0.1s ticks accumulate just shy of 1.0 in binary float.
        for _ in 0..10 {
            script.tick(0.1);
        }
        assert_eq!(*stops.borrow(), 0);
        let last = *progresses.borrow().last().unwrap();
        assert!((last - 0.8).abs() < 1e-9);

        // Lands exactly on delay + duration: progress caps but the run
        // is not finished yet.
        script.tick(0.2);
        assert_eq!(*stops.borrow(), 0);
        assert_eq!(*progresses.borrow().last().unwrap(), 1.0);
        assert!((script.timeline.elapsed() - 1.2).abs() < 1e-9);

        // The next tick overshoots and fires the single stop.
        script.tick(0.2);
        assert_eq!(*stops.borrow(), 1);
        assert!(!script.timeline.is_playing());
    }

    #[test]
    fn the_node_update_phase_drives_the_timeline() {
        let mut arena = NodeArena::new();
        let host = arena.insert(Node::new("host"));
        arena.add_script::<AnimationScript>(host);
        arena
            .get_script_mut::<AnimationScript>(host)
            .unwrap()
            .timeline
            .play();

        arena.raise_update_event(host, 0.25, true);
        arena.raise_update_event(host, 0.25, true);
        let script = arena.get_script::<AnimationScript>(host).unwrap();
        assert_eq!(script.timeline.elapsed(), 0.5);
        assert_eq!(script.timeline.progress(), 0.5);
    }
}
