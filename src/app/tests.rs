// Driver and reporter tests

#[cfg(test)]
mod driver {
    use crate::app::*;
    use crate::config::{DiffusionAmplitude, SimConfig};
    use crate::error::SimError;
    use crate::simulation::{ParticleStore, RunRequest, SimulationRun, TickSnapshot};
    use std::time::Duration;
    use ultraviolet::Vec2;

    fn headless<R: Reporter>(config: SimConfig, reporter: R) -> Driver<R> {
        Driver::new(config, reporter).with_frame_delay(Duration::ZERO)
    }

    fn frozen() -> SimConfig {
        SimConfig {
            diffusion: DiffusionAmplitude {
                acid: 0.0,
                base: 0.0,
                product: 0.0,
            },
            ..SimConfig::default()
        }
    }

    struct CancelAfter {
        token: CancelToken,
        after: usize,
        seen: usize,
    }

    impl Reporter for CancelAfter {
        fn on_snapshot(&mut self, _snapshot: &TickSnapshot) {
            self.seen += 1;
            if self.seen == self.after {
                self.token.cancel();
            }
        }
        fn on_complete(&mut self, _completion: &Completion) {}
    }

    #[test]
    fn zero_base_run_is_terminal_without_ticks() {
        let mut driver = headless(SimConfig::default(), CollectingReporter::default());
        driver.start(RunRequest { acid: 5, base: 0 }, 3).unwrap();
        assert_eq!(driver.state(), DriverState::Terminal);

        let before: Vec<Vec2> = driver.run().unwrap().store.acid.iter().map(|p| p.pos).collect();
        let completion = driver.run_to_completion().unwrap();
        assert_eq!(completion.ticks, 0);
        assert_eq!(completion.total_reacted, 0);
        assert_eq!(completion.reason, StopReason::Exhausted);
        assert_eq!(completion.counts.acid.remaining, 5);

        // No tick ran, so the lone acid particles were never displaced
        let after: Vec<Vec2> = driver.run().unwrap().store.acid.iter().map(|p| p.pos).collect();
        assert_eq!(before, after);

        let reporter = driver.into_reporter();
        assert!(reporter.snapshots.is_empty());
        assert_eq!(reporter.completions.len(), 1);
    }

    #[test]
    fn empty_run_completes_immediately() {
        let mut driver = headless(SimConfig::default(), CollectingReporter::default());
        driver.start(RunRequest { acid: 0, base: 0 }, 0).unwrap();
        let completion = driver.run_to_completion().unwrap();
        assert_eq!(completion.ticks, 0);
        assert_eq!(driver.reporter().completions.len(), 1);
    }

    #[test]
    fn close_pairs_finish_in_one_tick() {
        let store = ParticleStore::from_positions(
            &[Vec2::new(0.1, 0.1), Vec2::new(0.5, 0.5), Vec2::new(0.9, 0.9)],
            &[Vec2::new(0.1, 0.12), Vec2::new(0.52, 0.5), Vec2::new(0.9, 0.88)],
        );
        let run = SimulationRun::with_store(store, SimConfig::default(), 1).unwrap();
        let mut driver = headless(SimConfig::default(), CollectingReporter::default());
        driver.start_run(run).unwrap();

        let snapshot = driver.step_once().unwrap();
        assert_eq!(snapshot.reacted_this_tick, 3);
        assert_eq!(snapshot.product.len(), 3);
        assert!(snapshot.acid.is_empty() && snapshot.base.is_empty());
        assert_eq!(driver.state(), DriverState::Terminal);

        let completion = driver.completion().unwrap();
        assert_eq!(completion.ticks, 1);
        assert_eq!(completion.total_reacted, 3);
        assert!(matches!(driver.step_once(), Err(SimError::NotRunning)));
    }

    #[test]
    fn snapshots_arrive_in_tick_order() {
        let mut driver = headless(SimConfig::default(), CollectingReporter::default());
        driver.start(RunRequest { acid: 20, base: 20 }, 99).unwrap();
        let completion = driver.run_to_completion().unwrap();
        assert_eq!(completion.reason, StopReason::Exhausted);
        assert_eq!(completion.total_reacted, 20);

        let reporter = driver.into_reporter();
        assert_eq!(reporter.completions.len(), 1);
        assert_eq!(reporter.snapshots.len() as u64, completion.ticks);
        let mut total = 0;
        for (i, snap) in reporter.snapshots.iter().enumerate() {
            assert_eq!(snap.tick, i as u64 + 1);
            total += snap.reacted_this_tick;
            assert_eq!(snap.total_reacted, total);
            assert_eq!(snap.product.len(), total);
            assert_eq!(snap.counts.acid.reacted, snap.counts.base.reacted);
        }
    }

    #[test]
    fn cancellation_is_observed_between_ticks() {
        let token = CancelToken::new();
        let reporter = CancelAfter {
            token: token.clone(),
            after: 3,
            seen: 0,
        };
        let store = ParticleStore::from_positions(&[Vec2::new(0.1, 0.1)], &[Vec2::new(0.9, 0.9)]);
        let run = SimulationRun::with_store(store, frozen(), 0).unwrap();
        let mut driver = headless(frozen(), reporter).with_cancel_token(token);
        driver.start_run(run).unwrap();

        let completion = driver.run_to_completion().unwrap();
        assert_eq!(completion.reason, StopReason::Cancelled);
        assert_eq!(completion.ticks, 3);
        assert_eq!(driver.state(), DriverState::Terminal);
    }

    #[test]
    fn tick_ceiling_stops_a_stuck_run() {
        let store = ParticleStore::from_positions(&[Vec2::new(0.1, 0.1)], &[Vec2::new(0.9, 0.9)]);
        let run = SimulationRun::with_store(store, frozen(), 0).unwrap();
        let mut driver = headless(frozen(), CollectingReporter::default()).with_max_ticks(5);
        driver.start_run(run).unwrap();
        let completion = driver.run_to_completion().unwrap();
        assert_eq!(completion.reason, StopReason::TickLimit);
        assert_eq!(completion.ticks, 5);
        assert_eq!(driver.reporter().snapshots.len(), 5);
    }

    #[test]
    fn state_transitions_are_enforced() {
        let mut driver = headless(SimConfig::default(), NullReporter);
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(matches!(driver.step_once(), Err(SimError::NotRunning)));
        assert!(matches!(driver.run_to_completion(), Err(SimError::NotRunning)));

        driver.start(RunRequest { acid: 3, base: 3 }, 5).unwrap();
        assert_eq!(driver.state(), DriverState::Running);
        assert!(matches!(
            driver.start(RunRequest { acid: 1, base: 1 }, 5),
            Err(SimError::AlreadyRunning)
        ));

        driver.run_to_completion().unwrap();
        assert_eq!(driver.state(), DriverState::Terminal);
        // A finished driver accepts a new run
        driver.start(RunRequest { acid: 2, base: 2 }, 6).unwrap();
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.run().unwrap().tick, 0);
    }

    #[test]
    fn run_helper_reaches_completion() {
        let settings = RunSettings {
            request: RunRequest { acid: 10, base: 4 },
            config: SimConfig::default(),
            seed: 12,
            max_ticks: 1_000_000,
            frame_delay: Duration::ZERO,
        };
        let driver = run(&settings, NullReporter).unwrap();
        let completion = driver.completion().unwrap();
        assert_eq!(completion.total_reacted, 4);
        assert_eq!(completion.counts.acid.remaining, 6);
    }
}

#[cfg(test)]
mod reporters {
    use crate::app::*;
    use crate::config::SimConfig;
    use crate::simulation::RunRequest;
    use std::time::Duration;

    #[test]
    fn channel_reporter_delivers_in_order() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let handle = std::thread::spawn(move || rx.iter().collect::<Vec<ReportEvent>>());

        let mut driver = Driver::new(SimConfig::default(), ChannelReporter::new(tx))
            .with_frame_delay(Duration::ZERO);
        driver.start(RunRequest { acid: 6, base: 6 }, 21).unwrap();
        let completion = driver.run_to_completion().unwrap();
        drop(driver);

        let events = handle.join().unwrap();
        let (last, frames) = events.split_last().unwrap();
        assert_eq!(last, &ReportEvent::Complete(completion.clone()));
        assert_eq!(frames.len() as u64, completion.ticks);
        for (i, event) in frames.iter().enumerate() {
            match event {
                ReportEvent::Snapshot(snap) => assert_eq!(snap.tick, i as u64 + 1),
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[test]
    fn fanout_feeds_both_reporters() {
        let mut fan = Fanout(CollectingReporter::default(), CollectingReporter::default());
        {
            let mut driver = Driver::new(SimConfig::default(), &mut fan).with_frame_delay(Duration::ZERO);
            driver.start(RunRequest { acid: 4, base: 4 }, 2).unwrap();
            driver.run_to_completion().unwrap();
        }
        assert_eq!(fan.0.snapshots, fan.1.snapshots);
        assert_eq!(fan.0.completions.len(), 1);
        assert_eq!(fan.1.completions.len(), 1);
    }

    #[test]
    fn table_lists_every_species() {
        let run = crate::simulation::SimulationRun::new(RunRequest { acid: 3, base: 2 }, SimConfig::default(), 0)
            .unwrap();
        let table = format_table(&run.counts());
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("H⁺ (acid)"));
        assert!(table.contains("OH⁻ (base)"));
        assert!(table.contains("H₂O (water)"));
    }
}
