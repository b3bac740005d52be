use chrono::Utc;
use link26::game::route::{build_route, MAX_ANONYMITY};
use link26::game::trace::{add_noise, decay, TraceInfo, TraceStatus};
use link26::game::worldgen::generate_world;
use link26::game::GameState;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Noise(f64),
    Decay,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![(0.0f64..200.0).prop_map(Step::Noise), Just(Step::Decay)]
}

fn proxy_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec((1usize..=15).prop_map(|n| format!("proxy-{}", n)), 0..8)
}

proptest! {
    #[test]
    fn trace_level_stays_in_bounds(start in 0.0f64..100.0, steps in prop::collection::vec(step(), 0..64)) {
        let world = generate_world(Utc::now());
        let state = GameState::new(Utc::now());
        let host = world.host("charon");
        let mut trace = TraceInfo::new(start, "start");
        for s in steps {
            trace = match s {
                Step::Noise(base) => add_noise(&trace, base, &state.route, host),
                Step::Decay => decay(&trace),
            };
            prop_assert!((0.0..=100.0).contains(&trace.level));
            prop_assert_eq!(trace.status, TraceStatus::from_level(trace.level));
        }
    }

    #[test]
    fn status_follows_thresholds(level in 0.0f64..=100.0) {
        let expected = if level >= 80.0 {
            TraceStatus::Lockdown
        } else if level >= 50.0 {
            TraceStatus::Hunt
        } else if level >= 25.0 {
            TraceStatus::Alert
        } else {
            TraceStatus::Calm
        };
        prop_assert_eq!(TraceStatus::from_level(level), expected);
    }

    #[test]
    fn rebuilding_a_route_changes_nothing(hops in proxy_ids()) {
        let world = generate_world(Utc::now());
        let once = build_route(&hops, &world.proxies);
        let twice = build_route(&once.hops, &world.proxies);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn extra_hops_never_lower_anonymity(hops in proxy_ids(), extra in 1usize..=15) {
        let world = generate_world(Utc::now());
        let base = build_route(&hops, &world.proxies);
        let mut longer = hops.clone();
        longer.push(format!("proxy-{}", extra));
        let extended = build_route(&longer, &world.proxies);
        prop_assert!(extended.anonymity >= base.anonymity);
        prop_assert!(extended.anonymity <= MAX_ANONYMITY);
        prop_assert!(extended.latency_ms > base.latency_ms);
    }
}
