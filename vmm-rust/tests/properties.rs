use proptest::prelude::*;

use vmm_rust::{
    Access, AccessOutcome, AllocationPolicy, Mmu, ReplacementPolicy, SimConfig, NUM_PROCESSES,
};

const PAGE_SIZE: u64 = 256;

fn trace_strategy() -> impl Strategy<Value = Vec<Access>> {
    prop::collection::vec(
        (0..NUM_PROCESSES, 0..8 * PAGE_SIZE).prop_map(|(pid, address)| Access::new(pid, address)),
        0..120,
    )
}

fn replacement_strategy() -> impl Strategy<Value = ReplacementPolicy> {
    prop::sample::select(ReplacementPolicy::ALL.to_vec())
}

fn allocation_strategy() -> impl Strategy<Value = AllocationPolicy> {
    prop::sample::select(vec![AllocationPolicy::Global, AllocationPolicy::Local])
}

fn run(
    trace: &[Access],
    num_frames: usize,
    replacement: ReplacementPolicy,
    allocation: AllocationPolicy,
) -> u64 {
    let config = SimConfig::new(PAGE_SIZE, num_frames, replacement, allocation)
        .unwrap()
        .with_seed(1);
    Mmu::new(config).simulate(trace.to_vec()).unwrap().total_faults
}

proptest! {
    #[test]
    fn prop_faults_sum_per_process(
        trace in trace_strategy(),
        num_frames in 4usize..12,
        replacement in replacement_strategy(),
        allocation in allocation_strategy(),
    ) {
        let config = SimConfig::new(PAGE_SIZE, num_frames, replacement, allocation).unwrap();
        let stats = Mmu::new(config).simulate(trace.clone()).unwrap();
        prop_assert_eq!(stats.total_faults, stats.process_faults.iter().sum::<u64>());
        prop_assert_eq!(stats.hits + stats.total_faults, trace.len() as u64);
    }

    #[test]
    fn prop_residency_and_quotas_hold_every_step(
        trace in trace_strategy(),
        num_frames in 4usize..12,
        replacement in replacement_strategy(),
        allocation in allocation_strategy(),
    ) {
        let config = SimConfig::new(PAGE_SIZE, num_frames, replacement, allocation).unwrap();
        let mut mmu = Mmu::new(config);
        mmu.load_trace(trace).unwrap();

        if allocation == AllocationPolicy::Local {
            prop_assert_eq!((0..NUM_PROCESSES).map(|pid| mmu.quota(pid)).sum::<usize>(), num_frames);
        }

        while mmu.step().unwrap().is_some() {
            prop_assert!(mmu.frames().resident_count() <= num_frames);
            prop_assert!(mmu.is_consistent());
            if allocation == AllocationPolicy::Local {
                for pid in 0..NUM_PROCESSES {
                    prop_assert!(mmu.frames().count_owned_by(pid) <= mmu.quota(pid));
                }
            }
        }
    }

    #[test]
    fn prop_fifo_evicts_oldest_admission(
        trace in trace_strategy(),
        num_frames in 1usize..6,
    ) {
        let config = SimConfig::new(PAGE_SIZE, num_frames, ReplacementPolicy::Fifo, AllocationPolicy::Global).unwrap();
        let mut mmu = Mmu::new(config);
        mmu.load_trace(trace).unwrap();

        loop {
            // oldest resident load among all frames, taken before the access
            let oldest = (0..num_frames)
                .filter(|&idx| !mmu.frames().get(idx).is_free())
                .min_by_key(|&idx| mmu.frames().get(idx).load_time);
            match mmu.step().unwrap() {
                None => break,
                Some(AccessOutcome::Fault { frame, evicted: Some(_) }) => {
                    prop_assert_eq!(Some(frame), oldest);
                }
                Some(_) => {}
            }
        }
    }

    #[test]
    fn prop_optimal_is_a_lower_bound(
        trace in trace_strategy(),
        num_frames in 1usize..10,
    ) {
        let optimal = run(&trace, num_frames, ReplacementPolicy::Optimal, AllocationPolicy::Global);
        prop_assert!(optimal <= run(&trace, num_frames, ReplacementPolicy::Fifo, AllocationPolicy::Global));
        prop_assert!(optimal <= run(&trace, num_frames, ReplacementPolicy::Lru, AllocationPolicy::Global));
        prop_assert!(optimal <= run(&trace, num_frames, ReplacementPolicy::Random, AllocationPolicy::Global));
    }

    #[test]
    fn prop_lru_spares_the_page_just_hit(
        trace in trace_strategy(),
        num_frames in 2usize..6,
    ) {
        let config = SimConfig::new(PAGE_SIZE, num_frames, ReplacementPolicy::Lru, AllocationPolicy::Global).unwrap();
        let mut mmu = Mmu::new(config);
        mmu.load_trace(trace).unwrap();

        let mut last_hit: Option<usize> = None;
        loop {
            let last_used: Vec<Option<u64>> = mmu
                .frames()
                .iter()
                .map(|frame| if frame.is_free() { None } else { Some(frame.last_used) })
                .collect();

            match mmu.step().unwrap() {
                None => break,
                Some(AccessOutcome::Hit { frame }) => last_hit = Some(frame),
                Some(AccessOutcome::Fault { frame: victim, evicted: Some(_) }) => {
                    let oldest = last_used.iter().flatten().min().copied();
                    prop_assert_eq!(last_used[victim], oldest);
                    if let Some(hit) = last_hit {
                        let older_exists = last_used
                            .iter()
                            .enumerate()
                            .any(|(idx, used)| idx != hit && *used < last_used[hit] && used.is_some());
                        if older_exists {
                            prop_assert_ne!(victim, hit);
                        }
                    }
                    last_hit = None;
                }
                Some(_) => {}
            }
        }
    }
}
