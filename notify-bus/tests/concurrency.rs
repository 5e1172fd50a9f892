use notify_bus::{HandleMode, NotifyBus, SubscribeOptions};
use notify_core::{DispatchQueueRef, InMemoryNotifyCenter, InlineQueue, NotifyObject as _};
use notify_macros::NotifyObject;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

const POSTERS: usize = 8;
const POSTS_PER_THREAD: usize = 500;

#[derive(Clone, NotifyObject)]
#[notify(name = "metrics.sample", center = self.center.clone(), key = "value")]
struct Sample {
    center: Arc<InMemoryNotifyCenter>,
    #[notify(payload)]
    value: Option<u64>,
}

impl Sample {
    fn on(center: &Arc<InMemoryNotifyCenter>) -> Self {
        Self {
            center: center.clone(),
            value: None,
        }
    }
}

fn inline_deferred(mode: HandleMode) -> SubscribeOptions {
    SubscribeOptions::builder()
        .queue(Arc::new(InlineQueue) as DispatchQueueRef)
        .defer_execution(true)
        .handle_mode(mode)
        .build()
}

#[test]
fn concurrent_posts_and_flushes_lose_no_handler() {
    let center = Arc::new(InMemoryNotifyCenter::new());
    let bus = NotifyBus::new();
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = ran.clone();
    bus.subscribe_with(&Sample::on(&center), inline_deferred(HandleMode::All), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    let done = AtomicBool::new(false);
    let flushed = thread::scope(|s| {
        let flusher = s.spawn(|| {
            let mut flushed = 0;
            while !done.load(Ordering::SeqCst) {
                flushed += bus.flush("metrics.sample");
                thread::yield_now();
            }
            flushed
        });

        let posters: Vec<_> = (0..POSTERS)
            .map(|t| {
                let center = center.clone();
                s.spawn(move || {
                    for i in 0..POSTS_PER_THREAD {
                        Sample::on(&center)
                            .with_payload(Some((t * POSTS_PER_THREAD + i) as u64))
                            .post()
                            .unwrap();
                    }
                })
            })
            .collect();
        for poster in posters {
            poster.join().unwrap();
        }

        done.store(true, Ordering::SeqCst);
        flusher.join().unwrap()
    });

    let flushed = flushed + bus.flush("metrics.sample");
    assert_eq!(flushed, POSTERS * POSTS_PER_THREAD);
    assert_eq!(ran.load(Ordering::SeqCst), POSTERS * POSTS_PER_THREAD);
    assert!(!bus.has_pending("metrics.sample"));
}

#[test]
fn last_n_bound_holds_under_contention() {
    const KEEP: usize = 3;

    let center = Arc::new(InMemoryNotifyCenter::new());
    let bus = NotifyBus::new();
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = ran.clone();
    bus.subscribe_with(
        &Sample::on(&center),
        inline_deferred(HandleMode::Last(KEEP as isize)),
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    )
    .unwrap();

    let done = AtomicBool::new(false);
    let max_seen = thread::scope(|s| {
        let watcher = s.spawn(|| {
            let mut max_seen = 0;
            while !done.load(Ordering::SeqCst) {
                max_seen = max_seen.max(bus.pending("metrics.sample"));
                thread::yield_now();
            }
            max_seen
        });

        let posters: Vec<_> = (0..POSTERS)
            .map(|_| {
                let center = center.clone();
                s.spawn(move || {
                    for i in 0..POSTS_PER_THREAD {
                        Sample::on(&center)
                            .with_payload(Some(i as u64))
                            .post()
                            .unwrap();
                    }
                })
            })
            .collect();
        for poster in posters {
            poster.join().unwrap();
        }

        done.store(true, Ordering::SeqCst);
        watcher.join().unwrap()
    });

    assert!(max_seen <= KEEP, "buffer grew to {max_seen}");
    assert_eq!(bus.pending("metrics.sample"), KEEP);
    assert_eq!(bus.flush("metrics.sample"), KEEP);
    assert_eq!(ran.load(Ordering::SeqCst), KEEP);
}
