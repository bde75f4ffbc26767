use crate::message::HostMessage;
use droptty_core::TimerToken;
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use winit::event_loop::EventLoopProxy;

struct ScheduledTimer {
    handle: JoinHandle<()>,
    repeat: bool,
}

/// Runs the controller's timers on a small tokio runtime and posts each expiry back to the
/// event loop.
pub struct TimerService {
    runtime: Runtime,
    proxy: EventLoopProxy<HostMessage>,
    timers: HashMap<TimerToken, ScheduledTimer>,
}

impl TimerService {
    pub fn new(proxy: EventLoopProxy<HostMessage>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("droptty-timers")
            .enable_time()
            .build()?;

        Ok(Self {
            runtime,
            proxy,
            timers: HashMap::new(),
        })
    }

    pub fn start(&mut self, token: TimerToken, delay: Duration, repeat: bool) {
        self.cancel(token);

        let proxy = self.proxy.clone();
        let handle = self.runtime.spawn(async move {
            if repeat {
                let mut interval = interval_at(Instant::now() + delay, delay);
                loop {
                    interval.tick().await;
                    if proxy.send_event(HostMessage::TimerFired(token)).is_err() {
                        break;
                    }
                }
            } else {
                sleep(delay).await;
                let _ = proxy.send_event(HostMessage::TimerFired(token));
            }
        });

        self.timers.insert(token, ScheduledTimer { handle, repeat });
    }

    pub fn cancel(&mut self, token: TimerToken) {
        if let Some(timer) = self.timers.remove(&token) {
            timer.handle.abort();
        }
    }

    /// Called when an expiry reaches the event loop. Returns false for timers that were
    /// cancelled while their expiry was in flight.
    pub fn fired(&mut self, token: TimerToken) -> bool {
        match self.timers.get(&token) {
            Some(timer) if timer.repeat => true,
            Some(_) => {
                self.timers.remove(&token);
                true
            }
            None => false,
        }
    }
}
