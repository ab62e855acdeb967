//! The single-threaded control loop: a non-blocking accept loop that
//! alternates between servicing a request and letting the indexer take a
//! bounded step, per the cooperative scheduling model. No suspension point
//! in this loop ever waits longer than a few milliseconds, and a request
//! being serviced always runs to completion before the loop advances the
//! idle scheduler again — so idle ticks and request handling never race.

use std::io::BufReader;
use std::net::{TcpListener, TcpStream};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use snapfind_protocol::codec::{self, HttpResponse};

use crate::config::DaemonConfig;
use crate::error::ApiError;
use crate::idle::{IdleFire, IdleScheduler};
use crate::router::{self, RouteResult};
use crate::state::DaemonState;

/// Upper bound on how long the loop sleeps between `accept()` attempts
/// while idle; keeps a connecting client's latency under this even if no
/// idle deadline is closer.
const MAX_ACCEPT_POLL: Duration = Duration::from_millis(10);

pub fn serve(config: DaemonConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)?;
    listener.set_nonblocking(true)?;
    info!("snapfindd listening on {addr}");

    let mut state = DaemonState::new(config)?;
    let mut idle = IdleScheduler::new();
    // Held for the daemon's lifetime: the indexer always wants hi-idle
    // ticks, since a freshly `add_dir`-ed directory can show up at any
    // time and there is no cheap way to tell "nothing left to walk" apart
    // from checking on every tick.
    let _indexing_subscription = idle.subscribe();

    loop {
        match listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = handle_connection(&mut state, stream) {
                    warn!("connection from {peer} failed: {e}");
                }
                if should_exit(&state) {
                    return Ok(());
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                run_idle_tick(&mut state, &mut idle);
                std::thread::sleep(MAX_ACCEPT_POLL);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn should_exit(state: &DaemonState) -> bool {
    state.exiting
}

fn run_idle_tick(state: &mut DaemonState, idle: &mut IdleScheduler) {
    match idle.poll(Instant::now()) {
        IdleFire::None => {}
        IdleFire::Hi | IdleFire::Lo => {
            let outcome = state.indexer.step(&mut state.index);
            if !matches!(outcome, snapfind_indexer::StepOutcome::Idle) {
                log::trace!("idle tick: {outcome:?}");
            }
        }
    }
}

fn handle_connection(state: &mut DaemonState, stream: TcpStream) -> anyhow::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    let request = match codec::read_request(&mut reader) {
        Ok(req) => req,
        Err(e) => {
            // A client that disconnects before sending a full request is
            // not this daemon's problem; swallow it like any other
            // client-I/O failure.
            log::debug!("malformed or aborted request: {e}");
            return Ok(());
        }
    };

    let response = match router::dispatch(state, &request) {
        Ok(RouteResult::Respond(resp)) => resp,
        Ok(RouteResult::RespondThenExit(resp)) => {
            state.exiting = true;
            resp
        }
        Err(err) => error_response(&err),
    };

    // Client-I/O failures (write to a disconnected socket) are swallowed
    // silently rather than propagated, matching the documented policy.
    let _ = codec::write_response(&mut writer, &response);
    Ok(())
}

fn error_response(err: &ApiError) -> HttpResponse {
    if err.should_log_trace() {
        error!("request handler failed: {err:#}");
    } else {
        log::debug!("request failed: {err}");
    }

    if err.has_empty_body() {
        HttpResponse { status: err.status(), reason: err.reason().to_string(), headers: Vec::new(), body: Vec::new() }
    } else {
        codec::json_response(err.status(), err.reason(), &err.body())
            .unwrap_or_else(|_| HttpResponse { status: 500, reason: "Internal Server Error".to_string(), headers: Vec::new(), body: Vec::new() })
    }
}
