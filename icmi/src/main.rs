//! Launcher binary: parses the CLI, sets up logging and configuration,
//! brings up the control socket, and drives `icm-server` from a `calloop`
//! event loop — grounded on `cosmic-panel-bin`'s `main.rs`/`run()` split,
//! adapted from a desktop-shell-per-output loop to a socket-accept loop.

use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use calloop::generic::Generic;
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, Interest, LoopHandle, Mode, PostAction, Readiness};

use icm_config::{resolve_socket_path, IcmServerConfig};
use icm_server::{ConnectionManager, NullSceneHost, Server};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const USAGE: &str = "USAGE: icmi sock [path]";

/// Everything the event loop's closures need `&mut` access to. `handle` is
/// kept here too so the accept callback can register a source for each
/// freshly connected client without capturing the `EventLoop` itself.
struct AppState {
    server: Server,
    /// No real compositor backs this launcher; a host embedding
    /// `icm-server` as a library supplies its own `SceneHost` (spec.md §6
    /// treats the scene graph as an external collaborator). This binary
    /// exists to prove the wire/dispatch/event stack runs end to end.
    scene: NullSceneHost,
    connections: ConnectionManager,
    start: Instant,
    handle: LoopHandle<'static, AppState>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("sock") => {}
        _ => {
            println!("{USAGE}");
            std::process::exit(1);
        }
    }
    let cli_path = args.next();

    let config = IcmServerConfig::load();
    let socket_path = resolve_socket_path(cli_path.as_deref().or(config.socket_path.as_deref()));

    if socket_path.exists() {
        std::fs::remove_file(&socket_path)
            .with_context(|| format!("failed to remove stale socket at {}", socket_path.display()))?;
    }
    let listener = UnixListener::bind(&socket_path)
        .with_context(|| format!("failed to bind control socket at {}", socket_path.display()))?;
    listener.set_nonblocking(true).context("failed to set listening socket non-blocking")?;
    tracing::info!(path = %socket_path.display(), "icmi listening");

    let mut event_loop: EventLoop<'static, AppState> =
        EventLoop::try_new().context("failed to create event loop")?;
    let handle = event_loop.handle();

    let mut state = AppState {
        server: Server::new(config.decoration),
        scene: NullSceneHost::new(),
        connections: ConnectionManager::new(),
        start: Instant::now(),
        handle: handle.clone(),
    };

    handle
        .insert_source(Generic::new(listener, Interest::READ, Mode::Level), accept_clients)
        .map_err(|e| anyhow::anyhow!("failed to register listening socket: {e}"))?;

    handle
        .insert_source(Timer::from_duration(FRAME_INTERVAL), tick_frame)
        .map_err(|e| anyhow::anyhow!("failed to register output-frame timer: {e}"))?;

    loop {
        event_loop
            .dispatch(Some(FRAME_INTERVAL), &mut state)
            .context("event loop dispatch failed")?;
    }
}

/// Drains every pending connection on the listening socket. `Level` mode
/// means calloop re-checks readiness every dispatch, so a short-read here
/// (leaving a connection still pending) just gets picked up next cycle.
fn accept_clients(_readiness: Readiness, listener: &mut UnixListener, state: &mut AppState) -> io::Result<PostAction> {
    loop {
        match listener.accept() {
            Ok((stream, _addr)) => register_connection(stream, state),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                break;
            }
        }
    }
    Ok(PostAction::Continue)
}

/// Hands the stream to `ConnectionManager` and watches a duplicate fd for
/// readability; the duplicate only drives wakeups, `ConnectionManager` owns
/// the socket used for actual reads and writes.
fn register_connection(stream: UnixStream, state: &mut AppState) {
    let watch_fd = match stream.try_clone() {
        Ok(dup) => dup,
        Err(e) => {
            tracing::warn!(error = %e, "failed to duplicate client socket");
            return;
        }
    };
    let client_id = match state.connections.accept(stream, &mut state.server) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "failed to register client connection");
            return;
        }
    };
    tracing::debug!(client = client_id, "client connected");

    let result = state.handle.insert_source(
        Generic::new(watch_fd, Interest::READ, Mode::Level),
        move |_readiness, _watch_fd, state: &mut AppState| {
            let alive = state.connections.service(client_id, &mut state.server, &mut state.scene);
            Ok(if alive { PostAction::Continue } else { PostAction::Remove })
        },
    );
    if let Err(e) = result {
        tracing::warn!(client = client_id, error = %e, "failed to watch client socket");
    }
}

/// Stands in for `SceneHost::on_output_frame` (spec.md §6): ticks
/// animations, re-evaluates dirty pixel effects, and answers queued
/// screen-copy requests once per scheduled frame.
fn tick_frame(_deadline: Instant, _metadata: &mut (), state: &mut AppState) -> TimeoutAction {
    let elapsed = state.start.elapsed();
    let now_ms = elapsed.as_millis() as u64;
    let time_seconds = elapsed.as_secs_f64();
    let out = icm_server::frame::output_frame(&mut state.server, &mut state.scene, now_ms, time_seconds);
    state.connections.route(out);
    TimeoutAction::ToDuration(FRAME_INTERVAL)
}
