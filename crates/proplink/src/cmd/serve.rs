use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use proplink_bridge::{BridgeSession, PropertyTable, SharedTable};
use proplink_directory::{PropertyType, PropertyValue};
use proplink_frame::FrameConfig;
use proplink_transport::TcpServer;
use tracing::{info, warn};

use crate::cmd::{parse_duration, ServeArgs};
use crate::exit::{transport_error, CliError, CliResult, DATA_INVALID, INTERNAL, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub fn run(args: ServeArgs, _format: OutputFormat) -> CliResult<i32> {
    let heartbeat_interval = parse_duration(&args.heartbeat_interval)?;

    let mut table = PropertyTable::new();
    for spec in &args.properties {
        let (name, value) = parse_property_spec(spec)?;
        table
            .host(name, value)
            .map_err(|err| CliError::new(DATA_INVALID, format!("cannot host {spec:?}: {err}")))?;
    }
    if table.is_empty() {
        return Err(CliError::new(
            USAGE,
            "nothing to serve: add at least one --property name:type[:initial]",
        ));
    }

    let server =
        TcpServer::bind(args.addr.as_str()).map_err(|err| transport_error("bind failed", err))?;
    info!(
        addr = %server.local_addr(),
        properties = table.len(),
        "bridge serving"
    );

    let table: SharedTable = Arc::new(Mutex::new(table));
    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    // Read timeout doubles as the heartbeat tick; keep it well under the
    // interval so idle connections still tick.
    let config = FrameConfig {
        read_timeout: Some(heartbeat_interval / 4),
        ..FrameConfig::default()
    };

    let mut workers = Vec::new();
    let mut accepted = 0usize;

    while running.load(Ordering::SeqCst) {
        let mut session = match BridgeSession::accept(&server, format!("conn-{accepted}"), &config) {
            Ok(session) => session,
            Err(err) => {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                warn!(%err, "accept failed");
                continue;
            }
        };
        accepted = accepted.saturating_add(1);

        let worker_table = Arc::clone(&table);
        let worker_running = Arc::clone(&running);
        workers.push(std::thread::spawn(move || {
            let id = session.id().to_string();
            if let Err(err) = session.serve(&worker_table, &worker_running, heartbeat_interval) {
                warn!(session = %id, %err, "session ended with error");
            }
        }));

        if let Some(max) = args.max_connections {
            if accepted >= max {
                break;
            }
        }
    }

    for worker in workers {
        let _ = worker.join();
    }

    Ok(SUCCESS)
}

/// Parse a `name:type[:initial]` hosting spec.
fn parse_property_spec(spec: &str) -> CliResult<(String, PropertyValue)> {
    let mut parts = spec.splitn(3, ':');
    let name = parts.next().unwrap_or_default();
    let kind = parts.next();
    let initial = parts.next();

    if name.is_empty() {
        return Err(CliError::new(
            USAGE,
            format!("property spec {spec:?} is missing a name"),
        ));
    }
    let kind = kind.ok_or_else(|| {
        CliError::new(USAGE, format!("property spec {spec:?} is missing a type"))
    })?;
    let kind = PropertyType::from_tag(kind)
        .map_err(|err| CliError::new(USAGE, format!("property spec {spec:?}: {err}")))?;

    let value = match initial {
        Some(text) => kind
            .parse_value(text)
            .map_err(|err| CliError::new(USAGE, format!("property spec {spec:?}: {err}")))?,
        None => default_value(kind),
    };

    Ok((name.to_string(), value))
}

fn default_value(kind: PropertyType) -> PropertyValue {
    match kind {
        PropertyType::Int => PropertyValue::Int(0),
        PropertyType::Float => PropertyValue::Float(0.0),
        PropertyType::Bool => PropertyValue::Bool(false),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
