//! Command Dispatcher (§4.8): three-level token routing down to the right
//! Operation Executor, and the transport-necessity pre-check that keeps
//! `help` offline (testable property 4).
//!
//! Help text itself is an external collaborator's job (§1 Out of scope);
//! this module only decides *that* help was asked for and at what scope,
//! leaving the banner content to the `dpll-cli` binary.

use crate::cursor::TokenCursor;
use crate::error::{ArgError, CoreError};
use crate::executors::{device, pin};
use crate::notify;
use crate::sink::Sink;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpScope {
    Top,
    Device,
    DeviceVerb(&'static str),
    Pin,
    PinVerb(&'static str),
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Help(HelpScope),
    DeviceShow,
    DeviceSet,
    DeviceIdGet,
    PinShow,
    PinSet,
    PinIdGet,
    Monitor,
}

/// Routes the object/verb prefix of `cursor`, consuming exactly those
/// tokens and leaving the rest for the Operation Executor.
pub fn route(cursor: &mut TokenCursor) -> Result<Route, ArgError> {
    match cursor.take() {
        None => Ok(Route::Help(HelpScope::Top)),
        Some("help") => Ok(Route::Help(HelpScope::Top)),
        Some("device") => route_device(cursor),
        Some("pin") => route_pin(cursor),
        Some("monitor") => Ok(Route::Monitor),
        Some(other) => Err(ArgError::Usage(other.to_string())),
    }
}

fn route_device(cursor: &mut TokenCursor) -> Result<Route, ArgError> {
    match cursor.take() {
        None => Ok(Route::Help(HelpScope::Device)),
        Some("help") => Ok(Route::Help(HelpScope::Device)),
        Some("show") => Ok(end_in_help(cursor, Route::DeviceShow, HelpScope::DeviceVerb("show"))),
        Some("set") => Ok(end_in_help(cursor, Route::DeviceSet, HelpScope::DeviceVerb("set"))),
        Some("id-get") => Ok(end_in_help(
            cursor,
            Route::DeviceIdGet,
            HelpScope::DeviceVerb("id-get"),
        )),
        Some(other) => Err(ArgError::Usage(other.to_string())),
    }
}

fn route_pin(cursor: &mut TokenCursor) -> Result<Route, ArgError> {
    match cursor.take() {
        None => Ok(Route::Help(HelpScope::Pin)),
        Some("help") => Ok(Route::Help(HelpScope::Pin)),
        Some("show") => Ok(end_in_help(cursor, Route::PinShow, HelpScope::PinVerb("show"))),
        Some("set") => Ok(end_in_help(cursor, Route::PinSet, HelpScope::PinVerb("set"))),
        Some("id-get") => Ok(end_in_help(
            cursor,
            Route::PinIdGet,
            HelpScope::PinVerb("id-get"),
        )),
        Some(other) => Err(ArgError::Usage(other.to_string())),
    }
}

/// A verb immediately followed by `help` is verb-level help rather than
/// the verb's own argument loop — no executor keyword is ever named
/// `help`, so the check doesn't need to look further than one token.
fn end_in_help(cursor: &mut TokenCursor, route: Route, help: HelpScope) -> Route {
    if cursor.match_and_advance("help") {
        Route::Help(help)
    } else {
        route
    }
}

/// `help` never needs a live transport; every other route does.
pub fn needs_transport(route: &Route) -> bool {
    !matches!(route, Route::Help(_))
}

/// Runs a non-help route against an already-open transport.
pub async fn execute(
    route: Route,
    transport: &mut Transport,
    sink: &mut dyn Sink,
    cursor: &mut TokenCursor<'_>,
) -> Result<(), CoreError> {
    match route {
        Route::Help(_) => Ok(()),
        Route::DeviceShow => device::show(transport, sink, cursor).await,
        Route::DeviceSet => device::set(transport, cursor).await,
        Route::DeviceIdGet => device::id_get(transport, sink, cursor).await,
        Route::PinShow => pin::show(transport, sink, cursor).await,
        Route::PinSet => pin::set(transport, cursor).await,
        Route::PinIdGet => pin::id_get(transport, sink, cursor).await,
        Route::Monitor => notify::run(transport, sink).await,
    }
}
