//! Typed request/response engine for the kernel "dpll" generic netlink
//! family: attribute schema, wire encode/decode, command dispatch, and the
//! async notification loop. Output rendering and CLI option parsing are the
//! `dpll-cli` binary's job; this crate never writes to stdout/stderr itself.

pub mod cursor;
pub mod decode;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod executors;
pub mod model;
pub mod notify;
pub mod numeric;
pub mod render;
pub mod schema;
pub mod sink;
pub mod transport;
pub mod wire;
