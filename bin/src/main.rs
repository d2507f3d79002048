//! CLI entry point (§4.14, out-of-scope collaborators from §1): the
//! hand-rolled leading-option scanner, the help banner text, and wiring
//! the chosen concrete [`Sink`] into the core's dispatcher.

mod sink_json;
mod sink_text;

use dpll::cursor::TokenCursor;
use dpll::dispatch::{self, HelpScope, Route};
use dpll::error::CoreError;
use dpll::sink::{Sink, SinkConfig};
use dpll::transport::Transport;

use sink_json::JsonSink;
use sink_text::PlainTextSink;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage_top() -> &'static str {
    "usage: dpll [-V|-j|-p] <device|pin|monitor|help> ...\n\
dpll device show [id ID]\n\
dpll device set id ID [phase-offset-monitor {true|false|1|0}] [phase-offset-avg-factor U32]\n\
dpll device id-get [module-name STR] [clock-id U64] [type {pps|eec}]\n\
dpll pin show [id ID] [device ID]\n\
dpll pin set id ID [frequency U64] [direction {input|output}] [prio U32]\n\
               [state {connected|disconnected|selectable}] [phase-adjust S32] [esync-frequency U64]\n\
               [parent-device ID ...] [parent-pin ID ...] [reference-sync ID ...]\n\
dpll pin id-get [module-name STR] [clock-id U64] [board-label STR] [panel-label STR]\n\
                [package-label STR] [type {mux|ext|synce-eth-port|int-oscillator|gnss}]\n\
dpll monitor"
}

fn usage_for(scope: HelpScope) -> String {
    match scope {
        HelpScope::Top => usage_top().to_string(),
        HelpScope::Device => "usage: dpll device <show|set|id-get|help>".to_string(),
        HelpScope::DeviceVerb("show") => "usage: dpll device show [id ID]".to_string(),
        HelpScope::DeviceVerb("set") => "usage: dpll device set id ID [phase-offset-monitor {true|false|1|0}] [phase-offset-avg-factor U32]".to_string(),
        HelpScope::DeviceVerb("id-get") => "usage: dpll device id-get [module-name STR] [clock-id U64] [type {pps|eec}]".to_string(),
        HelpScope::DeviceVerb(_) => usage_top().to_string(),
        HelpScope::Pin => "usage: dpll pin <show|set|id-get|help>".to_string(),
        HelpScope::PinVerb("show") => "usage: dpll pin show [id ID] [device ID]".to_string(),
        HelpScope::PinVerb("set") => "usage: dpll pin set id ID [frequency U64] [direction {input|output}] [prio U32] [state {connected|disconnected|selectable}] [phase-adjust S32] [esync-frequency U64] [parent-device ID ...] [parent-pin ID ...] [reference-sync ID ...]".to_string(),
        HelpScope::PinVerb("id-get") => "usage: dpll pin id-get [module-name STR] [clock-id U64] [board-label STR] [panel-label STR] [package-label STR] [type {mux|ext|synce-eth-port|int-oscillator|gnss}]".to_string(),
        HelpScope::PinVerb(_) => usage_top().to_string(),
        HelpScope::Monitor => "usage: dpll monitor".to_string(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut pos = 0;
    let mut json = false;
    let mut pretty = false;
    while pos < args.len() {
        match args[pos].as_str() {
            "-V" | "--Version" => {
                println!("dpll {VERSION}");
                std::process::exit(0);
            }
            "-j" | "--json" => {
                json = true;
                pos += 1;
            }
            "-p" | "--pretty" => {
                pretty = true;
                pos += 1;
            }
            tok if tok.starts_with('-') => {
                eprintln!("unknown option '{tok}'");
                eprintln!("{}", usage_top());
                std::process::exit(1);
            }
            _ => break,
        }
    }
    let config = SinkConfig::new(json, pretty);

    let tokens = args[pos..].to_vec();
    let mut cursor = TokenCursor::new(&tokens);

    let route = match dispatch::route(&mut cursor) {
        Ok(route) => route,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{}", usage_top());
            std::process::exit(1);
        }
    };

    if let Route::Help(scope) = route {
        eprintln!("{}", usage_for(scope));
        std::process::exit(0);
    }

    let code = if config.json {
        let mut sink = JsonSink::new(config.pretty);
        let result = run_route(route, &mut sink, &mut cursor).await;
        sink.finish();
        exit_code_for(result)
    } else {
        let mut sink = PlainTextSink::new();
        let result = run_route(route, &mut sink, &mut cursor).await;
        exit_code_for(result)
    };
    std::process::exit(code);
}

/// Routes that reach here always need a live transport — `help` is
/// short-circuited above before this is ever called (testable property 4).
async fn run_route(
    route: Route,
    sink: &mut dyn Sink,
    cursor: &mut TokenCursor<'_>,
) -> Result<(), CoreError> {
    let mut transport = Transport::connect().await?;
    dispatch::execute(route, &mut transport, sink, cursor).await
}

fn exit_code_for(result: Result<(), CoreError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    }
}
