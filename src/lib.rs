// Loom language server
// - rpc: framing, envelopes, async transport
// - lsp: payload types, dispatcher, handlers, process loop
// - analysis: session state and the analyzer boundary

pub mod analysis;
pub mod cli;
pub mod config;
pub mod log;
pub mod lsp;
pub mod rpc;
