// LSP protocol layer
// - server.rs: Process loop over stdin/stdout
// - dispatcher.rs: Method name to handler routing
// - handlers.rs: Request/notification handlers
// - types.rs: LSP payload types

pub mod dispatcher;
pub mod handlers;
pub mod server;
pub mod types;
