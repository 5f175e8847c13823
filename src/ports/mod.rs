/// Ports module defining interfaces for hexagonal architecture
///
/// Inbound ports are what drivers (the CLI, the JSON-lines worker loop) call;
/// outbound ports are what the core needs from files, the console, the
/// layout worker thread and the recalculation API.
pub mod inbound;
pub mod outbound;
