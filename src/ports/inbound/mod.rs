/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., the CLI
/// or the worker driver) use to interact with the application core.
pub mod graph_view_port;
pub mod recalculation_port;

pub use graph_view_port::GraphViewPort;
pub use recalculation_port::RecalculationPort;
