/// Application layer - graph-view session, render use case and DTOs
///
/// Orchestrates the career graph services and talks to the layout worker,
/// the console and the recalculation endpoint only through ports.
pub mod dto;
pub mod use_cases;
