/// Use cases module containing application business logic orchestration
mod graph_view_session;
mod render_tree;

pub use graph_view_session::GraphViewSession;
pub use render_tree::RenderTreeUseCase;
