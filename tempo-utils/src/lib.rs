/// Embed construction from rendered pages and notices.
pub mod embed;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Paginated-session machinery: rendering, registry, components, responses.
pub mod pagination;
