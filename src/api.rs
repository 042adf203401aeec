pub mod handlers;
pub mod serve;
pub mod util;
