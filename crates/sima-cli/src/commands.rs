pub mod analyze;
pub mod certify;
pub mod dispatch;
pub mod improve;
pub mod project;
pub mod schema;
pub mod score;
pub mod serve;
pub mod shared;
pub mod timeline;
pub mod upload;
pub mod verify;
pub mod workflow;
