pub mod block;
pub mod install;
