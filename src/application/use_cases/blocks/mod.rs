pub mod install_block;
pub mod search_blocks;
