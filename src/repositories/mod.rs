pub mod post_repository;
#[cfg(test)]
pub mod memory_post_repository;
