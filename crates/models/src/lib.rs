pub mod errors;
pub mod db;
pub mod provider;
pub mod service;

#[cfg(test)]
mod tests;
