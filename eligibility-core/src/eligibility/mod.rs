pub mod actions;
pub mod manager;
pub mod state;

#[cfg(test)]
mod tests;

pub use actions::EligibilityAction;
pub use manager::EligibilityManager;
pub use state::EligibilityState;

