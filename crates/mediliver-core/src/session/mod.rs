//! Session state: demo sign-in, checkout, the reducer and per-portal views.

mod auth;
mod payment;
mod state;
mod views;

pub use auth::*;
pub use payment::*;
pub use state::*;
pub use views::*;
