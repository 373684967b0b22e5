//! Demo authentication.
//!
//! Three fixed accounts, one per portal. Credentials are compared exactly; there is no
//! account storage and no password hashing.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::latency::{self, CancelToken, LatencyError, SimulatedLatency};

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Latency(#[from] LatencyError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Portal a session belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Patient,
    Pharmacy,
    Doctor,
}

/// A built-in demo login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub role: UserRole,
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        role: UserRole::Patient,
        email: "patient@demo.ph",
        password: "demo1234",
        name: "Lola Rosa",
    },
    DemoAccount {
        role: UserRole::Pharmacy,
        email: "pharmacy@demo.ph",
        password: "pharma123",
        name: "MedExpress QC Branch",
    },
    DemoAccount {
        role: UserRole::Doctor,
        email: "doctor@demo.ph",
        password: "doctor123",
        name: "Dr. Maria Reyes",
    },
];

/// The signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSession {
    pub role: UserRole,
    pub name: String,
    pub email: String,
}

/// Check credentials against the demo accounts.
pub fn authenticate(email: &str, password: &str) -> AuthResult<AuthSession> {
    DEMO_ACCOUNTS
        .iter()
        .find(|account| account.email == email && account.password == password)
        .map(|account| AuthSession {
            role: account.role,
            name: account.name.to_string(),
            email: account.email.to_string(),
        })
        .ok_or(AuthError::InvalidCredentials)
}

/// Sign in after the simulated network round trip.
pub async fn login(
    email: &str,
    password: &str,
    latency: SimulatedLatency,
    deadline: Duration,
    cancel: &CancelToken,
) -> AuthResult<AuthSession> {
    let outcome = authenticate(email, password);
    let session = latency::simulate(latency, deadline, cancel, outcome).await??;
    tracing::info!(role = ?session.role, "signed in");
    Ok(session)
}
