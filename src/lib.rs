/// Devnet address registry
/// Exports all modules for use as a library crate

pub mod app_state;
pub mod client;
pub mod dispatch;
pub mod emulator_client;
pub mod handlers;
pub mod models;
pub mod registry;

pub use app_state::{AppState, SharedState};
pub use client::{ClientError, RegistryClient};
pub use dispatch::{dispatch, DispatchError};
pub use emulator_client::{EmulatorClient, EmulatorError};
pub use handlers::router;
pub use models::{MethodDescriptor, TypeDescriptor};
pub use registry::{describe_methods, describe_types, Method, MethodError};
