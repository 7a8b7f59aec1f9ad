// Services layer for business logic
// Services own business logic and validation, calling storage through core traits

pub mod session;

pub use session::{SaveSessionInput, SessionService, SessionServiceError};
