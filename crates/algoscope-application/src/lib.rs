pub mod request_lifecycle;
pub mod session_store;

pub use request_lifecycle::{
    FailureClass, RejectReason, RequestGate, RequestPermit, SendOutcome, dispatch,
};
pub use session_store::SessionStore;
