// Google sign-in: explicit identity initialization and the signed-in session.

pub mod handlers;
pub mod identity;
pub mod session;
