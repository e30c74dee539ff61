//! Account signup, login and profile edits. No tokens are issued; callers
//! carry the returned `userId` themselves.

pub mod handlers;
pub mod password;
