//! UseCase 層
//!
//! ドメイン層の trait だけに依存して、セッションのライフサイクル・イベント配送・
//! typing インジケータを組み立てます。

mod list_participants;
mod presence;
mod router;
mod session;

pub use list_participants::ListParticipantsUseCase;
pub use presence::TypingTracker;
pub use router::{Delivery, EventRouter};
pub use session::SessionController;
