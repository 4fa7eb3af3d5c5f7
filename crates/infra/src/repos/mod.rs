pub mod attachments;
pub mod attendances;
pub mod background_jobs;
pub mod comments;
pub mod extraction_results;
pub mod friends;
pub mod match_team_members;
pub mod matches;
pub mod sessions;
pub mod team_preset_members;

pub use attachments::CreateAttachment;
pub use friends::{CreateFriend, FriendFilter, UpdateFriend};
pub use matches::ConfirmedMatchFilter;
pub use sessions::{
    CreateSession, SessionFilter, SessionOrder, SessionOrderColumn, UpdateSessionInfo,
};
