// One module per GraphQL domain: types.rs (objects, inputs, payloads),
// resolvers.rs (Query/Mutation fragments) and service.rs (workflows).

pub mod attachments;
pub mod auth;
pub mod friends;
pub mod matches;
pub mod node;
pub mod sessions;
pub mod statistics;
