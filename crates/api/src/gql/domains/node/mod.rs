pub mod resolvers;

pub use resolvers::{Node, NodeQuery};
