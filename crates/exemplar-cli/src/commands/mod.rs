//! One module per subcommand.

pub mod corpus;
pub mod index;
pub mod retrieve;
pub mod synthesize;
